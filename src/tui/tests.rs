#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tokio::sync::mpsc;

    use crate::config::TriageConfig;
    use crate::form::elements::{FILE_PLACEHOLDER, UiElements};
    use crate::form::ingest::IngestResolution;
    use crate::form::types::{
        FormState, IngestOutcome, InputSelection, SubmissionInput, SubmissionOutcome,
    };
    use crate::form::FormController;
    use crate::tui::app::{dropped_path, App};
    use crate::tui::types::InputMode;

    fn controller() -> (FormController, mpsc::UnboundedReceiver<IngestResolution>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (FormController::new(tx), rx)
    }

    fn temp_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "some email content").unwrap();
        path
    }

    #[tokio::test]
    async fn test_app_creation() {
        let app = App::new(&TriageConfig::default()).unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.form.state, FormState::Idle);
        assert!(app.form.selection.is_empty());
        assert!(!app.form.ui.submit_enabled);
        assert!(app.form.ui.input_visible);
        assert!(!app.form.ui.output_visible);
        assert!(!app.should_quit);
    }

    #[test]
    fn at_most_one_input_mode_is_populated() {
        let (mut form, _rx) = controller();

        form.on_text_edited("hello".to_string());
        assert!(matches!(form.selection, InputSelection::Text(_)));
        assert!(!form.ui.file_enabled);

        form.on_text_edited(String::new());
        assert!(form.selection.is_empty());
        assert!(form.ui.file_enabled);

        // Whitespace-only text is not an input.
        form.on_text_edited("   ".to_string());
        assert!(form.selection.is_empty());
        assert!(!form.ui.submit_enabled);
    }

    #[tokio::test]
    async fn selecting_a_file_takes_over_from_typed_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "mail.txt");
        let (mut form, _rx) = controller();

        form.on_text_edited("hello".to_string());
        form.on_file_selected(path);

        // Text side is cleared and locked; the file owns the input now.
        assert!(form.ui.text_value.is_empty());
        assert!(!form.ui.text_enabled);
        assert!(matches!(form.selection, InputSelection::File { .. }));
        assert_eq!(form.state, FormState::ReadingFile);

        // Submit uses the file once the read settles.
        form.resolve_ingest(form.read_generation(), IngestOutcome::Loaded);
        assert!(form.ui.submit_enabled);
        let input = form.begin_submission().unwrap();
        assert!(matches!(input, SubmissionInput::File { name, .. } if name == "mail.txt"));
    }

    #[tokio::test]
    async fn typing_clears_a_selected_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "mail.txt");
        let (mut form, _rx) = controller();

        form.on_file_selected(path);
        form.on_text_edited("h".to_string());

        assert!(matches!(form.selection, InputSelection::Text(_)));
        assert_eq!(form.ui.file_message, FILE_PLACEHOLDER);
        assert!(!form.ui.file_loading);
        assert!(!form.ui.file_enabled);
    }

    #[test]
    fn eligibility_tracks_trimmed_text() {
        let (mut form, _rx) = controller();
        assert!(!form.ui.submit_enabled);

        form.on_text_edited("refund request".to_string());
        assert!(form.ui.submit_enabled);
        assert_eq!(form.state, FormState::ReadyToSubmit);

        form.on_text_edited(String::new());
        assert!(!form.ui.submit_enabled);
        assert_eq!(form.state, FormState::Idle);
    }

    #[tokio::test]
    async fn pending_read_is_not_yet_submittable() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "mail.txt");
        let (mut form, _rx) = controller();

        form.on_file_selected(path);
        assert!(form.ui.file_loading);
        assert!(!form.ui.submit_enabled);

        form.resolve_ingest(form.read_generation(), IngestOutcome::Loaded);
        assert!(!form.ui.file_loading);
        assert!(form.ui.submit_enabled);
        assert_eq!(form.ui.file_message, "file loaded: mail.txt");
    }

    #[tokio::test]
    async fn failed_read_clears_selection_and_reenables_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "mail.txt");
        let (mut form, _rx) = controller();

        form.on_file_selected(path);
        form.resolve_ingest(
            form.read_generation(),
            IngestOutcome::Failed("disk error".to_string()),
        );

        assert!(form.selection.is_empty());
        assert!(form.ui.text_enabled);
        assert!(!form.ui.file_loading);
        assert!(form.ui.file_message.contains("mail.txt"));
        assert!(!form.ui.submit_enabled);
        assert_eq!(form.state, FormState::Idle);
    }

    #[tokio::test]
    async fn fallback_expiry_is_a_soft_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "big.bin");
        let (mut form, _rx) = controller();

        form.on_file_selected(path);
        form.resolve_ingest(form.read_generation(), IngestOutcome::FallbackExpired);

        assert_eq!(form.ui.file_message, "file selected: big.bin");
        assert!(!form.ui.file_loading);
        assert!(form.ui.submit_enabled);
        assert!(matches!(form.selection, InputSelection::File { .. }));
    }

    #[tokio::test]
    async fn stale_read_resolution_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let first = temp_file(&dir, "first.txt");
        let second = temp_file(&dir, "second.txt");
        let (mut form, _rx) = controller();

        form.on_file_selected(first);
        let old_generation = form.read_generation();
        form.on_file_selected(second);
        assert_ne!(old_generation, form.read_generation());

        // The superseded read resolving must not touch the new selection.
        form.resolve_ingest(old_generation, IngestOutcome::Loaded);
        assert!(form.ui.file_loading);
        assert!(!form.ui.submit_enabled);
        assert_eq!(form.selection.file_name(), Some("second.txt"));

        form.resolve_ingest(form.read_generation(), IngestOutcome::Loaded);
        assert_eq!(form.ui.file_message, "file loaded: second.txt");
    }

    #[test]
    fn synchronous_ingest_failure_still_hides_loader() {
        let (mut form, _rx) = controller();

        form.on_file_selected(PathBuf::from("/nonexistent/mail.txt"));

        assert!(!form.ui.file_loading);
        assert!(form.selection.is_empty());
        assert!(form.ui.text_enabled);
        assert!(form.ui.file_message.contains("mail.txt"));
        assert_eq!(form.state, FormState::Idle);
    }

    #[test]
    fn text_submission_flips_the_view() {
        let (mut form, _rx) = controller();
        form.on_text_edited("refund request".to_string());

        let input = form.begin_submission().unwrap();
        assert_eq!(input, SubmissionInput::Text("refund request".to_string()));
        assert!(form.selection.is_empty());
        assert_eq!(form.state, FormState::Submitting);
        assert!(!form.ui.input_visible);
        assert!(form.ui.output_visible);
        assert!(form.ui.main_loading);
        assert!(!form.ui.submit_enabled);
        assert!(!form.ui.file_loading);

        form.resolve_submission(SubmissionOutcome::Success {
            category: "billing".to_string(),
            suggested_response: "We are looking into your refund.".to_string(),
        });
        assert_eq!(form.state, FormState::ShowingResult);
        assert!(!form.ui.main_loading);
        assert_eq!(form.ui.result_category.as_deref(), Some("billing"));
        assert_eq!(
            form.ui.result_response.as_deref(),
            Some("We are looking into your refund.")
        );
    }

    #[test]
    fn submit_is_blocked_when_nothing_is_entered() {
        let (mut form, _rx) = controller();
        assert_eq!(form.begin_submission(), None);
        assert_eq!(form.state, FormState::Idle);
        assert!(form.ui.input_visible);
    }

    #[test]
    fn server_error_shows_in_error_panel_until_reset() {
        let (mut form, _rx) = controller();
        form.on_text_edited("hi".to_string());
        form.begin_submission().unwrap();

        form.resolve_submission(SubmissionOutcome::Failure {
            message: "text too short".to_string(),
        });
        assert_eq!(form.state, FormState::ShowingError);
        assert!(!form.ui.main_loading);
        assert_eq!(form.ui.error_message.as_deref(), Some("text too short"));
        // Input stays hidden until the user resets explicitly.
        assert!(!form.ui.input_visible);

        form.reset();
        assert_eq!(form.state, FormState::Idle);
        assert_eq!(form.ui, UiElements::new());
        assert!(form.selection.is_empty());
    }

    #[tokio::test]
    async fn reset_restores_idle_after_a_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "mail.txt");
        let (mut form, _rx) = controller();

        form.on_file_selected(path);
        form.resolve_ingest(form.read_generation(), IngestOutcome::Loaded);
        form.begin_submission().unwrap();
        form.resolve_submission(SubmissionOutcome::Success {
            category: "support".to_string(),
            suggested_response: "ok".to_string(),
        });

        form.reset();
        assert!(form.ui.input_visible);
        assert!(form.ui.text_enabled);
        assert!(form.ui.file_enabled);
        assert_eq!(form.ui.file_message, FILE_PLACEHOLDER);
        assert!(!form.ui.submit_enabled);
    }

    #[tokio::test]
    async fn dropped_pdf_is_accepted_while_text_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "x.pdf");
        let mut app = App::new(&TriageConfig::default()).unwrap();

        app.handle_paste(path.to_str().unwrap());
        assert_eq!(app.form.state, FormState::ReadingFile);

        app.form
            .resolve_ingest(app.form.read_generation(), IngestOutcome::Loaded);
        assert_eq!(app.form.ui.file_message, "file loaded: x.pdf");
        assert!(app.form.ui.submit_enabled);
    }

    #[tokio::test]
    async fn drop_is_ignored_while_text_mode_is_active() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "x.pdf");
        let mut app = App::new(&TriageConfig::default()).unwrap();

        app.form.on_text_edited("drafting a reply".to_string());
        app.handle_paste(path.to_str().unwrap());

        assert!(matches!(app.form.selection, InputSelection::Text(_)));
        assert_eq!(app.form.state, FormState::ReadyToSubmit);
        assert!(!app.form.ui.file_loading);
    }

    #[tokio::test]
    async fn drop_during_submission_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let first = temp_file(&dir, "first.txt");
        let second = temp_file(&dir, "second.txt");
        let mut app = App::new(&TriageConfig::default()).unwrap();

        app.handle_paste(first.to_str().unwrap());
        app.form
            .resolve_ingest(app.form.read_generation(), IngestOutcome::Loaded);
        app.form.begin_submission().unwrap();
        assert_eq!(app.form.state, FormState::Submitting);

        // The drop zone is off screen; a drop must not restart ingestion.
        app.handle_paste(second.to_str().unwrap());
        assert_eq!(app.form.state, FormState::Submitting);
        assert!(app.form.selection.is_empty());
        assert!(!app.form.ui.file_loading);
        assert!(!app.form.ui.input_visible);
    }

    #[tokio::test]
    async fn drop_after_a_result_leaves_reset_live() {
        let dir = tempfile::tempdir().unwrap();
        let first = temp_file(&dir, "first.txt");
        let second = temp_file(&dir, "second.txt");
        let mut app = App::new(&TriageConfig::default()).unwrap();

        app.handle_paste(first.to_str().unwrap());
        app.form
            .resolve_ingest(app.form.read_generation(), IngestOutcome::Loaded);
        app.form.begin_submission().unwrap();
        app.form.resolve_submission(SubmissionOutcome::Success {
            category: "support".to_string(),
            suggested_response: "ok".to_string(),
        });
        assert_eq!(app.form.state, FormState::ShowingResult);

        app.handle_paste(second.to_str().unwrap());
        assert_eq!(app.form.state, FormState::ShowingResult);
        assert!(!app.form.ui.input_visible);
        assert!(!app.form.ui.submit_enabled);
        // r/n must still be able to leave the result panel.
        assert!(app.can_reset());

        app.reset();
        assert_eq!(app.form.state, FormState::Idle);
        assert!(app.form.ui.input_visible);
    }

    #[tokio::test]
    async fn non_path_paste_goes_into_the_text_field() {
        let mut app = App::new(&TriageConfig::default()).unwrap();
        app.input_mode = InputMode::EditingText;

        app.handle_paste("please check invoice 1234\nthanks");
        assert_eq!(app.form.ui.text_value, "please check invoice 1234\nthanks");
        assert!(matches!(app.form.selection, InputSelection::Text(_)));
    }

    #[test]
    fn drop_highlight_is_suppressed_while_text_mode_owns_input() {
        let (mut form, _rx) = controller();

        form.set_drop_highlight(true);
        assert!(form.ui.drop_highlight);
        form.set_drop_highlight(false);

        form.on_text_edited("hello".to_string());
        form.set_drop_highlight(true);
        assert!(!form.ui.drop_highlight);
    }

    #[test]
    fn dropped_path_normalization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mail with space.txt");
        std::fs::File::create(&path).unwrap();
        let raw = path.to_str().unwrap();

        assert_eq!(dropped_path(raw), Some(path.clone()));
        assert_eq!(dropped_path(&format!("'{raw}'")), Some(path.clone()));
        assert_eq!(dropped_path(&format!("\"{raw}\"")), Some(path.clone()));
        assert_eq!(dropped_path(&format!("file://{raw}")), Some(path.clone()));
        assert_eq!(dropped_path(&format!("  {raw}  ")), Some(path));

        assert_eq!(dropped_path("just some pasted prose"), None);
        assert_eq!(dropped_path("/nonexistent/mail.txt"), None);
        assert_eq!(dropped_path("line one\nline two"), None);
        assert_eq!(dropped_path(""), None);
    }
}
