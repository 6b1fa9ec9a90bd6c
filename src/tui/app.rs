use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tokio::sync::mpsc;
use tokio::task;

use crate::api::AnalyzeClient;
use crate::config::TriageConfig;
use crate::file_picker::FilePicker;
use crate::form::ingest::IngestResolution;
use crate::form::types::{FormState, SubmissionOutcome};
use crate::form::FormController;

use super::types::{AppMessage, InputMode};

pub struct App {
    // The form state machine; everything the renderer shows lives in
    // form.ui.
    pub form: FormController,
    pub input_mode: InputMode,
    pub picker: FilePicker,

    pub status_message: String,
    pub current_time: String,

    // Backend
    pub client: AnalyzeClient,

    // Message channels
    pub tx: mpsc::UnboundedSender<AppMessage>,
    pub rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
    pub ingest_rx: Option<mpsc::UnboundedReceiver<IngestResolution>>,

    pub should_quit: bool,
}

impl App {
    pub fn new(config: &TriageConfig) -> Result<Self> {
        let client = AnalyzeClient::new(
            config.api.endpoint.clone(),
            Duration::from_secs(config.api.timeout_seconds),
            Duration::from_secs(config.api.connect_timeout_seconds),
        )?;
        let picker = FilePicker::new()?;
        let (ingest_tx, ingest_rx) = mpsc::unbounded_channel();
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            form: FormController::new(ingest_tx),
            input_mode: InputMode::Normal,
            picker,
            status_message: "Ready - press '?' for help".to_string(),
            current_time: Local::now().format("%H:%M:%S").to_string(),
            client,
            tx,
            rx: Some(rx),
            ingest_rx: Some(ingest_rx),
            should_quit: false,
        })
    }

    pub fn update_time(&mut self) {
        self.current_time = Local::now().format("%H:%M:%S").to_string();
    }

    // ---- text editing ----

    pub fn push_text_char(&mut self, c: char) {
        let mut value = self.form.ui.text_value.clone();
        value.push(c);
        self.form.on_text_edited(value);
    }

    pub fn backspace_text(&mut self) {
        let mut value = self.form.ui.text_value.clone();
        value.pop();
        self.form.on_text_edited(value);
    }

    pub fn push_text_newline(&mut self) {
        self.push_text_char('\n');
    }

    // ---- file selection paths ----

    /// Bracketed paste is the terminal's drop event: dropping a file onto
    /// the window pastes its path. Path-like pastes become the same
    /// file-selected event the picker raises; anything else is text.
    pub fn handle_paste(&mut self, pasted: &str) {
        if let Some(path) = dropped_path(pasted) {
            if !self.form.ui.input_visible {
                // No drop zone on screen while a submission or its result
                // owns the view.
                tracing::debug!(path = %path.display(), "ignoring drop while the input section is hidden");
                return;
            }
            if !self.form.ui.file_enabled {
                // Text mode owns the input; the drop changes nothing.
                tracing::debug!(path = %path.display(), "ignoring drop while text mode is active");
                return;
            }
            self.select_file(path);
        } else if self.input_mode == InputMode::EditingText && self.form.ui.text_enabled {
            let mut value = self.form.ui.text_value.clone();
            value.push_str(pasted);
            self.form.on_text_edited(value);
        }
    }

    pub fn select_file(&mut self, path: PathBuf) {
        let display = path.display().to_string();
        self.form.on_file_selected(path);
        self.status_message = format!("Reading {display}");
    }

    pub fn open_picker(&mut self) {
        if let Err(e) = self.picker.refresh() {
            self.status_message = format!("Error listing directory: {e}");
            return;
        }
        self.input_mode = InputMode::Picker;
        // Picking is our dragover: light the drop zone up unless text
        // mode owns the input.
        self.form.set_drop_highlight(true);
        self.status_message = "PICK FILE - jk to move, Enter to select, Esc to cancel".to_string();
    }

    pub fn close_picker(&mut self) {
        self.form.set_drop_highlight(false);
        self.input_mode = InputMode::Normal;
        self.status_message = "Ready".to_string();
    }

    // ---- submission lifecycle ----

    pub fn submit(&mut self) {
        let Some(input) = self.form.begin_submission() else {
            return;
        };
        self.input_mode = InputMode::Normal;
        self.status_message = "Analyzing...".to_string();

        let tx = self.tx.clone();
        let client = self.client.clone();
        task::spawn(async move {
            let outcome = client.analyze(&input).await;
            let _ = tx.send(AppMessage::AnalysisResolved(outcome));
        });
    }

    pub fn on_analysis_resolved(&mut self, outcome: SubmissionOutcome) {
        self.status_message = match &outcome {
            SubmissionOutcome::Success { category, .. } => format!("Analyzed: {category}"),
            SubmissionOutcome::Failure { .. } => "Analysis failed - 'r' to try again".to_string(),
        };
        self.form.resolve_submission(outcome);
    }

    /// Both "try again" ('r') and "analyze new" ('n') land here.
    pub fn reset(&mut self) {
        self.form.reset();
        self.input_mode = InputMode::Normal;
        self.status_message = "Ready - press '?' for help".to_string();
    }

    pub fn can_reset(&self) -> bool {
        matches!(
            self.form.state,
            FormState::ShowingResult | FormState::ShowingError
        )
    }
}

/// Turns pasted text into a filesystem path when it plausibly came from a
/// file drop: one line, optionally quoted or a file:// URL, pointing at
/// something that exists.
pub fn dropped_path(pasted: &str) -> Option<PathBuf> {
    let trimmed = pasted.trim();
    if trimmed.is_empty() || trimmed.lines().count() != 1 {
        return None;
    }

    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(trimmed);

    let without_scheme = unquoted
        .strip_prefix("file://")
        .map(|rest| {
            // file://host/path -> /path
            match rest.find('/') {
                Some(0) => rest,
                Some(idx) => &rest[idx..],
                None => rest,
            }
        })
        .unwrap_or(unquoted);

    let expanded = if let Some(rest) = without_scheme.strip_prefix("~/") {
        dirs::home_dir()?.join(rest)
    } else {
        PathBuf::from(without_scheme)
    };

    if expanded.as_os_str().is_empty() || !expanded.exists() {
        return None;
    }
    Some(expanded)
}
