pub mod elements;
pub mod ingest;
pub mod types;

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use self::elements::{FileLoaderGuard, UiElements, FILE_PLACEHOLDER};
use self::ingest::IngestResolution;
use self::types::{
    FormState, IngestOutcome, InputSelection, ReadStatus, SubmissionInput, SubmissionOutcome,
};

/// Owns the form's state machine: the input-mode arbiter, file ingestion,
/// and the submit/result/error/reset lifecycle. All methods run on the
/// event loop; background work reports back through the resolution
/// channel, tagged with a generation so a superseded read can never
/// mutate newer state.
pub struct FormController {
    pub state: FormState,
    pub selection: InputSelection,
    pub ui: UiElements,
    generation: u64,
    read_task: Option<JoinHandle<()>>,
    ingest_tx: mpsc::UnboundedSender<IngestResolution>,
}

impl FormController {
    pub fn new(ingest_tx: mpsc::UnboundedSender<IngestResolution>) -> Self {
        Self {
            state: FormState::Idle,
            selection: InputSelection::Empty,
            ui: UiElements::new(),
            generation: 0,
            read_task: None,
            ingest_tx,
        }
    }

    // ---- input mode arbiter ----

    /// Text field edited. Non-empty text takes the input over from the
    /// file side and locks the file control; empty text hands it back.
    pub fn on_text_edited(&mut self, value: String) {
        self.ui.text_value = value.clone();
        self.ui.text_enabled = true;
        if !value.trim().is_empty() {
            self.clear_file_selection();
            self.ui.file_enabled = false;
            self.selection = InputSelection::Text(value);
        } else {
            self.ui.file_enabled = true;
            if matches!(self.selection, InputSelection::Text(_)) {
                self.selection = InputSelection::Empty;
            }
        }
        self.recompute_eligibility();
    }

    /// File chosen through the picker or a drop. The selection wins the
    /// input over from the text side, supersedes any in-flight read, and
    /// starts ingestion. An error while initiating the read resolves
    /// through the same path a failed read takes.
    pub fn on_file_selected(&mut self, path: PathBuf) {
        self.cancel_pending_read();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.ui.text_value.clear();
        self.ui.text_enabled = false;
        self.ui.file_enabled = true;
        self.selection = InputSelection::File {
            path: path.clone(),
            name,
            status: ReadStatus::Pending,
        };
        self.state = FormState::ReadingFile;
        self.ui.file_loading = true;
        self.ui.file_message.clear();
        self.recompute_eligibility();

        self.generation += 1;
        match ingest::begin(path, self.generation, self.ingest_tx.clone()) {
            Ok(handle) => self.read_task = Some(handle),
            Err(e) => self.resolve_ingest(self.generation, IngestOutcome::Failed(e.to_string())),
        }
    }

    /// Drop-zone feedback for dragenter/dragover. Suppressed while text
    /// mode owns the input.
    pub fn set_drop_highlight(&mut self, on: bool) {
        self.ui.drop_highlight = on && self.ui.file_enabled;
    }

    /// Eligibility: trimmed text present, or a file whose read has
    /// settled in a submittable state. Recomputed after every mutation
    /// that can change it.
    pub fn recompute_eligibility(&mut self) {
        let eligible = match &self.selection {
            InputSelection::Text(text) => !text.trim().is_empty(),
            InputSelection::File { status, .. } => {
                matches!(status, ReadStatus::Succeeded | ReadStatus::TimedOut)
            }
            InputSelection::Empty => false,
        };
        self.ui.submit_enabled = eligible && self.state != FormState::Submitting;
        if eligible && self.state == FormState::Idle {
            self.state = FormState::ReadyToSubmit;
        } else if !eligible && self.state == FormState::ReadyToSubmit {
            self.state = FormState::Idle;
        }
    }

    // ---- file ingestion ----

    /// One read resolved. Resolutions from superseded reads are dropped
    /// here; for live ones the guard puts the loader away no matter which
    /// branch runs.
    pub fn resolve_ingest(&mut self, generation: u64, outcome: IngestOutcome) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping stale read resolution");
            return;
        }
        self.read_task = None;

        let name = self.selection.file_name().unwrap_or_default().to_string();
        {
            let mut ui = FileLoaderGuard::new(&mut self.ui);
            match &outcome {
                IngestOutcome::Loaded => {
                    ui.file_message = format!("file loaded: {name}");
                    self.selection.set_read_status(ReadStatus::Succeeded);
                    self.state = FormState::ReadyToSubmit;
                }
                IngestOutcome::Failed(err) => {
                    ui.file_message = format!("could not read {name}: {err}");
                    ui.text_enabled = true;
                    self.selection = InputSelection::Empty;
                    self.state = FormState::Idle;
                }
                IngestOutcome::FallbackExpired => {
                    // Soft-success: the read gave no signal, but the file
                    // handle is still usable for submission.
                    ui.file_message = format!("file selected: {name}");
                    self.selection.set_read_status(ReadStatus::TimedOut);
                    self.state = FormState::ReadyToSubmit;
                }
            }
        }
        self.recompute_eligibility();
    }

    // ---- submission lifecycle ----

    /// Locks the form for submission and hands back what to send, or
    /// `None` while the submit control is not invocable.
    pub fn begin_submission(&mut self) -> Option<SubmissionInput> {
        if !self.ui.submit_enabled {
            return None;
        }
        let input = match std::mem::replace(&mut self.selection, InputSelection::Empty) {
            InputSelection::Text(text) => SubmissionInput::Text(text),
            InputSelection::File { path, name, .. } => SubmissionInput::File { path, name },
            InputSelection::Empty => return None,
        };
        self.state = FormState::Submitting;
        self.ui.input_visible = false;
        self.ui.output_visible = true;
        self.ui.main_loading = true;
        self.ui.result_category = None;
        self.ui.result_response = None;
        self.ui.error_message = None;
        self.ui.submit_enabled = false;
        // A file loader must not outlive the input section.
        self.ui.file_loading = false;
        Some(input)
    }

    pub fn resolve_submission(&mut self, outcome: SubmissionOutcome) {
        self.ui.main_loading = false;
        match outcome {
            SubmissionOutcome::Success {
                category,
                suggested_response,
            } => {
                self.ui.result_category = Some(category);
                self.ui.result_response = Some(suggested_response);
                self.state = FormState::ShowingResult;
            }
            SubmissionOutcome::Failure { message } => {
                self.ui.error_message = Some(message);
                self.state = FormState::ShowingError;
            }
        }
    }

    /// The full reset behind both "try again" and "analyze new": back to
    /// Idle with cleared fields, both input modes enabled, and the
    /// placeholder messages restored.
    pub fn reset(&mut self) {
        self.cancel_pending_read();
        self.selection = InputSelection::Empty;
        self.ui.reset();
        self.state = FormState::Idle;
        self.recompute_eligibility();
    }

    fn clear_file_selection(&mut self) {
        self.cancel_pending_read();
        if matches!(self.selection, InputSelection::File { .. }) {
            self.selection = InputSelection::Empty;
        }
        self.ui.file_message = FILE_PLACEHOLDER.to_string();
        self.ui.file_loading = false;
        if self.state == FormState::ReadingFile {
            self.state = FormState::Idle;
        }
    }

    /// Generation of the read the controller currently considers live.
    pub fn read_generation(&self) -> u64 {
        self.generation
    }

    fn cancel_pending_read(&mut self) {
        if let Some(task) = self.read_task.take() {
            task.abort();
            // The aborted read may already have queued a resolution;
            // bumping the generation makes it stale.
            self.generation += 1;
        }
    }
}
