use std::path::PathBuf;

/// Which view of the form is live. Transitions on this enum are the only
/// thing rendering keys off of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormState {
    Idle,
    ReadingFile,
    ReadyToSubmit,
    Submitting,
    ShowingResult,
    ShowingError,
}

/// Progress of the background read attached to a file selection. Governs
/// whether the file is currently submittable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadStatus {
    Pending,
    Succeeded,
    // A failed read empties the selection outright, so nothing rests in
    // this state; it remains a valid answer to "is this submittable?".
    #[allow(dead_code)]
    Failed,
    TimedOut,
}

/// The active input. At most one of the two modes is ever populated;
/// selecting one clears the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSelection {
    Empty,
    Text(String),
    File {
        path: PathBuf,
        name: String,
        status: ReadStatus,
    },
}

impl InputSelection {
    pub fn is_empty(&self) -> bool {
        matches!(self, InputSelection::Empty)
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            InputSelection::File { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn set_read_status(&mut self, new_status: ReadStatus) {
        if let InputSelection::File { status, .. } = self {
            *status = new_status;
        }
    }
}

/// Resolution of one ingestion attempt. Exactly one of these is produced
/// per started read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    Loaded,
    Failed(String),
    FallbackExpired,
}

/// What actually gets posted to the analysis endpoint. The arbiter
/// guarantees at most one input mode is populated, so this is a plain
/// either.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionInput {
    Text(String),
    File { path: PathBuf, name: String },
}

/// Terminal result of one submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success {
        category: String,
        suggested_response: String,
    },
    Failure {
        message: String,
    },
}
