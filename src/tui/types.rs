use crate::form::types::SubmissionOutcome;

/// Where keystrokes currently go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingText,
    Picker,
}

/// Async work reports back to the event loop through these.
#[derive(Clone, Debug)]
pub enum AppMessage {
    AnalysisResolved(SubmissionOutcome),
}
