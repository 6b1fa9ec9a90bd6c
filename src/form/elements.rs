use std::ops::{Deref, DerefMut};

pub const FILE_PLACEHOLDER: &str = "drop a file here, or press 'f' to browse";
pub const TEXT_PLACEHOLDER: &str = "press 'i' and paste or type the email text";

/// Explicit handle on every view attribute the form mutates. The renderer
/// reads these flags and nothing else, so there are no scattered lookups
/// of widget state anywhere in the state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiElements {
    pub text_value: String,
    pub text_enabled: bool,
    pub file_enabled: bool,
    pub file_message: String,
    pub file_loading: bool,
    pub drop_highlight: bool,
    pub submit_enabled: bool,
    pub input_visible: bool,
    pub output_visible: bool,
    pub main_loading: bool,
    pub result_category: Option<String>,
    pub result_response: Option<String>,
    pub error_message: Option<String>,
}

impl UiElements {
    pub fn new() -> Self {
        Self {
            text_value: String::new(),
            text_enabled: true,
            file_enabled: true,
            file_message: FILE_PLACEHOLDER.to_string(),
            file_loading: false,
            drop_highlight: false,
            submit_enabled: false,
            input_visible: true,
            output_visible: false,
            main_loading: false,
            result_category: None,
            result_response: None,
            error_message: None,
        }
    }

    /// Full reset shared by "try again" and "analyze new".
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for UiElements {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped release for the file loader. Every path out of an ingestion
/// resolution drops the guard, so the loader cannot be left visible no
/// matter which branch ran.
pub struct FileLoaderGuard<'a> {
    ui: &'a mut UiElements,
}

impl<'a> FileLoaderGuard<'a> {
    pub fn new(ui: &'a mut UiElements) -> Self {
        Self { ui }
    }
}

impl Deref for FileLoaderGuard<'_> {
    type Target = UiElements;

    fn deref(&self) -> &UiElements {
        self.ui
    }
}

impl DerefMut for FileLoaderGuard<'_> {
    fn deref_mut(&mut self) -> &mut UiElements {
        self.ui
    }
}

impl Drop for FileLoaderGuard<'_> {
    fn drop(&mut self) {
        self.ui.file_loading = false;
    }
}
