//! Output model
//!
//! Holds what the output panel shows and the raw error captured by the last
//! run. Both are plain replacement cells: the last write wins.

/// Output panel text and the last captured raw error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputModel {
    output: String,
    raw_error: String,
}

impl OutputModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently shown in the output panel
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Raw error from the most recent run, empty when there was none
    pub fn raw_error(&self) -> &str {
        &self.raw_error
    }

    pub fn has_raw_error(&self) -> bool {
        !self.raw_error.is_empty()
    }

    pub fn set_output(&mut self, output: String) {
        self.output = output;
    }

    pub fn set_raw_error(&mut self, raw_error: String) {
        self.raw_error = raw_error;
    }

    pub fn clear_raw_error(&mut self) {
        self.raw_error.clear();
    }

    /// Clear both the output panel and the raw error
    pub fn clear(&mut self) {
        self.output.clear();
        self.raw_error.clear();
    }
}
