//! Editor model
//!
//! Holds the selected language and the code buffer. Only the logical editor
//! state lives here; rendering is left to the view.

use super::language::{default_template, Language};

/// Editor state: current language and the code being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorModel {
    language: Language,
    code: String,
}

impl EditorModel {
    /// Create an editor seeded with the Python starter program
    pub fn new() -> Self {
        Self::with_language(Language::default())
    }

    /// Create an editor seeded with the starter program for `language`
    pub fn with_language(language: Language) -> Self {
        Self {
            language,
            code: default_template(language).to_string(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Switch language, discarding the buffer in favour of the new template
    pub fn set_language(&mut self, language: Language) {
        tracing::debug!("Switching editor language to {}", language);
        self.language = language;
        self.code = default_template(language).to_string();
    }

    /// Replace the buffer with user-edited text, verbatim
    pub fn set_code(&mut self, code: String) {
        self.code = code;
    }

    /// Replace the buffer with text produced by the backend (auto-comment)
    pub fn replace_code(&mut self, code: String) {
        tracing::debug!("Replacing code buffer ({} bytes) from backend", code.len());
        self.code = code;
    }
}

impl Default for EditorModel {
    fn default() -> Self {
        Self::new()
    }
}
