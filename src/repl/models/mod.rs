//! # Models Module
//!
//! Re-exports the workbench state holders: the language/template registry,
//! the editor buffer and the output panel.

pub mod editor_model;
pub mod language;
pub mod output_model;

pub use editor_model::EditorModel;
pub use language::{default_template, Language, UnknownLanguage};
pub use output_model::OutputModel;
