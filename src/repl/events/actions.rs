//! # User Actions
//!
//! Everything a user can ask the workbench to do: pick a language, edit the
//! buffer, or press one of the buttons under the editor.

use crate::repl::models::Language;
use crate::repl::services::{Operation, ReviewType};

/// An intent triggered from the action surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SelectLanguage(Language),
    EditCode(String),
    RunCode,
    ReviewCode,
    ExplainError,
    AutoComment,
    AnalyzeComplexity,
    /// A button whose feature has not been built yet
    Unimplemented(String),
}

impl UserAction {
    /// Remote operation this action dispatches, if any
    pub fn operation(&self) -> Option<Operation> {
        match self {
            UserAction::RunCode => Some(Operation::Run),
            UserAction::ReviewCode => Some(Operation::Review(ReviewType::StaticCheck)),
            UserAction::ExplainError => Some(Operation::ExplainError),
            UserAction::AutoComment => Some(Operation::AutoComment),
            UserAction::AnalyzeComplexity => Some(Operation::Review(ReviewType::Complexity)),
            UserAction::SelectLanguage(_)
            | UserAction::EditCode(_)
            | UserAction::Unimplemented(_) => None,
        }
    }
}

/// Buttons in the action row, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    RunCode,
    AiCodeReview,
    ExplainError,
    AutoComment,
    ComplexityAnalysis,
    FormatCode,
}

impl Button {
    pub const ALL: [Button; 6] = [
        Button::RunCode,
        Button::AiCodeReview,
        Button::ExplainError,
        Button::AutoComment,
        Button::ComplexityAnalysis,
        Button::FormatCode,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Button::RunCode => "Run Code",
            Button::AiCodeReview => "AI Code Review",
            Button::ExplainError => "Explain Error",
            Button::AutoComment => "Auto-Comment",
            Button::ComplexityAnalysis => "Complexity Analysis",
            Button::FormatCode => "Format Code",
        }
    }

    /// Action fired when the button is pressed
    pub fn action(&self) -> UserAction {
        match self {
            Button::RunCode => UserAction::RunCode,
            Button::AiCodeReview => UserAction::ReviewCode,
            Button::ExplainError => UserAction::ExplainError,
            Button::AutoComment => UserAction::AutoComment,
            Button::ComplexityAnalysis => UserAction::AnalyzeComplexity,
            Button::FormatCode => UserAction::Unimplemented(self.label().to_string()),
        }
    }
}
