//! # Application State
//!
//! The whole workbench state lives in one [`AppState`] value. Transitions are
//! expressed by [`reduce`], which takes the current state and a
//! [`ModelEvent`] and returns the next state.
//!
//! Every transition that writes the output panel on behalf of a new user
//! action advances the generation counter. Completions carry the generation
//! they were dispatched at and are dropped when it is no longer current, so a
//! late reply can never overwrite a newer action's output.

use crate::repl::events::ModelEvent;
use crate::repl::models::{EditorModel, Language, OutputModel};
use crate::repl::services::operations::{AUTO_COMMENT_SUCCESS, EXPLAIN_NEEDS_RUN};
use crate::repl::services::OperationOutcome;

/// Editor, output panel and dispatch generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    editor: EditorModel,
    output: OutputModel,
    generation: u64,
}

impl AppState {
    /// Fresh session state: Python template, empty output, generation zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: Language) -> Self {
        Self {
            editor: EditorModel::with_language(language),
            ..Self::default()
        }
    }

    pub fn editor(&self) -> &EditorModel {
        &self.editor
    }

    pub fn output(&self) -> &OutputModel {
        &self.output
    }

    pub fn language(&self) -> Language {
        self.editor.language()
    }

    pub fn code(&self) -> &str {
        self.editor.code()
    }

    pub fn output_text(&self) -> &str {
        self.output.output()
    }

    pub fn raw_error(&self) -> &str {
        self.output.raw_error()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a completion dispatched at `generation` may still be applied
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    fn advance_generation(&mut self) {
        self.generation += 1;
    }
}

/// Message shown for buttons whose feature does not exist yet
pub fn unimplemented_message(feature: &str) -> String {
    format!("Feature {feature} is not yet implemented. This is the only remaining feature!")
}

/// Compute the state that follows `event`
pub fn reduce(mut state: AppState, event: ModelEvent) -> AppState {
    match event {
        ModelEvent::LanguageSelected(language) => {
            state.editor.set_language(language);
            state.output.clear();
            state.advance_generation();
        }
        ModelEvent::CodeEdited(code) => {
            state.editor.set_code(code);
        }
        ModelEvent::OperationStarted(operation) => {
            state.advance_generation();
            let placeholder = operation.placeholder(state.editor.language());
            state.output.set_output(placeholder);
            if operation.clears_raw_error() {
                state.output.clear_raw_error();
            }
        }
        ModelEvent::OperationSucceeded {
            generation,
            outcome,
        } => {
            if !state.is_current(generation) {
                return state;
            }
            apply_outcome(&mut state, outcome);
        }
        ModelEvent::OperationFailed {
            generation,
            operation,
            error,
        } => {
            if !state.is_current(generation) {
                return state;
            }
            state.output.set_output(operation.failure_message(&error));
        }
        ModelEvent::ExplainWithoutError => {
            state.advance_generation();
            state.output.set_output(EXPLAIN_NEEDS_RUN.to_string());
        }
        ModelEvent::FeatureUnavailable { feature } => {
            state.advance_generation();
            state.output.set_output(unimplemented_message(&feature));
        }
    }
    state
}

fn apply_outcome(state: &mut AppState, outcome: OperationOutcome) {
    match outcome {
        OperationOutcome::Executed { output, raw_error } => {
            state.output.set_output(output);
            state.output.set_raw_error(raw_error);
        }
        OperationOutcome::Explained { explanation } => {
            state.output.set_output(explanation);
        }
        OperationOutcome::Reviewed {
            review_type,
            report,
        } => {
            state
                .output
                .set_output(format!("--- {} Results ---\n{}", review_type.title(), report));
        }
        OperationOutcome::Commented { code } => {
            state.editor.replace_code(code);
            state.output.set_output(AUTO_COMMENT_SUCCESS.to_string());
        }
    }
}
