//! # Model Events
//!
//! Inputs to the state reducer. Each event carries the payload needed to
//! compute the next [`AppState`](crate::repl::state::AppState).

use crate::repl::models::Language;
use crate::repl::services::{BackendError, Operation, OperationOutcome};

/// A state transition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// Language selector changed
    LanguageSelected(Language),

    /// User edited the code buffer
    CodeEdited(String),

    /// An operation is about to be sent; shows its placeholder
    OperationStarted(Operation),

    /// The backend answered an operation dispatched at `generation`
    OperationSucceeded {
        generation: u64,
        outcome: OperationOutcome,
    },

    /// An operation dispatched at `generation` failed
    OperationFailed {
        generation: u64,
        operation: Operation,
        error: BackendError,
    },

    /// Explain was requested without a captured raw error.
    ///
    /// Advances the generation like any other output write, so a run still
    /// in flight is superseded and its raw error never lands.
    ExplainWithoutError,

    /// A button without an implementation was pressed
    FeatureUnavailable { feature: String },
}
