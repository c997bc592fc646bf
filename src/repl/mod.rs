//! # Workbench Core
//!
//! The client-side orchestration layer: state holders, the reducer, the
//! backend dispatcher and the line-oriented front end.

pub mod commands;
pub mod controllers;
pub mod events;
pub mod models;
pub mod services;
pub mod state;
pub mod testing;
pub mod views;

// Re-export core types
pub use controllers::{AppController, CompletionStatus, Dispatch};
pub use events::{Button, ModelEvent, UserAction};
pub use models::{default_template, EditorModel, Language, OutputModel};
pub use services::{BackendError, HttpTransport, Operation, ReviewType, Transport};
pub use state::{reduce, AppState};
