//! # Controllers Module
//!
//! Application-level controllers that coordinate state, backend calls and the
//! terminal front end.

pub mod app_controller;

pub use app_controller::{AppController, Completion, CompletionStatus, Dispatch};
