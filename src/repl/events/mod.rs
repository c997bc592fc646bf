//! # Events Module
//!
//! User-facing actions and the model events they reduce to.

pub mod actions;
pub mod model_events;

pub use actions::{Button, UserAction};
pub use model_events::ModelEvent;
