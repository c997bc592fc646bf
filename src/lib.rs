//! # SmartCompile - Terminal Code Workbench
//!
//! Edit code in Python, Java, C or C++, run it on a SmartCompile backend and
//! ask the backend's AI for error explanations, reviews, complexity analysis
//! and inline comments.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  UserAction  ┌──────────────┐  ModelEvent  ┌──────────┐
//! │   Commands   │─────────────▶│  Controller  │─────────────▶│ Reducer  │
//! │ (:run, ...)  │              │              │              │ AppState │
//! └──────────────┘              └──────────────┘              └──────────┘
//!                                   │      ▲
//!                         spawn     │      │ Completion (mpsc)
//!                                   ▼      │
//!                               ┌──────────────┐    POST /run, /explain,
//!                               │  Transport   │──▶ /code_review, /auto_comment
//!                               └──────────────┘
//! ```
//!
//! Each request is tagged with the state's generation when it is sent. A reply
//! whose generation is no longer current is discarded instead of overwriting
//! the output of a newer action.

pub mod cmd_args;
pub mod config;
pub mod repl;

// Re-export main types for easy access
pub use repl::*;
