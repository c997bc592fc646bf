//! # REPL Commands
//!
//! Parses a line typed at the prompt into the command it names. Button
//! commands map onto [`UserAction`]s; the rest drive the terminal front end.

use crate::repl::events::{Button, UserAction};
use crate::repl::models::{Language, UnknownLanguage};
use thiserror::Error;

/// A parsed prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Blank line
    Empty,
    /// Something the workbench state reacts to
    Action(UserAction),
    /// Start reading a replacement buffer
    Edit,
    /// Load a file into the buffer
    Open(String),
    Show,
    Output,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type :help for a list of commands")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Language(#[from] UnknownLanguage),
    #[error("commands start with ':', use :edit to change the code")]
    NotACommand,
}

/// Line that ends an `:edit` block
pub const EDIT_TERMINATOR: &str = ".";

pub fn parse_command(line: &str) -> Result<ReplCommand, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ReplCommand::Empty);
    }

    let Some(rest) = line.strip_prefix(':') else {
        return Err(CommandError::NotACommand);
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "lang" | "language" => {
            if argument.is_empty() {
                return Err(CommandError::MissingArgument(":lang"));
            }
            ReplCommand::Action(UserAction::SelectLanguage(argument.parse::<Language>()?))
        }
        "run" => ReplCommand::Action(Button::RunCode.action()),
        "review" => ReplCommand::Action(Button::AiCodeReview.action()),
        "explain" => ReplCommand::Action(Button::ExplainError.action()),
        "comment" => ReplCommand::Action(Button::AutoComment.action()),
        "complexity" => ReplCommand::Action(Button::ComplexityAnalysis.action()),
        "format" => ReplCommand::Action(Button::FormatCode.action()),
        "edit" => ReplCommand::Edit,
        "open" => {
            if argument.is_empty() {
                return Err(CommandError::MissingArgument(":open"));
            }
            ReplCommand::Open(argument.to_string())
        }
        "show" => ReplCommand::Show,
        "output" => ReplCommand::Output,
        "help" | "h" => ReplCommand::Help,
        "quit" | "q" => ReplCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(command)
}
