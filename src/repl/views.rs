//! # Views
//!
//! Plain-text rendering of the workbench: the output panel, the code buffer
//! with line numbers, and the command help. Everything writes to an
//! `io::Write` so tests can capture it.

use crate::repl::events::Button;
use crate::repl::models::Language;
use crate::repl::state::AppState;
use std::io::{self, Write};

/// Header printed above the output panel
pub const OUTPUT_HEADER: &str = "Output:";

/// Print the output panel
pub fn render_output<W: Write>(state: &AppState, out: &mut W) -> io::Result<()> {
    writeln!(out, "{OUTPUT_HEADER}")?;
    writeln!(out, "{}", state.output_text())?;
    out.flush()
}

/// Print the code buffer with a language banner and line numbers
pub fn render_code<W: Write>(state: &AppState, out: &mut W) -> io::Result<()> {
    let language = state.language();
    writeln!(out, "--- {} ---", language.display_name())?;

    let lines: Vec<&str> = state.code().lines().collect();
    let width = lines.len().max(1).to_string().len();
    for (index, line) in lines.iter().enumerate() {
        writeln!(out, "{:>width$} | {}", index + 1, line)?;
    }
    out.flush()
}

/// Print the prompt, e.g. `smartcompile[cpp]> `
pub fn render_prompt<W: Write>(state: &AppState, out: &mut W) -> io::Result<()> {
    write!(out, "smartcompile[{}]> ", state.language())?;
    out.flush()
}

pub fn render_help<W: Write>(out: &mut W) -> io::Result<()> {
    let languages: Vec<&str> = Language::ALL.iter().map(Language::as_str).collect();
    writeln!(out, "Commands:")?;
    writeln!(out, "  :lang <{}>   select language (resets the buffer)", languages.join("|"))?;
    for button in Button::ALL {
        writeln!(out, "  {:<18} {}", button_command(button), button.label())?;
    }
    writeln!(out, "  :edit              replace the buffer; finish with a line containing only '.'")?;
    writeln!(out, "  :open <path>       load a file into the buffer")?;
    writeln!(out, "  :show              print the code buffer")?;
    writeln!(out, "  :output            print the output panel")?;
    writeln!(out, "  :help              show this help")?;
    writeln!(out, "  :quit              exit")?;
    out.flush()
}

/// REPL command bound to a button
pub fn button_command(button: Button) -> &'static str {
    match button {
        Button::RunCode => ":run",
        Button::AiCodeReview => ":review",
        Button::ExplainError => ":explain",
        Button::AutoComment => ":comment",
        Button::ComplexityAnalysis => ":complexity",
        Button::FormatCode => ":format",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::events::ModelEvent;
    use crate::repl::state::reduce;
    use crate::repl::testing::MockWriter;

    #[test]
    fn render_output_should_print_header_and_text() {
        let state = reduce(AppState::new(), ModelEvent::ExplainWithoutError);
        let mut writer = MockWriter::new();

        render_output(&state, &mut writer).unwrap();

        assert_eq!(
            writer.get_output(),
            "Output:\nPlease run your code first and generate an error before explaining.\n"
        );
    }

    #[test]
    fn render_code_should_number_lines() {
        let state = reduce(
            AppState::with_language(Language::Cpp),
            ModelEvent::CodeEdited("int a;\nint b;".to_string()),
        );
        let mut writer = MockWriter::new();

        render_code(&state, &mut writer).unwrap();

        assert_eq!(writer.get_output(), "--- C++ ---\n1 | int a;\n2 | int b;\n");
    }

    #[test]
    fn render_prompt_should_show_language() {
        let mut writer = MockWriter::new();

        render_prompt(&AppState::with_language(Language::Java), &mut writer).unwrap();

        assert_eq!(writer.get_output(), "smartcompile[java]> ");
    }

    #[test]
    fn render_help_should_list_every_button() {
        let mut writer = MockWriter::new();

        render_help(&mut writer).unwrap();

        let help = writer.get_output();
        for button in Button::ALL {
            assert!(help.contains(button.label()));
            assert!(help.contains(button_command(button)));
        }
    }
}
