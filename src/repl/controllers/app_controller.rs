//! # Workbench Application Controller
//!
//! Owns the [`AppState`] and turns user actions into state transitions and
//! backend calls. Remote operations run on spawned tasks and report back over
//! an mpsc channel; the controller applies each completion through the
//! reducer, which drops any that a newer action has superseded.

use crate::repl::commands::{parse_command, ReplCommand, EDIT_TERMINATOR};
use crate::repl::events::{ModelEvent, UserAction};
use crate::repl::services::{invoke, BackendError, Operation, OperationOutcome, Transport};
use crate::repl::state::{reduce, AppState};
use crate::repl::views::{render_code, render_help, render_output, render_prompt};
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Result of a remote operation, tagged with the generation it was sent at
#[derive(Debug)]
pub struct Completion {
    pub generation: u64,
    pub operation: Operation,
    pub result: Result<OperationOutcome, BackendError>,
}

/// What handling an action did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// State changed locally, nothing was sent
    Local,
    /// A request is in flight
    Sent {
        generation: u64,
        operation: Operation,
    },
}

/// What applying a completion did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Applied(Operation),
    /// A newer action owns the output panel; the result was dropped
    Stale(Operation),
}

/// The main application controller
pub struct AppController {
    state: AppState,
    transport: Arc<dyn Transport>,
    completion_sender: mpsc::Sender<Completion>,
    completion_receiver: mpsc::Receiver<Completion>,
    in_flight: usize,
}

impl AppController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_state(AppState::new(), transport)
    }

    pub fn with_state(state: AppState, transport: Arc<dyn Transport>) -> Self {
        let (completion_sender, completion_receiver) = mpsc::channel(10);
        Self {
            state,
            transport,
            completion_sender,
            completion_receiver,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Number of requests sent whose completion has not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn apply(&mut self, event: ModelEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    /// Handle one user action. Remote operations are spawned and return
    /// immediately after the placeholder is shown.
    pub fn handle_action(&mut self, action: UserAction) -> Dispatch {
        tracing::debug!("Handling action: {:?}", action);

        if let Some(operation) = action.operation() {
            return self.dispatch(operation);
        }

        match action {
            UserAction::SelectLanguage(language) => {
                self.apply(ModelEvent::LanguageSelected(language));
            }
            UserAction::EditCode(code) => self.apply(ModelEvent::CodeEdited(code)),
            UserAction::Unimplemented(feature) => {
                self.apply(ModelEvent::FeatureUnavailable { feature });
            }
            UserAction::RunCode
            | UserAction::ReviewCode
            | UserAction::ExplainError
            | UserAction::AutoComment
            | UserAction::AnalyzeComplexity => {
                tracing::warn!("Remote action reached the local handler");
            }
        }
        Dispatch::Local
    }

    fn dispatch(&mut self, operation: Operation) -> Dispatch {
        if operation == Operation::ExplainError && !self.state.output().has_raw_error() {
            tracing::debug!("Explain requested without a raw error, not contacting backend");
            self.apply(ModelEvent::ExplainWithoutError);
            return Dispatch::Local;
        }

        let request = operation.build_request(self.state.editor(), self.state.output());
        self.apply(ModelEvent::OperationStarted(operation));
        let generation = self.state.generation();

        let transport = Arc::clone(&self.transport);
        let sender = self.completion_sender.clone();
        self.in_flight += 1;

        let request_task =
            tokio::spawn(async move { invoke(transport.as_ref(), operation, &request).await });

        // A panicking request task must still report back, or in_flight never drains
        tokio::spawn(async move {
            let result = match request_task.await {
                Ok(result) => result,
                Err(e) => Err(BackendError::Transport(format!("request task failed: {e}"))),
            };
            if let Err(e) = &result {
                tracing::error!("{:?} failed: {e}", operation);
            }
            // The receiver lives as long as the controller
            let _ = sender
                .send(Completion {
                    generation,
                    operation,
                    result,
                })
                .await;
        });

        tracing::debug!("Dispatched {:?} at generation {}", operation, generation);
        Dispatch::Sent {
            generation,
            operation,
        }
    }

    /// Apply a completion through the reducer
    pub fn complete(&mut self, completion: Completion) -> CompletionStatus {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Completion {
            generation,
            operation,
            result,
        } = completion;

        if !self.state.is_current(generation) {
            tracing::debug!(
                "Discarding stale {:?} result from generation {} (current {})",
                operation,
                generation,
                self.state.generation()
            );
            return CompletionStatus::Stale(operation);
        }

        let event = match result {
            Ok(outcome) => ModelEvent::OperationSucceeded {
                generation,
                outcome,
            },
            Err(error) => ModelEvent::OperationFailed {
                generation,
                operation,
                error,
            },
        };
        self.apply(event);
        CompletionStatus::Applied(operation)
    }

    /// Apply a completion if one has already arrived (non-blocking)
    pub fn poll_completion(&mut self) -> Option<CompletionStatus> {
        let completion = self.completion_receiver.try_recv().ok()?;
        Some(self.complete(completion))
    }

    /// Wait for the next completion and apply it. Returns `None` when nothing
    /// is in flight.
    pub async fn next_completion(&mut self) -> Option<CompletionStatus> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.completion_receiver.recv().await?;
        Some(self.complete(completion))
    }

    /// Wait until every in-flight request has completed
    pub async fn settle(&mut self) -> Vec<CompletionStatus> {
        let mut statuses = Vec::new();
        while let Some(status) = self.next_completion().await {
            statuses.push(status);
        }
        statuses
    }

    /// Handle an action and wait for everything it sent to complete
    pub async fn perform(&mut self, action: UserAction) -> Dispatch {
        let dispatch = self.handle_action(action);
        self.settle().await;
        dispatch
    }

    /// Run the line-oriented workbench until `:quit` or end of input.
    ///
    /// Completions are rendered as they arrive, so further commands can be
    /// typed while a request is outstanding.
    pub async fn run<R, W>(&mut self, mut input: R, out: &mut W, interactive: bool) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        // Kept across iterations: read_until appends partial reads when cancelled
        let mut raw_line: Vec<u8> = Vec::new();
        let mut edit_buffer: Option<Vec<String>> = None;

        loop {
            if interactive && edit_buffer.is_none() {
                render_prompt(&self.state, out)?;
            }

            tokio::select! {
                read = input.read_until(b'\n', &mut raw_line) => {
                    if read? == 0 && raw_line.is_empty() {
                        break;
                    }
                    let line = decode_line(&raw_line);
                    raw_line.clear();
                    if line.replaced_invalid {
                        tracing::warn!("Input line contained invalid UTF-8");
                        writeln!(out, "warning: input contained invalid UTF-8, replaced with \u{FFFD}")?;
                    }
                    let line = line.text;

                    if let Some(buffer) = edit_buffer.as_mut() {
                        if line == EDIT_TERMINATOR {
                            let code = buffer.join("\n");
                            edit_buffer = None;
                            self.handle_action(UserAction::EditCode(code));
                            render_code(&self.state, out)?;
                        } else {
                            buffer.push(line);
                        }
                        continue;
                    }

                    match parse_command(&line) {
                        Ok(ReplCommand::Quit) => break,
                        Ok(ReplCommand::Edit) => {
                            writeln!(out, "Enter code, finish with a line containing only '{EDIT_TERMINATOR}'")?;
                            edit_buffer = Some(Vec::new());
                        }
                        Ok(command) => self.execute(command, out).await?,
                        Err(e) => writeln!(out, "{e}")?,
                    }
                }
                status = self.next_completion(), if self.in_flight > 0 => {
                    if let Some(CompletionStatus::Applied(operation)) = status {
                        if interactive {
                            writeln!(out)?;
                        }
                        self.render_after(operation, out)?;
                    }
                }
            }
        }

        // Let outstanding requests land before exiting
        for status in self.settle().await {
            if let CompletionStatus::Applied(operation) = status {
                self.render_after(operation, out)?;
            }
        }
        Ok(())
    }

    async fn execute<W: Write>(&mut self, command: ReplCommand, out: &mut W) -> Result<()> {
        match command {
            ReplCommand::Empty | ReplCommand::Quit | ReplCommand::Edit => {}
            ReplCommand::Action(action) => {
                let shows_code = matches!(action, UserAction::SelectLanguage(_));
                self.handle_action(action);
                if shows_code {
                    render_code(&self.state, out)?;
                } else {
                    render_output(&self.state, out)?;
                }
            }
            ReplCommand::Open(path) => {
                let expanded = shellexpand::tilde(&path).to_string();
                match tokio::fs::read_to_string(&expanded).await {
                    Ok(code) => {
                        self.handle_action(UserAction::EditCode(code));
                        render_code(&self.state, out)?;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to open {}: {}", expanded, e);
                        writeln!(out, "Could not open {expanded}: {e}")?;
                    }
                }
            }
            ReplCommand::Show => render_code(&self.state, out)?,
            ReplCommand::Output => render_output(&self.state, out)?,
            ReplCommand::Help => render_help(out)?,
        }
        Ok(())
    }

    fn render_after<W: Write>(&self, operation: Operation, out: &mut W) -> Result<()> {
        render_output(&self.state, out)?;
        if operation == Operation::AutoComment {
            render_code(&self.state, out)?;
        }
        Ok(())
    }
}

struct InputLine {
    text: String,
    replaced_invalid: bool,
}

/// Strip the line terminator and decode, replacing invalid UTF-8
fn decode_line(raw: &[u8]) -> InputLine {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    match std::str::from_utf8(raw) {
        Ok(text) => InputLine {
            text: text.to_string(),
            replaced_invalid: false,
        },
        Err(_) => InputLine {
            text: String::from_utf8_lossy(raw).into_owned(),
            replaced_invalid: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::models::{default_template, Language};
    use crate::repl::services::operations::{AUTO_COMMENT_SUCCESS, EXPLAIN_NEEDS_RUN};
    use crate::repl::services::ReviewType;
    use crate::repl::testing::{MockTransport, MockWriter};
    use serde_json::json;

    fn controller() -> (AppController, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let app = AppController::new(transport.clone());
        (app, transport)
    }

    #[tokio::test]
    async fn select_language_should_reset_buffer_without_network() {
        let (mut app, transport) = controller();

        for language in Language::ALL {
            let dispatch = app.handle_action(UserAction::SelectLanguage(language));

            assert_eq!(dispatch, Dispatch::Local);
            assert_eq!(app.state().code(), default_template(language));
            assert!(app.state().output_text().is_empty());
            assert!(app.state().raw_error().is_empty());
        }
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn run_should_show_placeholder_then_copy_response() {
        let (mut app, transport) = controller();
        transport.push_response(200, r#"{"output": "55\n", "raw_error": ""}"#);

        let dispatch = app.handle_action(UserAction::RunCode);
        assert!(matches!(dispatch, Dispatch::Sent { operation: Operation::Run, .. }));
        assert_eq!(app.state().output_text(), "Running code...");

        app.settle().await;

        assert_eq!(app.state().output_text(), "55\n");
        assert_eq!(app.state().raw_error(), "");
        assert_eq!(
            transport.calls()[0].body,
            json!({"code": default_template(Language::Python), "language": "python"})
        );
    }

    #[tokio::test]
    async fn explain_without_raw_error_should_not_send_request() {
        let (mut app, transport) = controller();

        let dispatch = app.perform(UserAction::ExplainError).await;

        assert_eq!(dispatch, Dispatch::Local);
        assert_eq!(app.state().output_text(), EXPLAIN_NEEDS_RUN);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn explain_should_send_raw_error_and_keep_it() {
        let (mut app, transport) = controller();
        transport.push_response(200, r#"{"output": "", "raw_error": "division by zero"}"#);
        transport.push_response(200, r#"{"explanation": "X"}"#);

        app.perform(UserAction::RunCode).await;
        app.perform(UserAction::ExplainError).await;

        assert_eq!(app.state().output_text(), "X");
        assert_eq!(app.state().raw_error(), "division by zero");
        let calls = transport.calls();
        assert_eq!(calls[1].path, "/explain");
        assert_eq!(calls[1].body["raw_error"], "division by zero");
    }

    #[tokio::test]
    async fn complexity_should_prefix_results() {
        let (mut app, transport) = controller();
        transport.push_response(200, r#"{"output": "O(n)"}"#);

        app.perform(UserAction::AnalyzeComplexity).await;

        assert_eq!(
            app.state().output_text(),
            "--- Complexity Analysis Results ---\nO(n)"
        );
        assert_eq!(transport.calls()[0].body["review_type"], "complexity");
    }

    #[tokio::test]
    async fn auto_comment_should_replace_code_buffer() {
        let (mut app, transport) = controller();
        transport.push_response(200, r##"{"output": "# commented\ncode"}"##);

        app.perform(UserAction::AutoComment).await;

        assert_eq!(app.state().code(), "# commented\ncode");
        assert_eq!(app.state().output_text(), AUTO_COMMENT_SUCCESS);
    }

    #[tokio::test]
    async fn run_server_error_should_report_status_and_clear_raw_error() {
        let (mut app, transport) = controller();
        transport.push_response(200, r#"{"output": "", "raw_error": "old error"}"#);
        transport.push_response(500, r#"{"error": "internal"}"#);

        app.perform(UserAction::RunCode).await;
        assert_eq!(app.state().raw_error(), "old error");
        app.perform(UserAction::RunCode).await;

        assert!(app.state().output_text().contains("HTTP error! status: 500"));
        assert!(app.state().raw_error().is_empty());
    }

    #[tokio::test]
    async fn review_connection_failure_should_name_review() {
        let (mut app, transport) = controller();
        transport.push_error(BackendError::Transport("connection refused".to_string()));

        app.perform(UserAction::ReviewCode).await;

        assert_eq!(
            app.state().output_text(),
            "Error connecting to backend for AI Code Review: connection refused"
        );
    }

    #[tokio::test]
    async fn unimplemented_feature_should_not_send_request() {
        let (mut app, transport) = controller();

        app.perform(UserAction::Unimplemented("Format Code".to_string()))
            .await;

        assert_eq!(
            app.state().output_text(),
            "Feature Format Code is not yet implemented. This is the only remaining feature!"
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn late_response_should_not_overwrite_newer_action() {
        let (mut app, transport) = controller();
        let run_gate = transport.push_gated_response(
            "/run",
            200,
            r#"{"output": "late run", "raw_error": "late"}"#,
        );
        let review_gate =
            transport.push_gated_response("/code_review", 200, r#"{"output": "looks fine"}"#);

        app.handle_action(UserAction::RunCode);
        app.handle_action(UserAction::ReviewCode);
        assert_eq!(app.in_flight(), 2);

        review_gate.open();
        let first = app.next_completion().await;
        run_gate.open();
        let second = app.next_completion().await;

        assert_eq!(
            first,
            Some(CompletionStatus::Applied(Operation::Review(
                ReviewType::StaticCheck
            )))
        );
        assert_eq!(second, Some(CompletionStatus::Stale(Operation::Run)));
        assert_eq!(
            app.state().output_text(),
            "--- AI Code Review Results ---\nlooks fine"
        );
        assert!(app.state().raw_error().is_empty());
        assert_eq!(app.in_flight(), 0);
    }

    #[tokio::test]
    async fn next_completion_should_return_none_when_idle() {
        let (mut app, _transport) = controller();

        assert_eq!(app.next_completion().await, None);
        assert_eq!(app.poll_completion(), None);
    }

    #[tokio::test]
    async fn run_loop_should_execute_script_and_render_results() {
        let (mut app, transport) = controller();
        transport.push_response(200, r#"{"output": "Hello, Smart Compile!\n", "raw_error": ""}"#);
        let script = ":lang c\n:run\n:format\n:bogus\n:quit\n:run\n";
        let mut out = MockWriter::new();

        app.run(script.as_bytes(), &mut out, false).await.unwrap();

        let text = out.get_output();
        assert!(text.contains("--- C ---"));
        assert!(text.contains("Running code..."));
        assert!(text.contains("Feature Format Code is not yet implemented."));
        assert!(text.contains("unknown command 'bogus'"));
        assert_eq!(app.state().language(), Language::C);
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.calls()[0].body["language"], "c");
    }

    #[tokio::test]
    async fn run_loop_should_replace_buffer_from_edit_block() {
        let (mut app, transport) = controller();
        let script = ":edit\nx = 1\nprint(x)\n.\n:show\n";
        let mut out = MockWriter::new();

        app.run(script.as_bytes(), &mut out, false).await.unwrap();

        assert_eq!(app.state().code(), "x = 1\nprint(x)");
        assert!(out.get_output().contains("2 | print(x)"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn run_loop_should_load_file_into_buffer() {
        let (mut app, _transport) = controller();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.py");
        std::fs::write(&path, "print('from file')").unwrap();
        let script = format!(":open {}\n", path.display());
        let mut out = MockWriter::new();

        app.run(script.as_bytes(), &mut out, false).await.unwrap();

        assert_eq!(app.state().code(), "print('from file')");
    }

    struct PanickingTransport;

    #[async_trait::async_trait]
    impl Transport for PanickingTransport {
        async fn post_json(
            &self,
            _path: &str,
            _body: serde_json::Value,
        ) -> Result<crate::repl::services::TransportResponse, BackendError> {
            panic!("transport blew up");
        }
    }

    #[tokio::test]
    async fn explain_failure_should_report_detail_and_keep_raw_error() {
        let (mut app, transport) = controller();
        transport.push_response(200, r#"{"output": "", "raw_error": "boom"}"#);
        transport.push_error(BackendError::Transport("refused".to_string()));

        app.perform(UserAction::RunCode).await;
        app.perform(UserAction::ExplainError).await;

        assert_eq!(
            app.state().output_text(),
            "Error: Could not get AI explanation. Detail: refused"
        );
        assert_eq!(app.state().raw_error(), "boom");
        assert_eq!(transport.calls()[1].path, "/explain");
    }

    #[tokio::test]
    async fn explain_while_run_in_flight_should_supersede_run_reply() {
        let (mut app, transport) = controller();
        let run_gate = transport.push_gated_response(
            "/run",
            200,
            r#"{"output": "", "raw_error": "late error"}"#,
        );

        app.handle_action(UserAction::RunCode);
        app.handle_action(UserAction::ExplainError);
        run_gate.open();
        let statuses = app.settle().await;

        assert_eq!(statuses, vec![CompletionStatus::Stale(Operation::Run)]);
        assert_eq!(app.state().output_text(), EXPLAIN_NEEDS_RUN);
        assert!(app.state().raw_error().is_empty());
    }

    #[tokio::test]
    async fn panicking_request_should_still_complete_with_failure() {
        let mut app = AppController::new(Arc::new(PanickingTransport));

        app.handle_action(UserAction::RunCode);
        let statuses = app.settle().await;

        assert_eq!(statuses, vec![CompletionStatus::Applied(Operation::Run)]);
        assert_eq!(app.in_flight(), 0);
        assert!(app
            .state()
            .output_text()
            .starts_with("Error connecting to backend: request task failed"));
    }

    #[tokio::test]
    async fn run_loop_should_survive_invalid_utf8_input() {
        let (mut app, transport) = controller();
        let mut out = MockWriter::new();

        app.run(&b"\xff\n:format\n"[..], &mut out, false)
            .await
            .unwrap();

        let text = out.get_output();
        assert!(text.contains("invalid UTF-8"));
        assert!(text.contains(
            "Feature Format Code is not yet implemented. This is the only remaining feature!"
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn run_loop_should_keep_invalid_bytes_inside_edit_block() {
        let (mut app, _transport) = controller();
        let mut out = MockWriter::new();

        app.run(&b":edit\r\nname = 'caf\xe9'\r\n.\r\n"[..], &mut out, false)
            .await
            .unwrap();

        assert_eq!(app.state().code(), "name = 'caf\u{FFFD}'");
    }

    #[test]
    fn decode_line_should_strip_terminators() {
        let line = decode_line(b"print(1)\r\n");

        assert_eq!(line.text, "print(1)");
        assert!(!line.replaced_invalid);
    }
}
