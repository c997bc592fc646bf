//! Testing infrastructure for workbench components
//!
//! Provides a recording [`Transport`] and a capturing writer so the dispatcher
//! and the view can be exercised without a backend or a terminal.

use crate::repl::services::{BackendError, Transport, TransportResponse};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Mock writer that captures output instead of writing to terminal
#[derive(Default)]
pub struct MockWriter {
    pub output: Vec<u8>,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MockWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_output(&self) -> String {
        String::from_utf8_lossy(&self.output).to_string()
    }

    pub fn clear(&mut self) {
        self.output.clear();
    }
}

/// A request the mock transport received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub path: String,
    pub body: serde_json::Value,
}

/// Handle that releases a gated mock reply
pub struct ReplyGate(oneshot::Sender<()>);

impl ReplyGate {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

struct QueuedReply {
    result: Result<TransportResponse, BackendError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Transport that records every call and answers from queued replies.
///
/// Replies queued for a specific path are used first; otherwise the shared
/// queue is consumed in order. With nothing queued the call fails with a
/// transport error.
#[derive(Default)]
pub struct MockTransport {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<VecDeque<QueuedReply>>,
    path_replies: Mutex<HashMap<String, VecDeque<QueuedReply>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next call to any path
    pub fn push_response(&self, status: u16, body: &str) {
        self.enqueue(
            None,
            QueuedReply {
                result: Ok(TransportResponse::new(status, body)),
                gate: None,
            },
        );
    }

    /// Queue a failure for the next call to any path
    pub fn push_error(&self, error: BackendError) {
        self.enqueue(
            None,
            QueuedReply {
                result: Err(error),
                gate: None,
            },
        );
    }

    /// Queue a reply for `path` that is held back until the gate is opened
    pub fn push_gated_response(&self, path: &str, status: u16, body: &str) -> ReplyGate {
        let (sender, receiver) = oneshot::channel();
        self.enqueue(
            Some(path),
            QueuedReply {
                result: Ok(TransportResponse::new(status, body)),
                gate: Some(receiver),
            },
        );
        ReplyGate(sender)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn enqueue(&self, path: Option<&str>, reply: QueuedReply) {
        match path {
            Some(path) => {
                if let Ok(mut replies) = self.path_replies.lock() {
                    replies.entry(path.to_string()).or_default().push_back(reply);
                }
            }
            None => {
                if let Ok(mut replies) = self.replies.lock() {
                    replies.push_back(reply);
                }
            }
        }
    }

    fn next_reply(&self, path: &str) -> Option<QueuedReply> {
        let for_path = self
            .path_replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.get_mut(path).and_then(VecDeque::pop_front));
        for_path.or_else(|| self.replies.lock().ok().and_then(|mut r| r.pop_front()))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<TransportResponse, BackendError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                path: path.to_string(),
                body,
            });
        }

        let Some(reply) = self.next_reply(path) else {
            return Err(BackendError::Transport(format!(
                "no mock response queued for {path}"
            )));
        };

        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        reply.result
    }
}
