//! # Remote Operations
//!
//! The five backend operations share one request/response protocol. Each
//! [`Operation`] knows its endpoint, whether it checks the HTTP status before
//! parsing, how to build its request from editor state and how to decode the
//! reply. [`invoke`] runs that protocol against any [`Transport`].

use super::backend::{BackendError, Transport};
use crate::repl::models::{EditorModel, Language, OutputModel};
use serde::{Deserialize, Serialize};

pub const RUN_PLACEHOLDER: &str = "Running code...";
pub const EXPLAIN_PLACEHOLDER: &str = "Generating AI explanation...";
pub const AUTO_COMMENT_PLACEHOLDER: &str = "Generating inline comments...";
pub const AUTO_COMMENT_SUCCESS: &str = "Comments generated successfully! Check the code editor.";
pub const EXPLAIN_NEEDS_RUN: &str =
    "Please run your code first and generate an error before explaining.";

/// Kind of review requested from `/code_review`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    StaticCheck,
    Complexity,
}

impl ReviewType {
    /// Title used in placeholder, result header and failure messages
    pub fn title(&self) -> &'static str {
        match self {
            ReviewType::StaticCheck => "AI Code Review",
            ReviewType::Complexity => "Complexity Analysis",
        }
    }
}

/// One request/response cycle against the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Run,
    ExplainError,
    Review(ReviewType),
    AutoComment,
}

impl Operation {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Run => "/run",
            Operation::ExplainError => "/explain",
            Operation::Review(_) => "/code_review",
            Operation::AutoComment => "/auto_comment",
        }
    }

    /// Whether a non-2xx status fails the operation before the body is parsed.
    ///
    /// `/explain` has never checked the status and parses whatever body it
    /// gets back; the other endpoints do.
    pub fn checks_http_status(&self) -> bool {
        !matches!(self, Operation::ExplainError)
    }

    /// Whether starting this operation clears the captured raw error.
    /// Explain reads the raw error, so it must leave it in place.
    pub fn clears_raw_error(&self) -> bool {
        !matches!(self, Operation::ExplainError)
    }

    /// Text shown in the output panel while the request is outstanding
    pub fn placeholder(&self, language: Language) -> String {
        match self {
            Operation::Run => RUN_PLACEHOLDER.to_string(),
            Operation::ExplainError => EXPLAIN_PLACEHOLDER.to_string(),
            Operation::Review(review_type) => {
                format!("Running {} for {}...", review_type.title(), language)
            }
            Operation::AutoComment => AUTO_COMMENT_PLACEHOLDER.to_string(),
        }
    }

    /// Text shown in the output panel when the operation fails
    pub fn failure_message(&self, error: &BackendError) -> String {
        match self {
            Operation::Run => {
                format!("Error connecting to backend: {error}. Is Flask running?")
            }
            Operation::ExplainError => {
                format!("Error: Could not get AI explanation. Detail: {error}")
            }
            Operation::Review(review_type) => {
                format!("Error connecting to backend for {}: {error}", review_type.title())
            }
            Operation::AutoComment => format!("Error generating comments: {error}"),
        }
    }

    /// Build the request body from the current editor and output state
    pub fn build_request(&self, editor: &EditorModel, output: &OutputModel) -> OperationRequest {
        let code = editor.code().to_string();
        let language = editor.language();
        match self {
            Operation::Run | Operation::AutoComment => {
                OperationRequest::Source(SourceRequest { code, language })
            }
            Operation::ExplainError => OperationRequest::Explain(ExplainRequest {
                code,
                language,
                raw_error: output.raw_error().to_string(),
            }),
            Operation::Review(review_type) => OperationRequest::Review(ReviewRequest {
                code,
                language,
                review_type: *review_type,
            }),
        }
    }

    /// Decode a response body into this operation's outcome
    pub fn decode_response(&self, body: &str) -> Result<OperationOutcome, BackendError> {
        let outcome = match self {
            Operation::Run => {
                let response: RunResponse = decode(body)?;
                OperationOutcome::Executed {
                    output: response.output.unwrap_or_default(),
                    raw_error: response.raw_error.unwrap_or_default(),
                }
            }
            Operation::ExplainError => {
                let response: ExplainResponse = decode(body)?;
                OperationOutcome::Explained {
                    explanation: response.explanation.unwrap_or_default(),
                }
            }
            Operation::Review(review_type) => {
                let response: OutputResponse = decode(body)?;
                OperationOutcome::Reviewed {
                    review_type: *review_type,
                    report: response.output.unwrap_or_default(),
                }
            }
            Operation::AutoComment => {
                let response: OutputResponse = decode(body)?;
                OperationOutcome::Commented {
                    code: response.output.unwrap_or_default(),
                }
            }
        };
        Ok(outcome)
    }
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Body for `/run` and `/auto_comment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRequest {
    pub code: String,
    pub language: Language,
}

/// Body for `/explain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainRequest {
    pub code: String,
    pub language: Language,
    pub raw_error: String,
}

/// Body for `/code_review`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRequest {
    pub code: String,
    pub language: Language,
    pub review_type: ReviewType,
}

/// Request body for any operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationRequest {
    Source(SourceRequest),
    Explain(ExplainRequest),
    Review(ReviewRequest),
}

// Missing and null fields both decode to None and render as empty text.

#[derive(Debug, Deserialize)]
struct RunResponse {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    raw_error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExplainResponse {
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OutputResponse {
    #[serde(default)]
    output: Option<String>,
}

/// Decoded result of a successful operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Executed { output: String, raw_error: String },
    Explained { explanation: String },
    Reviewed { review_type: ReviewType, report: String },
    Commented { code: String },
}

/// Run one operation against the backend: post the request, check the status
/// where the operation asks for it, then decode the body.
pub async fn invoke(
    transport: &dyn Transport,
    operation: Operation,
    request: &OperationRequest,
) -> Result<OperationOutcome, BackendError> {
    let body = serde_json::to_value(request).map_err(|e| BackendError::Encode(e.to_string()))?;

    tracing::debug!("Invoking {:?} at {}", operation, operation.endpoint());
    let response = transport.post_json(operation.endpoint(), body).await?;

    if operation.checks_http_status() && !response.is_success() {
        tracing::warn!(
            "{:?} failed with HTTP status {}",
            operation,
            response.status
        );
        return Err(BackendError::Status(response.status));
    }

    operation.decode_response(&response.body)
}
