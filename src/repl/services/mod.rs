//! # Services Layer
//!
//! Talks to the SmartCompile backend. The transport abstracts the wire so the
//! controller and its tests can swap in a recording fake; the operations module
//! holds the per-endpoint contracts and the shared invoke primitive.

pub mod backend;
pub mod operations;

pub use backend::{BackendError, HttpTransport, Transport, TransportResponse};
pub use operations::{
    invoke, ExplainRequest, Operation, OperationOutcome, OperationRequest, ReviewRequest,
    ReviewType, SourceRequest,
};
