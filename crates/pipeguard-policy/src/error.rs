//! Gate error types.
//!
//! Every failure the gate can meet on the way to a decision has a variant
//! here. At the gate boundary each one is collapsed into a single
//! [`GateOutcome::Reject`](crate::GateOutcome::Reject) whose reason is the
//! variant's `Display` text, so the messages below are what a user sees on a
//! blocked save.

use thiserror::Error;

/// Errors raised while building, dispatching, or interpreting a decision.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GateError {
    /// The pipeline carries no application, so it cannot be identified.
    #[error("pipeline has no application field")]
    MissingApplication,

    /// The pipeline could not be rendered to the canonical document.
    #[error("failed to encode decision request: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Delta mode found no stored revision to compare against.
    #[error("there is no pipeline with name {name}")]
    PipelineNotFound {
        /// Name of the pipeline being saved.
        name: String,
    },

    /// The pipeline store could not be queried.
    #[error("failed to look up pipelines for application {application}: {reason}")]
    Lookup {
        /// Application whose pipelines were requested.
        application: String,
        /// Store-supplied description.
        reason: String,
    },

    /// The HTTP exchange with the decision service failed.
    #[error("communication with policy service failed: {0}")]
    Transport(String),

    /// The decision service answered without a body.
    #[error("policy service returned an empty response")]
    EmptyResponse,

    /// A native-mode decision document lacks an expected field or has the
    /// wrong shape.
    #[error("{0}")]
    MalformedResponse(String),

    /// The policy denied the pipeline. The reason is passed through verbatim.
    #[error("{0}")]
    PolicyDenied(String),
}

impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        GateError::Transport(err.to_string())
    }
}

/// A convenience type alias for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

/// Failure of a pipeline store lookup.
#[derive(Error, Debug)]
#[error("pipeline store unavailable: {0}")]
pub struct StoreError(pub String);

/// A save blocked by a validator.
///
/// This is what the save pathway propagates; its message is the rejection
/// reason unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ValidationRejected {
    /// Human-readable rejection reason.
    pub reason: String,
}
