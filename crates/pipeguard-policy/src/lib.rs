//! Policy-decision gate for pipeline saves.
//!
//! Before a pipeline create/update is written, the gate submits the pipeline
//! to an Open Policy Agent server (or an OPA proxy) and blocks the write if
//! the policy denies it.
//!
//! # Architecture
//!
//! - [`request`] builds the `{"input": {"new": ..., "current": ...}}` document
//! - [`DecisionClient`] sends it; [`HttpDecisionClient`] is the reqwest-backed
//!   implementation
//! - [`response`] interprets the answer in proxy or native mode
//! - [`ValidationGate`] orchestrates the three and yields a [`GateOutcome`]
//! - [`PipelineLookup`] is the read-only store consulted in delta mode
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pipeguard_policy::{HttpDecisionClient, InMemoryPipelineStore, ValidationGate};
//!
//! let gate = ValidationGate::new(
//!     Arc::new(config.policy.opa),
//!     Arc::new(HttpDecisionClient::new()),
//!     Arc::new(InMemoryPipelineStore::default()),
//! );
//! gate.validate(&pipeline).await.into_result()?;
//! ```

pub mod client;
pub mod document;
pub mod error;
pub mod gate;
pub mod request;
pub mod response;
pub mod store;
pub mod validator;

pub use client::{DecisionClient, HttpDecisionClient, RawDecision};
pub use error::{GateError, Result, StoreError, ValidationRejected};
pub use gate::{GateState, ValidationGate};
pub use request::{DecisionInput, DecisionRequest};
pub use response::{GateOutcome, interpret};
pub use store::{InMemoryPipelineStore, PipelineLookup};
pub use validator::{PipelineValidator, validate_all};
