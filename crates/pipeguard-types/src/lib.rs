//! Core types for pipeguard.
//!
//! This crate holds the data shared by every other pipeguard crate:
//!
//! - [`PipelineDefinition`] -- the pipeline document submitted for a save.
//! - [`Config`] / [`OpaConfig`] -- the immutable policy-service settings,
//!   established once at startup.
//! - [`ResponseMode`] -- which of the two decision-response wire formats the
//!   configured service speaks.
//!
//! It has no I/O and no async code; loading configuration from disk is the
//! job of the binary.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{Config, OpaConfig, PolicyConfig, ResponseMode};
pub use error::ConfigError;
pub use pipeline::PipelineDefinition;
