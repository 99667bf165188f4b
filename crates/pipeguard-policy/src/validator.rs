//! The [`PipelineValidator`] seam used by the save pathway.
//!
//! A save runs every registered validator in order and stops at the first
//! rejection. [`ValidationGate`](crate::ValidationGate) is one such
//! validator.

use std::sync::Arc;

use async_trait::async_trait;
use pipeguard_types::PipelineDefinition;
use tracing::debug;

use crate::error::ValidationRejected;

/// Something that can veto a pipeline save.
#[async_trait]
pub trait PipelineValidator: Send + Sync {
    /// Short name for logs (e.g. "opa").
    fn name(&self) -> &str;

    /// Return `Err` to block the save.
    async fn validate(&self, pipeline: &PipelineDefinition) -> Result<(), ValidationRejected>;
}

/// Run `validators` in order, returning the first rejection.
pub async fn validate_all(
    validators: &[Arc<dyn PipelineValidator>],
    pipeline: &PipelineDefinition,
) -> Result<(), ValidationRejected> {
    for validator in validators {
        debug!(validator = validator.name(), "running pipeline validator");
        validator.validate(pipeline).await?;
    }
    Ok(())
}
