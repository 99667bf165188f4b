//! Decision request construction.
//!
//! A request wraps the pipeline under `input.new`. In delta mode the stored
//! revision rides along under `input.current` so a policy can reason about
//! what changed:
//!
//! ```json
//! {"input": {"new": {...}, "current": {...}}}
//! ```

use pipeguard_types::PipelineDefinition;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GateError, Result};
use crate::store::PipelineLookup;

/// The document POSTed to the decision service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Everything the policy evaluates.
    pub input: DecisionInput,
}

/// The `input` object of a [`DecisionRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionInput {
    /// The revision being saved.
    pub new: PipelineDefinition,

    /// The revision currently stored. Only set in delta mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<PipelineDefinition>,
}

impl DecisionRequest {
    /// A request carrying only the new revision.
    pub fn single(new: PipelineDefinition) -> Self {
        Self {
            input: DecisionInput { new, current: None },
        }
    }

    /// A request carrying both revisions.
    pub fn delta(new: PipelineDefinition, current: PipelineDefinition) -> Self {
        Self {
            input: DecisionInput {
                new,
                current: Some(current),
            },
        }
    }

    /// Whether the stored revision is included.
    pub fn is_delta(&self) -> bool {
        self.input.current.is_some()
    }

    /// Encode as the JSON request body.
    pub fn to_body(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Build the decision request for `pipeline`.
///
/// With `delta_enabled`, a pipeline that is not a first-time save is paired
/// with its stored revision, found among the application's pipelines by
/// case-insensitive name. A first-time save (present, empty stage list)
/// never consults the store.
pub async fn build(
    pipeline: &PipelineDefinition,
    delta_enabled: bool,
    lookup: &dyn PipelineLookup,
) -> Result<DecisionRequest> {
    let application = pipeline
        .application
        .as_deref()
        .ok_or(GateError::MissingApplication)?;

    let initial_save = pipeline.is_initial_save();
    if !delta_enabled || initial_save {
        debug!(
            application,
            pipeline = pipeline.name_or_empty(),
            delta_enabled,
            initial_save,
            "building single-revision decision request"
        );
        return Ok(DecisionRequest::single(pipeline.clone()));
    }

    let name = pipeline.name_or_empty();
    let stored = lookup
        .pipelines_by_application(application, true)
        .await
        .map_err(|e| GateError::Lookup {
            application: application.to_string(),
            reason: e.to_string(),
        })?;

    let current = stored
        .into_iter()
        .find(|p| p.is_named(name))
        .ok_or_else(|| GateError::PipelineNotFound {
            name: name.to_string(),
        })?;

    debug!(application, pipeline = name, "building delta decision request");
    Ok(DecisionRequest::delta(pipeline.clone(), current))
}
