//! The validation gate.
//!
//! [`ValidationGate`] runs one evaluation per save:
//!
//! ```text
//! Disabled ───────────────────────────────────────────────► Allowed
//! BuildingInput ──► Dispatching ──► Interpreting ──► Allowed | Rejected
//!       │                │
//!       └────────────────┴──────────────────────────────► Rejected
//! ```
//!
//! Any failure along the way becomes a single [`GateOutcome::Reject`]. There
//! is no caching: every call is a fresh round trip to the decision service.

use std::sync::Arc;

use async_trait::async_trait;
use pipeguard_types::{OpaConfig, PipelineDefinition};
use tracing::{debug, error, info, trace, warn};

use crate::client::{DecisionClient, decision_url};
use crate::error::{GateError, ValidationRejected};
use crate::request;
use crate::response::{GateOutcome, interpret};
use crate::store::PipelineLookup;
use crate::validator::PipelineValidator;

/// States visited during one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// The gate is switched off.
    Disabled,
    /// Building the decision request.
    BuildingInput,
    /// Waiting on the decision service.
    Dispatching,
    /// Reading the decision.
    Interpreting,
    /// Terminal: the write may proceed.
    Allowed,
    /// Terminal: the write is blocked.
    Rejected(String),
}

impl GateState {
    /// Whether no further transition follows.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GateState::Allowed | GateState::Rejected(_))
    }
}

/// Policy gate for pipeline saves.
///
/// Cheap to share: configuration is immutable and the client pools its
/// connections, so one gate serves all concurrent saves.
#[derive(Clone)]
pub struct ValidationGate {
    config: Arc<OpaConfig>,
    client: Arc<dyn DecisionClient>,
    lookup: Arc<dyn PipelineLookup>,
}

impl ValidationGate {
    /// Create a gate over a fixed configuration, transport and store.
    pub fn new(
        config: Arc<OpaConfig>,
        client: Arc<dyn DecisionClient>,
        lookup: Arc<dyn PipelineLookup>,
    ) -> Self {
        Self {
            config,
            client,
            lookup,
        }
    }

    /// Returns the gate configuration.
    pub fn config(&self) -> &OpaConfig {
        &self.config
    }

    /// Evaluate `pipeline` against the policy.
    pub async fn validate(&self, pipeline: &PipelineDefinition) -> GateOutcome {
        let mut trail = Vec::new();
        self.run(pipeline, &mut trail).await
    }

    /// Evaluate `pipeline` and also return every state visited, in order.
    pub async fn validate_traced(
        &self,
        pipeline: &PipelineDefinition,
    ) -> (GateOutcome, Vec<GateState>) {
        let mut trail = Vec::new();
        let outcome = self.run(pipeline, &mut trail).await;
        (outcome, trail)
    }

    async fn run(&self, pipeline: &PipelineDefinition, trail: &mut Vec<GateState>) -> GateOutcome {
        if !self.config.enabled {
            debug!("policy gate disabled, allowing");
            enter(trail, GateState::Disabled);
            enter(trail, GateState::Allowed);
            return GateOutcome::Allow;
        }

        enter(trail, GateState::BuildingInput);
        let body = match self.build_body(pipeline).await {
            Ok(body) => body,
            Err(err) => return finish(trail, err.into()),
        };

        enter(trail, GateState::Dispatching);
        let raw = match self
            .client
            .send(&self.config.url, &self.config.policy_location, body)
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    url = %self.config.url,
                    error = %err,
                    "communication with policy service failed"
                );
                return finish(trail, err.into());
            }
        };

        enter(trail, GateState::Interpreting);
        let outcome = interpret(self.config.response_mode(), &self.config.result_key, &raw);
        finish(trail, outcome)
    }

    async fn build_body(&self, pipeline: &PipelineDefinition) -> Result<Vec<u8>, GateError> {
        debug!(
            url = %decision_url(&self.config.url, &self.config.policy_location),
            proxy = self.config.proxy,
            delta = self.config.delta_verification,
            "evaluating pipeline against policy service"
        );
        let request =
            request::build(pipeline, self.config.delta_verification, self.lookup.as_ref()).await?;
        let body = request.to_body()?;
        debug!(
            body = %String::from_utf8_lossy(&body),
            "decision request"
        );
        Ok(body)
    }
}

fn enter(trail: &mut Vec<GateState>, state: GateState) {
    trace!(state = ?state, "gate transition");
    trail.push(state);
}

fn finish(trail: &mut Vec<GateState>, outcome: GateOutcome) -> GateOutcome {
    match &outcome {
        GateOutcome::Allow => {
            info!("pipeline allowed by policy");
            enter(trail, GateState::Allowed);
        }
        GateOutcome::Reject(reason) => {
            warn!(reason = %reason, "pipeline rejected by policy");
            enter(trail, GateState::Rejected(reason.clone()));
        }
    }
    outcome
}

#[async_trait]
impl PipelineValidator for ValidationGate {
    fn name(&self) -> &str {
        "opa"
    }

    async fn validate(&self, pipeline: &PipelineDefinition) -> Result<(), ValidationRejected> {
        ValidationGate::validate(self, pipeline).await.into_result()
    }
}
