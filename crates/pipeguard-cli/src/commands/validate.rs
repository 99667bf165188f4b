//! `pipeguard validate` -- check a pipeline against the policy service.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use pipeguard_policy::{GateOutcome, HttpDecisionClient, ValidationGate};

use crate::config_loader::load_config;

/// Arguments for `pipeguard validate`.
#[derive(Args)]
pub struct ValidateArgs {
    /// Pipeline JSON file to validate.
    pub pipeline: PathBuf,

    /// JSON array of stored pipelines, consulted in delta mode.
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Run the gate once and report the outcome. A rejection is an error so the
/// process exits non-zero.
pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    config.policy.opa.validate()?;

    let pipeline = super::read_pipeline(&args.pipeline).await?;
    let store = super::read_store(args.store.as_deref()).await?;

    let gate = ValidationGate::new(
        Arc::new(config.policy.opa),
        Arc::new(decision_client()?),
        Arc::new(store),
    );

    let outcome = gate.validate(&pipeline).await;
    println!("{}", describe(&outcome));
    outcome
        .into_result()
        .map_err(|e| anyhow::Error::new(e).context("pipeline rejected by policy"))
}

/// Decision client with pooled connections. Idle connections are dropped
/// after 30 seconds; request time is bounded only by reqwest's defaults.
pub fn decision_client() -> anyhow::Result<HttpDecisionClient> {
    let http = reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(30))
        .build()?;
    Ok(HttpDecisionClient::with_client(http))
}

/// One-line, user-facing rendering of an outcome.
pub fn describe(outcome: &GateOutcome) -> String {
    match outcome {
        GateOutcome::Allow => "allowed".to_string(),
        GateOutcome::Reject(reason) => format!("rejected: {reason}"),
    }
}
