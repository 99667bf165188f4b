//! `pipeguard request` -- print the decision request a save would send.

use std::path::PathBuf;

use clap::Args;
use pipeguard_policy::request;

use crate::config_loader::load_config;

/// Arguments for `pipeguard request`.
#[derive(Args)]
pub struct RequestArgs {
    /// Pipeline JSON file.
    pub pipeline: PathBuf,

    /// JSON array of stored pipelines, consulted in delta mode.
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Build the request and pretty-print it. Nothing is sent.
pub async fn run(args: RequestArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    let pipeline = super::read_pipeline(&args.pipeline).await?;
    let store = super::read_store(args.store.as_deref()).await?;

    let request = request::build(&pipeline, config.policy.opa.delta_verification, &store).await?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}
