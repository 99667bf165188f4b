//! `pipeguard` -- CLI binary for checking pipelines against a policy service.
//!
//! Provides the following subcommands:
//!
//! - `pipeguard validate` -- Run the policy gate against a pipeline file.
//! - `pipeguard request` -- Print the decision request without sending it.
//! - `pipeguard config` -- Show the resolved configuration.

use clap::{Parser, Subcommand};

mod commands;
mod config_loader;

/// pipeguard policy gate CLI.
#[derive(Parser)]
#[command(name = "pipeguard", about = "Pipeline policy gate CLI", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate a pipeline against the configured policy.
    Validate(commands::validate::ValidateArgs),

    /// Print the decision request for a pipeline without sending it.
    Request(commands::request::RequestArgs),

    /// Show resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

/// Subcommands for `pipeguard config`.
#[derive(Subcommand)]
enum ConfigCmd {
    /// Show the full resolved configuration.
    Show {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate(args) => commands::validate::run(args).await?,
        Commands::Request(args) => commands::request::run(args).await?,
        Commands::Config { action } => match action {
            ConfigCmd::Show { config } => {
                let cfg = config_loader::load_config(config.as_deref()).await?;
                commands::config_cmd::config_show(&cfg)?;
            }
        },
    }

    Ok(())
}
