//! `pipeguard config` -- inspect the resolved configuration.

use pipeguard_types::Config;

/// Print the full resolved configuration as JSON, followed by any
/// validation problem.
pub fn config_show(config: &Config) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if let Err(e) = config.policy.opa.validate() {
        eprintln!("warning: {e}");
    }
    Ok(())
}
