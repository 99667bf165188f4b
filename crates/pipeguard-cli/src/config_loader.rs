//! Configuration file discovery and loading.
//!
//! The discovery order is:
//! 1. `--config <path>` on the command line.
//! 2. `PIPEGUARD_CONFIG` environment variable.
//! 3. `~/.pipeguard/config.json`
//! 4. If none found, the built-in defaults (gate disabled).
//!
//! JSON keys are normalized from camelCase to snake_case before
//! deserializing, so `policy.opa.policyLocation` and
//! `policy.opa.policy_location` are equivalent.

use std::path::{Path, PathBuf};

use anyhow::Context;
use pipeguard_types::Config;
use serde_json::Value;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PIPEGUARD_CONFIG";

/// Discover the config file path using the fallback chain.
///
/// A path from the environment is returned as-is; the home-directory
/// candidate only if it exists.
pub fn discover_config_path(
    env_path: Option<String>,
    home_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(env_path) = env_path.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(env_path));
    }

    let candidate = home_dir?.join(".pipeguard").join("config.json");
    candidate.exists().then_some(candidate)
}

/// Load configuration from `config_override` or via discovery.
pub async fn load_config(config_override: Option<&str>) -> anyhow::Result<Config> {
    let path = match config_override {
        Some(path_str) => {
            let path = PathBuf::from(path_str);
            if !path.exists() {
                anyhow::bail!("config file not found: {path_str}");
            }
            Some(path)
        }
        None => discover_config_path(std::env::var(CONFIG_ENV).ok(), dirs::home_dir()),
    };

    let Some(path) = path else {
        tracing::info!("no config file found, using defaults");
        return Ok(Config::default());
    };

    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "config path does not exist, using defaults"
        );
        return Ok(Config::default());
    }

    load_config_file(&path).await
}

/// Read, normalize and deserialize one config file.
pub async fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::debug!(path = %path.display(), "loading config file");
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    let config = serde_json::from_value(normalize_keys(value))
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(config)
}

/// Convert camelCase JSON keys to snake_case recursively.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (camel_to_snake(&key), normalize_keys(val)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Convert a single camelCase string to snake_case.
///
/// A run of capitals is kept together as one word, so `"HTTPProxy"` becomes
/// `"http_proxy"`.
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            if prev.is_lowercase()
                || (prev.is_uppercase() && next.is_some_and(|c| c.is_lowercase()))
            {
                result.push('_');
            }
        }
        result.push(ch.to_ascii_lowercase());
    }
    result
}
