//! Policy service configuration.
//!
//! The configuration tree mirrors the property layout the gate has always
//! been deployed with (`policy.opa.*`):
//!
//! ```json
//! {
//!   "policy": {
//!     "opa": {
//!       "url": "http://oes-server-svc.oes:8085",
//!       "resultKey": "deny",
//!       "policyLocation": "/v1/staticPolicy/eval",
//!       "enabled": true,
//!       "proxy": false,
//!       "deltaVerification": true
//!     }
//!   }
//! }
//! ```
//!
//! Every field has a default, so an empty document is a valid (disabled)
//! configuration. Values are read once at startup and never reassigned.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Policy enforcement settings.
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// The `policy` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Open Policy Agent (or OPA proxy) settings.
    #[serde(default)]
    pub opa: OpaConfig,
}

/// Connection and interpretation settings for the decision service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaConfig {
    /// Base URL of the OPA server or proxy.
    #[serde(default = "default_url", alias = "opaUrl", alias = "opa_url")]
    pub url: String,

    /// Key read inside `result` in native mode. Unused by the proxy.
    #[serde(default = "default_result_key", alias = "resultKey")]
    pub result_key: String,

    /// Path of the policy, appended to [`url`](Self::url). Generally
    /// `v1/data/<package path>` for OPA and `/v1/staticPolicy/eval` for the
    /// proxy.
    #[serde(default = "default_policy_location", alias = "policyLocation")]
    pub policy_location: String,

    /// Master switch. Evaluation is skipped entirely when false.
    #[serde(default)]
    pub enabled: bool,

    /// True when a proxy answers instead of an OPA server.
    #[serde(default = "default_proxy")]
    pub proxy: bool,

    /// Send the currently stored revision alongside the new one.
    #[serde(default, alias = "deltaVerification")]
    pub delta_verification: bool,
}

fn default_url() -> String {
    "http://oes-server-svc.oes:8085".to_string()
}

fn default_result_key() -> String {
    "deny".to_string()
}

fn default_policy_location() -> String {
    "/v1/staticPolicy/eval".to_string()
}

fn default_proxy() -> bool {
    true
}

impl Default for OpaConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            result_key: default_result_key(),
            policy_location: default_policy_location(),
            enabled: false,
            proxy: default_proxy(),
            delta_verification: false,
        }
    }
}

/// Wire format of decision responses.
///
/// Chosen by configuration and never sniffed from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Pass/fail carried by the HTTP status; the body is the denial reason.
    Proxy,
    /// `{"result": {"<key>": [reasons]}}` from an OPA server.
    Native,
}

impl OpaConfig {
    /// The response format this deployment speaks.
    pub fn response_mode(&self) -> ResponseMode {
        if self.proxy {
            ResponseMode::Proxy
        } else {
            ResponseMode::Native
        }
    }

    /// Check the settings a live evaluation depends on.
    ///
    /// A disabled configuration is always valid since it never reaches the
    /// network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(url.to_string()));
        }
        if !self.proxy && self.result_key.trim().is_empty() {
            return Err(ConfigError::EmptyResultKey);
        }
        Ok(())
    }
}
