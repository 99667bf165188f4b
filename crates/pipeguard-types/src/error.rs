//! Configuration error types.

use thiserror::Error;

/// A policy configuration that cannot be used to reach the decision service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The service URL is empty.
    #[error("policy.opa.url must not be empty")]
    EmptyUrl,

    /// The service URL does not use an HTTP scheme.
    #[error("policy.opa.url must start with http:// or https://, got '{0}'")]
    UnsupportedScheme(String),

    /// Native mode needs a key to read inside `result`.
    #[error("policy.opa.result_key must not be empty when proxy mode is off")]
    EmptyResultKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty_url() {
        assert_eq!(
            ConfigError::EmptyUrl.to_string(),
            "policy.opa.url must not be empty"
        );
    }

    #[test]
    fn display_unsupported_scheme() {
        let err = ConfigError::UnsupportedScheme("ftp://opa".into());
        assert_eq!(
            err.to_string(),
            "policy.opa.url must start with http:// or https://, got 'ftp://opa'"
        );
    }
}
