//! Checker configuration.

use std::time::Duration;

pub const ENDPOINT_VAR: &str = "FITCH_CHECKER_URL";
pub const PREDICATE_SETTINGS_VAR: &str = "FITCH_PREDICATE_SETTINGS";
pub const TIMEOUT_VAR: &str = "FITCH_CHECKER_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the remote proof checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    pub endpoint: String,
    /// Opaque settings string forwarded as `predicateSettings`.
    pub predicate_settings: String,
    pub timeout_secs: u64,
}

impl CheckerConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            predicate_settings: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup(ENDPOINT_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        url::Url::parse(&endpoint)
            .map_err(|e| ConfigError::Invalid(format!("{ENDPOINT_VAR}: {e}")))?;

        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("{TIMEOUT_VAR}={raw:?}: {e}")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint,
            predicate_settings: lookup(PREDICATE_SETTINGS_VAR).unwrap_or_default(),
            timeout_secs,
        })
    }

    pub fn with_predicate_settings(mut self, settings: impl Into<String>) -> Self {
        self.predicate_settings = settings.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("No proof checker configured. Set FITCH_CHECKER_URL")]
    MissingEndpoint,
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            CheckerConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "http://localhost:8080/check")]))
                .unwrap();
        assert_eq!(config, CheckerConfig::new("http://localhost:8080/check"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_all_variables() {
        let config = CheckerConfig::from_lookup(lookup(&[
            (ENDPOINT_VAR, "https://checker.example/proofs"),
            (PREDICATE_SETTINGS_VAR, "{\"constants\":\"a b\"}"),
            (TIMEOUT_VAR, " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.predicate_settings, "{\"constants\":\"a b\"}");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_missing_endpoint() {
        assert_eq!(
            CheckerConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingEndpoint)
        );
        assert_eq!(
            CheckerConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "  ")])),
            Err(ConfigError::MissingEndpoint)
        );
    }

    #[test]
    fn test_invalid_values() {
        let bad_timeout = CheckerConfig::from_lookup(lookup(&[
            (ENDPOINT_VAR, "http://localhost/check"),
            (TIMEOUT_VAR, "soon"),
        ]));
        assert!(matches!(bad_timeout, Err(ConfigError::Invalid(_))));

        let bad_url = CheckerConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "not a url")]));
        assert!(matches!(bad_url, Err(ConfigError::Invalid(_))));
    }
}
