use std::any::Any;

use sadtime_states::{SnapshotClone, State};
use serde::Deserialize;
use thiserror::Error;
use ustr::Ustr;

/// Backend used by native builds when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment configuration: {0}")]
    Env(String),
}

/// Environment overrides, read from `SADTIME_*` variables.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    sadtime_api_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Origin of the backend, without the `/api` prefix. Empty means same origin.
    pub api_base_url: String,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Default configuration with `SADTIME_API_URL` applied on top.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    fn from_vars<I, S>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let raw: RawConfig =
            serde_env::from_iter(vars).map_err(|err| ConfigError::Env(err.to_string()))?;
        Ok(match raw.sadtime_api_url {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        })
    }

    pub fn api_url(&self) -> Ustr {
        if self.api_base_url.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{}/api", self.api_base_url))
        }
    }

    /// Absolute URL of an API endpoint; `path` starts with `/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_url())
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: if cfg!(target_arch = "wasm32") {
                String::new()
            } else {
                DEFAULT_API_BASE_URL.to_string()
            },
        }
    }
}

impl SnapshotClone for BusinessConfig {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for BusinessConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = BusinessConfig::default();

        if cfg!(target_arch = "wasm32") {
            assert_eq!(config.api_base_url, "");
            assert_eq!(config.api_url(), Ustr::from("/api"));
        } else {
            assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
            assert_eq!(config.api_url(), Ustr::from("http://localhost:8000/api"));
        }
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = BusinessConfig::new("https://sadtime.example.com/");
        assert_eq!(
            config.endpoint("/auth/me/"),
            "https://sadtime.example.com/api/auth/me/"
        );
    }

    #[test]
    fn test_empty_base_is_same_origin() {
        let config = BusinessConfig::new("");
        assert_eq!(config.endpoint("/analytics/summary/"), "/api/analytics/summary/");
    }

    #[test]
    fn test_env_override() {
        let config = BusinessConfig::from_vars(vec![("SADTIME_API_URL", "http://10.0.0.5:9000")])
            .expect("config should build");
        assert_eq!(config.api_base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn test_env_without_override_uses_default() {
        let config = BusinessConfig::from_vars(vec![("HOME", "/root")])
            .expect("config should build");
        assert_eq!(config, BusinessConfig::default());
    }
}
