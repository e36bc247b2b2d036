use thiserror::Error;
use url::Url;

use crate::transport::TransportSettings;

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "PUBMED_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub transport: TransportSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            transport: TransportSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Reads [`API_URL_ENV`], falling back to [`DEFAULT_API_URL`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
            Some(value) => Self::default().with_base_url(&value),
            None => Ok(Self::default()),
        }
    }

    /// Replaces the base URL after checking it parses as an http(s) URL.
    /// A trailing slash is dropped.
    pub fn with_base_url(mut self, value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        let invalid = |reason: String| ConfigError::InvalidUrl {
            key: API_URL_ENV,
            value: value.to_string(),
            reason,
        };
        let parsed = Url::parse(value).map_err(|err| invalid(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }
        self.base_url = value.trim_end_matches('/').to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_uses_default() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.transport, TransportSettings::default());
    }

    #[test]
    fn variable_overrides_and_drops_trailing_slash() {
        let config = ClientConfig::from_lookup(|key| {
            (key == API_URL_ENV).then(|| "https://api.example.org/v1/".to_string())
        })
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.org/v1");
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = ClientConfig::from_lookup(|_| Some("not a url".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { key: API_URL_ENV, .. }));
        assert!(ClientConfig::default().with_base_url("ftp://example.org").is_err());
    }
}
