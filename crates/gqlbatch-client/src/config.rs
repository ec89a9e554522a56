//! Client configuration.
//!
//! Can be written in TOML:
//!
//! ```toml
//! endpoint = "https://api.example.com/graphql"
//! timeout_ms = 3000
//!
//! [headers]
//! authorization = "Bearer ..."
//! ```

use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ClientError;
use crate::Result;

/// Where to send operations and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// GraphQL endpoint URL. Must be http or https.
    pub endpoint: Url,

    /// Headers sent with every request (auth, tracing, ...).
    /// Default: none
    #[serde(default)]
    pub headers: IndexMap<String, String>,

    /// Deadline for one request, in milliseconds.
    /// Default: 3000
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    3000
}

impl ClientConfig {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            headers: IndexMap::new(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Parses `endpoint` and builds a config with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the URL is invalid.
    pub fn parse(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ClientError::config(format!("invalid endpoint {endpoint}: {e}")))?;
        let config = Self::new(endpoint);
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// The request deadline.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the TOML is invalid or fails
    /// validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ClientError::config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Checks the endpoint scheme and the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        match self.endpoint.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ClientError::config(format!(
                    "endpoint scheme must be http or https, got {other}"
                )));
            }
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::config("timeout_ms must be greater than 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_toml() {
        let config = ClientConfig::from_toml_str(r#"endpoint = "https://api.example.com/graphql""#)
            .unwrap();
        assert_eq!(config.timeout_ms, 3000);
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_full_toml() {
        let toml = r#"
endpoint = "http://localhost:4000/graphql"
timeout_ms = 500

[headers]
authorization = "Bearer abc"
x-tenant = "acme"
"#;
        let config = ClientConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.timeout_ms, 500);
        let names: Vec<_> = config.headers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["authorization", "x-tenant"]);
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = ClientConfig::parse("ftp://example.com/graphql").unwrap_err();
        assert!(matches!(err, ClientError::Config { .. }));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = ClientConfig::from_toml_str(
            "endpoint = \"https://example.com\"\ntimeout_ms = 0",
        )
        .unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_missing_endpoint() {
        assert!(ClientConfig::from_toml_str("timeout_ms = 10").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "endpoint = \"https://example.com/graphql\"\n").unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.endpoint.as_str(), "https://example.com/graphql");
        assert!(ClientConfig::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::parse("https://example.com/graphql")
            .unwrap()
            .with_header("authorization", "Bearer t")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.headers["authorization"], "Bearer t");
    }
}
