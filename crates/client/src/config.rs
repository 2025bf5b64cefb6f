//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MINDFUL_API_URL` - Base URL of the REST API (default: `http://localhost:3000/api`)
//! - `MINDFUL_STATE_DIR` - Directory holding the stored token and user
//!   (default: `<local data dir>/mindful-ledger`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Base URL used when `MINDFUL_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Directory name under the platform data dir.
const STATE_DIR_NAME: &str = "mindful-ledger";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the API lives and where session state is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api_url: Url,
    /// Directory for the `token` and `user` files.
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Build a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns error if `api_url` is not an absolute http(s) URL.
    pub fn new(api_url: &str, state_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url("api_url", api_url)?,
            state_dir: state_dir.into(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an invalid value, or if no state
    /// directory is configured and the platform has no local data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(
            "MINDFUL_API_URL",
            &get_env_or_default("MINDFUL_API_URL", DEFAULT_API_URL),
        )?;

        let state_dir = match get_optional_env("MINDFUL_STATE_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_state_dir()
                .ok_or_else(|| ConfigError::MissingEnvVar("MINDFUL_STATE_DIR".to_string()))?,
        };

        Ok(Self { api_url, state_dir })
    }
}

/// `<local data dir>/mindful-ledger`, when the platform has one.
#[must_use]
pub fn default_state_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(STATE_DIR_NAME))
}

/// Parse and check an API base URL.
fn parse_api_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute URL with a host".to_string(),
        ));
    }
    Ok(url)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_default() {
        let url = parse_api_url("MINDFUL_API_URL", DEFAULT_API_URL).unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(3000));
        assert_eq!(url.path(), "/api");
    }

    #[test]
    fn test_parse_api_url_rejects_other_schemes() {
        let err = parse_api_url("MINDFUL_API_URL", "ftp://example.com/api").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "MINDFUL_API_URL"));
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn test_parse_api_url_rejects_garbage() {
        assert!(parse_api_url("MINDFUL_API_URL", "not a url").is_err());
        assert!(parse_api_url("MINDFUL_API_URL", "mailto:ana@example.com").is_err());
    }

    #[test]
    fn test_new() {
        let config = ClientConfig::new("https://api.example.com/v1", "/tmp/ml").unwrap();
        assert_eq!(config.api_url.as_str(), "https://api.example.com/v1");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/ml"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("MINDFUL_STATE_DIR".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: MINDFUL_STATE_DIR"
        );
    }
}
