//! Client configuration for the registry backend and direct probes.
//!
//! Configuration is read from `MCP_REGISTRY_*` environment variables or
//! deserialized from any serde source. Timeouts default to the same 30
//! second bound used for tool servers without an explicit timeout.

use crate::tool_registry::domain::DEFAULT_TIMEOUT_MS;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the backend base URL.
pub const BACKEND_URL_VAR: &str = "MCP_REGISTRY_BACKEND_URL";
/// Environment variable holding the application session token.
pub const SESSION_TOKEN_VAR: &str = "MCP_REGISTRY_SESSION_TOKEN";
/// Environment variable holding the backend request timeout in milliseconds.
pub const REQUEST_TIMEOUT_VAR: &str = "MCP_REGISTRY_REQUEST_TIMEOUT_MS";
/// Environment variable holding the fallback probe timeout in milliseconds.
pub const PROBE_TIMEOUT_VAR: &str = "MCP_REGISTRY_PROBE_TIMEOUT_MS";

/// Errors raised while loading configuration or building HTTP clients.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// The backend URL could not be used as a base URL.
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidBackendUrl {
        /// Rejected URL.
        url: String,
        /// Parser or shape failure.
        reason: String,
    },

    /// A timeout setting was not a positive integer.
    #[error("invalid value '{value}' for {setting}: expected a positive number of milliseconds")]
    InvalidTimeout {
        /// Setting name.
        setting: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConfigError {
    /// Wraps an HTTP client construction failure.
    pub fn http_client(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::HttpClient(Arc::new(err))
    }
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Settings for talking to the application backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryClientConfig {
    /// Base URL of the application backend; `/mcp-tools` is appended.
    pub backend_url: String,
    /// Application session token sent as a bearer credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    /// Bound applied to each backend request.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Probe bound used when a draft carries no usable timeout.
    #[serde(default = "default_timeout_ms")]
    pub default_probe_timeout_ms: u64,
}

impl fmt::Debug for RegistryClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryClientConfig")
            .field("backend_url", &self.backend_url)
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("default_probe_timeout_ms", &self.default_probe_timeout_ms)
            .finish()
    }
}

impl RegistryClientConfig {
    /// Creates a configuration with default timeouts and no session token.
    #[must_use]
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            session_token: None,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            default_probe_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sets the session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Sets the backend request timeout.
    #[must_use]
    pub const fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the backend URL is missing or invalid,
    /// or a timeout is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the backend URL is missing or invalid,
    /// or a timeout is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let backend_url = read(BACKEND_URL_VAR).ok_or(ConfigError::Missing(BACKEND_URL_VAR))?;
        let config = Self {
            backend_url,
            session_token: read(SESSION_TOKEN_VAR),
            request_timeout_ms: parse_timeout(REQUEST_TIMEOUT_VAR, read(REQUEST_TIMEOUT_VAR))?,
            default_probe_timeout_ms: parse_timeout(PROBE_TIMEOUT_VAR, read(PROBE_TIMEOUT_VAR))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the URL shape and timeout bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend_base_url()?;
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout {
                setting: REQUEST_TIMEOUT_VAR,
                value: "0".to_owned(),
            });
        }
        if self.default_probe_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout {
                setting: PROBE_TIMEOUT_VAR,
                value: "0".to_owned(),
            });
        }
        Ok(())
    }

    /// Parses the backend URL, rejecting URLs that cannot carry a path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBackendUrl`] when parsing fails or the
    /// URL is not hierarchical (for example `mailto:`).
    pub fn backend_base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBackendUrl {
            url: self.backend_url.clone(),
            reason,
        };
        let url = Url::parse(self.backend_url.trim()).map_err(|err| invalid(err.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_owned()));
        }
        Ok(url)
    }

    /// Returns the backend request bound.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Returns the fallback probe bound.
    #[must_use]
    pub const fn default_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.default_probe_timeout_ms)
    }
}

fn parse_timeout(setting: &'static str, raw: Option<String>) -> Result<u64, ConfigError> {
    let Some(value) = raw else {
        return Ok(DEFAULT_TIMEOUT_MS);
    };
    match value.parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidTimeout { setting, value }),
    }
}
