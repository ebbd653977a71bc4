//! Inputs and outcomes of direct tool server probes.
//!
//! Probes never fail with `Err`: every timeout, transport failure, or
//! unusable response is captured as a [`ProbeFailure`] inside the outcome
//! so callers can display it inline.

use super::{
    McpAuthentication, McpTool, ToolServer, ToolServerDraft, UnsupportedAuthenticationError,
    server::DEFAULT_TIMEOUT_MS,
};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Hint appended to connection-level failures where no HTTP status was
/// ever obtained.
pub const UNREACHABLE_HINT: &str =
    " (the server may be unreachable, or may be rejecting cross-origin requests; check CORS settings)";

/// URL, credentials, and bound for a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    url: String,
    authentication: McpAuthentication,
    timeout: Duration,
}

impl ProbeTarget {
    /// Creates a probe target.
    #[must_use]
    pub fn new(url: impl Into<String>, authentication: McpAuthentication, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            authentication,
            timeout,
        }
    }

    /// Builds a target from an unsaved draft.
    ///
    /// A zero timeout in the draft falls back to the default so the probe is
    /// still bounded.
    #[must_use]
    pub fn from_draft(draft: &ToolServerDraft) -> Self {
        let timeout_ms = if draft.timeout_ms == 0 {
            DEFAULT_TIMEOUT_MS
        } else {
            draft.timeout_ms
        };
        Self::new(
            draft.url.trim(),
            draft.authentication.clone(),
            Duration::from_millis(timeout_ms),
        )
    }

    /// Returns the configured server URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the authentication scheme.
    #[must_use]
    pub const fn authentication(&self) -> &McpAuthentication {
        &self.authentication
    }

    /// Returns the probe bound.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl From<&ToolServer> for ProbeTarget {
    fn from(server: &ToolServer) -> Self {
        Self::new(
            server.url(),
            server.authentication().clone(),
            server.timeout(),
        )
    }
}

/// Classified reason a probe did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The server answered with a non-success status.
    #[error("server responded with HTTP {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The probe exceeded its bound and was cancelled.
    #[error("request timed out after {timeout_ms} ms")]
    TimedOut {
        /// Bound that was exceeded.
        timeout_ms: u128,
    },

    /// The exchange failed at the network level.
    #[error("network error: {detail}{}", transport_hint(.likely_cors))]
    Transport {
        /// Underlying failure text.
        detail: String,
        /// Whether the failure happened before any HTTP exchange.
        likely_cors: bool,
    },

    /// The response held zero usable tool descriptors.
    #[error("no tools found")]
    NoToolsFound,

    /// The declared authentication scheme cannot produce headers.
    #[error(transparent)]
    UnsupportedAuthentication(#[from] UnsupportedAuthenticationError),
}

fn transport_hint(likely_cors: &bool) -> &'static str {
    if *likely_cors { UNREACHABLE_HINT } else { "" }
}

impl ProbeFailure {
    /// Creates a timeout failure for the given bound.
    #[must_use]
    pub const fn timed_out(timeout: Duration) -> Self {
        Self::TimedOut {
            timeout_ms: timeout.as_millis(),
        }
    }
}

/// Body returned by a health endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthBody {
    /// Body parsed as JSON.
    Json(Value),
    /// Non-JSON body kept as text.
    Text(String),
    /// No body.
    Empty,
}

impl HealthBody {
    /// Interprets a raw response body, tolerating non-JSON content.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        serde_json::from_slice(bytes).map_or_else(
            |_| Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            Self::Json,
        )
    }
}

/// Result of a health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthCheckOutcome {
    /// The server answered with a success status.
    Healthy {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: HealthBody,
    },
    /// The probe failed.
    Failed(ProbeFailure),
}

impl HealthCheckOutcome {
    /// Returns whether the probe succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }

    /// Returns the failure, when there is one.
    #[must_use]
    pub const fn failure(&self) -> Option<&ProbeFailure> {
        match self {
            Self::Healthy { .. } => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Returns a user-facing summary.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Healthy { status, .. } => format!("Connection successful (HTTP {status})"),
            Self::Failed(failure) => format!("Health check failed: {failure}"),
        }
    }
}

/// Result of a capability discovery call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// At least one tool was discovered.
    Discovered(Vec<McpTool>),
    /// Discovery failed or found nothing.
    Failed(ProbeFailure),
}

impl DiscoveryOutcome {
    /// Returns whether discovery produced tools.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Discovered(_))
    }

    /// Returns the discovered tools, empty on failure.
    #[must_use]
    pub fn tools(&self) -> &[McpTool] {
        match self {
            Self::Discovered(tools) => tools,
            Self::Failed(_) => &[],
        }
    }

    /// Returns the failure, when there is one.
    #[must_use]
    pub const fn failure(&self) -> Option<&ProbeFailure> {
        match self {
            Self::Discovered(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Returns a user-facing summary.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Discovered(tools) => format!("Discovered {} tools", tools.len()),
            Self::Failed(ProbeFailure::NoToolsFound) => "No tools found on this server".to_owned(),
            Self::Failed(failure) => format!("Tool discovery failed: {failure}"),
        }
    }
}
