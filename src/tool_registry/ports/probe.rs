//! Transport port for direct requests to third-party tool servers.

use crate::tool_registry::domain::AuthHeaders;
use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Raw response from a tool server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl ProbeResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Stage at which a probe request failed without an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTransportErrorKind {
    /// No connection could be established (DNS, refused, TLS, blocked).
    Connect,
    /// The request was cancelled through its token.
    Cancelled,
    /// Any other failure while sending or reading.
    Other,
}

/// Failure returned by a probe transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{detail}")]
pub struct ProbeTransportError {
    /// Where the failure happened.
    pub kind: ProbeTransportErrorKind,
    /// Underlying failure text.
    pub detail: String,
}

impl ProbeTransportError {
    /// Creates a transport error.
    pub fn new(kind: ProbeTransportErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Issues a single `GET` to a tool server.
///
/// Implementations should stop work promptly when `cancellation` fires; the
/// caller enforces the deadline either way by dropping the future.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Sends `GET url` with the given headers.
    async fn get(
        &self,
        url: &str,
        headers: &AuthHeaders,
        cancellation: CancellationToken,
    ) -> Result<ProbeResponse, ProbeTransportError>;
}
