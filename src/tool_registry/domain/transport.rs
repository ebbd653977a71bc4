//! Tool server connection type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport a tool server is reached over.
///
/// Only the configuration is modelled here; probes and discovery always use
/// plain HTTP `GET` against the configured URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    /// Plain HTTP(S).
    #[default]
    Http,
    /// WebSocket.
    Websocket,
    /// Local process STDIO.
    Stdio,
}

impl ConnectionType {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Websocket => "websocket",
            Self::Stdio => "stdio",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
