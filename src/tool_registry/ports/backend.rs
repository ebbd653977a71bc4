//! Backend port for remote-first registry persistence.

use crate::tool_registry::domain::{
    AvailableTool, ConnectionTestResult, McpServerName, RegistrySnapshot, ToolServer,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for registry backend operations.
pub type McpRegistryBackendResult<T> = Result<T, McpRegistryBackendError>;

/// Application backend contract that owns the persisted registry.
///
/// Every call is a round trip; implementations must not report success
/// until the backend has confirmed the change.
#[async_trait]
pub trait McpRegistryBackend: Send + Sync {
    /// Loads the persisted registry (`GET /mcp-tools`).
    async fn fetch_registry(&self) -> McpRegistryBackendResult<RegistrySnapshot>;

    /// Persists the whole registry (`PUT /mcp-tools`).
    async fn save_registry(&self, registry: &RegistrySnapshot) -> McpRegistryBackendResult<()>;

    /// Inserts or replaces one server (`POST /mcp-tools/servers`).
    async fn upsert_server(&self, server: &ToolServer) -> McpRegistryBackendResult<()>;

    /// Removes one server (`DELETE /mcp-tools/servers/{name}`).
    async fn delete_server(&self, name: &McpServerName) -> McpRegistryBackendResult<()>;

    /// Runs an authenticated reachability test from the backend
    /// (`POST /mcp-tools/servers/{name}/test`).
    async fn test_connection(
        &self,
        name: &McpServerName,
    ) -> McpRegistryBackendResult<ConnectionTestResult>;

    /// Lists the tools currently exposed to the agent
    /// (`GET /mcp-tools/available`).
    async fn available_tools(&self) -> McpRegistryBackendResult<Vec<AvailableTool>>;
}

/// Errors returned by registry backend implementations.
#[derive(Debug, Clone, Error)]
pub enum McpRegistryBackendError {
    /// The backend answered but refused the operation.
    #[error("backend rejected the request with HTTP {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Backend-provided reason.
        message: String,
    },

    /// The backend could not be reached.
    #[error("backend transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The backend answered with a payload that could not be decoded into
    /// domain types.
    #[error("invalid backend response: {0}")]
    InvalidResponse(Arc<dyn std::error::Error + Send + Sync>),
}

impl McpRegistryBackendError {
    /// Creates a rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Wraps a transport-level failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Wraps a response decoding or validation failure.
    pub fn invalid_response(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidResponse(Arc::new(err))
    }
}
