//! Error types for tool server domain validation.

use thiserror::Error;

/// Errors returned while constructing tool registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolRegistryDomainError {
    /// The server name is empty after trimming.
    #[error("tool server name must not be empty")]
    EmptyServerName,

    /// The server URL is empty after trimming.
    #[error("tool server URL must not be empty")]
    EmptyServerUrl,

    /// The request timeout is zero.
    #[error("tool server timeout must be greater than zero milliseconds")]
    ZeroTimeout,

    /// A tool definition name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// Two tools on the same server share a name.
    #[error("duplicate tool name '{tool}' on tool server '{server}'")]
    DuplicateToolName {
        /// Server the tools belong to.
        server: String,
        /// Repeated tool name.
        tool: String,
    },

    /// Two servers in a registry share a name.
    #[error("duplicate tool server name: {0}")]
    DuplicateServerName(String),
}
