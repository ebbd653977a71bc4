//! Tool server aggregate and its editable draft form.

use super::{ConnectionType, McpAuthentication, McpServerName, McpTool, ToolRegistryDomainError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroU64;
use std::time::Duration;

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Retry count stored when none is configured.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

const fn enabled_by_default() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

const fn default_retry_attempts() -> u32 {
    DEFAULT_RETRY_ATTEMPTS
}

/// Unvalidated tool server record as held in the edit buffer.
///
/// Every field may be edited freely. [`ToolServerDraft::validate`] turns the
/// draft into a [`ToolServer`] and is the only way to obtain one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolServerDraft {
    /// Registry key.
    #[serde(default)]
    pub name: String,
    /// Base URL of the tool server.
    #[serde(default)]
    pub url: String,
    /// Declared transport.
    #[serde(default)]
    pub connection_type: ConnectionType,
    /// Declared authentication scheme.
    #[serde(default)]
    pub authentication: McpAuthentication,
    /// Tools exposed by the server, in display order.
    #[serde(default)]
    pub tools: Vec<McpTool>,
    /// Whether the server participates in the agent's tool set.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retry count consumed by the agent runtime.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

impl Default for ToolServerDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            connection_type: ConnectionType::default(),
            authentication: McpAuthentication::default(),
            tools: Vec::new(),
            enabled: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }
}

impl ToolServerDraft {
    /// Creates a draft with the given name and URL and default settings.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the authentication scheme.
    #[must_use]
    pub fn with_authentication(mut self, authentication: McpAuthentication) -> Self {
        self.authentication = authentication;
        self
    }

    /// Sets the connection type.
    #[must_use]
    pub const fn with_connection_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }

    /// Replaces the tool list.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<McpTool>) -> Self {
        self.tools = tools;
        self
    }

    /// Sets the request timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Validates the draft into a [`ToolServer`].
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when the name or URL is blank, the
    /// timeout is zero, or two tools share a name.
    pub fn validate(&self) -> Result<ToolServer, ToolRegistryDomainError> {
        ToolServer::try_from(self.clone())
    }
}

/// Validated tool server registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ToolServerDraft", into = "ToolServerDraft")]
pub struct ToolServer {
    name: McpServerName,
    url: String,
    connection_type: ConnectionType,
    authentication: McpAuthentication,
    tools: Vec<McpTool>,
    enabled: bool,
    timeout_ms: NonZeroU64,
    retry_attempts: u32,
}

impl TryFrom<ToolServerDraft> for ToolServer {
    type Error = ToolRegistryDomainError;

    fn try_from(draft: ToolServerDraft) -> Result<Self, Self::Error> {
        let name = McpServerName::new(draft.name)?;

        let url = draft.url.trim().to_owned();
        if url.is_empty() {
            return Err(ToolRegistryDomainError::EmptyServerUrl);
        }

        let timeout_ms =
            NonZeroU64::new(draft.timeout_ms).ok_or(ToolRegistryDomainError::ZeroTimeout)?;

        ensure_unique_tool_names(&name, &draft.tools)?;

        Ok(Self {
            name,
            url,
            connection_type: draft.connection_type,
            authentication: draft.authentication,
            tools: draft.tools,
            enabled: draft.enabled,
            timeout_ms,
            retry_attempts: draft.retry_attempts,
        })
    }
}

impl From<ToolServer> for ToolServerDraft {
    fn from(server: ToolServer) -> Self {
        Self {
            name: server.name.into(),
            url: server.url,
            connection_type: server.connection_type,
            authentication: server.authentication,
            tools: server.tools,
            enabled: server.enabled,
            timeout_ms: server.timeout_ms.get(),
            retry_attempts: server.retry_attempts,
        }
    }
}

fn ensure_unique_tool_names(
    server: &McpServerName,
    tools: &[McpTool],
) -> Result<(), ToolRegistryDomainError> {
    let mut seen = HashSet::with_capacity(tools.len());
    for tool in tools {
        if !seen.insert(tool.name()) {
            return Err(ToolRegistryDomainError::DuplicateToolName {
                server: server.as_str().to_owned(),
                tool: tool.name().to_owned(),
            });
        }
    }
    Ok(())
}

impl ToolServer {
    /// Returns the registry key.
    #[must_use]
    pub const fn name(&self) -> &McpServerName {
        &self.name
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the declared transport.
    #[must_use]
    pub const fn connection_type(&self) -> ConnectionType {
        self.connection_type
    }

    /// Returns the declared authentication scheme.
    #[must_use]
    pub const fn authentication(&self) -> &McpAuthentication {
        &self.authentication
    }

    /// Returns the tool list.
    #[must_use]
    pub fn tools(&self) -> &[McpTool] {
        &self.tools
    }

    /// Returns whether the server is enabled.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the request timeout in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> NonZeroU64 {
        self.timeout_ms
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.get())
    }

    /// Returns the stored retry count.
    #[must_use]
    pub const fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    /// Returns a copy with the enabled flag replaced.
    #[must_use]
    pub fn with_enabled(&self, enabled: bool) -> Self {
        Self {
            enabled,
            ..self.clone()
        }
    }

    /// Returns the editable draft form of this server.
    #[must_use]
    pub fn to_draft(&self) -> ToolServerDraft {
        ToolServerDraft::from(self.clone())
    }
}
