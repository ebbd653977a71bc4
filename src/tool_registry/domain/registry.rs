//! Registry snapshot: the global switch plus the configured tool servers.

use super::{McpServerName, McpTool, ToolRegistryDomainError, ToolServer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Persisted registry state as exchanged with the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireRegistry")]
pub struct RegistrySnapshot {
    enabled: bool,
    servers: Vec<ToolServer>,
}

#[derive(Deserialize)]
struct WireRegistry {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    servers: Vec<ToolServer>,
}

impl TryFrom<WireRegistry> for RegistrySnapshot {
    type Error = ToolRegistryDomainError;

    fn try_from(wire: WireRegistry) -> Result<Self, Self::Error> {
        Self::new(wire.enabled, wire.servers)
    }
}

/// A tool exposed to the agent, tagged with the server providing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposedTool<'a> {
    /// Server providing the tool.
    pub server: &'a McpServerName,
    /// Tool definition.
    pub tool: &'a McpTool,
}

impl RegistrySnapshot {
    /// Creates a snapshot from a server list.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::DuplicateServerName`] when two
    /// servers share a name.
    pub fn new(enabled: bool, servers: Vec<ToolServer>) -> Result<Self, ToolRegistryDomainError> {
        let mut seen = HashSet::with_capacity(servers.len());
        for server in &servers {
            if !seen.insert(server.name()) {
                return Err(ToolRegistryDomainError::DuplicateServerName(
                    server.name().as_str().to_owned(),
                ));
            }
        }
        Ok(Self { enabled, servers })
    }

    /// Returns the global enable switch.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns servers in registry order.
    #[must_use]
    pub fn servers(&self) -> &[ToolServer] {
        &self.servers
    }

    /// Finds a server by name.
    #[must_use]
    pub fn find(&self, name: &McpServerName) -> Option<&ToolServer> {
        self.servers.iter().find(|server| server.name() == name)
    }

    /// Sets the global enable switch.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Replaces the server with the same name in place, or appends it.
    pub fn upsert(&mut self, server: ToolServer) {
        match self
            .servers
            .iter_mut()
            .find(|existing| existing.name() == server.name())
        {
            Some(existing) => *existing = server,
            None => self.servers.push(server),
        }
    }

    /// Removes a server by name, returning it when present.
    pub fn remove(&mut self, name: &McpServerName) -> Option<ToolServer> {
        let position = self
            .servers
            .iter()
            .position(|server| server.name() == name)?;
        Some(self.servers.remove(position))
    }

    /// Returns the tools the agent would see: enabled tools of enabled
    /// servers, or nothing when the global switch is off.
    pub fn exposed_tools(&self) -> impl Iterator<Item = ExposedTool<'_>> {
        self.servers
            .iter()
            .filter(|server| self.enabled && server.enabled())
            .flat_map(|server| {
                server
                    .tools()
                    .iter()
                    .filter(|tool| tool.enabled())
                    .map(move |tool| ExposedTool {
                        server: server.name(),
                        tool,
                    })
            })
    }
}
