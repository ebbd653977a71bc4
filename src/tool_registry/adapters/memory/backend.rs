//! In-memory registry backend.

use crate::tool_registry::{
    domain::{AvailableTool, ConnectionTestResult, McpServerName, RegistrySnapshot, ToolServer},
    ports::{McpRegistryBackend, McpRegistryBackendError, McpRegistryBackendResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory stand-in for the application backend.
///
/// Requests are counted, and the backend can be told to reject every
/// request with a given status so callers can exercise remote-first
/// failure paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistryBackend {
    state: Arc<RwLock<InMemoryBackendState>>,
}

#[derive(Debug, Default)]
struct InMemoryBackendState {
    registry: RegistrySnapshot,
    rejection: Option<(u16, String)>,
    connection_results: HashMap<McpServerName, ConnectionTestResult>,
    request_count: usize,
}

impl InMemoryRegistryBackend {
    /// Creates an empty backend with the global switch off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `registry`.
    #[must_use]
    pub fn with_registry(registry: RegistrySnapshot) -> Self {
        let backend = Self::default();
        if let Ok(mut state) = backend.state.write() {
            state.registry = registry;
        }
        backend
    }

    /// Makes every subsequent request fail with the given status.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn reject_requests(
        &self,
        status: u16,
        message: impl Into<String>,
    ) -> McpRegistryBackendResult<()> {
        self.write()?.rejection = Some((status, message.into()));
        Ok(())
    }

    /// Stops rejecting requests.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn accept_requests(&self) -> McpRegistryBackendResult<()> {
        self.write()?.rejection = None;
        Ok(())
    }

    /// Scripts the connection test result for a server.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn set_connection_result(
        &self,
        name: McpServerName,
        result: ConnectionTestResult,
    ) -> McpRegistryBackendResult<()> {
        self.write()?.connection_results.insert(name, result);
        Ok(())
    }

    /// Returns the number of requests received, rejected ones included.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn request_count(&self) -> McpRegistryBackendResult<usize> {
        Ok(self.read()?.request_count)
    }

    /// Returns the registry as currently persisted.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn stored_registry(&self) -> McpRegistryBackendResult<RegistrySnapshot> {
        Ok(self.read()?.registry.clone())
    }

    fn read(&self) -> McpRegistryBackendResult<RwLockReadGuard<'_, InMemoryBackendState>> {
        self.state.read().map_err(|err| {
            McpRegistryBackendError::transport(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> McpRegistryBackendResult<RwLockWriteGuard<'_, InMemoryBackendState>> {
        self.state.write().map_err(|err| {
            McpRegistryBackendError::transport(std::io::Error::other(err.to_string()))
        })
    }

    /// Records a request and returns the state guard unless requests are
    /// being rejected.
    fn admit(&self) -> McpRegistryBackendResult<RwLockWriteGuard<'_, InMemoryBackendState>> {
        let mut state = self.write()?;
        state.request_count += 1;
        if let Some((status, message)) = &state.rejection {
            return Err(McpRegistryBackendError::rejected(*status, message.clone()));
        }
        Ok(state)
    }
}

fn not_found(name: &McpServerName) -> McpRegistryBackendError {
    McpRegistryBackendError::rejected(404, format!("tool server '{name}' not found"))
}

#[async_trait]
impl McpRegistryBackend for InMemoryRegistryBackend {
    async fn fetch_registry(&self) -> McpRegistryBackendResult<RegistrySnapshot> {
        Ok(self.admit()?.registry.clone())
    }

    async fn save_registry(&self, registry: &RegistrySnapshot) -> McpRegistryBackendResult<()> {
        self.admit()?.registry = registry.clone();
        Ok(())
    }

    async fn upsert_server(&self, server: &ToolServer) -> McpRegistryBackendResult<()> {
        self.admit()?.registry.upsert(server.clone());
        Ok(())
    }

    async fn delete_server(&self, name: &McpServerName) -> McpRegistryBackendResult<()> {
        self.admit()?
            .registry
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }

    async fn test_connection(
        &self,
        name: &McpServerName,
    ) -> McpRegistryBackendResult<ConnectionTestResult> {
        let state = self.admit()?;
        if state.registry.find(name).is_none() {
            return Err(not_found(name));
        }
        Ok(state
            .connection_results
            .get(name)
            .cloned()
            .unwrap_or_else(|| ConnectionTestResult::succeeded("Connection successful")))
    }

    async fn available_tools(&self) -> McpRegistryBackendResult<Vec<AvailableTool>> {
        let state = self.admit()?;
        Ok(state
            .registry
            .exposed_tools()
            .map(|exposed| AvailableTool {
                name: exposed.tool.name().to_owned(),
                description: exposed.tool.description().to_owned(),
                parameters: exposed.tool.parameters().clone(),
                server: Some(exposed.server.as_str().to_owned()),
            })
            .collect())
    }
}
