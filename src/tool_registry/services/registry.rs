//! Remote-first registry orchestration.

use crate::tool_registry::{
    domain::{
        AvailableTool, ConnectionTestResult, McpServerName, RegistrySnapshot, ToolRegistryDomainError,
        ToolServer, ToolServerDraft,
    },
    ports::{McpRegistryBackend, McpRegistryBackendError, RemovalConfirmer},
};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors for registry operations.
#[derive(Debug, Clone, Error)]
pub enum McpRegistryServiceError {
    /// The draft or registry failed domain validation.
    #[error(transparent)]
    Validation(#[from] ToolRegistryDomainError),
    /// The backend call failed; local state is unchanged.
    #[error(transparent)]
    Persistence(#[from] McpRegistryBackendError),
    /// No server with the given name is present in the local registry.
    #[error("tool server '{0}' not found")]
    NotFound(McpServerName),
    /// The user declined the removal.
    #[error("removal of tool server '{0}' was not confirmed")]
    RemovalNotConfirmed(McpServerName),
    /// The local registry lock was poisoned.
    #[error("local registry state is unavailable")]
    StatePoisoned,
}

impl<T> From<PoisonError<T>> for McpRegistryServiceError {
    fn from(_: PoisonError<T>) -> Self {
        Self::StatePoisoned
    }
}

/// Result type for registry service operations.
pub type McpRegistryServiceResult<T> = Result<T, McpRegistryServiceError>;

/// Keeps a local registry snapshot in step with the application backend.
///
/// Every mutation calls the backend first and touches the local snapshot
/// only after the backend confirms. On failure the error is returned and
/// local state is left exactly as it was.
#[derive(Clone)]
pub struct McpRegistryService<B, C>
where
    B: McpRegistryBackend,
    C: RemovalConfirmer,
{
    backend: Arc<B>,
    confirmer: Arc<C>,
    local: Arc<RwLock<RegistrySnapshot>>,
}

impl<B, C> McpRegistryService<B, C>
where
    B: McpRegistryBackend,
    C: RemovalConfirmer,
{
    /// Creates a service with an empty local snapshot.
    #[must_use]
    pub fn new(backend: Arc<B>, confirmer: Arc<C>) -> Self {
        Self {
            backend,
            confirmer,
            local: Arc::new(RwLock::new(RegistrySnapshot::default())),
        }
    }

    /// Returns the local snapshot without I/O.
    ///
    /// # Errors
    ///
    /// Returns [`McpRegistryServiceError::StatePoisoned`] when the lock is
    /// poisoned.
    pub fn snapshot(&self) -> McpRegistryServiceResult<RegistrySnapshot> {
        Ok(self.local.read()?.clone())
    }

    fn find_local(&self, name: &McpServerName) -> McpRegistryServiceResult<ToolServer> {
        self.local
            .read()?
            .find(name)
            .cloned()
            .ok_or_else(|| McpRegistryServiceError::NotFound(name.clone()))
    }

    /// Loads the registry from the backend and replaces the local snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`McpRegistryServiceError::Persistence`] when the backend
    /// cannot be read; the local snapshot is kept.
    pub async fn list(&self) -> McpRegistryServiceResult<RegistrySnapshot> {
        let registry = self.backend.fetch_registry().await?;
        *self.local.write()? = registry.clone();
        info!(servers = registry.servers().len(), enabled = registry.enabled(), "loaded tool registry");
        Ok(registry)
    }

    /// Validates and persists a server, then mirrors it locally.
    ///
    /// A server with the same name is replaced in place; otherwise it is
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`McpRegistryServiceError::Validation`] before any request
    /// when the draft is invalid, or [`McpRegistryServiceError::Persistence`]
    /// when the backend rejects it.
    pub async fn upsert(&self, draft: &ToolServerDraft) -> McpRegistryServiceResult<ToolServer> {
        let server = draft.validate()?;
        self.backend.upsert_server(&server).await.inspect_err(|err| {
            warn!(server = %server.name(), error = %err, "backend rejected tool server upsert");
        })?;
        self.local.write()?.upsert(server.clone());
        info!(server = %server.name(), tools = server.tools().len(), "saved tool server");
        Ok(server)
    }

    /// Removes a server after the user confirms.
    ///
    /// # Errors
    ///
    /// Returns [`McpRegistryServiceError::NotFound`] when the server is not
    /// in the local snapshot, [`McpRegistryServiceError::RemovalNotConfirmed`]
    /// when the user declines (no request is sent), or
    /// [`McpRegistryServiceError::Persistence`] when the backend rejects the
    /// deletion.
    pub async fn remove(&self, name: &McpServerName) -> McpRegistryServiceResult<ToolServer> {
        let server = self.find_local(name)?;
        if !self.confirmer.confirm_removal(&server).await {
            info!(server = %name, "tool server removal declined");
            return Err(McpRegistryServiceError::RemovalNotConfirmed(name.clone()));
        }
        self.backend.delete_server(name).await.inspect_err(|err| {
            warn!(server = %name, error = %err, "backend rejected tool server removal");
        })?;
        self.local.write()?.remove(name);
        info!(server = %name, "removed tool server");
        Ok(server)
    }

    /// Turns the registry-wide switch on or off.
    ///
    /// The whole registry is written back, so it is re-read from the backend
    /// first; the local snapshot may be stale or never loaded. On success the
    /// local snapshot becomes the saved registry.
    ///
    /// # Errors
    ///
    /// Returns [`McpRegistryServiceError::Persistence`] when the backend
    /// cannot be read or rejects the update.
    pub async fn set_global_enabled(
        &self,
        enabled: bool,
    ) -> McpRegistryServiceResult<RegistrySnapshot> {
        let mut updated = self.backend.fetch_registry().await.inspect_err(|err| {
            warn!(error = %err, "failed to load tool registry before switch update");
        })?;
        updated.set_enabled(enabled);
        self.backend.save_registry(&updated).await.inspect_err(|err| {
            warn!(enabled, error = %err, "backend rejected tool registry switch");
        })?;
        *self.local.write()? = updated.clone();
        info!(enabled, "updated tool registry switch");
        Ok(updated)
    }

    /// Enables or disables one server.
    ///
    /// # Errors
    ///
    /// Returns [`McpRegistryServiceError::NotFound`] when the server is not
    /// in the local snapshot, or [`McpRegistryServiceError::Persistence`]
    /// when the backend rejects the update.
    pub async fn set_server_enabled(
        &self,
        name: &McpServerName,
        enabled: bool,
    ) -> McpRegistryServiceResult<ToolServer> {
        let updated = self.find_local(name)?.with_enabled(enabled);
        self.backend.upsert_server(&updated).await?;
        self.local.write()?.upsert(updated.clone());
        info!(server = %name, enabled, "updated tool server switch");
        Ok(updated)
    }

    /// Asks the backend to test a server with full authentication.
    ///
    /// # Errors
    ///
    /// Returns [`McpRegistryServiceError::NotFound`] without a request when
    /// the server is not in the local snapshot, or
    /// [`McpRegistryServiceError::Persistence`] when the backend call fails.
    pub async fn test_connection(
        &self,
        name: &McpServerName,
    ) -> McpRegistryServiceResult<ConnectionTestResult> {
        self.find_local(name)?;
        let result = self.backend.test_connection(name).await?;
        info!(server = %name, success = result.success, "backend connection test finished");
        Ok(result)
    }

    /// Lists the tools the backend currently exposes to the agent.
    ///
    /// # Errors
    ///
    /// Returns [`McpRegistryServiceError::Persistence`] when the backend call
    /// fails.
    pub async fn available_tools(&self) -> McpRegistryServiceResult<Vec<AvailableTool>> {
        Ok(self.backend.available_tools().await?)
    }
}
