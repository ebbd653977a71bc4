//! Single-slot edit buffer for creating or changing one tool server.

use super::registry::{McpRegistryService, McpRegistryServiceError};
use crate::tool_registry::{
    domain::{DiscoveryOutcome, ProbeTarget, ToolServer, ToolServerDraft},
    ports::{McpRegistryBackend, RemovalConfirmer},
};
use thiserror::Error;
use tracing::debug;

/// What to do with unsaved changes when a new session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscardPolicy {
    /// Refuse to start while the active session has unsaved changes.
    #[default]
    KeepUnsaved,
    /// Drop the active session and its unsaved changes.
    DiscardUnsaved,
}

/// Edit session errors.
#[derive(Debug, Clone, Error)]
pub enum EditSessionError {
    /// No session is active.
    #[error("no tool server is being edited")]
    NoActiveSession,
    /// The active session has unsaved changes.
    #[error("unsaved changes to tool server '{0}'")]
    UnsavedChanges(String),
    /// Committing through the registry failed; the session is kept.
    #[error(transparent)]
    Registry(#[from] McpRegistryServiceError),
}

/// An in-progress edit of one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    baseline: Option<ToolServer>,
    draft: ToolServerDraft,
}

impl EditSession {
    /// Starts a session for a server that does not exist yet.
    #[must_use]
    pub fn new_server() -> Self {
        Self {
            baseline: None,
            draft: ToolServerDraft::default(),
        }
    }

    /// Starts a session editing an existing server.
    #[must_use]
    pub fn editing(server: &ToolServer) -> Self {
        Self {
            baseline: Some(server.clone()),
            draft: server.to_draft(),
        }
    }

    /// Returns the server the session started from, if any.
    #[must_use]
    pub const fn baseline(&self) -> Option<&ToolServer> {
        self.baseline.as_ref()
    }

    /// Returns the buffered draft.
    #[must_use]
    pub const fn draft(&self) -> &ToolServerDraft {
        &self.draft
    }

    /// Returns whether the draft differs from where the session started.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.baseline.as_ref().map_or_else(
            || self.draft != ToolServerDraft::default(),
            |server| self.draft != server.to_draft(),
        )
    }

    fn label(&self) -> String {
        let name = self.draft.name.trim();
        if name.is_empty() {
            "<new server>".to_owned()
        } else {
            name.to_owned()
        }
    }
}

/// Holds at most one [`EditSession`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSessionSlot {
    current: Option<EditSession>,
}

impl EditSessionSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active session.
    #[must_use]
    pub const fn current(&self) -> Option<&EditSession> {
        self.current.as_ref()
    }

    /// Returns the active draft for in-place edits.
    ///
    /// # Errors
    ///
    /// Returns [`EditSessionError::NoActiveSession`] when the slot is empty.
    pub fn draft_mut(&mut self) -> Result<&mut ToolServerDraft, EditSessionError> {
        self.current
            .as_mut()
            .map(|session| &mut session.draft)
            .ok_or(EditSessionError::NoActiveSession)
    }

    /// Opens a session for a new server.
    ///
    /// # Errors
    ///
    /// Returns [`EditSessionError::UnsavedChanges`] when the active session
    /// is dirty and `policy` keeps unsaved work.
    pub fn begin_new(&mut self, policy: DiscardPolicy) -> Result<&mut ToolServerDraft, EditSessionError> {
        self.replace(EditSession::new_server(), policy)
    }

    /// Opens a session editing `server`.
    ///
    /// # Errors
    ///
    /// Returns [`EditSessionError::UnsavedChanges`] when the active session
    /// is dirty and `policy` keeps unsaved work.
    pub fn begin_edit(
        &mut self,
        server: &ToolServer,
        policy: DiscardPolicy,
    ) -> Result<&mut ToolServerDraft, EditSessionError> {
        self.replace(EditSession::editing(server), policy)
    }

    fn replace(
        &mut self,
        session: EditSession,
        policy: DiscardPolicy,
    ) -> Result<&mut ToolServerDraft, EditSessionError> {
        if policy == DiscardPolicy::KeepUnsaved
            && let Some(active) = &self.current
            && active.is_dirty()
        {
            return Err(EditSessionError::UnsavedChanges(active.label()));
        }
        debug!(server = %session.label(), "opened tool server edit session");
        Ok(&mut self.current.insert(session).draft)
    }

    /// Builds a probe target from the buffered draft.
    ///
    /// # Errors
    ///
    /// Returns [`EditSessionError::NoActiveSession`] when the slot is empty.
    pub fn probe_target(&self) -> Result<ProbeTarget, EditSessionError> {
        self.current
            .as_ref()
            .map(|session| ProbeTarget::from_draft(&session.draft))
            .ok_or(EditSessionError::NoActiveSession)
    }

    /// Applies a discovery result to the buffer.
    ///
    /// Discovered tools replace the buffered list wholesale; a failed
    /// discovery leaves the buffer untouched. Returns whether the buffer
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`EditSessionError::NoActiveSession`] when the slot is empty.
    pub fn apply_discovery(&mut self, outcome: &DiscoveryOutcome) -> Result<bool, EditSessionError> {
        let draft = self.draft_mut()?;
        match outcome {
            DiscoveryOutcome::Discovered(tools) => {
                draft.tools.clone_from(tools);
                Ok(true)
            }
            DiscoveryOutcome::Failed(_) => Ok(false),
        }
    }

    /// Saves the buffered draft through `registry`.
    ///
    /// The slot is cleared only when the save succeeds; on failure the
    /// session is kept as it was.
    ///
    /// # Errors
    ///
    /// Returns [`EditSessionError::NoActiveSession`] when the slot is empty,
    /// or [`EditSessionError::Registry`] when validation or persistence
    /// fails.
    pub async fn commit<B, C>(
        &mut self,
        registry: &McpRegistryService<B, C>,
    ) -> Result<ToolServer, EditSessionError>
    where
        B: McpRegistryBackend,
        C: RemovalConfirmer,
    {
        let session = self.current.as_ref().ok_or(EditSessionError::NoActiveSession)?;
        let saved = registry.upsert(&session.draft).await?;
        self.current = None;
        Ok(saved)
    }

    /// Drops the active session and any unsaved changes.
    pub fn discard(&mut self) -> Option<EditSession> {
        self.current.take()
    }
}
