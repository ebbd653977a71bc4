//! Confirmation port guarding destructive registry operations.

use crate::tool_registry::domain::ToolServer;
use async_trait::async_trait;

/// Asks the user to confirm removing a tool server.
///
/// Removal proceeds only when this returns `true`; a declined prompt must
/// not cause any backend request.
#[async_trait]
pub trait RemovalConfirmer: Send + Sync {
    /// Returns whether the user confirmed removing `server`.
    async fn confirm_removal(&self, server: &ToolServer) -> bool;
}
