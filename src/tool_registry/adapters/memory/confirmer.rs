//! Fixed-answer removal confirmer.

use crate::tool_registry::{domain::ToolServer, ports::RemovalConfirmer};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// [`RemovalConfirmer`] that always gives the same answer and counts how
/// often it was asked.
///
/// Used by tests and by non-interactive callers that collected consent up
/// front (for example a `--yes` flag).
#[derive(Debug, Clone)]
pub struct StaticRemovalConfirmer {
    answer: bool,
    prompts: Arc<AtomicUsize>,
}

impl StaticRemovalConfirmer {
    /// Creates a confirmer that approves every removal.
    #[must_use]
    pub fn approving() -> Self {
        Self::answering(true)
    }

    /// Creates a confirmer that declines every removal.
    #[must_use]
    pub fn declining() -> Self {
        Self::answering(false)
    }

    /// Creates a confirmer with a fixed answer.
    #[must_use]
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns how many removals were put to this confirmer.
    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemovalConfirmer for StaticRemovalConfirmer {
    async fn confirm_removal(&self, _server: &ToolServer) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}
