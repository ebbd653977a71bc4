//! Application services for probing tool servers and maintaining the
//! registry.

mod edit_session;
mod probe;
mod registry;

pub use edit_session::{DiscardPolicy, EditSession, EditSessionError, EditSessionSlot};
pub use probe::ToolServerProbeService;
pub use registry::{McpRegistryService, McpRegistryServiceError, McpRegistryServiceResult};
