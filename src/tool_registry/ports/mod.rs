//! Port contracts for registry persistence, direct probing, and user
//! confirmation.

mod backend;
mod confirmation;
mod probe;

pub use backend::{McpRegistryBackend, McpRegistryBackendError, McpRegistryBackendResult};
pub use confirmation::RemovalConfirmer;
pub use probe::{ProbeResponse, ProbeTransport, ProbeTransportError, ProbeTransportErrorKind};
