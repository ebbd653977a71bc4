//! Domain model for tool server registration, probing, and discovery.
//!
//! The tool registry domain models tool server identity, authentication,
//! registry state, probe outcomes, and the normalization of discovered tool
//! metadata. Infrastructure concerns remain outside this boundary.

mod auth;
mod connection;
mod discovery;
mod endpoint;
mod error;
mod health;
mod ids;
mod probe;
mod registry;
mod server;
mod tool;
mod transport;

pub use auth::{
    API_KEY_HEADER, AUTHORIZATION_HEADER, AuthHeaders, McpAuthentication,
    UnsupportedAuthenticationError,
};
pub use connection::{AvailableTool, ConnectionTestResult};
pub use discovery::{DescriptorFlavor, EnvelopeShape, NormalizedTools, normalize_tools_response};
pub use endpoint::{health_check_url, tools_url};
pub use error::ToolRegistryDomainError;
pub use health::{HealthCheckReport, McpServerHealthStatus};
pub use ids::McpServerName;
pub use probe::{
    DiscoveryOutcome, HealthBody, HealthCheckOutcome, ProbeFailure, ProbeTarget, UNREACHABLE_HINT,
};
pub use registry::{ExposedTool, RegistrySnapshot};
pub use server::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_TIMEOUT_MS, ToolServer, ToolServerDraft};
pub use tool::{DEFAULT_TOOL_DESCRIPTION, McpTool, empty_parameters};
pub use transport::ConnectionType;
