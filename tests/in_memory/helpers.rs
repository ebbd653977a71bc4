//! Shared test helpers for in-memory adapter integration tests.

use std::sync::Arc;

use mcp_registry::tool_registry::{
    adapters::memory::{InMemoryRegistryBackend, ScriptedProbeTransport, StaticRemovalConfirmer},
    domain::{McpServerName, RegistrySnapshot, ToolServer, ToolServerDraft},
    services::{McpRegistryService, ToolServerProbeService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Registry service wired to in-memory adapters.
pub type TestRegistry = McpRegistryService<InMemoryRegistryBackend, StaticRemovalConfirmer>;

/// Probe service wired to the scripted transport.
pub type TestProbes = ToolServerProbeService<ScriptedProbeTransport, DefaultClock>;

/// Adapters and services shared by a single test.
pub struct RegistryContext {
    pub backend: InMemoryRegistryBackend,
    pub confirmer: StaticRemovalConfirmer,
    pub registry: TestRegistry,
}

/// Provides a registry over a backend seeded with `alpha` and `beta`.
#[fixture]
pub fn context() -> RegistryContext {
    let backend = InMemoryRegistryBackend::with_registry(
        RegistrySnapshot::new(true, vec![server("alpha"), server("beta")])
            .expect("seed registry should be valid"),
    );
    let confirmer = StaticRemovalConfirmer::approving();
    let registry = McpRegistryService::new(Arc::new(backend.clone()), Arc::new(confirmer.clone()));
    RegistryContext {
        backend,
        confirmer,
        registry,
    }
}

/// Provides a scripted transport and the probe service using it.
#[fixture]
pub fn probes() -> (ScriptedProbeTransport, TestProbes) {
    let transport = ScriptedProbeTransport::new();
    let service = ToolServerProbeService::new(Arc::new(transport.clone()), Arc::new(DefaultClock));
    (transport, service)
}

/// Builds a valid server named `name` at `http://{name}.local`.
#[must_use]
pub fn server(name: &str) -> ToolServer {
    ToolServerDraft::new(name, format!("http://{name}.local"))
        .validate()
        .expect("test server should be valid")
}

/// Parses a server name.
#[must_use]
pub fn name(value: &str) -> McpServerName {
    McpServerName::new(value).expect("test server name should be valid")
}
