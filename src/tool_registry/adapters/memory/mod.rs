//! In-memory adapters for tests and deterministic local flows.

mod backend;
mod confirmer;
mod probe;

pub use backend::InMemoryRegistryBackend;
pub use confirmer::StaticRemovalConfirmer;
pub use probe::{RecordedProbe, ScriptedProbe, ScriptedProbeTransport};
