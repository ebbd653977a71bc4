//! HTTP adapters built on `reqwest`.

mod backend;
mod probe;

pub use backend::HttpRegistryBackend;
pub use probe::ReqwestProbeTransport;
