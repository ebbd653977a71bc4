//! Adapter implementations for the registry backend, probe transport, and
//! removal confirmation ports.

pub mod http;
pub mod memory;
