//! MCP tool server registry and capability discovery.
//!
//! This module registers third-party tool servers with the application
//! backend, checks their health, and discovers the tools they advertise.
//! It follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
