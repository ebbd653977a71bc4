//! MCP tool server registry and capability discovery client.
//!
//! This crate lets an application register third-party tool servers with
//! its backend, verify that they are reachable, and discover the tools they
//! advertise so an agent can call them.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Registry records, authentication, probe outcomes, and tool
//!   normalization with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the backend, the probe
//!   transport, and removal confirmation
//! - **Adapters**: Concrete implementations of ports (HTTP, in-memory)
//!
//! # Modules
//!
//! - [`tool_registry`]: Registry, probes, discovery, and the edit session
//! - [`config`]: Backend client configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod telemetry;
pub mod tool_registry;
