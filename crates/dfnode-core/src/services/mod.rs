//! Core services - orchestrators between adapters and ports.
//!
//! Services here only know port traits; the runtime crate provides the
//! concrete implementations.

mod node_service;

pub use node_service::NodeService;
