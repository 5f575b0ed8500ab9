//! OS-facing implementations of the `dfnode-core` ports.
//!
//! - [`SysinfoProcessLocator`] - process table queries
//! - [`FsBinaryResolver`] - filesystem checks for the node binary
//! - [`EnvelopeBroadcaster`] - tokio broadcast fan-out of lifecycle envelopes
//! - [`NodeSupervisor`] - the lifecycle state machine that spawns, monitors
//!   and stops the node process
#![deny(unsafe_code)]

mod locator;
mod notify;
mod resolver;
pub mod supervisor;

pub use locator::SysinfoProcessLocator;
pub use notify::EnvelopeBroadcaster;
pub use resolver::FsBinaryResolver;
pub use supervisor::{
    ExitFuture, NodeSupervisor, NodeSupervisorDeps, ProcessSpawner, ProcessTerminator,
    SignalTerminator, SpawnedChild, TokioSpawner, kill_pid,
};
