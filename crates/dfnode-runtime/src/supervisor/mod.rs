//! Node process supervision.
//!
//! # Structure
//!
//! - `NodeSupervisor` - lifecycle state machine, implements `NodeController`
//! - `ProcessSpawner` / `TokioSpawner` - creates the child with piped output
//! - `ProcessTerminator` / `SignalTerminator` - SIGTERM then SIGKILL by PID
//! - `stream` - chunked, lossy stdout/stderr readers

mod core;
mod shutdown;
mod spawner;
mod stream;

pub use core::{NodeSupervisor, NodeSupervisorDeps};
pub use shutdown::{ProcessTerminator, SignalTerminator, kill_pid};
pub use spawner::{ExitFuture, ProcessSpawner, SpawnedChild, TokioSpawner};
