//! Domain types for the supervised node process.
//!
//! These are pure data types with no OS dependencies.

mod launch;
mod process;

pub use launch::{LaunchCommand, LaunchParams};
pub use process::{SupervisedProcess, SupervisorState};
