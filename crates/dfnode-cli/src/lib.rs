//! Command-line front end for the `defid` node supervisor.
//!
//! `main.rs` parses arguments and dispatches; [`bootstrap`] wires the
//! runtime adapters into a [`CliContext`] that every handler receives.

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
