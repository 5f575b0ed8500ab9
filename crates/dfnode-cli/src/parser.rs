//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for supervising a local `defid` node.
///
/// Global options override the `DFNODE_*` environment settings for a
/// single invocation.
#[derive(Parser)]
#[command(name = "dfnode")]
#[command(about = "Start, stop and inspect a local defid node")]
#[command(version)]
pub struct Cli {
    /// Directory containing the node binary
    #[arg(long = "binary-dir", global = true)]
    pub binary_dir: Option<PathBuf>,

    /// Config file name passed to the node as `-conf=<name>`
    #[arg(long = "config-file", global = true)]
    pub config_file: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
