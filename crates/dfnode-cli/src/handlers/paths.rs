//! Paths command handler.
//!
//! Displays the resolved data, binary and config paths for diagnosing
//! "binary not found" reports.

use crate::bootstrap::CliConfig;
use crate::error::CliError;

/// Print resolved paths in `key = value` format.
pub fn execute(config: &CliConfig) -> Result<(), CliError> {
    println!("{}", config.resolved_paths());
    Ok(())
}
