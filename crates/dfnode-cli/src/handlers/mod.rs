//! Command handlers.
//!
//! Each handler takes the composed [`CliContext`](crate::CliContext) where it
//! needs the supervisor, prints its result, and maps failures to
//! [`CliError`].

pub mod paths;
pub mod rpc_methods;
pub mod start;
pub mod status;
pub mod stop;

use std::io::Write;

use dfnode_core::ResponseEnvelope;

use crate::error::CliError;

/// Print one envelope as a single JSON line on stdout.
pub fn print_envelope(envelope: &ResponseEnvelope) -> Result<(), CliError> {
    let line = serde_json::to_string(envelope)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()?;
    Ok(())
}

/// Print `envelope`, then turn a failed envelope into an error.
pub fn report(envelope: &ResponseEnvelope) -> Result<(), CliError> {
    print_envelope(envelope)?;
    CliError::from_envelope(envelope).map_or(Ok(()), Err)
}
