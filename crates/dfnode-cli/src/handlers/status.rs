//! Status command handler.
//!
//! Queries the process table for node instances, including ones started
//! outside this invocation.

use dfnode_core::{ProcessMatch, ResponseEnvelope, SupervisorError};
use serde_json::{Value, json};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::print_envelope;

pub async fn execute(ctx: &CliContext) -> Result<(), CliError> {
    let matches = ctx
        .locator
        .find(&ctx.supervisor.match_criteria())
        .await
        .map_err(SupervisorError::from)?;

    print_envelope(&status_envelope(
        &ctx.supervisor.executable().display().to_string(),
        &matches,
    ))
}

fn status_envelope(executable: &str, matches: &[ProcessMatch]) -> ResponseEnvelope {
    let message = if matches.is_empty() {
        "Node is not running"
    } else {
        "Node is running"
    };
    let processes: Vec<Value> = matches
        .iter()
        .map(|m| json!({ "pid": m.pid, "commandLine": m.command_line }))
        .collect();

    ResponseEnvelope::message(message)
        .with_field("executable", executable)
        .with_field("processes", processes)
}
