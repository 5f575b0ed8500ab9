//! Stop command handler.

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::report;

/// Terminate every node process matching the configured binary.
pub async fn execute(ctx: &CliContext) -> Result<(), CliError> {
    let envelope = ctx.service.stop().await;
    report(&envelope)
}
