//! Start command handler.
//!
//! Starts the node and relays lifecycle envelopes as JSON lines until the
//! node exits. Ctrl-C requests a stop and keeps relaying until the exit
//! event arrives.

use dfnode_core::LaunchParams;
use dfnode_core::events::names;
use dfnode_runtime::EnvelopeBroadcaster;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::{print_envelope, report};

/// `broadcaster` must be the channel `ctx` was bootstrapped with.
pub async fn execute(
    ctx: &CliContext,
    broadcaster: &EnvelopeBroadcaster,
    params: &[String],
) -> Result<(), CliError> {
    let params = LaunchParams::from_pairs(params)?;

    // Subscribe before spawning so the started event cannot be missed
    let mut events = broadcaster.subscribe();
    debug!(channel = broadcaster.channel(), "Relaying node events");

    let outcome = match ctx.supervisor.start(&params).await {
        Ok(outcome) => outcome,
        Err(e) => {
            print_envelope(&e.to_envelope())?;
            return Err(e.into());
        }
    };
    print_envelope(&outcome.to_envelope())?;
    if !outcome.is_spawned() {
        return Ok(());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut stop_requested = false;

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(envelope) if envelope.event_name() == Some(names::EXITED) => {
                    return report(&envelope);
                }
                Ok(envelope) => print_envelope(&envelope)?,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event relay fell behind, envelopes dropped");
                }
                Err(RecvError::Closed) => return Ok(()),
            },
            signal = &mut ctrl_c, if !stop_requested => {
                signal?;
                info!("Interrupt received, stopping node");
                stop_requested = true;
                report(&ctx.service.stop().await)?;
            }
        }
    }
}
