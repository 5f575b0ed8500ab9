//! Process termination by PID with SIGTERM → SIGKILL escalation.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use dfnode_core::DEFAULT_STOP_GRACE_SECS;
use tokio::time::sleep;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long to wait for exit after SIGKILL.
const KILL_WAIT: Duration = Duration::from_secs(2);

/// Terminates processes by PID.
#[async_trait]
pub trait ProcessTerminator: Send + Sync {
    /// Request termination of `pid` and wait until it is gone.
    ///
    /// A PID that no longer exists counts as terminated.
    async fn terminate(&self, pid: u32) -> io::Result<()>;
}

/// OS signal based terminator.
#[derive(Debug, Clone, Copy)]
pub struct SignalTerminator {
    grace_period: Duration,
}

impl SignalTerminator {
    pub const fn new(grace_period: Duration) -> Self {
        Self { grace_period }
    }

    pub const fn grace_period(&self) -> Duration {
        self.grace_period
    }
}

impl Default for SignalTerminator {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_STOP_GRACE_SECS))
    }
}

#[async_trait]
impl ProcessTerminator for SignalTerminator {
    async fn terminate(&self, pid: u32) -> io::Result<()> {
        kill_pid(pid, self.grace_period).await
    }
}

/// Kill a process by PID.
///
/// # Strategy
/// 1. Send SIGTERM
/// 2. Poll for exit for up to `grace_period`
/// 3. If still alive, send SIGKILL
/// 4. Poll again for up to 2 seconds
///
/// The process is not reaped here. A supervised child is reaped by its
/// monitor task.
///
/// # Returns
/// - `Ok(())` if the process was killed or already gone
/// - `Err` if signalling fails (excluding ESRCH) or the process survives SIGKILL
pub async fn kill_pid(pid: u32, grace_period: Duration) -> io::Result<()> {
    if pid == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "refusing to signal pid 0",
        ));
    }

    #[cfg(unix)]
    {
        kill_pid_unix(pid, grace_period).await
    }

    #[cfg(not(unix))]
    {
        kill_pid_sysinfo(pid, grace_period).await
    }
}

fn poll_rounds(window: Duration) -> u32 {
    let rounds = window.as_millis().div_ceil(POLL_INTERVAL.as_millis());
    u32::try_from(rounds).unwrap_or(u32::MAX).max(1)
}

#[cfg(unix)]
async fn kill_pid_unix(pid: u32, grace_period: Duration) -> io::Result<()> {
    let raw = i32::try_from(pid).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("pid {pid} out of range"))
    })?;
    let nix_pid = Pid::from_raw(raw);

    // Phase 1: SIGTERM
    match signal::kill(nix_pid, Signal::SIGTERM) {
        Ok(()) => {}
        Err(Errno::ESRCH) => return Ok(()),
        Err(e) => return Err(io::Error::from(e)),
    }

    if wait_for_exit(nix_pid, poll_rounds(grace_period)).await {
        return Ok(());
    }

    tracing::debug!(pid, "Process survived SIGTERM grace period, sending SIGKILL");

    // Phase 2: SIGKILL
    match signal::kill(nix_pid, Signal::SIGKILL) {
        Ok(()) => {}
        Err(Errno::ESRCH) => return Ok(()),
        Err(e) => return Err(io::Error::from(e)),
    }

    if wait_for_exit(nix_pid, poll_rounds(KILL_WAIT)).await {
        return Ok(());
    }

    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("process {pid} did not exit after SIGKILL"),
    ))
}

/// Poll with the null signal until the PID is gone.
#[cfg(unix)]
async fn wait_for_exit(pid: Pid, rounds: u32) -> bool {
    for _ in 0..rounds {
        sleep(POLL_INTERVAL).await;
        // Other errors (permission) mean the process still exists
        if signal::kill(pid, None) == Err(Errno::ESRCH) {
            return true;
        }
    }
    false
}

#[cfg(not(unix))]
async fn kill_pid_sysinfo(pid: u32, grace_period: Duration) -> io::Result<()> {
    use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

    let target = sysinfo::Pid::from_u32(pid);
    let mut system = System::new();
    let refresh = |system: &mut System| {
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[target]),
            true,
            ProcessRefreshKind::nothing(),
        );
    };

    refresh(&mut system);
    let Some(process) = system.process(target) else {
        return Ok(());
    };
    if !process.kill() {
        return Err(io::Error::other(format!("failed to kill process {pid}")));
    }

    for _ in 0..poll_rounds(grace_period.max(KILL_WAIT)) {
        sleep(POLL_INTERVAL).await;
        refresh(&mut system);
        if system.process(target).is_none() {
            return Ok(());
        }
    }

    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("process {pid} did not exit after kill"),
    ))
}
