//! Child process creation.

use std::io;
use std::process::Stdio;

use dfnode_core::LaunchCommand;
use futures_util::future::BoxFuture;
use tokio::io::AsyncRead;
use tokio::process::Command;

/// Resolves once the child exits, with its exit code (`None` if it was
/// ended by a signal).
pub type ExitFuture = BoxFuture<'static, io::Result<Option<i32>>>;

/// A freshly spawned child, split into the parts the monitor consumes.
pub struct SpawnedChild {
    pub pid: Option<u32>,
    pub stdout: Box<dyn AsyncRead + Send + Unpin>,
    pub stderr: Box<dyn AsyncRead + Send + Unpin>,
    pub exit: ExitFuture,
}

impl std::fmt::Debug for SpawnedChild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnedChild")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

/// Creates node processes.
pub trait ProcessSpawner: Send + Sync {
    /// Spawn `command` with stdout and stderr piped.
    fn spawn(&self, command: &LaunchCommand) -> io::Result<SpawnedChild>;
}

/// Spawns real OS processes through `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl ProcessSpawner for TokioSpawner {
    fn spawn(&self, command: &LaunchCommand) -> io::Result<SpawnedChild> {
        let mut cmd = Command::new(command.executable());
        cmd.args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Terminal interrupts reach only the supervisor, which stops the node itself
        #[cfg(unix)]
        cmd.process_group(0);
        let mut child = cmd.spawn()?;

        let pid = child.id();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("child stderr was not captured"))?;

        Ok(SpawnedChild {
            pid,
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            exit: Box::pin(async move { child.wait().await.map(|status| status.code()) }),
        })
    }
}
