//! Node lifecycle state machine.
//!
//! One [`NodeSupervisor`] owns at most one child process. Start and stop are
//! serialized by an async mutex so a liveness check and the spawn that
//! follows it can never interleave with another start. State shared with the
//! background monitor task sits behind a short-lived synchronous lock.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use async_trait::async_trait;
use dfnode_core::events::names;
use dfnode_core::{
    BinaryResolver, LaunchCommand, LaunchParams, LifecycleEvent, MatchCriteria, NodeController,
    NodeSettings, NotificationChannel, ProcessLocator, ResponseEnvelope, StartOutcome, StopReport,
    SupervisedProcess, SupervisorError, SupervisorState,
};
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::shutdown::{ProcessTerminator, SignalTerminator};
use super::spawner::{ProcessSpawner, SpawnedChild, TokioSpawner};
use super::stream::pump_chunks;
use crate::locator::SysinfoProcessLocator;
use crate::resolver::FsBinaryResolver;

/// Upper bound on waiting for the monitor to release a terminated child.
/// Grandchildren holding the output pipes open can delay EOF indefinitely.
const RELEASE_TIMEOUT: Duration = Duration::from_secs(5);

/// Collaborators injected into a [`NodeSupervisor`].
#[derive(Clone)]
pub struct NodeSupervisorDeps {
    pub locator: Arc<dyn ProcessLocator>,
    pub resolver: Arc<dyn BinaryResolver>,
    pub spawner: Arc<dyn ProcessSpawner>,
    pub terminator: Arc<dyn ProcessTerminator>,
}

impl NodeSupervisorDeps {
    /// OS-backed collaborators.
    pub fn system(stop_grace_period: Duration) -> Self {
        Self {
            locator: Arc::new(SysinfoProcessLocator::new()),
            resolver: Arc::new(FsBinaryResolver::new()),
            spawner: Arc::new(TokioSpawner),
            terminator: Arc::new(SignalTerminator::new(stop_grace_period)),
        }
    }
}

struct TrackedChild {
    process: SupervisedProcess,
    generation: u64,
    started: bool,
    stop_requested: bool,
}

struct Inner {
    state: SupervisorState,
    tracked: Option<TrackedChild>,
    next_generation: u64,
}

/// State shared between the caller-facing methods and the monitor task.
struct Shared {
    inner: Mutex<Inner>,
    channel: Weak<dyn NotificationChannel>,
    /// Signalled each time the monitor drops a tracked child.
    released: Notify,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: LifecycleEvent) {
        debug!(event = event.event_name(), "Pushing lifecycle event");
        self.push(event.to_envelope());
    }

    fn push(&self, envelope: ResponseEnvelope) {
        match self.channel.upgrade() {
            Some(channel) => channel.push(envelope),
            None => debug!(
                event = envelope.event_name(),
                "Notification channel gone, dropping envelope"
            ),
        }
    }

    fn set_state(&self, state: SupervisorState) {
        self.lock().state = state;
    }

    /// PID of the tracked child, if one is live.
    fn tracked_pid(&self) -> Option<Option<u32>> {
        self.lock().tracked.as_ref().map(|t| t.process.pid)
    }

    fn track(&self, process: SupervisedProcess) -> u64 {
        let mut inner = self.lock();
        let generation = inner.next_generation;
        inner.next_generation += 1;
        inner.tracked = Some(TrackedChild {
            process,
            generation,
            started: false,
            stop_requested: false,
        });
        inner.state = SupervisorState::Starting;
        generation
    }

    fn mark_running(&self, generation: u64) {
        let mut inner = self.lock();
        let Some(tracked) = inner.tracked.as_mut().filter(|t| t.generation == generation) else {
            return;
        };
        tracked.started = true;
        if inner.state == SupervisorState::Starting {
            inner.state = SupervisorState::Running;
        }
    }

    /// Flag the tracked child as asked to stop. Returns its PID and
    /// generation; a child without a PID cannot be terminated and is left
    /// untouched.
    fn request_stop(&self) -> Option<(u32, u64)> {
        let mut inner = self.lock();
        let tracked = inner.tracked.as_mut()?;
        let pid = tracked.process.pid?;
        tracked.stop_requested = true;
        let generation = tracked.generation;
        inner.state = SupervisorState::Stopping;
        Some((pid, generation))
    }

    fn is_tracking(&self, generation: u64) -> bool {
        self.lock()
            .tracked
            .as_ref()
            .is_some_and(|t| t.generation == generation)
    }

    /// Undo [`Self::request_stop`] after the termination request failed.
    fn cancel_stop(&self) {
        let mut inner = self.lock();
        let Some(tracked) = inner.tracked.as_mut() else {
            return;
        };
        tracked.stop_requested = false;
        let started = tracked.started;
        inner.state = if started {
            SupervisorState::Running
        } else {
            SupervisorState::Starting
        };
    }

    /// Drop the handle of an exited child. Returns whether the exit was
    /// requested through [`NodeSupervisor::stop`].
    fn release(&self, generation: u64) -> bool {
        let requested = {
            let mut inner = self.lock();
            match inner.tracked.take() {
                Some(tracked) if tracked.generation == generation => {
                    inner.state = SupervisorState::Stopped;
                    tracked.stop_requested
                }
                other => {
                    inner.tracked = other;
                    false
                }
            }
        };
        self.released.notify_waiters();
        requested
    }
}

/// Supervises one `defid` process.
///
/// Construct once with the executable and config file injected, then share
/// by `Arc`.
pub struct NodeSupervisor {
    executable: PathBuf,
    config_file_name: String,
    deps: NodeSupervisorDeps,
    lifecycle: tokio::sync::Mutex<()>,
    shared: Arc<Shared>,
}

impl NodeSupervisor {
    /// Create a supervisor for `executable`.
    ///
    /// The supervisor keeps only a weak handle to `channel`; once the
    /// listener side drops it, lifecycle events are discarded.
    pub fn new(
        executable: impl Into<PathBuf>,
        config_file_name: impl Into<String>,
        deps: NodeSupervisorDeps,
        channel: &Arc<dyn NotificationChannel>,
    ) -> Self {
        Self {
            executable: executable.into(),
            config_file_name: config_file_name.into(),
            deps,
            lifecycle: tokio::sync::Mutex::new(()),
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: SupervisorState::Idle,
                    tracked: None,
                    next_generation: 0,
                }),
                channel: Arc::downgrade(channel),
                released: Notify::new(),
            }),
        }
    }

    /// Create a supervisor for the binary described by `settings`.
    pub fn from_settings(
        settings: &NodeSettings,
        deps: NodeSupervisorDeps,
        channel: &Arc<dyn NotificationChannel>,
    ) -> Self {
        let executable = deps
            .resolver
            .resolve(&settings.binary_dir, &settings.binary_name);
        Self::new(executable, settings.config_file_name.clone(), deps, channel)
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn config_file_name(&self) -> &str {
        &self.config_file_name
    }

    /// Record of the tracked child, while one is live.
    pub fn tracked_process(&self) -> Option<SupervisedProcess> {
        self.shared.lock().tracked.as_ref().map(|t| t.process.clone())
    }

    pub fn state(&self) -> SupervisorState {
        self.shared.lock().state
    }

    /// Criteria selecting node processes: the configured path, plus its
    /// canonical form when that differs (symlinked install dirs).
    pub fn match_criteria(&self) -> MatchCriteria {
        let mut criteria = vec![MatchCriteria::Executable(self.executable.clone())];
        if let Some(canonical) = self
            .executable
            .canonicalize()
            .ok()
            .filter(|c| *c != self.executable)
        {
            criteria.push(MatchCriteria::Executable(canonical));
        }
        MatchCriteria::AnyOf(criteria)
    }

    /// Start the node unless an instance is already live.
    ///
    /// Returns as soon as the spawn decision is made. Output and exit are
    /// reported later through the notification channel.
    pub async fn start(&self, params: &LaunchParams) -> Result<StartOutcome, SupervisorError> {
        let _guard = self.lifecycle.lock().await;

        if let Some(pid) = self.shared.tracked_pid() {
            info!(?pid, "Node already running under this supervisor");
            self.shared.emit(LifecycleEvent::AlreadyRunning);
            return Ok(StartOutcome::AlreadyRunning {
                pids: pid.into_iter().collect(),
            });
        }

        let matches = self
            .deps
            .locator
            .find(&self.match_criteria())
            .await
            .map_err(|e| self.fail(e.into()))?;

        if !matches.is_empty() {
            let pids: Vec<u32> = matches.iter().map(|m| m.pid).collect();
            info!(?pids, "Node already running");
            self.shared.emit(LifecycleEvent::AlreadyRunning);
            return Ok(StartOutcome::AlreadyRunning { pids });
        }

        match self.deps.resolver.exists(&self.executable) {
            Ok(true) => {}
            Ok(false) => {
                return Err(self.fail(SupervisorError::BinaryNotFound {
                    path: self.executable.clone(),
                }));
            }
            Err(e) => return Err(self.fail(e.into())),
        }

        let command = LaunchCommand::from_params(&self.executable, &self.config_file_name, params)
            .map_err(|e| self.fail(e))?;

        self.shared.set_state(SupervisorState::Starting);
        let child = self.deps.spawner.spawn(&command).map_err(|source| {
            self.fail(SupervisorError::Spawn {
                path: self.executable.clone(),
                source,
            })
        })?;

        let pid = child.pid;
        let generation = self.shared.track(command.to_supervised(pid));
        info!(
            ?pid,
            path = %self.executable.display(),
            args = ?command.args(),
            "Spawned node process"
        );

        tokio::spawn(monitor(Arc::clone(&self.shared), generation, child));

        Ok(StartOutcome::Spawned { pid })
    }

    /// Terminate every matching node process, one PID at a time in
    /// ascending PID order.
    ///
    /// Covers externally started instances as well as the tracked child. A
    /// failing PID does not stop the loop. Once the tracked child is
    /// terminated, returns only after its handle has been released.
    pub async fn stop(&self) -> Result<StopReport, SupervisorError> {
        let _guard = self.lifecycle.lock().await;

        let mut pids: Vec<u32> = self
            .deps
            .locator
            .find(&self.match_criteria())
            .await?
            .into_iter()
            .map(|m| m.pid)
            .collect();

        let own = self.shared.request_stop();
        if let Some((pid, _)) = own {
            pids.push(pid);
        }
        pids.sort_unstable();
        pids.dedup();

        let mut report = StopReport::default();
        if pids.is_empty() {
            info!("No node process to stop");
            return Ok(report);
        }

        for pid in pids {
            info!(pid, "Terminating node process");
            match self.deps.terminator.terminate(pid).await {
                Ok(()) => report.record_success(pid),
                Err(e) => {
                    warn!(pid, error = %e, "Failed to terminate node process");
                    report.record_failure(pid, e.to_string());
                }
            }
        }

        match own {
            Some((pid, _)) if report.failures.iter().any(|f| f.pid == pid) => {
                self.shared.cancel_stop();
            }
            Some((_, generation)) => self.await_release(generation).await,
            None => {}
        }

        if report.is_clean() {
            Ok(report)
        } else {
            Err(SupervisorError::Termination { report })
        }
    }

    /// Wait for the monitor to drop a terminated child, so a start issued
    /// right after stop does not see it as live.
    async fn await_release(&self, generation: u64) {
        let deadline = Instant::now() + RELEASE_TIMEOUT;
        loop {
            let released = self.shared.released.notified();
            tokio::pin!(released);
            released.as_mut().enable();

            if !self.shared.is_tracking(generation) {
                return;
            }
            if tokio::time::timeout_at(deadline, released).await.is_err() {
                warn!(generation, "Terminated node still holds its output open");
                return;
            }
        }
    }

    /// Record a failed start. The error is returned to the caller and also
    /// pushed to the listener tagged as a start failure.
    fn fail(&self, err: SupervisorError) -> SupervisorError {
        warn!(error = %err, kind = %err.kind(), "Node start failed");
        self.shared.set_state(SupervisorState::Failed);
        self.shared.push(err.to_envelope().with_field("event", names::START_FAILED));
        err
    }
}

#[async_trait]
impl NodeController for NodeSupervisor {
    async fn start(&self, params: &LaunchParams) -> Result<StartOutcome, SupervisorError> {
        Self::start(self, params).await
    }

    async fn stop(&self) -> Result<StopReport, SupervisorError> {
        Self::stop(self).await
    }

    fn state(&self) -> SupervisorState {
        Self::state(self)
    }
}

/// Turn the child's output and exit into lifecycle events.
///
/// The exit event is pushed only after both streams hit EOF and the exit
/// status is collected, so it always comes last for a run.
async fn monitor(shared: Arc<Shared>, generation: u64, child: SpawnedChild) {
    let SpawnedChild {
        pid,
        stdout,
        stderr,
        exit,
    } = child;

    let mut started = false;
    let stdout_done = pump_chunks(stdout, "stdout", pid, |_| {
        if !started {
            started = true;
            shared.mark_running(generation);
            shared.emit(LifecycleEvent::Started);
        }
    });
    let stderr_done = pump_chunks(stderr, "stderr", pid, |chunk| {
        shared.emit(LifecycleEvent::OutputFailure {
            message: chunk.trim().to_string(),
        });
    });

    let (_, _, status) = tokio::join!(stdout_done, stderr_done, exit);

    let code = status.unwrap_or_else(|e| {
        warn!(?pid, error = %e, "Failed to collect node exit status");
        None
    });
    let requested = shared.release(generation);
    info!(?pid, ?code, requested, "Node process exited");
    shared.emit(LifecycleEvent::ProcessExited { code, requested });
}
