//! Process table queries via `sysinfo`.

use async_trait::async_trait;
use dfnode_core::{LocatorError, MatchCriteria, ProcessLocator, ProcessMatch};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::debug;

/// [`ProcessLocator`] backed by a fresh `sysinfo` snapshot per query.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoProcessLocator;

impl SysinfoProcessLocator {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessLocator for SysinfoProcessLocator {
    async fn find(&self, criteria: &MatchCriteria) -> Result<Vec<ProcessMatch>, LocatorError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(LocatorError::Unsupported);
        }

        let criteria = criteria.clone();
        let matches = tokio::task::spawn_blocking(move || scan(&criteria))
            .await
            .map_err(|e| LocatorError::Enumeration(e.to_string()))?;

        debug!(count = matches.len(), "Process table scan complete");
        Ok(matches)
    }
}

fn scan(criteria: &MatchCriteria) -> Vec<ProcessMatch> {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing()
            .with_cmd(UpdateKind::Always)
            .with_exe(UpdateKind::Always),
    );

    let own_pid = std::process::id();
    let mut matches: Vec<ProcessMatch> = system
        .processes()
        .iter()
        .filter(|(pid, process)| pid.as_u32() != own_pid && process.thread_kind().is_none())
        .filter_map(|(pid, process)| {
            let command_line = process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ");
            criteria
                .matches(process.exe(), &command_line)
                .then(|| ProcessMatch {
                    pid: pid.as_u32(),
                    command_line,
                })
        })
        .collect();

    matches.sort_by_key(|m| m.pid);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn never_reports_own_process() {
        let Ok(exe) = std::env::current_exe() else {
            return;
        };
        let criteria = MatchCriteria::Executable(exe);
        let own_pid = std::process::id();

        if let Ok(matches) = SysinfoProcessLocator::new().find(&criteria).await {
            assert!(matches.iter().all(|m| m.pid != own_pid));
        }
    }

    #[tokio::test]
    async fn unmatched_criteria_yield_empty_result() {
        let criteria = MatchCriteria::CommandPrefix("dfnode-no-such-process-7f3a".to_string());
        if let Ok(matches) = SysinfoProcessLocator::new().find(&criteria).await {
            assert!(matches.is_empty());
        }
    }
}
