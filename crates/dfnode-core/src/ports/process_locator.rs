//! Process table query port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// A running process that satisfied a [`MatchCriteria`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessMatch {
    pub pid: u32,
    /// Full command line joined with spaces. May be empty when the OS hides it.
    pub command_line: String,
}

/// Predicate selecting node processes out of the process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchCriteria {
    /// The process executable path equals this path, or its command line is
    /// this path optionally followed by arguments.
    Executable(PathBuf),
    /// The command line starts with this text.
    CommandPrefix(String),
    /// Any of the nested criteria match.
    AnyOf(Vec<Self>),
}

impl MatchCriteria {
    /// Evaluate the predicate against one process table entry.
    pub fn matches(&self, exe: Option<&Path>, command_line: &str) -> bool {
        match self {
            Self::Executable(path) => {
                if exe.is_some_and(|exe| exe == path) {
                    return true;
                }
                let path = path.to_string_lossy();
                command_line == path
                    || command_line
                        .strip_prefix(path.as_ref())
                        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
            }
            Self::CommandPrefix(prefix) => !prefix.is_empty() && command_line.starts_with(prefix),
            Self::AnyOf(criteria) => criteria.iter().any(|c| c.matches(exe, command_line)),
        }
    }
}

/// Errors from enumerating the process table.
///
/// Distinct from an empty result: callers must not treat a failed query as
/// "nothing is running".
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("process enumeration is not supported on this platform")]
    Unsupported,

    #[error("process enumeration failed: {0}")]
    Enumeration(String),
}

/// Queries the OS process table.
#[async_trait]
pub trait ProcessLocator: Send + Sync {
    /// Every running process matching `criteria`, never including the
    /// calling process itself.
    async fn find(&self, criteria: &MatchCriteria) -> Result<Vec<ProcessMatch>, LocatorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executable_matches_exe_path() {
        let criteria = MatchCriteria::Executable(PathBuf::from("/opt/defid"));
        assert!(criteria.matches(Some(Path::new("/opt/defid")), ""));
        assert!(!criteria.matches(Some(Path::new("/opt/defid-cli")), "/opt/defid-cli"));
    }

    #[test]
    fn executable_matches_command_line_with_arguments() {
        let criteria = MatchCriteria::Executable(PathBuf::from("/opt/defid"));
        assert!(criteria.matches(None, "/opt/defid"));
        assert!(criteria.matches(None, "/opt/defid -conf=defi.conf"));
        assert!(!criteria.matches(None, "/opt/defid-cli getblockcount"));
        assert!(!criteria.matches(None, "tail -f /opt/defid"));
    }

    #[test]
    fn any_of_matches_either_branch() {
        let criteria = MatchCriteria::AnyOf(vec![
            MatchCriteria::Executable(PathBuf::from("/link/defid")),
            MatchCriteria::Executable(PathBuf::from("/real/defid")),
        ]);
        assert!(criteria.matches(Some(Path::new("/real/defid")), ""));
        assert!(criteria.matches(None, "/link/defid -conf=defi.conf"));
        assert!(!criteria.matches(None, "/other/defid"));
    }

    #[test]
    fn empty_prefix_never_matches() {
        assert!(!MatchCriteria::CommandPrefix(String::new()).matches(None, "anything"));
        assert!(MatchCriteria::CommandPrefix("defid ".into()).matches(None, "defid -daemon"));
    }
}
