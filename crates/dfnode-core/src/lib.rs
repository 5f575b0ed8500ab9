//! Core domain types and port definitions for the `defid` node supervisor.
//!
//! This crate holds everything that does not touch the operating system
//! directly: the supervisor state model, the response envelope shape, the
//! lifecycle event union, the ports the runtime implements, and the settings
//! and path resolution used to locate the node binary.

pub mod domain;
pub mod envelope;
pub mod events;
pub mod paths;
pub mod ports;
pub mod rpc;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{LaunchCommand, LaunchParams, SupervisedProcess, SupervisorState};
pub use envelope::{ErrorDescription, ErrorKind, Payload, ResponseEnvelope};
pub use events::{LifecycleEvent, START_NODE_REPLY_CHANNEL};
pub use ports::{
    BinaryResolver, LocatorError, MatchCriteria, NodeController, NoopChannel,
    NotificationChannel, ProcessLocator, ProcessMatch, ResolutionError, StartOutcome, StopReport,
    SupervisorError, TerminationFailure,
};
pub use rpc::RpcMethod;
pub use services::NodeService;
pub use settings::{
    DEFAULT_CONFIG_FILE_NAME, DEFAULT_STOP_GRACE_SECS, NodeSettings, SettingsError,
};

// Re-export path utilities
pub use paths::{PathError, ResolvedPaths, binary_dir, data_root, default_binary_name};
