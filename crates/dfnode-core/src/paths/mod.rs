//! Path utilities for the node data directory and binary location.
//!
//! This module provides the canonical path resolution for the supervisor:
//! - Application data root
//! - Directory holding the `defid` binary
//! - Lexical normalization used by binary resolution
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Environment overrides are read through a lookup function so tests never
//!   mutate the process environment
//! - OS-specific logic is kept private in `platform`

mod error;
mod node;
mod normalize;
mod platform;
mod resolver;

// Error type
pub use error::PathError;

// Environment access
pub use platform::{EnvLookup, process_env};

// Platform roots
pub use platform::{DATA_DIR_ENV, data_root, data_root_with, default_binary_name};

// Node binary location
pub use node::{BINARY_DIR_ENV, binary_dir, binary_dir_with};

// Pure path helpers
pub use normalize::{absolutize, normalize_lexically};

// Resolver for CLI introspection
pub use resolver::ResolvedPaths;
