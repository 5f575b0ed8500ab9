//! CLI bootstrap - the composition root.
//!
//! The only place where the runtime adapters are wired together for the
//! CLI. Command handlers receive the composed [`CliContext`].

use std::path::PathBuf;
use std::sync::Arc;

use dfnode_core::paths::{ResolvedPaths, data_root};
use dfnode_core::settings::validate_settings;
use dfnode_core::{
    NodeController, NodeService, NodeSettings, NotificationChannel, ProcessLocator, SettingsError,
};
use dfnode_runtime::{NodeSupervisor, NodeSupervisorDeps};

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Root of the wallet's application data.
    pub data_root: PathBuf,
    /// Node settings after environment and flag overrides.
    pub settings: NodeSettings,
}

impl CliConfig {
    /// Load settings from the environment and apply the global flags on top.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut settings = NodeSettings::from_env()?;
        if let Some(dir) = &cli.binary_dir {
            settings.binary_dir.clone_from(dir);
        }
        if let Some(name) = &cli.config_file {
            settings.config_file_name.clone_from(name);
        }
        validate_settings(&settings)?;

        Ok(Self {
            data_root: data_root().map_err(SettingsError::from)?,
            settings,
        })
    }

    pub fn resolved_paths(&self) -> ResolvedPaths {
        ResolvedPaths::from_settings(self.data_root.clone(), &self.settings)
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub config: CliConfig,
    pub supervisor: Arc<NodeSupervisor>,
    pub service: NodeService,
    pub locator: Arc<dyn ProcessLocator>,
    /// Strong handle keeping the supervisor's weak channel alive.
    pub channel: Arc<dyn NotificationChannel>,
}

/// Wire OS-backed adapters into a [`CliContext`].
///
/// Lifecycle events go to `channel`: an
/// [`EnvelopeBroadcaster`](dfnode_runtime::EnvelopeBroadcaster) for commands
/// that relay them, [`NoopChannel`](dfnode_core::NoopChannel) otherwise.
pub fn bootstrap(config: CliConfig, channel: Arc<dyn NotificationChannel>) -> CliContext {
    let deps = NodeSupervisorDeps::system(config.settings.stop_grace_period());
    let locator = Arc::clone(&deps.locator);
    let supervisor = Arc::new(NodeSupervisor::from_settings(
        &config.settings,
        deps,
        &channel,
    ));
    let controller: Arc<dyn NodeController> = supervisor.clone();
    let service = NodeService::new(controller);

    CliContext {
        config,
        supervisor,
        service,
        locator,
        channel,
    }
}
