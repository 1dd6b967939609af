use std::{path::PathBuf, sync::Arc};

use super::CliError;
use crate::{config::Config, services::mpris::SyncEngine};

/// Builds a fresh, uninitialized engine for one command invocation
pub type EngineFactory = Arc<dyn Fn() -> Result<SyncEngine, CliError> + Send + Sync>;

/// What commands are constructed from
#[derive(Clone)]
pub struct CliContext {
    /// Effective configuration
    pub config: Arc<Config>,
    /// File the configuration was read from, or would be
    pub config_path: PathBuf,
    /// Engine constructor for media commands
    pub engine: EngineFactory,
}

impl CliContext {
    /// Context whose engines drive the configured control program
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        let media = config.media.clone();
        let engine: EngineFactory = Arc::new(move || {
            media
                .build_engine()
                .map_err(|e| CliError::ConfigError(e.to_string()))
        });

        Self::with_engine_factory(config, config_path, engine)
    }

    /// Context with a custom engine constructor
    pub fn with_engine_factory(config: Config, config_path: PathBuf, engine: EngineFactory) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            engine,
        }
    }
}
