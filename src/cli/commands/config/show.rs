use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{CliError, Command, CommandMetadata, CommandResult},
    config::Config,
};

/// Command to print the effective configuration as TOML
pub struct ShowCommand {
    config: Arc<Config>,
}

impl ShowCommand {
    /// Creates a new ShowCommand
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for ShowCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        self.config
            .to_toml_string()
            .map_err(|e| CliError::ConfigError(e.to_string()))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "show".to_string(),
            description: "Print the effective configuration, defaults included".to_string(),
            category: "config".to_string(),
            args: vec![],
            examples: vec!["mpris-sync config show".to_string()],
        }
    }
}
