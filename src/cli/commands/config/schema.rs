use async_trait::async_trait;
use schemars::schema_for;

use crate::{
    cli::{CliError, Command, CommandMetadata, CommandResult},
    config::Config,
};

/// Command to print the JSON schema of the configuration file
pub struct SchemaCommand;

#[async_trait]
impl Command for SchemaCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let schema = schema_for!(Config);
        serde_json::to_string_pretty(&schema).map_err(|e| CliError::ConfigError(e.to_string()))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "schema".to_string(),
            description: "Print the JSON schema of the configuration file".to_string(),
            category: "config".to_string(),
            args: vec![],
            examples: vec!["mpris-sync config schema > mpris-sync.schema.json".to_string()],
        }
    }
}
