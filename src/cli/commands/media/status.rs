use async_trait::async_trait;

use crate::cli::{
    Command, CommandMetadata, CommandResult, EngineFactory, formatting::format_status,
};

use super::utils::{player_arg, resolve_player, start_engine};

/// Command to print the current state once
pub struct StatusCommand {
    engine: EngineFactory,
}

impl StatusCommand {
    /// Creates a new StatusCommand
    pub fn new(engine: EngineFactory) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Command for StatusCommand {
    /// Prints the selected player's track, volume, shuffle and loop mode
    ///
    /// # Errors
    ///
    /// Returns CliError if the control program is missing or the given
    /// player does not exist
    async fn execute(&self, args: &[String]) -> CommandResult {
        let engine = start_engine(&self.engine).await?;

        let result = match args.first() {
            Some(identifier) => resolve_player(&engine, Some(identifier)).await.map(|_| ()),
            None => Ok(()),
        };
        let output = result.map(|()| format_status(&engine.snapshot()));

        engine.dispose();
        output
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "status".to_string(),
            description: "Show the selected player's current media and settings".to_string(),
            category: "media".to_string(),
            args: vec![player_arg()],
            examples: vec![
                "mpris-sync media status".to_string(),
                "mpris-sync media status 2".to_string(),
            ],
        }
    }
}
