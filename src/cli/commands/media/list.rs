use async_trait::async_trait;

use crate::cli::{
    Command, CommandMetadata, CommandResult, EngineFactory, formatting::format_player_list,
};

use super::utils::start_engine;

/// Command to list the player roster
///
/// Shows index, identifier and the last known track of each player.
pub struct ListCommand {
    engine: EngineFactory,
}

impl ListCommand {
    /// Creates a new ListCommand
    pub fn new(engine: EngineFactory) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let engine = start_engine(&self.engine).await?;
        let output = format_player_list(&engine.snapshot());
        engine.dispose();

        Ok(output)
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "list".to_string(),
            description: "List all available media players".to_string(),
            category: "media".to_string(),
            args: vec![],
            examples: vec!["mpris-sync media list".to_string()],
        }
    }
}
