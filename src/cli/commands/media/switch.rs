use async_trait::async_trait;

use crate::cli::{
    ArgType, Command, CommandArg, CommandMetadata, CommandResult, EngineFactory,
    formatting::format_status,
};

use super::utils::{resolve_player, start_engine};

/// Command to select a player and show what it is playing
pub struct SwitchCommand {
    engine: EngineFactory,
}

impl SwitchCommand {
    /// Creates a new SwitchCommand
    pub fn new(engine: EngineFactory) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Command for SwitchCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let engine = start_engine(&self.engine).await?;

        let output = resolve_player(&engine, args.first())
            .await
            .map(|player| format!("Switched to {player}\n\n{}", format_status(&engine.snapshot())));

        engine.dispose();
        output
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "switch".to_string(),
            description: "Select a player and fetch its current state".to_string(),
            category: "media".to_string(),
            args: vec![CommandArg {
                name: "player".to_string(),
                description: "Roster index (1, 2, ...) or name prefix".to_string(),
                required: true,
                value_type: ArgType::Player,
            }],
            examples: vec![
                "mpris-sync media switch spotify".to_string(),
                "mpris-sync media switch 2".to_string(),
            ],
        }
    }
}
