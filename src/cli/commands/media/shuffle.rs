use async_trait::async_trait;

use crate::{
    cli::{
        ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult, EngineFactory,
        formatting::format_shuffle,
    },
    services::mpris::ShuffleMode,
};

use super::utils::{player_arg, resolve_player, split_mode_and_player, start_engine};

/// Command to toggle or set shuffle
pub struct ShuffleCommand {
    engine: EngineFactory,
}

impl ShuffleCommand {
    /// Creates a new ShuffleCommand
    pub fn new(engine: EngineFactory) -> Self {
        Self { engine }
    }

    /// `None` means toggle
    fn parse_mode(value: &str) -> Option<Option<ShuffleMode>> {
        match value.to_lowercase().as_str() {
            "on" => Some(Some(ShuffleMode::On)),
            "off" => Some(Some(ShuffleMode::Off)),
            "toggle" => Some(None),
            _ => None,
        }
    }
}

#[async_trait]
impl Command for ShuffleCommand {
    /// Toggles shuffle, or sets it when a mode is given
    ///
    /// # Errors
    ///
    /// Returns CliError for an unknown mode, a missing player, or a rejected
    /// change
    async fn execute(&self, args: &[String]) -> CommandResult {
        let (mode, identifier) = split_mode_and_player(args, "mode", Self::parse_mode)?;
        let mode = mode.flatten();

        let engine = start_engine(&self.engine).await?;

        let result = match resolve_player(&engine, identifier).await {
            Ok(player) => {
                let applied = match mode {
                    Some(mode) => engine.set_shuffle(mode).await,
                    None => engine.toggle_shuffle().await,
                };
                if applied {
                    Ok(format!(
                        "Shuffle {} for {player}",
                        format_shuffle(engine.snapshot().shuffle)
                    ))
                } else {
                    Err(CliError::media(format!("Shuffle change failed for {player}")))
                }
            }
            Err(e) => Err(e),
        };

        engine.dispose();
        result
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "shuffle".to_string(),
            description: "Toggle shuffle, or set it on or off".to_string(),
            category: "media".to_string(),
            args: vec![
                CommandArg {
                    name: "mode".to_string(),
                    description: "Target mode; toggles if omitted".to_string(),
                    required: false,
                    value_type: ArgType::Choice(vec![
                        "on".to_string(),
                        "off".to_string(),
                        "toggle".to_string(),
                    ]),
                },
                player_arg(),
            ],
            examples: vec![
                "mpris-sync media shuffle".to_string(),
                "mpris-sync media shuffle off spotify".to_string(),
            ],
        }
    }
}
