use async_trait::async_trait;

use crate::{
    cli::{
        ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult, EngineFactory,
        formatting::format_loop,
    },
    services::mpris::LoopMode,
};

use super::utils::{player_arg, resolve_player, split_mode_and_player, start_engine};

/// Command to cycle or set the loop mode
pub struct LoopCommand {
    engine: EngineFactory,
}

impl LoopCommand {
    /// Creates a new LoopCommand
    pub fn new(engine: EngineFactory) -> Self {
        Self { engine }
    }

    /// `None` means cycle
    fn parse_mode(value: &str) -> Option<Option<LoopMode>> {
        match value.to_lowercase().as_str() {
            "none" => Some(Some(LoopMode::None)),
            "track" => Some(Some(LoopMode::Track)),
            "playlist" => Some(Some(LoopMode::Playlist)),
            "cycle" => Some(None),
            _ => None,
        }
    }
}

#[async_trait]
impl Command for LoopCommand {
    /// Advances none → track → playlist → none, or sets the given mode
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
                    Some(mode) => engine.set_loop(mode).await,
                    None => engine.cycle_loop().await,
                };
                if applied {
                    Ok(format!(
                        "Loop mode {} for {player}",
                        format_loop(engine.snapshot().loop_mode)
                    ))
                } else {
                    Err(CliError::media(format!("Loop change failed for {player}")))
                }
            }
            Err(e) => Err(e),
        };

        engine.dispose();
        result
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "loop".to_string(),
            description: "Cycle the loop mode, or set it directly".to_string(),
            category: "media".to_string(),
            args: vec![
                CommandArg {
                    name: "mode".to_string(),
                    description: "Target mode; cycles if omitted".to_string(),
                    required: false,
                    value_type: ArgType::Choice(vec![
                        "none".to_string(),
                        "track".to_string(),
                        "playlist".to_string(),
                        "cycle".to_string(),
                    ]),
                },
                player_arg(),
            ],
            examples: vec![
                "mpris-sync media loop".to_string(),
                "mpris-sync media loop track".to_string(),
                "mpris-sync media loop none 2".to_string(),
            ],
        }
    }
}
