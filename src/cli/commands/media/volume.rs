use async_trait::async_trait;

use crate::{
    cli::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult, EngineFactory},
    services::mpris::MediaError,
};

use super::utils::{player_arg, resolve_player, start_engine};

/// Command to set a player's volume
pub struct VolumeCommand {
    engine: EngineFactory,
}

impl VolumeCommand {
    /// Creates a new VolumeCommand
    pub fn new(engine: EngineFactory) -> Self {
        Self { engine }
    }

    fn parse_percent(value: &str) -> Result<i64, CliError> {
        value
            .trim_end_matches('%')
            .parse::<i64>()
            .map_err(|_| CliError::InvalidArgument {
                arg: "percent".to_string(),
                reason: format!("'{value}' is not a whole number"),
            })
    }
}

#[async_trait]
impl Command for VolumeCommand {
    /// Sets the volume of the given or selected player
    ///
    /// # Errors
    ///
    /// Returns CliError for a value outside 0-100, a missing player, or a
    /// rejected change
    async fn execute(&self, args: &[String]) -> CommandResult {
        let value = args
            .first()
            .ok_or_else(|| CliError::InvalidArguments("Missing volume percent".to_string()))?;
        let percent = Self::parse_percent(value)?;

        let engine = start_engine(&self.engine).await?;

        let result = match resolve_player(&engine, args.get(1)).await {
            Ok(player) => match engine.set_volume(percent).await {
                Ok(true) => Ok(format!("Set volume of {player} to {percent}%")),
                Ok(false) => Err(CliError::media(format!("Volume change failed for {player}"))),
                Err(e @ MediaError::InvalidVolume(_)) => Err(CliError::InvalidArgument {
                    arg: "percent".to_string(),
                    reason: e.to_string(),
                }),
                Err(e) => Err(CliError::media(e.to_string())),
            },
            Err(e) => Err(e),
        };

        engine.dispose();
        result
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "volume".to_string(),
            description: "Set the player's volume".to_string(),
            category: "media".to_string(),
            args: vec![
                CommandArg {
                    name: "percent".to_string(),
                    description: "Volume from 0 to 100".to_string(),
                    required: true,
                    value_type: ArgType::Number,
                },
                player_arg(),
            ],
            examples: vec![
                "mpris-sync media volume 40".to_string(),
                "mpris-sync media volume 75 spotify".to_string(),
            ],
        }
    }
}
