use std::time::Duration;

use async_trait::async_trait;

use crate::{
    cli::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult, EngineFactory},
    services::mpris::SyncEngine,
};

use super::utils::{player_arg, resolve_player, start_engine};

/// Where a seek goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    /// Absolute position
    To(Duration),
    /// Relative offset in seconds, negative is backwards
    By(f64),
    /// Fraction of the track length, `0.0..=1.0`
    Fraction(f64),
}

/// Command to move within the current track
///
/// Accepts seconds, mm:ss, a percentage, or a signed relative offset.
pub struct SeekCommand {
    engine: EngineFactory,
}

fn invalid(reason: &str) -> CliError {
    CliError::InvalidArgument {
        arg: "position".to_string(),
        reason: reason.to_string(),
    }
}

impl SeekCommand {
    /// Creates a new SeekCommand
    pub fn new(engine: EngineFactory) -> Self {
        Self { engine }
    }

    /// Parse a position argument.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` for anything that is not one of
    /// the accepted forms.
    pub fn parse_position(position: &str) -> Result<SeekTarget, CliError> {
        if let Some(percentage) = position.strip_suffix('%') {
            let percentage = percentage
                .parse::<f64>()
                .map_err(|_| invalid("Invalid percentage format"))?;

            if !(0.0..=100.0).contains(&percentage) {
                return Err(invalid("Percentage must be between 0 and 100"));
            }
            return Ok(SeekTarget::Fraction(percentage / 100.0));
        }

        if position.starts_with('+') || position.starts_with('-') {
            let offset = position
                .parse::<f64>()
                .ok()
                .filter(|offset| offset.is_finite())
                .ok_or_else(|| invalid("Invalid relative seek format"))?;
            return Ok(SeekTarget::By(offset));
        }

        if let Some((minutes, seconds)) = position.split_once(':') {
            let minutes = minutes
                .parse::<u64>()
                .map_err(|_| invalid("Invalid minutes value"))?;
            let seconds = seconds
                .parse::<u64>()
                .map_err(|_| invalid("Invalid seconds value"))?;

            if seconds >= 60 {
                return Err(invalid("Seconds must be less than 60"));
            }
            return Ok(SeekTarget::To(Duration::from_secs(minutes * 60 + seconds)));
        }

        position
            .parse::<f64>()
            .ok()
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
            .map(|seconds| SeekTarget::To(Duration::from_secs_f64(seconds)))
            .ok_or_else(|| {
                invalid(
                    "Invalid position format. Use seconds, mm:ss, percentage (50%), or relative (+10, -10)",
                )
            })
    }

    async fn seek(engine: &SyncEngine, target: SeekTarget) -> Result<bool, CliError> {
        match target {
            SeekTarget::To(position) => Ok(engine.seek_to(position).await),
            SeekTarget::By(offset) => Ok(engine.seek_by(offset).await),
            SeekTarget::Fraction(fraction) => {
                let length = engine
                    .snapshot()
                    .current_media
                    .and_then(|media| media.length)
                    .ok_or_else(|| invalid("Cannot use percentage - track length unknown"))?;

                let position = Duration::from_micros(length).mul_f64(fraction);
                Ok(engine.seek_to(position).await)
            }
        }
    }
}

#[async_trait]
impl Command for SeekCommand {
    /// Seeks the given or selected player
    ///
    /// # Errors
    ///
    /// Returns CliError for a malformed position, a missing player, or a
    /// rejected seek
    async fn execute(&self, args: &[String]) -> CommandResult {
        let position = args
            .first()
            .ok_or_else(|| CliError::InvalidArguments("Missing position".to_string()))?;
        let target = Self::parse_position(position)?;

        let engine = start_engine(&self.engine).await?;

        let result = match resolve_player(&engine, args.get(1)).await {
            Ok(player) => match Self::seek(&engine, target).await {
                Ok(true) => Ok(format!("Seeked {player} to {position}")),
                Ok(false) => Err(CliError::media(format!("Seek failed for {player}"))),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        engine.dispose();
        result
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "seek".to_string(),
            description: "Seek to a position in the current track".to_string(),
            category: "media".to_string(),
            args: vec![
                CommandArg {
                    name: "position".to_string(),
                    description: "Seconds (90), mm:ss (1:30), percentage (50%), or relative (+10, -10)".to_string(),
                    required: true,
                    value_type: ArgType::String,
                },
                player_arg(),
            ],
            examples: vec![
                "mpris-sync media seek 1:30".to_string(),
                "mpris-sync media seek 50%".to_string(),
                "mpris-sync media seek +10".to_string(),
                "mpris-sync media seek -5 spotify".to_string(),
            ],
        }
    }
}
