use async_trait::async_trait;

use crate::{
    cli::{CliError, Command, CommandMetadata, CommandResult, EngineFactory},
    services::mpris::SyncEngine,
};

use super::utils::{player_arg, resolve_player, start_engine};

/// Playback verbs without arguments of their own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Start playback, pausing other players
    Play,
    /// Pause playback
    Pause,
    /// Toggle between playing and paused
    PlayPause,
    /// Stop playback
    Stop,
    /// Skip to the next track
    Next,
    /// Go back to the previous track
    Previous,
}

impl Transport {
    /// Every verb, in help order
    pub const ALL: [Transport; 6] = [
        Transport::Play,
        Transport::Pause,
        Transport::PlayPause,
        Transport::Stop,
        Transport::Next,
        Transport::Previous,
    ];

    /// Command name
    pub fn name(self) -> &'static str {
        match self {
            Transport::Play => "play",
            Transport::Pause => "pause",
            Transport::PlayPause => "play-pause",
            Transport::Stop => "stop",
            Transport::Next => "next",
            Transport::Previous => "previous",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Transport::Play => "Start playback, pausing every other player",
            Transport::Pause => "Pause playback",
            Transport::PlayPause => "Toggle playback, pausing other players when starting",
            Transport::Stop => "Stop playback",
            Transport::Next => "Skip to the next track",
            Transport::Previous => "Go back to the previous track",
        }
    }

    async fn apply(self, engine: &SyncEngine) -> bool {
        match self {
            Transport::Play => engine.play().await,
            Transport::Pause => engine.pause().await,
            Transport::PlayPause => engine.play_pause().await,
            Transport::Stop => engine.stop().await,
            Transport::Next => engine.next().await,
            Transport::Previous => engine.previous().await,
        }
    }
}

/// Command sending one playback verb to a player
pub struct TransportCommand {
    action: Transport,
    engine: EngineFactory,
}

impl TransportCommand {
    /// Creates a command for `action`
    pub fn new(action: Transport, engine: EngineFactory) -> Self {
        Self { action, engine }
    }
}

#[async_trait]
impl Command for TransportCommand {
    /// Sends the verb to the given or selected player
    ///
    /// # Errors
    ///
    /// Returns CliError if there is no player or the player rejects the verb
    async fn execute(&self, args: &[String]) -> CommandResult {
        let engine = start_engine(&self.engine).await?;

        let result = match resolve_player(&engine, args.first()).await {
            Ok(player) => {
                if self.action.apply(&engine).await {
                    Ok(format!("Sent {} to {player}", self.action.name()))
                } else {
                    Err(CliError::media(format!(
                        "{} failed for {player}",
                        self.action.name()
                    )))
                }
            }
            Err(e) => Err(e),
        };

        engine.dispose();
        result
    }

    fn metadata(&self) -> CommandMetadata {
        let name = self.action.name();

        CommandMetadata {
            name: name.to_string(),
            description: self.action.description().to_string(),
            category: "media".to_string(),
            args: vec![player_arg()],
            examples: vec![
                format!("mpris-sync media {name}"),
                format!("mpris-sync media {name} spotify"),
            ],
        }
    }
}
