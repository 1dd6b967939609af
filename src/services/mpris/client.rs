use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{
    CommandOutput, CommandRunner, Installation, LoopMode, MediaDescriptor, MetadataQuery,
    PlaybackControl, PlaybackState, PlayerId, RosterQuery, ShuffleMode, Volume, VolumeControl,
    protocol,
};

/// Typed one-shot access to the control program.
///
/// Spawn failures and non-zero exits are logged and collapse to
/// `None`/`false`, so a single failed invocation never escalates.
#[derive(Clone)]
pub struct PlayerctlClient {
    runner: Arc<dyn CommandRunner>,
    binary: String,
    ignored_players: Vec<String>,
}

impl PlayerctlClient {
    /// Create a client over `runner`.
    ///
    /// Roster entries starting with any of `ignored_players` are hidden.
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        binary: impl Into<String>,
        ignored_players: Vec<String>,
    ) -> Self {
        Self {
            runner,
            binary: binary.into(),
            ignored_players,
        }
    }

    async fn run(&self, args: Vec<String>) -> Option<CommandOutput> {
        match self.runner.run_once(&args).await {
            Ok(output) => Some(output),
            Err(e) => {
                warn!(error = %e, "Control program invocation failed");
                None
            }
        }
    }

    async fn query(&self, args: Vec<String>) -> Option<String> {
        let output = self.run(args).await?;
        if output.success() {
            return Some(output.stdout);
        }

        debug!(
            exit_code = ?output.exit_code,
            stderr = %output.stderr.trim(),
            "Query returned non-zero exit"
        );
        None
    }

    async fn command(&self, args: Vec<String>) -> bool {
        let Some(output) = self.run(args).await else {
            return false;
        };
        if !output.success() {
            debug!(
                exit_code = ?output.exit_code,
                stderr = %output.stderr.trim(),
                "Command returned non-zero exit"
            );
        }
        output.success()
    }

    fn is_ignored(&self, player: &PlayerId) -> bool {
        self.ignored_players
            .iter()
            .any(|pattern| player.as_str().starts_with(pattern.as_str()))
    }
}

#[async_trait]
impl Installation for PlayerctlClient {
    async fn is_installed(&self) -> bool {
        self.runner.is_installed()
    }

    async fn version(&self) -> Option<String> {
        self.query(protocol::version())
            .await
            .map(|output| output.trim().to_string())
            .filter(|version| !version.is_empty())
    }

    fn binary(&self) -> &str {
        &self.binary
    }
}

#[async_trait]
impl RosterQuery for PlayerctlClient {
    async fn list_players(&self) -> Option<Vec<PlayerId>> {
        let output = self.run(protocol::list_players()).await?;

        if !output.success() {
            if protocol::is_no_players_message(&output.stderr) {
                return Some(Vec::new());
            }
            debug!(stderr = %output.stderr.trim(), "Roster listing failed");
            return None;
        }

        let players = protocol::parse_roster(&output.stdout)
            .into_iter()
            .filter(|player| !self.is_ignored(player))
            .collect();
        Some(players)
    }
}

#[async_trait]
impl MetadataQuery for PlayerctlClient {
    async fn metadata(&self, player: Option<&PlayerId>) -> Option<MediaDescriptor> {
        let output = self.query(protocol::metadata(player)).await?;
        let line = output.lines().find(|line| !line.trim().is_empty())?;

        match protocol::parse_metadata_line(line) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                debug!(error = %e, "Dropping unparseable metadata");
                None
            }
        }
    }

    async fn status(&self, player: Option<&PlayerId>) -> Option<PlaybackState> {
        self.query(protocol::command(player, "status", &[]))
            .await
            .map(|output| protocol::parse_status(&output))
    }

    async fn shuffle(&self, player: Option<&PlayerId>) -> Option<ShuffleMode> {
        self.query(protocol::command(player, "shuffle", &[]))
            .await
            .map(|output| protocol::parse_shuffle(&output))
    }

    async fn loop_mode(&self, player: Option<&PlayerId>) -> Option<LoopMode> {
        self.query(protocol::command(player, "loop", &[]))
            .await
            .map(|output| protocol::parse_loop(&output))
    }
}

#[async_trait]
impl PlaybackControl for PlayerctlClient {
    async fn play(&self, player: Option<&PlayerId>) -> bool {
        self.command(protocol::command(player, "play", &[])).await
    }

    async fn pause(&self, player: Option<&PlayerId>) -> bool {
        self.command(protocol::command(player, "pause", &[])).await
    }

    async fn stop(&self, player: Option<&PlayerId>) -> bool {
        self.command(protocol::command(player, "stop", &[])).await
    }

    async fn play_pause(&self, player: Option<&PlayerId>) -> bool {
        self.command(protocol::command(player, "play-pause", &[]))
            .await
    }

    async fn next(&self, player: Option<&PlayerId>) -> bool {
        self.command(protocol::command(player, "next", &[])).await
    }

    async fn previous(&self, player: Option<&PlayerId>) -> bool {
        self.command(protocol::command(player, "previous", &[]))
            .await
    }

    async fn set_shuffle(&self, player: Option<&PlayerId>, mode: ShuffleMode) -> bool {
        let Some(arg) = mode.as_arg() else {
            return false;
        };
        self.command(protocol::command(player, "shuffle", &[arg]))
            .await
    }

    async fn set_loop(&self, player: Option<&PlayerId>, mode: LoopMode) -> bool {
        let Some(arg) = mode.as_arg() else {
            return false;
        };
        self.command(protocol::command(player, "loop", &[arg])).await
    }

    async fn set_position(&self, player: Option<&PlayerId>, position: Duration) -> bool {
        self.command(protocol::set_position(player, position)).await
    }

    async fn seek_by(&self, player: Option<&PlayerId>, offset_secs: f64) -> bool {
        self.command(protocol::seek_by(player, offset_secs)).await
    }
}

#[async_trait]
impl VolumeControl for PlayerctlClient {
    async fn volume(&self, player: Option<&PlayerId>) -> Option<Volume> {
        self.query(protocol::command(player, "volume", &[]))
            .await
            .and_then(|output| protocol::parse_volume(&output))
    }

    async fn set_volume(&self, player: Option<&PlayerId>, volume: Volume) -> bool {
        self.command(protocol::set_volume(player, volume)).await
    }
}
