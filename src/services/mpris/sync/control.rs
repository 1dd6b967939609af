use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::SyncEngine;
use crate::services::mpris::{LoopMode, MediaError, PlaybackState, PlayerId, ShuffleMode, Volume};

impl SyncEngine {
    fn selected_for(&self, verb: &str) -> Option<PlayerId> {
        let selected = self.snapshot().selected_player;
        if selected.is_none() {
            debug!(verb, "No player selected");
        }
        selected
    }

    /// Start playback on the selected player, pausing every other one first.
    #[instrument(parent = &self.inner.span, skip_all)]
    pub async fn play(&self) -> bool {
        let Some(player) = self.selected_for("play") else {
            return false;
        };
        self.pause_other_players(&player).await;
        self.inner.backend.play(Some(&player)).await
    }

    /// Pause the selected player
    #[instrument(parent = &self.inner.span, skip_all)]
    pub async fn pause(&self) -> bool {
        let Some(player) = self.selected_for("pause") else {
            return false;
        };
        self.inner.backend.pause(Some(&player)).await
    }

    /// Stop the selected player
    #[instrument(parent = &self.inner.span, skip_all)]
    pub async fn stop(&self) -> bool {
        let Some(player) = self.selected_for("stop") else {
            return false;
        };
        self.inner.backend.stop(Some(&player)).await
    }

    /// Toggle the selected player.
    ///
    /// Other players are paused only when the toggle is about to start
    /// playback.
    #[instrument(parent = &self.inner.span, skip_all)]
    pub async fn play_pause(&self) -> bool {
        let Some(player) = self.selected_for("play-pause") else {
            return false;
        };

        let status = self.inner.backend.status(Some(&player)).await;
        if status != Some(PlaybackState::Playing) {
            self.pause_other_players(&player).await;
        }
        self.inner.backend.play_pause(Some(&player)).await
    }

    /// Skip to the next track on the selected player
    #[instrument(parent = &self.inner.span, skip_all)]
    pub async fn next(&self) -> bool {
        let Some(player) = self.selected_for("next") else {
            return false;
        };
        self.pause_other_players(&player).await;
        self.inner.backend.next(Some(&player)).await
    }

    /// Go to the previous track on the selected player
    #[instrument(parent = &self.inner.span, skip_all)]
    pub async fn previous(&self) -> bool {
        let Some(player) = self.selected_for("previous") else {
            return false;
        };
        self.pause_other_players(&player).await;
        self.inner.backend.previous(Some(&player)).await
    }

    /// Set the selected player's volume from a percentage.
    ///
    /// Values outside 0..=100 are rejected before anything is sent to the
    /// player.
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn set_volume(&self, percent: i64) -> Result<bool, MediaError> {
        let volume = Volume::try_from_percent(percent)?;
        let Some(player) = self.selected_for("volume") else {
            return Ok(false);
        };

        let applied = self.inner.backend.set_volume(Some(&player), volume).await;
        if applied {
            self.update(|state| state.clone().with_volume(volume));
        }
        Ok(applied)
    }

    /// Flip shuffle on the selected player
    #[instrument(parent = &self.inner.span, skip_all)]
    pub async fn toggle_shuffle(&self) -> bool {
        let Some(player) = self.selected_for("shuffle") else {
            return false;
        };

        let current = match self.inner.backend.shuffle(Some(&player)).await {
            Some(mode) => mode,
            None => self.snapshot().shuffle,
        };
        self.apply_shuffle(&player, current.toggled()).await
    }

    /// Set shuffle on the selected player
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn set_shuffle(&self, mode: ShuffleMode) -> bool {
        let Some(player) = self.selected_for("shuffle") else {
            return false;
        };
        self.apply_shuffle(&player, mode).await
    }

    /// Advance the loop mode: none, track, playlist, none.
    #[instrument(parent = &self.inner.span, skip_all)]
    pub async fn cycle_loop(&self) -> bool {
        let Some(player) = self.selected_for("loop") else {
            return false;
        };

        let current = match self.inner.backend.loop_mode(Some(&player)).await {
            Some(mode) => mode,
            None => self.snapshot().loop_mode,
        };
        self.apply_loop(&player, current.cycle()).await
    }

    /// Set the loop mode on the selected player
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn set_loop(&self, mode: LoopMode) -> bool {
        let Some(player) = self.selected_for("loop") else {
            return false;
        };
        self.apply_loop(&player, mode).await
    }

    /// Jump to an absolute position in the current track
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn seek_to(&self, position: Duration) -> bool {
        let Some(player) = self.selected_for("seek") else {
            return false;
        };
        self.inner.backend.set_position(Some(&player), position).await
    }

    /// Move by `offset_secs`, negative values seek backwards
    #[instrument(parent = &self.inner.span, skip(self))]
    pub async fn seek_by(&self, offset_secs: f64) -> bool {
        let Some(player) = self.selected_for("seek") else {
            return false;
        };
        self.inner.backend.seek_by(Some(&player), offset_secs).await
    }

    async fn apply_shuffle(&self, player: &PlayerId, mode: ShuffleMode) -> bool {
        let applied = self.inner.backend.set_shuffle(Some(player), mode).await;
        if applied {
            self.update(|state| state.clone().with_shuffle(mode));
        }
        applied
    }

    async fn apply_loop(&self, player: &PlayerId, mode: LoopMode) -> bool {
        let applied = self.inner.backend.set_loop(Some(player), mode).await;
        if applied {
            self.update(|state| state.clone().with_loop_mode(mode));
        }
        applied
    }

    /// Pause every other listed player that reports `Playing`, one after
    /// another. Status and pause failures are skipped.
    async fn pause_other_players(&self, target: &PlayerId) {
        let Some(players) = self.inner.backend.list_players().await else {
            warn!("Could not list players to pause");
            return;
        };

        for player in players.iter().filter(|player| *player != target) {
            let status = self.inner.backend.status(Some(player)).await;
            if status != Some(PlaybackState::Playing) {
                continue;
            }
            if !self.inner.backend.pause(Some(player)).await {
                debug!(%player, "Pause of other player failed");
            }
        }
    }
}
