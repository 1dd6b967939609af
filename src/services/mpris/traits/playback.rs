use std::time::Duration;

use async_trait::async_trait;

use crate::services::mpris::{LoopMode, PlayerId, ShuffleMode};

/// Playback verbs. Each returns whether the command succeeded.
#[async_trait]
pub trait PlaybackControl: Send + Sync {
    /// Start playback
    async fn play(&self, player: Option<&PlayerId>) -> bool;

    /// Pause playback
    async fn pause(&self, player: Option<&PlayerId>) -> bool;

    /// Stop playback
    async fn stop(&self, player: Option<&PlayerId>) -> bool;

    /// Toggle between playing and paused
    async fn play_pause(&self, player: Option<&PlayerId>) -> bool;

    /// Skip to the next track
    async fn next(&self, player: Option<&PlayerId>) -> bool;

    /// Go to the previous track
    async fn previous(&self, player: Option<&PlayerId>) -> bool;

    /// Set shuffle; `ShuffleMode::Unknown` is rejected
    async fn set_shuffle(&self, player: Option<&PlayerId>, mode: ShuffleMode) -> bool;

    /// Set loop mode; `LoopMode::Unknown` is rejected
    async fn set_loop(&self, player: Option<&PlayerId>, mode: LoopMode) -> bool;

    /// Jump to an absolute position
    async fn set_position(&self, player: Option<&PlayerId>, position: Duration) -> bool;

    /// Move relative to the current position
    async fn seek_by(&self, player: Option<&PlayerId>, offset_secs: f64) -> bool;
}
