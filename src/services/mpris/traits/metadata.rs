use async_trait::async_trait;

use crate::services::mpris::{LoopMode, MediaDescriptor, PlaybackState, PlayerId, ShuffleMode};

/// One-shot reads of a player's track and settings.
///
/// `None` means the query failed or produced nothing usable.
#[async_trait]
pub trait MetadataQuery: Send + Sync {
    /// Current track metadata
    async fn metadata(&self, player: Option<&PlayerId>) -> Option<MediaDescriptor>;

    /// Current playback status
    async fn status(&self, player: Option<&PlayerId>) -> Option<PlaybackState>;

    /// Current shuffle mode
    async fn shuffle(&self, player: Option<&PlayerId>) -> Option<ShuffleMode>;

    /// Current loop mode
    async fn loop_mode(&self, player: Option<&PlayerId>) -> Option<LoopMode>;
}
