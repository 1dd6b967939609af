use async_trait::async_trait;

use crate::services::mpris::{PlayerId, Volume};

/// Volume read and write.
///
/// Range validation happens when the `Volume` is built, so nothing here
/// can be called with an out-of-range value.
#[async_trait]
pub trait VolumeControl: Send + Sync {
    /// Current volume
    async fn volume(&self, player: Option<&PlayerId>) -> Option<Volume>;

    /// Set the volume
    async fn set_volume(&self, player: Option<&PlayerId>, volume: Volume) -> bool;
}
