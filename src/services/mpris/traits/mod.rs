/// Track and player-setting queries
pub mod metadata;
/// Playback verbs
pub mod playback;
/// Installation probe and roster listing
pub mod player;
/// Volume verbs
pub mod volume;

pub use metadata::*;
pub use playback::*;
pub use player::*;
pub use volume::*;

/// Everything the sync engine needs from the control program.
///
/// Blanket-implemented, so any type providing the narrow traits qualifies.
pub trait MediaBackend:
    Installation + RosterQuery + MetadataQuery + PlaybackControl + VolumeControl
{
}

impl<T> MediaBackend for T where
    T: Installation + RosterQuery + MetadataQuery + PlaybackControl + VolumeControl
{
}
