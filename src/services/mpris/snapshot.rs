use std::collections::BTreeMap;

use serde::Serialize;

use super::{LoopMode, MediaDescriptor, PlayerId, ShuffleMode, Volume};

/// Everything a consumer can display or act on, at one point in time.
///
/// Never mutated in place: every change builds a new value with the
/// `with_*` methods and publishes it whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    /// Available players, in the order reported
    pub players: Vec<PlayerId>,

    /// Player whose media is displayed and controlled
    pub selected_player: Option<PlayerId>,

    /// Media of the selected player
    pub current_media: Option<MediaDescriptor>,

    /// Whether the control program was found
    pub is_installed: bool,

    /// Set while initializing or switching players
    pub is_loading: bool,

    /// Last non-fatal condition, cleared by the next meaningful update
    pub error: Option<String>,

    /// Volume of the selected player
    pub volume: Volume,

    /// Shuffle mode of the selected player
    pub shuffle: ShuffleMode,

    /// Loop mode of the selected player
    pub loop_mode: LoopMode,

    /// Last known media for every player, keyed by roster identifier
    pub player_media: BTreeMap<PlayerId, MediaDescriptor>,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}

impl StateSnapshot {
    /// State before `initialize()` has run
    pub fn initial() -> Self {
        Self {
            players: Vec::new(),
            selected_player: None,
            current_media: None,
            is_installed: false,
            is_loading: true,
            error: None,
            volume: Volume::default(),
            shuffle: ShuffleMode::Unknown,
            loop_mode: LoopMode::Unknown,
            player_media: BTreeMap::new(),
        }
    }

    /// Selection as a plain string, empty when nothing is selected
    pub fn selected_str(&self) -> &str {
        self.selected_player
            .as_ref()
            .map(PlayerId::as_str)
            .unwrap_or_default()
    }

    /// Replace the roster, dropping cached media for players that left
    pub fn with_players(mut self, players: Vec<PlayerId>) -> Self {
        self.player_media.retain(|id, _| players.contains(id));
        self.players = players;
        self
    }

    /// Change the selection
    pub fn with_selection(mut self, player: Option<PlayerId>) -> Self {
        self.selected_player = player;
        self
    }

    /// Replace the displayed media
    pub fn with_media(mut self, media: Option<MediaDescriptor>) -> Self {
        self.current_media = media;
        self
    }

    /// Update the per-player cache
    pub fn with_cached_media(mut self, player: PlayerId, media: MediaDescriptor) -> Self {
        self.player_media.insert(player, media);
        self
    }

    /// Set the installation flag
    pub fn with_installed(mut self, installed: bool) -> Self {
        self.is_installed = installed;
        self
    }

    /// Set the loading flag
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.is_loading = loading;
        self
    }

    /// Set or clear the error message
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    /// Set the volume
    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volume = volume;
        self
    }

    /// Set the shuffle mode
    pub fn with_shuffle(mut self, shuffle: ShuffleMode) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set the loop mode
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }
}
