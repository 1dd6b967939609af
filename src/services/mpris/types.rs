use std::fmt;

use serde::Serialize;

use super::MediaError;

/// Unique identifier for a media player, as listed in the roster.
///
/// Roster identifiers may be instance-qualified (`firefox.instance7723`)
/// while metadata payloads report only the base name (`firefox`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a PlayerId from a roster entry
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the identifier as passed to `--player=`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Current playback state of a media player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlaybackState {
    /// Player is currently playing
    Playing,

    /// Player is paused
    Paused,

    /// Player is stopped
    Stopped,

    /// Status was missing or not recognised
    #[default]
    Unknown,
}

impl From<&str> for PlaybackState {
    fn from(status: &str) -> Self {
        match status.trim() {
            "Playing" => Self::Playing,
            "Paused" => Self::Paused,
            "Stopped" => Self::Stopped,
            _ => Self::Unknown,
        }
    }
}

/// Loop mode for track or playlist repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LoopMode {
    /// No looping
    None,

    /// Loop current track
    Track,

    /// Loop entire playlist
    Playlist,

    /// Loop status was missing or not recognised
    #[default]
    Unknown,
}

impl LoopMode {
    /// Next mode in the fixed cycle None → Track → Playlist → None.
    ///
    /// An unknown mode is treated as `None`.
    pub fn cycle(self) -> Self {
        match self {
            Self::None | Self::Unknown => Self::Track,
            Self::Track => Self::Playlist,
            Self::Playlist => Self::None,
        }
    }

    /// Argument form understood by the control program, if settable
    pub fn as_arg(self) -> Option<&'static str> {
        match self {
            Self::None => Some("None"),
            Self::Track => Some("Track"),
            Self::Playlist => Some("Playlist"),
            Self::Unknown => None,
        }
    }
}

impl From<&str> for LoopMode {
    fn from(status: &str) -> Self {
        match status.trim() {
            "None" => Self::None,
            "Track" => Self::Track,
            "Playlist" => Self::Playlist,
            _ => Self::Unknown,
        }
    }
}

/// Shuffle mode for randomizing playback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ShuffleMode {
    /// Shuffle enabled
    On,

    /// Shuffle disabled
    Off,

    /// Shuffle status was missing or not recognised
    #[default]
    Unknown,
}

impl ShuffleMode {
    /// Opposite mode; unknown toggles to `On`
    pub fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off | Self::Unknown => Self::On,
        }
    }

    /// Argument form understood by the control program, if settable
    pub fn as_arg(self) -> Option<&'static str> {
        match self {
            Self::On => Some("On"),
            Self::Off => Some("Off"),
            Self::Unknown => None,
        }
    }
}

impl From<&str> for ShuffleMode {
    fn from(status: &str) -> Self {
        match status.trim() {
            "On" | "true" => Self::On,
            "Off" | "false" => Self::Off,
            _ => Self::Unknown,
        }
    }
}

/// Player volume as an integer percentage.
///
/// The control program speaks decimals in `0.0..=1.0`; the translation
/// happens here so the rest of the crate only sees `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Volume(u8);

impl Volume {
    /// Maximum percentage
    pub const MAX: u8 = 100;

    /// Validate a caller-supplied percentage.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidVolume` when `percent` is outside 0-100.
    pub fn try_from_percent(percent: i64) -> Result<Self, MediaError> {
        u8::try_from(percent)
            .ok()
            .filter(|p| *p <= Self::MAX)
            .map(Self)
            .ok_or(MediaError::InvalidVolume(percent))
    }

    /// Convert a decimal reported by the control program, clamping to range
    pub fn from_decimal(decimal: f64) -> Self {
        if !decimal.is_finite() {
            return Self(0);
        }
        let percent = (decimal * 100.0).round().clamp(0.0, f64::from(Self::MAX));
        Self(percent as u8)
    }

    /// Volume as a percentage
    pub fn percent(self) -> u8 {
        self.0
    }

    /// Volume as the decimal the control program expects
    pub fn to_decimal(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Metadata for one player's current track or session.
///
/// Position and length are microseconds. `position <= length` is not
/// guaranteed; players report transiently inconsistent values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaDescriptor {
    /// Track title
    pub title: String,

    /// Track artist(s)
    pub artist: String,

    /// Album name
    pub album: String,

    /// Playback status at the time of the report
    pub status: PlaybackState,

    /// Player name as reported in the payload (often the base name)
    pub player: String,

    /// Playback position in microseconds
    pub position: Option<u64>,

    /// Track length in microseconds
    pub length: Option<u64>,

    /// Artwork locator, remote or locally served
    pub art_url: Option<String>,
}

impl Default for MediaDescriptor {
    fn default() -> Self {
        Self {
            title: MediaDescriptor::UNKNOWN.to_string(),
            artist: MediaDescriptor::UNKNOWN.to_string(),
            album: MediaDescriptor::UNKNOWN.to_string(),
            status: PlaybackState::Unknown,
            player: String::new(),
            position: None,
            length: None,
            art_url: None,
        }
    }
}

impl MediaDescriptor {
    /// Placeholder for missing text fields
    pub const UNKNOWN: &'static str = "Unknown";

    /// Compare everything except `position`, which moves on every tick.
    pub fn same_content(&self, other: &Self) -> bool {
        self.title == other.title
            && self.artist == other.artist
            && self.album == other.album
            && self.status == other.status
            && self.player == other.player
            && self.length == other.length
            && self.art_url == other.art_url
    }
}
