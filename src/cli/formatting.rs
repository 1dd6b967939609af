//! Formatting utilities for CLI output.
//!
//! Styled help text plus plain renderings of the media state.

use std::fmt::Write;

use super::CliError;
use crate::services::mpris::{LoopMode, PlaybackState, ShuffleMode, StateSnapshot};

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow color
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Blue color
    pub const BLUE: &'static str = "\x1b[34m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, text, Colors::RESET)
}

/// Formats subheaders with styling
pub fn format_subheader(text: &str) -> String {
    format!(
        "{}{}{}{}",
        Colors::BOLD,
        Colors::YELLOW,
        text,
        Colors::RESET
    )
}

/// Formats command names with styling
pub fn format_command(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::GREEN, text, Colors::RESET)
}

/// Formats category names with styling
pub fn format_category(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::BLUE, text, Colors::RESET)
}

/// Formats descriptions with muted styling
pub fn format_description(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats usage examples with styling
pub fn format_usage(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Playback state with its symbol
pub fn format_playback(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "▶ Playing",
        PlaybackState::Paused => "⏸ Paused",
        PlaybackState::Stopped => "⏹ Stopped",
        PlaybackState::Unknown => "? Unknown",
    }
}

/// Shuffle mode as shown to users
pub fn format_shuffle(mode: ShuffleMode) -> &'static str {
    match mode {
        ShuffleMode::On => "on",
        ShuffleMode::Off => "off",
        ShuffleMode::Unknown => "unknown",
    }
}

/// Loop mode as shown to users
pub fn format_loop(mode: LoopMode) -> &'static str {
    match mode {
        LoopMode::None => "none",
        LoopMode::Track => "track",
        LoopMode::Playlist => "playlist",
        LoopMode::Unknown => "unknown",
    }
}

/// Microseconds as `m:ss`, or `h:mm:ss` past an hour
pub fn format_micros(micros: u64) -> String {
    let total = micros / 1_000_000;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Human-readable rendering of a snapshot
pub fn format_status(snapshot: &StateSnapshot) -> String {
    let mut output = String::new();

    let Some(player) = &snapshot.selected_player else {
        output.push_str("No player selected");
        if let Some(error) = &snapshot.error {
            let _ = write!(output, "\n{error}");
        }
        return output;
    };

    let _ = writeln!(output, "Player:   {player}");

    match &snapshot.current_media {
        Some(media) => {
            let _ = writeln!(output, "Status:   {}", format_playback(media.status));
            let _ = writeln!(output, "Title:    {}", media.title);
            let _ = writeln!(output, "Artist:   {}", media.artist);
            let _ = writeln!(output, "Album:    {}", media.album);

            let position = media.position.map(format_micros);
            let length = media.length.map(format_micros);
            match (position, length) {
                (Some(position), Some(length)) => {
                    let _ = writeln!(output, "Position: {position} / {length}");
                }
                (None, Some(length)) => {
                    let _ = writeln!(output, "Length:   {length}");
                }
                (Some(position), None) => {
                    let _ = writeln!(output, "Position: {position}");
                }
                (None, None) => {}
            }

            if let Some(art_url) = &media.art_url {
                let _ = writeln!(output, "Art:      {art_url}");
            }
        }
        None => output.push_str("Nothing playing\n"),
    }

    let _ = writeln!(output, "Volume:   {}%", snapshot.volume.percent());
    let _ = writeln!(output, "Shuffle:  {}", format_shuffle(snapshot.shuffle));
    let _ = write!(output, "Loop:     {}", format_loop(snapshot.loop_mode));

    if let Some(error) = &snapshot.error {
        let _ = write!(output, "\nError:    {error}");
    }

    output
}

/// One numbered line per roster entry, marking the selection
pub fn format_player_list(snapshot: &StateSnapshot) -> String {
    if snapshot.players.is_empty() {
        return "No media players found".to_string();
    }

    let mut output = format!("Found {} media player(s):\n\n", snapshot.players.len());

    for (index, player) in snapshot.players.iter().enumerate() {
        let marker = if snapshot.selected_player.as_ref() == Some(player) {
            " (selected)"
        } else {
            ""
        };

        let track = snapshot
            .player_media
            .get(player)
            .filter(|media| !media.title.is_empty())
            .map(|media| {
                format!(
                    "{:>12} - {} by {}",
                    format_playback(media.status),
                    media.title,
                    media.artist
                )
            })
            .unwrap_or_default();

        let _ = writeln!(output, "{:2}. {player:<30}{track}{marker}", index + 1);
    }

    output.push_str("\nUse player number or name prefix with other commands.");
    output
}

/// Snapshot as a single JSON line.
///
/// # Errors
///
/// Returns `CliError::ServiceError` if serialization fails.
pub fn snapshot_json_line(snapshot: &StateSnapshot) -> Result<String, CliError> {
    serde_json::to_string(snapshot).map_err(|e| CliError::media(e.to_string()))
}
