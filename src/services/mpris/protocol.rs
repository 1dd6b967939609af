//! Argument vectors for the control program and parsers for its output.
//!
//! One-shot form: `<binary> [--player=<id>] <verb> [args...]`.
//! Streaming form adds `--follow` to a `metadata --format` query.

use std::time::Duration;

use super::{LoopMode, MediaDescriptor, MediaError, PlaybackState, PlayerId, ShuffleMode, Volume};

/// Separator between fields in a formatted metadata line.
///
/// Titles routinely contain `|`, so a single character is not enough.
pub const FIELD_DELIMITER: &str = ";;;";

/// Fewest fields a metadata line may have (up to and including player name)
pub const MIN_FIELDS: usize = 5;

/// Substring the control program prints when nothing is running
pub const NO_PLAYERS_MARKER: &str = "no players found";

const METADATA_FIELDS: [&str; 8] = [
    "{{title}}",
    "{{artist}}",
    "{{album}}",
    "{{status}}",
    "{{playerName}}",
    "{{position}}",
    "{{mpris:length}}",
    "{{mpris:artUrl}}",
];

/// Template passed to `--format`
pub fn metadata_format() -> String {
    METADATA_FIELDS.join(FIELD_DELIMITER)
}

/// One-shot invocation `[--player=<id>] <verb> [args...]`
pub fn command(player: Option<&PlayerId>, verb: &str, args: &[&str]) -> Vec<String> {
    let mut argv = Vec::with_capacity(args.len() + 2);
    if let Some(player) = player {
        argv.push(format!("--player={player}"));
    }
    argv.push(verb.to_string());
    argv.extend(args.iter().map(|arg| arg.to_string()));
    argv
}

/// Roster listing
pub fn list_players() -> Vec<String> {
    vec!["--list-all".to_string()]
}

/// Version probe
pub fn version() -> Vec<String> {
    vec!["--version".to_string()]
}

/// One-shot formatted metadata query
pub fn metadata(player: Option<&PlayerId>) -> Vec<String> {
    command(player, "metadata", &["--format", &metadata_format()])
}

/// Long-running formatted metadata stream
pub fn follow_metadata(player: Option<&PlayerId>) -> Vec<String> {
    let mut argv = metadata(player);
    argv.push("--follow".to_string());
    argv
}

/// Volume as a decimal; `{:?}` keeps the fractional part (`0.0`, `1.0`)
pub fn set_volume(player: Option<&PlayerId>, volume: Volume) -> Vec<String> {
    let decimal = format!("{:?}", volume.to_decimal());
    command(player, "volume", &[&decimal])
}

/// Absolute position in seconds
pub fn set_position(player: Option<&PlayerId>, position: Duration) -> Vec<String> {
    let seconds = format!("{:?}", position.as_secs_f64());
    command(player, "position", &[&seconds])
}

/// Relative position change in seconds, always signed (`+5`, `-2.5`)
pub fn seek_by(player: Option<&PlayerId>, offset_secs: f64) -> Vec<String> {
    let offset = format!("{offset_secs:+}");
    command(player, "position", &[&offset])
}

/// Parse one formatted metadata line.
///
/// Fields are title, artist, album, status, player name, position,
/// length and art URL; everything after the player name may be absent.
///
/// # Errors
///
/// Returns `MediaError::ParseFailure` when fewer than five fields are present.
pub fn parse_metadata_line(line: &str) -> Result<MediaDescriptor, MediaError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

    if fields.len() < MIN_FIELDS {
        return Err(MediaError::ParseFailure {
            line: line.to_string(),
            fields: fields.len(),
        });
    }

    let text = |index: usize| {
        fields
            .get(index)
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
            .unwrap_or(MediaDescriptor::UNKNOWN)
            .to_string()
    };
    let micros = |index: usize| fields.get(index).and_then(|field| parse_micros(field));

    Ok(MediaDescriptor {
        title: text(0),
        artist: text(1),
        album: text(2),
        status: PlaybackState::from(fields[3]),
        player: fields[4].trim().to_string(),
        position: micros(5),
        length: micros(6),
        art_url: fields
            .get(7)
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
            .map(str::to_string),
    })
}

fn parse_micros(field: &str) -> Option<u64> {
    let field = field.trim();
    field
        .parse::<u64>()
        .ok()
        .or_else(|| field.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u64))
}

/// Newline-separated roster, order preserved, blanks skipped
pub fn parse_roster(output: &str) -> Vec<PlayerId> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PlayerId::from)
        .collect()
}

/// Decimal volume output (`0.650000`)
pub fn parse_volume(output: &str) -> Option<Volume> {
    output.trim().parse::<f64>().ok().map(Volume::from_decimal)
}

/// Status output (`Playing`)
pub fn parse_status(output: &str) -> PlaybackState {
    PlaybackState::from(output)
}

/// Shuffle output (`On` / `Off`)
pub fn parse_shuffle(output: &str) -> ShuffleMode {
    ShuffleMode::from(output)
}

/// Loop output (`None` / `Track` / `Playlist`)
pub fn parse_loop(output: &str) -> LoopMode {
    LoopMode::from(output)
}

/// Whether a stderr line means "nothing is running" rather than a failure
pub fn is_no_players_message(line: &str) -> bool {
    line.to_ascii_lowercase().contains(NO_PLAYERS_MARKER)
}
