use super::PlayerId;

/// Errors that can occur while supervising or querying media players
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    /// The external control program is not on the search path
    #[error(
        "{binary} is not installed. Install it with your package manager (for example `apt install {binary}` or `pacman -S {binary}`) and restart"
    )]
    NotInstalled {
        /// Program that was probed
        binary: String,
    },

    /// No player is currently running
    #[error("No active media player")]
    NoActivePlayer,

    /// The external program could not be spawned
    #[error("Failed to run `{command}`: {reason}")]
    ExecutionFailure {
        /// Command line that was attempted
        command: String,
        /// Underlying spawn error
        reason: String,
    },

    /// A line from the external program could not be parsed
    #[error("Malformed output line ({fields} fields): {line:?}")]
    ParseFailure {
        /// Offending line
        line: String,
        /// Number of fields found
        fields: usize,
    },

    /// Volume outside of 0-100
    #[error("Invalid volume {0}: must be between 0 and 100")]
    InvalidVolume(i64),

    /// The metadata stream exceeded its restart budget
    #[error("Metadata stream stopped after {attempts} restart attempts")]
    StreamExhausted {
        /// Restarts performed before giving up
        attempts: u32,
    },

    /// Player with the given ID is not in the current roster
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    /// Artwork server could not start or serve a file
    #[error("Artwork server error: {0}")]
    ArtServer(String),
}
