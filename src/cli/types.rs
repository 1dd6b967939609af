use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
///
/// Each variant carries enough context to tell the user what went wrong
/// without a backtrace.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Wrong number of arguments for a command.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A single argument could not be used.
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        arg: String,
        /// Why it was rejected
        reason: String,
    },

    /// The configuration could not be loaded, validated or rendered.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A backing service failed or refused the request.
    #[error("{service} error: {details}")]
    ServiceError {
        /// Service that failed
        service: String,
        /// What happened
        details: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CliError {
    /// Media service failure with the given details
    pub fn media(details: impl Into<String>) -> Self {
        CliError::ServiceError {
            service: "Media".to_string(),
            details: details.into(),
        }
    }
}

/// Type alias for command execution results.
///
/// Success carries the text to print; an empty string prints nothing.
pub type CommandResult = Result<String, CliError>;

/// Specification for a single command argument.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "percent", "player").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// The expected type of this argument for validation and help display.
    pub value_type: ArgType,
}

/// Type classification for command arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    /// A general string value.
    String,

    /// A numeric value (integer or float).
    Number,

    /// One of a fixed set of words.
    Choice(Vec<String>),

    /// A player reference: 1-based roster index or name prefix.
    Player,
}

impl ArgType {
    /// Short hint for help output
    pub fn hint(&self) -> String {
        match self {
            ArgType::String => "text".to_string(),
            ArgType::Number => "number".to_string(),
            ArgType::Choice(choices) => choices.join("|"),
            ArgType::Player => "index|name".to_string(),
        }
    }
}

/// Complete metadata for a CLI command.
///
/// Used for help generation, argument count validation, and command
/// discovery.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "play", "volume", "show").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Specification of all arguments this command accepts.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,

    /// Category this command belongs to (e.g., "media", "config").
    pub category: String,
}

/// Interface for all CLI commands.
///
/// Commands receive their dependencies through their constructors.
#[async_trait]
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// The registry has already checked the argument count against
    /// [`Command::metadata`]; the command validates the values.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for invalid argument values, configuration
    /// problems, or a failing media service.
    async fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}
