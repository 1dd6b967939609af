use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logging verbosity.
///
/// Only consulted when `RUST_LOG` is not set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Failures only, such as a stream giving up after its restart budget.
    Error,

    /// Also recoverable problems: failed polls, stream restarts, missing program.
    Warn,

    /// Also lifecycle events like player selection and reconnects (default level).
    #[default]
    Info,

    /// Also every skipped refresh and rejected control verb.
    Debug,

    /// Everything, including span entry and exit.
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}
