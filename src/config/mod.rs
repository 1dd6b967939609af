//! Configuration schema, paths and loading.
//!
//! Everything is serializable to and from TOML and has a sensible default,
//! so an empty or missing file is a valid configuration.

mod general;
mod loading;
mod media;
mod paths;

pub use general::{GeneralConfig, LogLevel};
pub use media::MediaConfig;
pub use paths::ConfigPaths;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Media bridge settings.
    #[serde(default)]
    pub media: MediaConfig,
}

#[cfg(test)]
mod tests;
