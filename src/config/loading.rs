use std::{fs, io::ErrorKind, path::Path};

use tracing::{debug, info};

use super::{Config, ConfigPaths};
use crate::core::{AppError, Result};

impl Config {
    /// Loads and validates the configuration file at `path`.
    ///
    /// A missing file is not an error: the defaults are returned instead.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The TOML content is invalid or has fields of the wrong type
    /// - A value fails validation
    pub fn load(path: &Path) -> Result<Config> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(AppError::io_at(e, path)),
        };

        let config: Config =
            toml::from_str(&content).map_err(|e| AppError::toml_parse(e, Some(path)))?;
        config.validate()?;

        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Loads the configuration from its XDG location.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be resolved or the file is
    /// invalid.
    pub fn load_default() -> Result<Config> {
        let path = ConfigPaths::main_config()?;
        Self::load(&path)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a value fails validation.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).map_err(|e| AppError::toml_parse(e, None))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigValidation` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::ConfigValidation {
            component: "config serialization".to_string(),
            details: e.to_string(),
        })
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns the first section's validation failure.
    pub fn validate(&self) -> Result<()> {
        self.media.validate()
    }
}
