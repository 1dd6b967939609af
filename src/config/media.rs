use std::{net::SocketAddr, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    core::{AppError, Result},
    services::mpris::{EngineSettings, StreamSettings, SyncEngine},
};

const COMPONENT: &str = "media";

/// Media bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MediaConfig {
    /// Name or path of the player control program
    pub binary: String,

    /// Players whose identifier starts with any of these prefixes are
    /// left out of the roster
    pub ignored_players: Vec<String>,

    /// How often the roster is re-listed, in milliseconds
    pub roster_interval_ms: u64,

    /// How often the selected player's volume is polled, in milliseconds
    pub volume_interval_ms: u64,

    /// How often the selected player's metadata is polled, in milliseconds
    pub metadata_interval_ms: u64,

    /// Wait before respawning an exited metadata stream, in milliseconds
    pub restart_delay_ms: u64,

    /// Consecutive respawns allowed before the metadata stream gives up
    pub max_restart_attempts: u32,

    /// Pause between tearing down and rebuilding a player's tasks, in milliseconds
    pub settle_delay_ms: u64,

    /// Bind address of the local artwork server
    pub art_server: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary: "playerctl".to_string(),
            ignored_players: Vec::new(),
            roster_interval_ms: 5000,
            volume_interval_ms: 2000,
            metadata_interval_ms: 3000,
            restart_delay_ms: 2000,
            max_restart_attempts: 5,
            settle_delay_ms: 100,
            art_server: "127.0.0.1:0".to_string(),
        }
    }
}

impl MediaConfig {
    /// Check the values a running engine depends on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigValidation` for a zero interval, and
    /// `AppError::InvalidConfigField` for an empty binary or an
    /// unparseable artwork server address.
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("roster_interval_ms", self.roster_interval_ms),
            ("volume_interval_ms", self.volume_interval_ms),
            ("metadata_interval_ms", self.metadata_interval_ms),
            ("restart_delay_ms", self.restart_delay_ms),
        ];

        if let Some((field, _)) = intervals.iter().find(|(_, value)| *value == 0) {
            return Err(AppError::ConfigValidation {
                component: COMPONENT.to_string(),
                details: format!("{field} must be greater than zero"),
            });
        }

        if self.binary.trim().is_empty() {
            return Err(AppError::invalid_field(
                COMPONENT,
                "binary",
                "must name a program",
            ));
        }

        self.art_server_addr()?;
        Ok(())
    }

    /// Parsed artwork server bind address
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidConfigField` if `art_server` is not a
    /// socket address.
    pub fn art_server_addr(&self) -> Result<SocketAddr> {
        self.art_server.parse().map_err(|e| {
            AppError::invalid_field(COMPONENT, "art_server", format!("{e}: {}", self.art_server))
        })
    }

    /// Timer cadences for the sync engine
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            roster_interval: Duration::from_millis(self.roster_interval_ms),
            volume_interval: Duration::from_millis(self.volume_interval_ms),
            metadata_interval: Duration::from_millis(self.metadata_interval_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            stream: StreamSettings {
                max_restart_attempts: self.max_restart_attempts,
                restart_delay: Duration::from_millis(self.restart_delay_ms),
            },
        }
    }

    /// Engine over the configured control program.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn build_engine(&self) -> Result<SyncEngine> {
        self.validate()?;

        Ok(SyncEngine::with_playerctl(
            &self.binary,
            self.ignored_players.clone(),
            self.art_server_addr()?,
            self.engine_settings(),
        ))
    }
}
