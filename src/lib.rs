//! mpris-sync - a supervised bridge to the `playerctl` control program.
//!
//! Keeps a single, de-duplicated view of what the system's media players
//! are doing and offers control verbs on the selected player:
//!
//! - Restart-supervised metadata stream with change gating
//! - Roster liveness polling with automatic reconnection
//! - Local HTTP serving of `file://` artwork
//! - CLI for watching state and controlling players
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mpris_sync::config::Config;
//!
//! # async fn run() -> mpris_sync::Result<()> {
//! let config = Config::load_default()?;
//! let engine = config.media.build_engine()?;
//!
//! engine.initialize().await;
//! println!("{:?}", engine.snapshot().current_media);
//! engine.dispose();
//! # Ok(())
//! # }
//! ```

/// Configuration schema, paths and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface.
pub mod cli;

/// Media services.
pub mod services;

/// Tracing subscriber setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{AppError, Result};
