use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

use crate::services::mpris::MediaError;

/// Error types for the application layer.
///
/// Covers configuration loading and validation, file I/O, and media errors
/// that escape to the command line.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration validation error
    #[error("configuration validation failed for '{component}': {details}")]
    ConfigValidation {
        /// Component that failed validation
        component: String,
        /// Validation error details
        details: String,
    },

    /// Configuration field missing or invalid
    #[error("invalid config field '{field}' in {component}: {reason}")]
    InvalidConfigField {
        /// The field that is invalid
        field: String,
        /// Component containing the field
        component: String,
        /// Reason why the field is invalid
        reason: String,
    },

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// Media layer error
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// A specialized `Result` type for application operations.
pub type Result<T> = result::Result<T, AppError>;

impl AppError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        AppError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an I/O error tied to the file it happened on
    pub fn io_at(error: impl fmt::Display, path: &Path) -> Self {
        AppError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }

    /// Creates a validation error for one field of a config section
    pub fn invalid_field(component: &str, field: &str, reason: impl Into<String>) -> Self {
        AppError::InvalidConfigField {
            field: field.to_string(),
            component: component.to_string(),
            reason: reason.into(),
        }
    }
}
