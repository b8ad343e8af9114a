//! Application error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::UnitError;

/// Application-level errors for passport generation.
///
/// A failure to read a unit's own assembly time is not represented here:
/// the document builder reports it and omits the field instead.
#[derive(Error, Debug)]
pub enum AppError {
    // Domain errors
    #[error("Assembly time aggregation failed: {0}")]
    Unit(#[from] UnitError),

    // Output errors
    #[error("Failed to write passport to '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize passport: {0}")]
    Serialize(#[from] serde_yaml::Error),

    // Input errors
    #[error("Invalid unit input '{path}': {message}")]
    Input { path: PathBuf, message: String },

    #[error("Unit uuid '{0}' cannot be used in a passport file name")]
    InvalidUuid(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}
