//! Global error handling for datahop
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

/// Global error type for datahop operations
#[derive(Error, Debug)]
pub enum DatahopError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The settings backend failed, or a stored value could not be
    /// interpreted. Carries the original decode error when one exists.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A required metadata entry was absent from a data file archive
    #[error("Missing metadata key '{key}' in {file}")]
    MissingMetadata { key: &'static str, file: String },

    /// A metadata value could not be parsed as a timestamp
    #[error("Invalid creation timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Zip archive errors while packaging a data file
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DatahopError {
    /// Build an `InvalidConfiguration` error without an underlying cause
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        DatahopError::InvalidConfiguration {
            message: message.into(),
            source: None,
        }
    }

    /// Build an `InvalidConfiguration` error wrapping the decode error
    /// that triggered it
    pub fn invalid_configuration_caused_by(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DatahopError::InvalidConfiguration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Specialized Result type for datahop operations
pub type Result<T> = std::result::Result<T, DatahopError>;
