//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from schemata-core
    #[error("{0}")]
    Core(#[from] schemata_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {}", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl From<schemata_core::SchemaError> for Error {
    fn from(err: schemata_core::SchemaError) -> Self {
        Self::Core(err.into())
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(core) => match core {
                schemata_core::Error::Schema(_) => 2,
                schemata_core::Error::Decode { .. } => 3,
                schemata_core::Error::Runtime { .. } => 4,
                _ => 5,
            },
            Self::FileNotFound { .. } => 6,
            Self::InvalidFormat { .. } => 7,
            Self::Config(_) => 8,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_core::{LogicErrorKind, SchemaError};

    #[test]
    fn test_exit_codes() {
        let schema: Error = SchemaError::EmptySchema.into();
        assert_eq!(schema.exit_code(), 2);

        let logic: Error = schemata_core::Error::logic(LogicErrorKind::NoFormat, "none").into();
        assert_eq!(logic.exit_code(), 5);

        let missing = Error::FileNotFound {
            path: PathBuf::from("format.json"),
        };
        assert_eq!(missing.exit_code(), 6);
    }

    #[test]
    fn test_format_error_plain() {
        let err = Error::config("bad level");
        assert_eq!(format_error(&err, false), "Error: Configuration error: bad level");
    }
}
