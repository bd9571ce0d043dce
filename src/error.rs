//! Error types for the answer validator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Errors that can occur while validating generated answers.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// An input file does not exist.
    #[error("{kind} file not found: {}", .path.display())]
    NotFound { kind: &'static str, path: PathBuf },

    /// Error reading or writing files.
    #[error("I/O error for path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid JSON for the expected shape.
    #[error("Failed to parse JSON in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The embedding model could not be located or loaded.
    #[error("Failed to load embedding model: {0}")]
    ModelLoad(String),

    /// Encoding text with the embedding model failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Error during serialization of the report.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ValidatorError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a not-found error for the given kind of input file.
    pub fn not_found(kind: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            kind,
            path: path.into(),
        }
    }
}

impl From<candle_core::Error> for ValidatorError {
    fn from(err: candle_core::Error) -> Self {
        ValidatorError::Embedding(err.to_string())
    }
}
