//! Error types for the Castle Escape crate

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the Castle Escape crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("position ({row}, {col}) is outside the 5x5 castle grid")]
    InvalidPosition { row: usize, col: usize },

    #[error("health ordinal {ordinal} is out of range (expected 0, 1 or 2)")]
    InvalidHealth { ordinal: usize },

    #[error("action index {index} is out of range (expected 0-5)")]
    InvalidAction { index: usize },

    #[error("invalid guard label '{label}' (expected 'G1'..'G4')")]
    InvalidGuardLabel { label: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("no trained table found at {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("malformed table artifact: {message}")]
    MalformedArtifact { message: String },

    #[error("state index {index} has no entry in the trained table")]
    MissingState { index: usize },

    #[error("environment failure: {message}")]
    Environment { message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
