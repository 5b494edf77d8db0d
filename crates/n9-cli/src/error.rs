//! Error types for n9-cli.

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Dataset file missing; names the expected schema so the diagnostic is
    /// actionable on its own.
    #[error("Dataset not found: {0}. Expected a CSV with a header row, 72 feature columns, and an integer label column in 0-9.")]
    DatasetNotFound(PathBuf),

    /// Model checkpoint missing
    #[error("Model not found: {0}")]
    ModelNotFound(PathBuf),

    /// Invalid artifact format
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline error from the neura9 library
    #[error("{0}")]
    Neura9(#[from] neura9::error::Neura9Error),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::DatasetNotFound(_) | Self::ModelNotFound(_) => ExitCode::from(3),
            Self::InvalidArtifact(_) => ExitCode::from(4),
            Self::Io(_) => ExitCode::from(7),
            Self::Neura9(_) => ExitCode::from(1),
        }
    }
}
