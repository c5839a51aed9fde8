//! Error types for the sustainability scoring library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong number of feature arguments
    #[error(
        "Incorrect number of arguments. Expected {expected} features ({}), got {actual}",
        crate::data::RAW_FEATURE_NAMES.join(", ")
    )]
    ArgumentCount { expected: usize, actual: usize },

    /// A feature argument is not a valid number
    #[error("Invalid input - {0}")]
    ArgumentParse(String),

    /// Scaler, model or encoder missing or corrupt
    #[error("Failed to load artifact {}: {reason}", .path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Failure while transforming or scoring an input
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Dataset missing or malformed
    #[error("Failed to load dataset {}: {reason}", .path.display())]
    DataLoad { path: PathBuf, reason: String },

    /// Artifact write failure
    #[error("Failed to persist artifact {}: {reason}", .path.display())]
    Persistence { path: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Not enough rows to train or evaluate
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

impl Error {
    pub(crate) fn artifact_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn data_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
