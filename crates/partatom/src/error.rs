//! Error types for the extraction pipeline.
//!
//! Everything here is fatal for a single file and is caught at the service
//! boundary. Drift is deliberately not an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Pipeline error type.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("not a readable container: {path}: {reason}")]
    ContainerFormat { path: PathBuf, reason: String },

    #[error("metadata parsed but carries no identity: {path}")]
    EmptyRecord { path: PathBuf },

    #[error("serialization failed for {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("validation failed for {path}: {reason}")]
    Validation { path: PathBuf, reason: String },
}

impl ExtractError {
    /// Stable classification label for batch reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::ContainerFormat { .. } => "container-format",
            Self::EmptyRecord { .. } => "empty-record",
            Self::Serialization { .. } => "serialization",
            Self::Validation { .. } => "validation",
        }
    }

    pub(crate) fn container_format(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::ContainerFormat {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn validation(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::Validation {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ExtractError>;
