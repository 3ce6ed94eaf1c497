//! Error types for the classifier module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while classifying a file.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The type-detection facility is missing or misconfigured.
    #[error("File type detection is unavailable ({path}): install libmagic's `file` command or set classifier.file_path")]
    Unavailable { path: PathBuf },

    /// The classifier ran but could not classify this file.
    #[error("Failed to classify {path}: {reason}")]
    ClassificationFailed { path: PathBuf, reason: String },

    /// The classifier did not answer in time.
    #[error("Classification of {path} timed out after {timeout_secs} seconds")]
    Timeout { path: PathBuf, timeout_secs: u64 },

    /// I/O error while running the classifier.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    /// Creates a classification failed error.
    pub fn classification_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ClassificationFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error means no file can be classified at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
