//! Error types for the mirror engine.

use std::path::PathBuf;
use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::converter::ConverterError;
use crate::placer::PlacerError;

/// Errors of the mirror engine.
///
/// Per-file variants are recorded in the run report and the walk goes on.
/// [`MirrorError::is_fatal`] tells the variants that abort the whole run.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Invalid run settings.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An input root is missing or not a directory.
    #[error("Input is not a directory: {path}")]
    InputNotDirectory { path: PathBuf },

    /// Content classification failed.
    #[error("Failed to classify {path}: {source}")]
    Classifier {
        path: PathBuf,
        #[source]
        source: ClassifierError,
    },

    /// Probe, transcode or cover art extraction failed.
    #[error("Failed to process {path}: {source}")]
    Converter {
        path: PathBuf,
        #[source]
        source: ConverterError,
    },

    /// Copy, write or rename failed.
    #[error("Failed to write output for {path}: {source}")]
    Placer {
        path: PathBuf,
        #[source]
        source: PlacerError,
    },

    /// Sidecar serialization failed.
    #[error("Failed to serialize metadata of {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Directory listing or metadata lookup failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MirrorError {
    pub(crate) fn classifier(path: impl Into<PathBuf>, source: ClassifierError) -> Self {
        Self::Classifier {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn converter(path: impl Into<PathBuf>, source: ConverterError) -> Self {
        Self::Converter {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn placer(path: impl Into<PathBuf>, source: PlacerError) -> Self {
        Self::Placer {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error ends the whole run rather than one file.
    ///
    /// A missing `file`, `ffmpeg` or `ffprobe` binary fails every file alike.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Configuration(_) | Self::InputNotDirectory { .. } => true,
            Self::Classifier { source, .. } => source.is_unavailable(),
            Self::Converter { source, .. } => source.is_tool_missing(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fatal() {
        let err = MirrorError::classifier(
            "/m/a.mp3",
            ClassifierError::Unavailable {
                path: PathBuf::from("file"),
            },
        );
        assert!(err.is_fatal());

        let err = MirrorError::converter(
            "/m/a.mp3",
            ConverterError::conversion_failed("invalid data", None),
        );
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("/m/a.mp3"));

        let err = MirrorError::converter(
            "/m/a.mp3",
            ConverterError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg"),
            },
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_io_error_names_directory() {
        let err = MirrorError::io(
            "/m/disc 1",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Failed to read /m/disc 1: denied");
    }
}
