//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while probing or transcoding.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Encoder process failed.
    #[error("Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Encoder or prober did not finish in time.
    #[error("Timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Failed to probe media file.
    #[error("Failed to probe media file: {reason}")]
    ProbeFailed { reason: String },

    /// The probed file has no audio stream.
    #[error("No audio streams present in {path}")]
    NoAudioStream { path: PathBuf },

    /// The probed file has an audio stream but no duration.
    #[error("No duration reported for {path}")]
    DurationUnavailable { path: PathBuf },

    /// I/O error while running the tools.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse FFprobe output.
    #[error("Failed to parse media info: {reason}")]
    ParseError { reason: String },
}

impl ConverterError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new probe failed error.
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }

    /// Whether a required external tool is missing.
    ///
    /// This is a configuration problem of the whole run, not of a single file.
    pub fn is_tool_missing(&self) -> bool {
        matches!(
            self,
            Self::FfmpegNotFound { .. } | Self::FfprobeNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_missing() {
        let err = ConverterError::FfmpegNotFound {
            path: PathBuf::from("ffmpeg"),
        };
        assert!(err.is_tool_missing());
        assert!(!ConverterError::probe_failed("bad").is_tool_missing());
    }

    #[test]
    fn test_display() {
        let err = ConverterError::NoAudioStream {
            path: PathBuf::from("/music/cover.jpg"),
        };
        assert_eq!(err.to_string(), "No audio streams present in /music/cover.jpg");
    }
}
