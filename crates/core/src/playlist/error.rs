//! Error types for the playlist module.

use std::path::PathBuf;
use thiserror::Error;

use crate::placer::PlacerError;

/// Errors that can occur while rewriting a playlist.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// Conflicting options.
    #[error("Cannot use both --relative-prefix and --absolute at the same time")]
    PrefixWithAbsolute,

    /// An absolute entry does not live under the base directory.
    #[error("Entry {entry} is not under {base}")]
    OutsideBase { entry: PathBuf, base: PathBuf },

    /// The input playlist could not be read.
    #[error("Failed to read playlist {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input playlist is not valid UTF-8.
    #[error("Playlist {path} is not valid UTF-8")]
    Encoding { path: PathBuf },

    /// Resolving an absolute path failed.
    #[error("Failed to make {path} absolute: {source}")]
    Absolute {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output playlist could not be written.
    #[error("Failed to write playlist: {0}")]
    Write(#[from] PlacerError),
}

impl PlaylistError {
    /// Whether the error comes from the options rather than the playlist.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::PrefixWithAbsolute)
    }
}
