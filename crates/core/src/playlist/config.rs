//! Options of a playlist rewrite.

use std::path::{Path, PathBuf};

use super::error::PlaylistError;

/// How playlist entries are rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistConfig {
    /// Base directory entries are made relative to, or resolved against.
    pub relative_to: Option<PathBuf>,
    /// Prefix prepended to relative entries.
    pub relative_prefix: Option<PathBuf>,
    /// Make every entry absolute.
    pub make_absolute: bool,
}

impl PlaylistConfig {
    pub fn validate(&self) -> Result<(), PlaylistError> {
        if self.relative_prefix.is_some() && self.make_absolute {
            return Err(PlaylistError::PrefixWithAbsolute);
        }
        Ok(())
    }

    /// Base used with `make_absolute`: `relative_to`, else the playlist's
    /// own directory.
    pub fn absolute_base(&self, playlist: &Path) -> PathBuf {
        match &self.relative_to {
            Some(base) => base.clone(),
            None => playlist
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}
