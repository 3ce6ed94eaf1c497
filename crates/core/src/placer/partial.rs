//! Partial files: the temporary names outputs are written under.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

const PARTIAL_MARKER: &str = "msic-partial";

/// Returns the partial name used while writing `destination`.
///
/// The partial file lives in the same directory (so the final rename stays on
/// one filesystem), is hidden, and keeps the destination's extension so tools
/// that infer the format from the name still work:
/// `out/a.wav.mp3` becomes `out/.a.wav.msic-partial.mp3`.
pub fn partial_path(destination: &Path) -> PathBuf {
    let parent = destination.parent().unwrap_or_else(|| Path::new(""));

    let mut name = OsString::from(".");
    match (destination.file_stem(), destination.extension()) {
        (Some(stem), Some(ext)) => {
            name.push(stem);
            name.push(format!(".{}.", PARTIAL_MARKER));
            name.push(ext);
        }
        _ => {
            name.push(destination.file_name().unwrap_or_default());
            name.push(format!(".{}", PARTIAL_MARKER));
        }
    }

    parent.join(name)
}

/// Whether `path` looks like a partial file left behind by an interrupted run.
pub fn is_partial_path(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .is_some_and(|n| n.starts_with('.') && n.contains(&format!(".{}", PARTIAL_MARKER)))
}

/// Guard for a partial file.
///
/// Removes the file when dropped unless it was committed, so failed and
/// cancelled writes never leave debris behind.
#[derive(Debug)]
pub struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    /// Creates a guard for the partial file of `destination`.
    pub fn for_destination(destination: &Path) -> Self {
        Self {
            path: partial_path(destination),
            armed: true,
        }
    }

    /// Path the writer should write to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stops the guard from deleting the file.
    pub(crate) fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed partial file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove partial file"
            ),
        }
    }
}
