//! Output paths derived from one input file.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::converter::AudioFormat;

use super::policy::CopyKind;

/// Directory, next to the outputs, holding extracted cover art.
pub const ARTWORK_DIR: &str = "metadata-artwork";

/// Suffix of metadata sidecars.
pub const SIDECAR_SUFFIX: &str = ".metadata.json";

/// Output paths of one input file in its mirrored directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTargets {
    out_dir: PathBuf,
    name: OsString,
    extension: &'static str,
}

impl OutputTargets {
    pub fn new(out_dir: impl Into<PathBuf>, name: impl AsRef<OsStr>, format: AudioFormat) -> Self {
        Self {
            out_dir: out_dir.into(),
            name: name.as_ref().to_os_string(),
            extension: format.extension(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// `<out_dir>/<name>`
    pub fn raw(&self) -> PathBuf {
        self.out_dir.join(&self.name)
    }

    /// `<out_dir>/<name>.<ext>`
    pub fn transcoded(&self) -> PathBuf {
        self.with_suffix(&format!(".{}", self.extension))
    }

    /// `<out_dir>/<name>.metadata.json`
    pub fn sidecar(&self) -> PathBuf {
        self.with_suffix(SIDECAR_SUFFIX)
    }

    /// `<out_dir>/metadata-artwork`
    pub fn artwork_dir(&self) -> PathBuf {
        self.out_dir.join(ARTWORK_DIR)
    }

    /// Content-addressed artwork path for a hex SHA-256 digest.
    pub fn artwork(&self, sha256_hex: &str) -> PathBuf {
        let short = sha256_hex.get(..10).unwrap_or(sha256_hex);
        self.artwork_dir().join(format!("{}.jpg", short))
    }

    /// Staging path the cover art is extracted to before it is hashed.
    pub fn artwork_staging(&self) -> PathBuf {
        self.with_suffix(".artwork.jpg")
    }

    /// Destination of the main output of a copy kind.
    pub fn copy_target(&self, kind: CopyKind) -> PathBuf {
        match kind {
            CopyKind::Raw => self.raw(),
            CopyKind::Transcode => self.transcoded(),
        }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = self.name.clone();
        name.push(suffix);
        self.out_dir.join(name)
    }
}
