//! Metadata sidecars: probe output and content-addressed cover art.

use std::path::{Path, PathBuf};

use crate::converter::{Converter, MediaInfo};
use crate::placer::FsPlacer;

use super::error::MirrorError;
use super::locks::PathLocks;
use super::targets::OutputTargets;

/// Serializes the sidecar document `{"ffprobe": <probe output>}`.
pub fn sidecar_json(info: &MediaInfo) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(&serde_json::json!({ "ffprobe": info.raw }))
}

/// Writes the sidecars of one audio file.
pub(crate) struct SidecarWriter<'a, C: ?Sized> {
    pub converter: &'a C,
    pub placer: &'a FsPlacer,
    pub locks: &'a PathLocks,
}

impl<C: Converter + ?Sized> SidecarWriter<'_, C> {
    /// Probes `source` and writes its JSON sidecar and cover art.
    ///
    /// With `keep_existing`, a sidecar already at its destination is left
    /// alone. Artwork is always written since its name is its digest.
    /// Returns the paths written.
    pub async fn write(
        &self,
        source: &Path,
        targets: &OutputTargets,
        keep_existing: bool,
    ) -> Result<Vec<PathBuf>, MirrorError> {
        let info = self
            .converter
            .probe(source)
            .await
            .map_err(|e| MirrorError::converter(source, e))?;

        let mut written = Vec::new();

        let sidecar = targets.sidecar();
        {
            let _guard = self.locks.lock(&sidecar).await;
            if keep_existing && sidecar.exists() {
                tracing::info!(path = %sidecar.display(), "Keeping existing metadata");
            } else {
                let json = sidecar_json(&info).map_err(|e| MirrorError::Serialization {
                    path: source.to_path_buf(),
                    source: e,
                })?;
                self.placer
                    .write_atomic(&sidecar, &json)
                    .await
                    .map_err(|e| MirrorError::placer(source, e))?;
                tracing::debug!(path = %sidecar.display(), "Wrote metadata");
                written.push(sidecar);
            }
        }

        if info.has_video_stream() {
            written.push(self.write_artwork(source, targets).await?);
        }

        Ok(written)
    }

    async fn write_artwork(
        &self,
        source: &Path,
        targets: &OutputTargets,
    ) -> Result<PathBuf, MirrorError> {
        let partial = self
            .placer
            .prepare(&targets.artwork_staging())
            .await
            .map_err(|e| MirrorError::placer(source, e))?;

        self.converter
            .extract_cover_art(source, partial.path())
            .await
            .map_err(|e| MirrorError::converter(source, e))?;

        let digest = self
            .placer
            .sha256_file(partial.path())
            .await
            .map_err(|e| MirrorError::placer(source, e))?;
        let artwork = targets.artwork(&digest);

        let _guard = self.locks.lock(&artwork).await;
        self.placer
            .commit(partial, &artwork)
            .await
            .map_err(|e| MirrorError::placer(source, e))?;

        tracing::debug!(path = %artwork.display(), "Wrote cover art");
        Ok(artwork)
    }
}
