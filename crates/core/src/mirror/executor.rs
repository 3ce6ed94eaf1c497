//! Carries out the action chosen for each regular file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classifier::ContentClassifier;
use crate::converter::{ConversionJob, Converter};
use crate::placer::FsPlacer;

use super::config::MirrorConfig;
use super::equivalence::should_skip_existing;
use super::error::MirrorError;
use super::locks::PathLocks;
use super::policy::{copy_kind, decide, Action, CopyKind};
use super::sidecar::SidecarWriter;
use super::targets::OutputTargets;
use super::types::{FileOutcome, SkipReason};

pub(crate) struct Executor<C, K> {
    pub(crate) config: MirrorConfig,
    pub(crate) converter: Arc<C>,
    pub(crate) classifier: Arc<K>,
    pub(crate) placer: FsPlacer,
    pub(crate) locks: PathLocks,
}

impl<C: Converter, K: ContentClassifier> Executor<C, K> {
    pub(crate) fn new(config: MirrorConfig, converter: C, classifier: K, placer: FsPlacer) -> Self {
        Self {
            config,
            converter: Arc::new(converter),
            classifier: Arc::new(classifier),
            placer,
            locks: PathLocks::new(),
        }
    }

    /// Processes `source` into `out_dir` under the entry name `name`.
    ///
    /// Per-file failures become [`FileOutcome::Failed`]; only fatal errors are
    /// returned as `Err`.
    pub(crate) async fn process_file(
        &self,
        source: &Path,
        out_dir: &Path,
        name: &OsStr,
    ) -> Result<FileOutcome, MirrorError> {
        match self.try_process(source, out_dir, name).await {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::error!(path = %source.display(), error = %e, "Failed to process file");
                Ok(FileOutcome::Failed {
                    source: source.to_path_buf(),
                    error: e.to_string(),
                })
            }
        }
    }

    async fn try_process(
        &self,
        source: &Path,
        out_dir: &Path,
        name: &OsStr,
    ) -> Result<FileOutcome, MirrorError> {
        let content_type = self
            .classifier
            .classify(source)
            .await
            .map_err(|e| MirrorError::classifier(source, e))?;

        let targets = OutputTargets::new(out_dir, name, self.config.profile.format);
        let kind = copy_kind(&self.config, &content_type);
        let destination_exists = kind.is_some_and(|k| targets.copy_target(k).exists());

        let mut action = decide(&self.config, &content_type, destination_exists);
        if action.is_transcode()
            && destination_exists
            && should_skip_existing(
                &self.config,
                self.converter.as_ref(),
                source,
                &targets.transcoded(),
            )
            .await
        {
            action = Action::SkipEquivalentDuration;
        }
        // Metadata-only files have no copy target; their sidecar stands in
        if action == Action::MetadataOnly
            && !self.config.effective_overwrite()
            && targets.sidecar().exists()
        {
            action = Action::SkipExistingOutput;
        }

        if let Some(reason) = SkipReason::from_action(action) {
            tracing::info!(
                path = %source.display(),
                content_type = %content_type,
                ?reason,
                "Skipping"
            );
            return Ok(FileOutcome::Skipped {
                source: source.to_path_buf(),
                reason,
            });
        }

        let mut outputs = Vec::new();

        if action.is_raw_copy() || action.is_transcode() {
            let kind = if action.is_transcode() {
                CopyKind::Transcode
            } else {
                CopyKind::Raw
            };
            if let Some(written) = self.copy(source, &targets, kind).await? {
                outputs.push(written);
            }
        }

        if action.emits_metadata() {
            let writer = SidecarWriter {
                converter: self.converter.as_ref(),
                placer: &self.placer,
                locks: &self.locks,
            };
            outputs.extend(
                writer
                    .write(source, &targets, !self.config.effective_overwrite())
                    .await?,
            );
        }

        if outputs.is_empty() {
            return Ok(FileOutcome::Skipped {
                source: source.to_path_buf(),
                reason: SkipReason::NoOverwrite,
            });
        }

        Ok(FileOutcome::Written {
            source: source.to_path_buf(),
            action,
            outputs,
        })
    }

    /// Writes the main output. Returns `None` when an existing output may not
    /// be replaced.
    async fn copy(
        &self,
        source: &Path,
        targets: &OutputTargets,
        kind: CopyKind,
    ) -> Result<Option<PathBuf>, MirrorError> {
        let destination = targets.copy_target(kind);
        let _guard = self.locks.lock(&destination).await;

        if destination.exists() && !self.config.effective_overwrite() {
            tracing::info!(path = %destination.display(), "Output exists, not overwriting");
            return Ok(None);
        }

        tracing::info!("{} into {}", source.display(), destination.display());

        match kind {
            CopyKind::Raw => {
                self.placer
                    .copy_atomic(source, &destination)
                    .await
                    .map_err(|e| MirrorError::placer(source, e))?;
            }
            CopyKind::Transcode => {
                let partial = self
                    .placer
                    .prepare(&destination)
                    .await
                    .map_err(|e| MirrorError::placer(source, e))?;

                let job = ConversionJob {
                    input_path: source.to_path_buf(),
                    output_path: partial.path().to_path_buf(),
                    profile: self.config.profile.clone(),
                    overwrite: self.config.effective_overwrite(),
                };
                let result = self
                    .converter
                    .convert(job)
                    .await
                    .map_err(|e| MirrorError::converter(source, e))?;
                tracing::debug!(
                    path = %destination.display(),
                    size_bytes = result.output_size_bytes,
                    duration_ms = result.duration_ms,
                    "Transcoded"
                );

                self.placer
                    .commit(partial, &destination)
                    .await
                    .map_err(|e| MirrorError::placer(source, e))?;
            }
        }

        Ok(Some(destination))
    }
}
