//! Mirror module: the directory-mirroring conditional-conversion engine.
//!
//! Walks one or more input trees and mirrors them into a destination tree.
//! Every regular file is classified, then copied, transcoded, skipped or
//! described by metadata sidecars according to the run's [`MirrorConfig`].
//! Existing outputs are checked first so repeated runs skip finished work.
//!
//! # Example
//!
//! ```ignore
//! use msic_core::classifier::FileCommandClassifier;
//! use msic_core::converter::FfmpegConverter;
//! use msic_core::mirror::{MirrorConfig, MirrorEngine};
//! use msic_core::placer::FsPlacer;
//!
//! let engine = MirrorEngine::new(
//!     MirrorConfig::default(),
//!     FfmpegConverter::with_defaults(),
//!     FileCommandClassifier::with_defaults(),
//!     FsPlacer::with_defaults(),
//! );
//! engine.validate().await?;
//!
//! let report = engine.run(&[PathBuf::from("/music")], Path::new("/mirror")).await?;
//! println!("{} files written", report.files_processed);
//! ```

mod config;
mod equivalence;
mod error;
mod executor;
mod locks;
mod policy;
mod sidecar;
mod targets;
mod types;
mod walker;

pub use config::{AudioMode, MirrorConfig};
pub use equivalence::{should_skip_existing, within_tolerance, DURATION_TOLERANCE_SECS};
pub use error::MirrorError;
pub use locks::{PathGuard, PathLocks};
pub use policy::{copy_kind, decide, Action, CopyKind};
pub use sidecar::sidecar_json;
pub use targets::{OutputTargets, ARTWORK_DIR, SIDECAR_SUFFIX};
pub use types::{FileFailure, FileOutcome, RunReport, SkipReason};
pub use walker::{read_sorted, EntryKind, FileEntry};

use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::watch;

use crate::classifier::ContentClassifier;
use crate::converter::Converter;
use crate::placer::FsPlacer;

use executor::Executor;
use walker::Walker;

/// The mirror engine.
pub struct MirrorEngine<C: Converter, K: ContentClassifier> {
    executor: Executor<C, K>,
    cancel: watch::Receiver<bool>,
}

impl<C: Converter, K: ContentClassifier> MirrorEngine<C, K> {
    /// Creates a new engine.
    pub fn new(config: MirrorConfig, converter: C, classifier: K, placer: FsPlacer) -> Self {
        // Without a sender the run can't be cancelled
        let (_, cancel) = watch::channel(false);
        Self {
            executor: Executor::new(config, converter, classifier, placer),
            cancel,
        }
    }

    /// Stops the run once `true` is sent on the channel.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.executor.config
    }

    /// Checks the settings and the collaborators the run will need.
    pub async fn validate(&self) -> Result<(), MirrorError> {
        let config = &self.executor.config;
        config.validate()?;

        self.executor.classifier.validate().await.map_err(|e| {
            MirrorError::Configuration(format!(
                "content classifier '{}' unavailable: {}",
                self.executor.classifier.name(),
                e
            ))
        })?;

        if config.audio_mode == AudioMode::Compress || config.emit_metadata {
            self.executor.converter.validate().await.map_err(|e| {
                MirrorError::Configuration(format!(
                    "converter '{}' unavailable: {}",
                    self.executor.converter.name(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Mirrors every input root into `output`, in order.
    ///
    /// Per-file failures are collected in the report. `Err` means the run was
    /// aborted: invalid settings, an input that is not a directory, or a
    /// missing external tool.
    pub async fn run(&self, inputs: &[PathBuf], output: &Path) -> Result<RunReport, MirrorError> {
        self.executor.config.validate()?;

        for input in inputs {
            let is_dir = tokio::fs::metadata(input)
                .await
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            if !is_dir {
                return Err(MirrorError::InputNotDirectory {
                    path: input.clone(),
                });
            }
        }

        let start = Instant::now();
        let mut report = RunReport::default();
        let mut walker = Walker::new(&self.executor, self.cancel.clone());

        for input in inputs {
            tracing::info!(
                input = %input.display(),
                output = %output.display(),
                "Mirroring"
            );
            walker.walk(input, output, &mut report).await?;

            if report.cancelled {
                tracing::warn!("Run interrupted");
                break;
            }
        }

        tracing::info!(
            directories = report.directories,
            files = report.files_seen,
            processed = report.files_processed,
            skipped = report.files_skipped,
            transcodes = report.transcodes,
            unknown = report.unknown_entries,
            failed = report.failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Run finished"
        );

        Ok(report)
    }
}
