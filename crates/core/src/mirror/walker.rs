//! Tree walk pairing each input directory with its mirrored output directory.

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::watch;

use crate::classifier::ContentClassifier;
use crate::converter::Converter;
use crate::placer::is_partial_path;

use super::error::MirrorError;
use super::executor::Executor;
use super::types::RunReport;

/// Kind of a directory entry, with symlinks followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    RegularFile,
    /// Device, socket, FIFO, broken or looping symlink.
    Other,
}

impl EntryKind {
    /// Classifies `path`, following symlinks.
    pub async fn of(path: &Path) -> std::io::Result<Self> {
        match fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => Ok(Self::Directory),
            Ok(meta) if meta.is_file() => Ok(Self::RegularFile),
            Ok(_) => Ok(Self::Other),
            Err(e) => {
                // The link itself exists but its target can't be reached
                if fs::symlink_metadata(path).await.is_ok() {
                    Ok(Self::Other)
                } else {
                    Err(e)
                }
            }
        }
    }
}

/// One entry of an input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: OsString,
    pub kind: EntryKind,
}

/// Lists a directory, sorted by entry name.
///
/// An entry that disappears while listing is reported as [`EntryKind::Other`].
pub async fn read_sorted(dir: &Path) -> std::io::Result<Vec<FileEntry>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let path = entry.path();
        let kind = listed_kind(&path).await;
        entries.push(FileEntry {
            path,
            name: entry.file_name(),
            kind,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

async fn listed_kind(path: &Path) -> EntryKind {
    match EntryKind::of(path).await {
        Ok(kind) => kind,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Entry vanished while listing");
            EntryKind::Other
        }
    }
}

/// Resolves once cancellation is requested. Never resolves if the sender is
/// gone without having requested it.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

pub(crate) struct Walker<'a, C, K> {
    executor: &'a Executor<C, K>,
    cancel: watch::Receiver<bool>,
}

impl<'a, C: Converter, K: ContentClassifier> Walker<'a, C, K> {
    pub(crate) fn new(executor: &'a Executor<C, K>, cancel: watch::Receiver<bool>) -> Self {
        Self { executor, cancel }
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Mirrors `input_root` into `output_root`.
    ///
    /// A directory's files are processed before its subdirectories, which are
    /// visited depth-first in name order through an explicit stack.
    pub(crate) async fn walk(
        &mut self,
        input_root: &Path,
        output_root: &Path,
        report: &mut RunReport,
    ) -> Result<(), MirrorError> {
        let executor = self.executor;
        let max_parallel_files = executor.config.max_parallel_files.max(1);
        let mut visited = HashSet::new();
        let mut stack = vec![(input_root.to_path_buf(), output_root.to_path_buf())];

        while let Some((in_dir, out_dir)) = stack.pop() {
            if self.is_cancelled() {
                report.cancelled = true;
                return Ok(());
            }

            let canonical = match fs::canonicalize(&in_dir).await {
                Ok(canonical) => canonical,
                Err(e) => {
                    let e = MirrorError::io(&in_dir, e);
                    tracing::error!(error = %e, "Failed to resolve directory");
                    report.record_failure(in_dir, e);
                    continue;
                }
            };

            // Checked per directory since the output root appears lazily
            if let Ok(output_canonical) = fs::canonicalize(output_root).await {
                if canonical == output_canonical {
                    tracing::info!(path = %in_dir.display(), "Skipping output directory");
                    continue;
                }
            }

            if !visited.insert(canonical) {
                tracing::warn!(path = %in_dir.display(), "Directory already visited, skipping");
                continue;
            }

            let entries = match read_sorted(&in_dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    let e = MirrorError::io(&in_dir, e);
                    tracing::error!(error = %e, "Failed to read directory");
                    report.record_failure(in_dir, e);
                    continue;
                }
            };
            report.directories += 1;
            tracing::debug!(path = %in_dir.display(), entries = entries.len(), "Entering directory");

            let mut files = Vec::new();
            let mut dirs = Vec::new();
            for entry in entries {
                match entry.kind {
                    EntryKind::RegularFile if is_partial_path(&entry.path) => {
                        tracing::debug!(path = %entry.path.display(), "Ignoring partial file");
                    }
                    EntryKind::RegularFile => files.push(entry),
                    EntryKind::Directory => dirs.push(entry),
                    EntryKind::Other => {
                        tracing::warn!(path = %entry.path.display(), "Unknown file");
                        report.unknown_entries += 1;
                    }
                }
            }

            let out_dir_ref = &out_dir;
            let mut outcomes = stream::iter(files)
                .map(|entry| async move {
                    executor
                        .process_file(&entry.path, out_dir_ref, &entry.name)
                        .await
                })
                .buffer_unordered(max_parallel_files);

            loop {
                tokio::select! {
                    next = outcomes.next() => match next {
                        Some(Ok(outcome)) => report.record(&outcome),
                        Some(Err(e)) => return Err(e),
                        None => break,
                    },
                    _ = cancelled(&mut self.cancel) => {
                        report.cancelled = true;
                        return Ok(());
                    }
                }
            }

            for dir in dirs.into_iter().rev() {
                let child_out = out_dir.join(&dir.name);
                stack.push((dir.path, child_out));
            }
        }

        Ok(())
    }
}
