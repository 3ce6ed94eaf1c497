//! File system placer implementation.

use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};

use super::config::PlacerConfig;
use super::error::PlacerError;
use super::partial::PartialFile;
use super::types::PlacedFile;

/// File system based placer implementation.
#[derive(Debug, Clone, Default)]
pub struct FsPlacer {
    config: PlacerConfig,
}

impl FsPlacer {
    /// Creates a new file system placer with the given configuration.
    pub fn new(config: PlacerConfig) -> Self {
        Self { config }
    }

    /// Creates a placer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlacerConfig::default())
    }

    /// Attempts to move a file atomically (rename).
    ///
    /// Returns `Ok(false)` when source and destination are on different
    /// filesystems.
    async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, std::io::Error> {
        match fs::rename(source, destination).await {
            Ok(()) => Ok(true),
            Err(e) => {
                // Cross-filesystem moves fail with EXDEV (18 on Linux)
                if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Copies a file through a buffer, returning the number of bytes copied.
    async fn copy_file(&self, source: &Path, destination: &Path) -> Result<u64, PlacerError> {
        let source_file = File::open(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlacerError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                PlacerError::Io(e)
            }
        })?;

        let dest_file = File::create(destination).await.map_err(|e| {
            PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, dest_file);

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; self.config.buffer_size];

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            if bytes_read == 0 {
                break;
            }

            writer.write_all(&buffer[..bytes_read]).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            total_bytes += bytes_read as u64;
        }

        writer.flush().await.map_err(|e| {
            PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        // Carry permission bits like a plain copy would
        if let Ok(meta) = fs::metadata(source).await {
            let _ = fs::set_permissions(destination, meta.permissions()).await;
        }

        Ok(total_bytes)
    }

    /// Creates the parent directories of a path.
    pub async fn ensure_parent_dirs(&self, path: &Path) -> Result<(), PlacerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    PlacerError::DirectoryCreationFailed {
                        path: parent.to_path_buf(),
                        source: e,
                    }
                })?;
            }
        }
        Ok(())
    }

    /// Prepares the partial file for `destination`.
    ///
    /// Creates the destination directory and removes a stale partial file left
    /// over from an interrupted run.
    pub async fn prepare(&self, destination: &Path) -> Result<PartialFile, PlacerError> {
        self.ensure_parent_dirs(destination).await?;

        let partial = PartialFile::for_destination(destination);
        match fs::remove_file(partial.path()).await {
            Ok(()) => tracing::debug!(
                path = %partial.path().display(),
                "Removed stale partial file"
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(PlacerError::Io(e)),
        }

        Ok(partial)
    }

    /// Moves a finished partial file to its final name, replacing any file
    /// already there.
    pub async fn commit(
        &self,
        partial: PartialFile,
        destination: &Path,
    ) -> Result<PlacedFile, PlacerError> {
        self.ensure_parent_dirs(destination).await?;

        let moved = Self::try_atomic_move(partial.path(), destination)
            .await
            .map_err(|e| {
                PlacerError::move_failed(partial.path().to_path_buf(), destination.to_path_buf(), e)
            })?;

        if moved {
            partial.disarm();
        } else {
            // Different filesystem: copy next to the destination, then rename.
            // Dropping `partial` afterwards removes the original.
            let staged = PartialFile::for_destination(destination);
            self.copy_file(partial.path(), staged.path()).await?;
            fs::rename(staged.path(), destination).await.map_err(|e| {
                PlacerError::move_failed(staged.path().to_path_buf(), destination.to_path_buf(), e)
            })?;
            staged.disarm();
        }

        let meta = fs::metadata(destination).await?;
        Ok(PlacedFile {
            destination: destination.to_path_buf(),
            size_bytes: meta.len(),
        })
    }

    /// Copies `source` to `destination` byte for byte through a partial file.
    pub async fn copy_atomic(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<PlacedFile, PlacerError> {
        if !source.exists() {
            return Err(PlacerError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        let partial = self.prepare(destination).await?;
        self.copy_file(source, partial.path()).await?;
        self.commit(partial, destination).await
    }

    /// Writes `contents` to `destination` through a partial file.
    pub async fn write_atomic(
        &self,
        destination: &Path,
        contents: &[u8],
    ) -> Result<PlacedFile, PlacerError> {
        let partial = self.prepare(destination).await?;

        let mut file = File::create(partial.path())
            .await
            .map_err(|e| PlacerError::WriteFailed {
                path: partial.path().to_path_buf(),
                source: e,
            })?;
        file.write_all(contents)
            .await
            .map_err(|e| PlacerError::WriteFailed {
                path: partial.path().to_path_buf(),
                source: e,
            })?;
        file.sync_all().await.map_err(|e| PlacerError::WriteFailed {
            path: partial.path().to_path_buf(),
            source: e,
        })?;
        drop(file);

        self.commit(partial, destination).await
    }

    /// Calculates the hex SHA-256 digest of a file.
    pub async fn sha256_file(&self, path: &Path) -> Result<String, PlacerError> {
        let file = File::open(path)
            .await
            .map_err(|e| PlacerError::ChecksumCalculationFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut hasher = Sha256::new();

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                PlacerError::ChecksumCalculationFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}
