//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ConverterError;
use super::types::{ConversionJob, ConversionResult, MediaInfo};

/// Prober and transcoder for media files.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Probes a media file to get its stream information.
    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError>;

    /// Transcodes the audio of a file as described by the job.
    ///
    /// Video streams are dropped; container metadata is carried over when the
    /// job's profile asks for it.
    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError>;

    /// Copies the first video stream of `input` (embedded cover art) into
    /// `output` without re-encoding, replacing `output` if it exists.
    async fn extract_cover_art(&self, input: &Path, output: &Path) -> Result<(), ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;
}
