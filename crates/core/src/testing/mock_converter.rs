//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{
    ConversionJob, ConversionResult, Converter, ConverterError, MediaInfo, StreamInfo,
};

/// A recorded conversion job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The job that was submitted.
    pub job: ConversionJob,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track conversion jobs and probes for assertions
/// - Simulate failures, per input path or for the next call
/// - Control probe durations and embedded cover art
///
/// Conversions write a small placeholder file to the job's output path, so the
/// engine's rename and sidecar steps run for real. Clones share state.
///
/// # Example
///
/// ```rust,ignore
/// use msic_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.set_probe_result("/music/a.flac", MediaInfo::audio_only("/music/a.flac", 200.0)).await;
/// converter.fail_conversion_of("/music/broken.flac", "invalid data").await;
///
/// let engine = MirrorEngine::new(config, converter.clone(), classifier, placer);
/// engine.run(&inputs, &output).await?;
///
/// assert_eq!(converter.conversion_count().await, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockConverter {
    /// Recorded conversions.
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    /// Probed paths, in call order.
    probes: Arc<RwLock<Vec<PathBuf>>>,
    /// Pre-configured probe results by path.
    probe_results: Arc<RwLock<HashMap<PathBuf, MediaInfo>>>,
    /// Pre-configured probe failures by path.
    probe_errors: Arc<RwLock<HashMap<PathBuf, String>>>,
    /// Conversion failures by input path.
    conversion_errors: Arc<RwLock<HashMap<PathBuf, String>>>,
    /// Embedded cover art by input path.
    cover_art: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// Duration reported for existing files without a configured result.
    default_duration_secs: Arc<RwLock<f64>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            conversions: Arc::new(RwLock::new(Vec::new())),
            probes: Arc::new(RwLock::new(Vec::new())),
            probe_results: Arc::new(RwLock::new(HashMap::new())),
            probe_errors: Arc::new(RwLock::new(HashMap::new())),
            conversion_errors: Arc::new(RwLock::new(HashMap::new())),
            cover_art: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            default_duration_secs: Arc::new(RwLock::new(180.0)),
        }
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of conversions attempted.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Get the number of probes performed.
    pub async fn probe_count(&self) -> usize {
        self.probes.read().await.len()
    }

    /// Get the probed paths, in call order.
    pub async fn probed_paths(&self) -> Vec<PathBuf> {
        self.probes.read().await.clone()
    }

    /// Set a probe result for a specific path.
    pub async fn set_probe_result(&self, path: impl AsRef<Path>, info: MediaInfo) {
        self.probe_results
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), info);
    }

    /// Make every probe of `path` fail with the given error's message.
    pub async fn set_probe_error(&self, path: impl AsRef<Path>, error: ConverterError) {
        self.probe_errors
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), error.to_string());
    }

    /// Make every conversion of `input` fail.
    ///
    /// The failing conversion still leaves bytes in its output file, like an
    /// encoder that dies halfway.
    pub async fn fail_conversion_of(&self, input: impl AsRef<Path>, reason: impl Into<String>) {
        self.conversion_errors
            .write()
            .await
            .insert(input.as_ref().to_path_buf(), reason.into());
    }

    /// Give `input` an embedded cover art stream with the given bytes.
    pub async fn set_cover_art(&self, input: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) {
        self.cover_art
            .write()
            .await
            .insert(input.as_ref().to_path_buf(), bytes.into());
    }

    /// Set the duration reported for files without a configured result.
    pub async fn set_default_duration(&self, secs: f64) {
        *self.default_duration_secs.write().await = secs;
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ConverterError> {
        self.next_error.write().await.take()
    }

    async fn probe_result(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        if let Some(reason) = self.probe_errors.read().await.get(path) {
            return Err(ConverterError::probe_failed(reason.clone()));
        }

        let mut info = match self.probe_results.read().await.get(path) {
            Some(info) => info.clone(),
            None => {
                if !path.exists() {
                    return Err(ConverterError::InputNotFound {
                        path: path.to_path_buf(),
                    });
                }
                MediaInfo::audio_only(path, *self.default_duration_secs.read().await)
            }
        };

        if self.cover_art.read().await.contains_key(path) && !info.has_video_stream() {
            let index = info.streams.len() as u32;
            info.streams.push(StreamInfo {
                index,
                codec_type: "video".to_string(),
                codec_name: Some("mjpeg".to_string()),
                duration_secs: None,
            });
            if let Some(streams) = info.raw.get_mut("streams").and_then(|s| s.as_array_mut()) {
                streams.push(serde_json::json!({
                    "index": index,
                    "codec_type": "video",
                    "codec_name": "mjpeg",
                }));
            }
        }

        Ok(info)
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        self.probes.write().await.push(path.to_path_buf());

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.probe_result(path).await
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        if let Some(err) = self.take_error().await {
            self.conversions.write().await.push(RecordedConversion {
                job,
                success: false,
            });
            return Err(err);
        }

        let failure = self
            .conversion_errors
            .read()
            .await
            .get(&job.input_path)
            .cloned();
        if let Some(reason) = failure {
            tokio::fs::write(&job.output_path, b"half-written").await?;
            self.conversions.write().await.push(RecordedConversion {
                job,
                success: false,
            });
            return Err(ConverterError::conversion_failed(reason, None));
        }

        if !job.overwrite && job.output_path.exists() {
            return Err(ConverterError::conversion_failed(
                "output exists and overwrite is disabled",
                None,
            ));
        }

        let contents = format!(
            "{}@{}k from {}",
            job.profile.format.extension(),
            job.profile.bitrate_kbps,
            job.input_path.display()
        );
        tokio::fs::write(&job.output_path, contents.as_bytes()).await?;

        self.conversions.write().await.push(RecordedConversion {
            job: job.clone(),
            success: true,
        });

        Ok(ConversionResult {
            output_path: job.output_path,
            output_size_bytes: contents.len() as u64,
            duration_ms: 0,
        })
    }

    async fn extract_cover_art(&self, input: &Path, output: &Path) -> Result<(), ConverterError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let bytes = self.cover_art.read().await.get(input).cloned();
        match bytes {
            Some(bytes) => {
                tokio::fs::write(output, bytes).await?;
                Ok(())
            }
            None => Err(ConverterError::conversion_failed(
                "Output file does not contain any stream",
                None,
            )),
        }
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(())
    }
}
