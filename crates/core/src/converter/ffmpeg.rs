//! FFmpeg-based converter implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionJob, ConversionResult, MediaInfo, StreamInfo};

/// FFmpeg-based converter implementation.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    /// Creates a new FFmpeg converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Builds ffmpeg arguments for an audio transcode.
    fn build_transcode_args(&self, job: &ConversionJob) -> Vec<String> {
        let mut args = vec![
            if job.overwrite { "-y" } else { "-n" }.to_string(),
            "-i".to_string(),
            job.input_path.to_string_lossy().to_string(),
            // Drop video (cover art) streams
            "-vn".to_string(),
            "-c:a".to_string(),
            job.profile.format.ffmpeg_codec().to_string(),
        ];

        // Bitrate (for lossy formats)
        if !job.profile.format.is_lossless() {
            args.extend(["-b:a".to_string(), format!("{}k", job.profile.bitrate_kbps)]);
        }

        if job.profile.map_metadata {
            args.extend(["-map_metadata".to_string(), "0".to_string()]);
        }

        args.extend([
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
        ]);

        // Extra args
        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        // Output
        args.push(job.output_path.to_string_lossy().to_string());

        args
    }

    /// Builds ffmpeg arguments that copy the first video stream out of a file.
    fn build_cover_art_args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-an".to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Parses ffprobe JSON output into MediaInfo.
    fn parse_probe_output(path: &Path, output: &str) -> Result<MediaInfo, ConverterError> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            #[serde(default)]
            format: Option<ProbeFormat>,
            #[serde(default)]
            streams: Vec<ProbeStream>,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            format_name: Option<String>,
            duration: Option<String>,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            #[serde(default)]
            index: u32,
            codec_type: Option<String>,
            codec_name: Option<String>,
            duration: Option<String>,
        }

        let raw: serde_json::Value =
            serde_json::from_str(output).map_err(|e| ConverterError::ParseError {
                reason: format!("Failed to parse ffprobe output: {}", e),
            })?;

        let probe: ProbeOutput =
            serde_json::from_value(raw.clone()).map_err(|e| ConverterError::ParseError {
                reason: format!("Unexpected ffprobe document: {}", e),
            })?;

        let parse_secs = |d: &Option<String>| d.as_ref().and_then(|d| d.parse::<f64>().ok());

        let (format_name, duration_secs) = match &probe.format {
            Some(format) => (format.format_name.clone(), parse_secs(&format.duration)),
            None => (None, None),
        };

        let streams = probe
            .streams
            .iter()
            .map(|s| StreamInfo {
                index: s.index,
                codec_type: s.codec_type.clone().unwrap_or_default(),
                codec_name: s.codec_name.clone(),
                duration_secs: parse_secs(&s.duration),
            })
            .collect();

        Ok(MediaInfo {
            path: path.to_path_buf(),
            format_name,
            duration_secs,
            streams,
            raw,
        })
    }

    /// Spawns a tool and waits for it, bounded by the configured timeout.
    ///
    /// The child is killed if the returned future is dropped.
    async fn run_tool(
        &self,
        program: &Path,
        args: &[String],
        capture_stdout: bool,
        not_found: impl FnOnce(PathBuf) -> ConverterError,
    ) -> Result<Output, ConverterError> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(if capture_stdout {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    not_found(program.to_path_buf())
                } else {
                    ConverterError::Io(e)
                }
            })?;

        let output = timeout(
            Duration::from_secs(self.config.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| ConverterError::Timeout {
            timeout_secs: self.config.timeout_secs,
        })??;

        Ok(output)
    }

    async fn run_ffmpeg(&self, args: &[String]) -> Result<(), ConverterError> {
        tracing::debug!(ffmpeg = %self.config.ffmpeg_path.display(), ?args, "Running ffmpeg");

        let output = self
            .run_tool(&self.config.ffmpeg_path, args, false, |path| {
                ConverterError::FfmpegNotFound { path }
            })
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ConverterError::conversion_failed(
                format!("FFmpeg exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        Ok(())
    }

    /// Checks that a tool can be spawned.
    async fn check_tool(
        program: &Path,
        not_found: impl FnOnce(PathBuf) -> ConverterError,
    ) -> Result<(), ConverterError> {
        let result = Command::new(program)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(not_found(program.to_path_buf()))
            }
            Err(e) => Err(ConverterError::Io(e)),
        }
    }
}

#[async_trait]
impl Converter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        if !path.exists() {
            return Err(ConverterError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let args = [
            "-v".to_string(),
            "quiet".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            "-show_streams".to_string(),
            path.to_string_lossy().to_string(),
        ];

        let output = self
            .run_tool(&self.config.ffprobe_path, &args, true, |path| {
                ConverterError::FfprobeNotFound { path }
            })
            .await?;

        if !output.status.success() {
            return Err(ConverterError::probe_failed(format!(
                "ffprobe failed on {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_probe_output(path, &stdout)
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        let start = Instant::now();

        if !job.input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        let args = self.build_transcode_args(&job);
        self.run_ffmpeg(&args).await?;

        // Verify output exists and get size
        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| ConverterError::conversion_failed("Output file not created", None))?;

        Ok(ConversionResult {
            output_path: job.output_path,
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn extract_cover_art(&self, input: &Path, output: &Path) -> Result<(), ConverterError> {
        let args = self.build_cover_art_args(input, output);
        self.run_ffmpeg(&args).await?;

        if !output.exists() {
            return Err(ConverterError::conversion_failed(
                "Cover art file not created",
                None,
            ));
        }
        Ok(())
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        Self::check_tool(&self.config.ffmpeg_path, |path| {
            ConverterError::FfmpegNotFound { path }
        })
        .await?;

        Self::check_tool(&self.config.ffprobe_path, |path| {
            ConverterError::FfprobeNotFound { path }
        })
        .await
    }
}
