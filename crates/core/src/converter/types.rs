//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConverterError;

/// Audio format of transcoded outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// MPEG Audio Layer III
    Mp3,
    /// Advanced Audio Coding
    Aac,
    /// Ogg Vorbis
    OggVorbis,
    /// Opus
    Opus,
    /// Free Lossless Audio Codec (lossless)
    Flac,
}

impl AudioFormat {
    /// Returns the file extension appended to transcoded outputs.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Aac => "m4a",
            Self::OggVorbis => "ogg",
            Self::Opus => "opus",
            Self::Flac => "flac",
        }
    }

    /// Returns the ffmpeg encoder name for this format.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::Aac => "aac",
            Self::OggVorbis => "libvorbis",
            Self::Opus => "libopus",
            Self::Flac => "flac",
        }
    }

    /// Whether this format is lossless (bitrate does not apply).
    pub fn is_lossless(&self) -> bool {
        matches!(self, Self::Flac)
    }
}

/// Encoding preset handed to the transcoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingProfile {
    /// Target audio format.
    #[serde(default = "default_format")]
    pub format: AudioFormat,
    /// Target bitrate in kbps (ignored for lossless formats).
    pub bitrate_kbps: u32,
    /// Carry container metadata from the first input (`-map_metadata 0`).
    #[serde(default = "default_true")]
    pub map_metadata: bool,
}

fn default_format() -> AudioFormat {
    AudioFormat::Mp3
}

fn default_true() -> bool {
    true
}

impl EncodingProfile {
    /// Preset used by the `copy` subcommand.
    pub fn copy_preset() -> Self {
        Self {
            format: AudioFormat::Mp3,
            bitrate_kbps: 256,
            map_metadata: true,
        }
    }

    /// Preset used by the `compress` subcommand.
    pub fn compress_preset() -> Self {
        Self {
            format: AudioFormat::Mp3,
            bitrate_kbps: 64,
            map_metadata: true,
        }
    }

    /// Overrides the bitrate.
    pub fn with_bitrate(mut self, bitrate_kbps: u32) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }
}

/// A single transcode request.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionJob {
    /// Source file.
    pub input_path: PathBuf,
    /// File the encoder writes to.
    pub output_path: PathBuf,
    /// Codec and bitrate settings.
    pub profile: EncodingProfile,
    /// Whether the encoder may replace an existing `output_path`.
    pub overwrite: bool,
}

/// Result of a successful transcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Path that was written.
    pub output_path: PathBuf,
    /// Size of the written file.
    pub output_size_bytes: u64,
    /// Wall-clock time spent in the encoder.
    pub duration_ms: u64,
}

/// One stream reported by the prober.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub index: u32,
    /// `audio`, `video`, `subtitle`, `data`...
    pub codec_type: String,
    pub codec_name: Option<String>,
    pub duration_secs: Option<f64>,
}

/// Probe result for a media file.
///
/// `raw` keeps the full prober document so it can be persisted verbatim in
/// metadata sidecars; the other fields are the parts the engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub format_name: Option<String>,
    /// Container-level duration.
    pub duration_secs: Option<f64>,
    pub streams: Vec<StreamInfo>,
    pub raw: serde_json::Value,
}

impl MediaInfo {
    /// First audio stream, if any.
    pub fn audio_stream(&self) -> Option<&StreamInfo> {
        self.streams.iter().find(|s| s.codec_type == "audio")
    }

    /// First video stream (embedded cover art for audio files), if any.
    pub fn video_stream(&self) -> Option<&StreamInfo> {
        self.streams.iter().find(|s| s.codec_type == "video")
    }

    pub fn has_video_stream(&self) -> bool {
        self.video_stream().is_some()
    }

    /// Duration of the first audio stream.
    ///
    /// Falls back to the container duration when the stream does not carry
    /// one. Fails when there is no audio stream at all.
    pub fn audio_duration_secs(&self) -> Result<f64, ConverterError> {
        let stream = self
            .audio_stream()
            .ok_or_else(|| ConverterError::NoAudioStream {
                path: self.path.clone(),
            })?;

        stream
            .duration_secs
            .or(self.duration_secs)
            .ok_or_else(|| ConverterError::DurationUnavailable {
                path: self.path.clone(),
            })
    }

    /// Builds a minimal audio-only probe result.
    pub fn audio_only(path: impl AsRef<Path>, duration_secs: f64) -> Self {
        let path = path.as_ref().to_path_buf();
        let raw = serde_json::json!({
            "streams": [{
                "index": 0,
                "codec_type": "audio",
                "duration": duration_secs.to_string(),
            }],
            "format": {
                "filename": path.display().to_string(),
                "duration": duration_secs.to_string(),
            },
        });

        Self {
            path,
            format_name: None,
            duration_secs: Some(duration_secs),
            streams: vec![StreamInfo {
                index: 0,
                codec_type: "audio".to_string(),
                codec_name: None,
                duration_secs: Some(duration_secs),
            }],
            raw,
        }
    }
}
