//! Configuration for the mirror engine.

use serde::{Deserialize, Serialize};

use crate::converter::EncodingProfile;

use super::error::MirrorError;

/// How files classified as audio are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioMode {
    /// Audio files are not copied.
    None,
    /// Audio files are copied byte for byte.
    Raw,
    /// Audio files are transcoded with the run's encoding profile.
    #[default]
    Compress,
}

/// Settings of one mirror run. Immutable for the duration of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Permit replacing existing outputs.
    pub overwrite: bool,
    /// Handling of audio files.
    pub audio_mode: AudioMode,
    /// Treat an existing output as done without inspecting it.
    pub skip_existing: bool,
    /// Drop non-audio files instead of copying them.
    pub skip_non_audio: bool,
    /// Write the probe sidecar and cover art of audio files.
    pub emit_metadata: bool,
    /// Encoding profile used for transcodes.
    pub profile: EncodingProfile,
    /// Files of one directory processed concurrently.
    pub max_parallel_files: usize,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            overwrite: true,
            audio_mode: AudioMode::Compress,
            skip_existing: false,
            skip_non_audio: false,
            emit_metadata: false,
            profile: EncodingProfile::compress_preset(),
            max_parallel_files: 4,
        }
    }
}

impl MirrorConfig {
    /// Whether an existing output may be replaced.
    ///
    /// `skip_existing` wins over `overwrite`.
    pub fn effective_overwrite(&self) -> bool {
        self.overwrite && !self.skip_existing
    }

    /// Checks the settings before a run.
    pub fn validate(&self) -> Result<(), MirrorError> {
        if self.max_parallel_files == 0 {
            return Err(MirrorError::Configuration(
                "max_parallel_files must be at least 1".to_string(),
            ));
        }
        if self.audio_mode == AudioMode::Compress
            && self.profile.bitrate_kbps == 0
            && !self.profile.format.is_lossless()
        {
            return Err(MirrorError::Configuration(
                "bitrate must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MirrorConfig::default();
        assert!(config.overwrite);
        assert_eq!(config.audio_mode, AudioMode::Compress);
        assert_eq!(config.profile.bitrate_kbps, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_skip_existing_wins_over_overwrite() {
        let config = MirrorConfig {
            overwrite: true,
            skip_existing: true,
            ..Default::default()
        };
        assert!(!config.effective_overwrite());

        let config = MirrorConfig {
            overwrite: false,
            ..Default::default()
        };
        assert!(!config.effective_overwrite());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let config = MirrorConfig {
            max_parallel_files: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MirrorError::Configuration(_))
        ));
    }

    #[test]
    fn test_audio_mode_serde() {
        let mode: AudioMode = serde_json::from_str("\"raw\"").unwrap();
        assert_eq!(mode, AudioMode::Raw);
        assert_eq!(serde_json::to_string(&AudioMode::None).unwrap(), "\"none\"");
    }
}
