use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierConfig;
use crate::converter::{ConverterConfig, EncodingProfile};
use crate::placer::PlacerConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub placer: PlacerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub presets: PresetsConfig,
}

/// Mirror engine configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Files of one directory processed concurrently
    #[serde(default = "default_max_parallel_files")]
    pub max_parallel_files: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_parallel_files: default_max_parallel_files(),
        }
    }
}

fn default_max_parallel_files() -> usize {
    4
}

/// Encoding presets of the `copy` and `compress` commands
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PresetsConfig {
    #[serde(default = "EncodingProfile::copy_preset")]
    pub copy: EncodingProfile,
    #[serde(default = "EncodingProfile::compress_preset")]
    pub compress: EncodingProfile,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            copy: EncodingProfile::copy_preset(),
            compress: EncodingProfile::compress_preset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::AudioFormat;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.engine.max_parallel_files, 4);
        assert_eq!(config.presets.copy.bitrate_kbps, 256);
        assert_eq!(config.presets.compress.bitrate_kbps, 64);
    }

    #[test]
    fn test_partial_preset() {
        let toml = r#"
[presets.compress]
bitrate_kbps = 96
format = "opus"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.presets.compress.bitrate_kbps, 96);
        assert_eq!(config.presets.compress.format, AudioFormat::Opus);
        assert!(config.presets.compress.map_metadata);
        assert_eq!(config.presets.copy, EncodingProfile::copy_preset());
    }

    #[test]
    fn test_config_serializes_back() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
