use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Timeouts, worker count and buffer size are not 0
/// - Preset bitrates are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.converter.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.classifier.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "classifier.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.placer.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "placer.buffer_size cannot be 0".to_string(),
        ));
    }

    if config.engine.max_parallel_files == 0 {
        return Err(ConfigError::ValidationError(
            "engine.max_parallel_files cannot be 0".to_string(),
        ));
    }

    for (name, preset) in [
        ("copy", &config.presets.copy),
        ("compress", &config.presets.compress),
    ] {
        if preset.bitrate_kbps == 0 && !preset.format.is_lossless() {
            return Err(ConfigError::ValidationError(format!(
                "presets.{}.bitrate_kbps cannot be 0",
                name
            )));
        }
    }

    Ok(())
}
