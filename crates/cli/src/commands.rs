use anyhow::{Context, Result};
use std::path::Path;
use tokio::sync::watch;
use tracing::{error, info, warn};

use msic_core::{
    load_config_or_default, rewrite_file, validate_config, AudioMode, FileCommandClassifier,
    FfmpegConverter, FsPlacer, MirrorConfig, MirrorEngine, PlaylistConfig,
};

use crate::cli::{MirrorArgs, PlaylistArgs};

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Success,
    /// Some files failed; the rest were processed.
    PartialFailure,
    Interrupted,
}

impl Completion {
    pub fn exit_code(self) -> u8 {
        match self {
            Completion::Success => 0,
            Completion::PartialFailure => 2,
            Completion::Interrupted => 130,
        }
    }
}

/// Which configured encoding preset a command starts from.
#[derive(Debug, Clone, Copy)]
pub enum Preset {
    Copy,
    Compress,
}

/// Runs the mirror engine for `copy` and `compress`.
pub async fn mirror(
    config_path: Option<&Path>,
    args: &MirrorArgs,
    audio_mode: AudioMode,
    emit_metadata: bool,
    preset: Preset,
    cancel: watch::Receiver<bool>,
) -> Result<Completion> {
    let (inputs, output, overwrite) = args.validate()?;

    if let Some(path) = config_path {
        info!("Loading configuration from {:?}", path);
    }
    let config = load_config_or_default(config_path).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;

    let mut profile = match preset {
        Preset::Copy => config.presets.copy.clone(),
        Preset::Compress => config.presets.compress.clone(),
    };
    if let Some(bitrate) = args.bitrate {
        profile = profile.with_bitrate(bitrate);
    }

    let mirror_config = MirrorConfig {
        overwrite,
        audio_mode,
        skip_existing: args.skip_existing,
        skip_non_audio: args.skip_non_audio,
        emit_metadata,
        profile,
        max_parallel_files: args.jobs.unwrap_or(config.engine.max_parallel_files),
    };

    let engine = MirrorEngine::new(
        mirror_config,
        FfmpegConverter::new(config.converter),
        FileCommandClassifier::new(config.classifier),
        FsPlacer::new(config.placer),
    )
    .with_cancellation(cancel);
    engine.validate().await?;

    let report = engine.run(&inputs, &output).await?;

    if report.cancelled {
        warn!("Interrupted, outputs written so far are complete");
        return Ok(Completion::Interrupted);
    }
    if report.has_failures() {
        for failure in &report.failures {
            error!(path = %failure.path.display(), "{}", failure.error);
        }
        warn!("{} file(s) failed", report.failures.len());
        return Ok(Completion::PartialFailure);
    }

    Ok(Completion::Success)
}

/// Runs the `playlist` command.
pub async fn playlist(args: &PlaylistArgs) -> Result<Completion> {
    let config = PlaylistConfig {
        relative_to: args.relative_to.clone(),
        relative_prefix: args.relative_prefix.clone(),
        make_absolute: args.absolute,
    };
    config.validate()?;

    rewrite_file(&config, &FsPlacer::with_defaults(), &args.input, &args.output)
        .await
        .with_context(|| format!("Failed to rewrite {:?}", args.input))?;

    Ok(Completion::Success)
}
