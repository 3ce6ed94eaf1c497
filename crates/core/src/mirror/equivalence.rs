//! Existence and duration-equivalence check for transcoded outputs.

use std::path::Path;

use crate::converter::Converter;

use super::config::MirrorConfig;

/// Largest duration difference, in seconds, at which an existing output is
/// treated as already converted.
pub const DURATION_TOLERANCE_SECS: f64 = 0.1;

/// Absorbs the rounding of decimal durations, e.g. `1.1 - 1.0`.
const ROUNDING_SLACK_SECS: f64 = 1e-9;

/// Whether two durations are equivalent.
pub fn within_tolerance(input_secs: f64, output_secs: f64) -> bool {
    (input_secs - output_secs).abs() <= DURATION_TOLERANCE_SECS + ROUNDING_SLACK_SECS
}

/// Decides whether an existing output can be kept.
///
/// Without `skip_existing`, both files are probed; a failed probe means the
/// equivalence is unknown and the file is reprocessed.
pub async fn should_skip_existing<C: Converter + ?Sized>(
    config: &MirrorConfig,
    converter: &C,
    input: &Path,
    output: &Path,
) -> bool {
    if !output.exists() {
        return false;
    }
    if config.skip_existing {
        return true;
    }

    let input_secs = match probe_duration(converter, input).await {
        Some(secs) => secs,
        None => return false,
    };
    let output_secs = match probe_duration(converter, output).await {
        Some(secs) => secs,
        None => return false,
    };

    let equivalent = within_tolerance(input_secs, output_secs);
    tracing::debug!(
        input = %input.display(),
        input_secs,
        output_secs,
        equivalent,
        "Compared durations"
    );
    equivalent
}

async fn probe_duration<C: Converter + ?Sized>(converter: &C, path: &Path) -> Option<f64> {
    let result = match converter.probe(path).await {
        Ok(info) => info.audio_duration_secs(),
        Err(e) => Err(e),
    };

    match result {
        Ok(secs) => Some(secs),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Duration unknown");
            None
        }
    }
}
