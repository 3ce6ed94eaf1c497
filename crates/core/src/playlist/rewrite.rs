//! Entry rewriting.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::{Path, PathBuf};

use crate::placer::FsPlacer;

use super::config::PlaylistConfig;
use super::error::PlaylistError;

/// URL scheme. Two characters minimum so `C:\...` stays a path.
static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]+:").expect("scheme pattern is valid"));

/// Whether a playlist entry is a URL rather than a path.
pub fn is_url(entry: &str) -> bool {
    URL_SCHEME.is_match(entry)
}

/// Rewrites one entry. `base` is the directory relative entries are resolved
/// against with `make_absolute`.
pub fn rewrite_entry(
    config: &PlaylistConfig,
    base: &Path,
    entry: &str,
) -> Result<String, PlaylistError> {
    if is_url(entry) {
        return Ok(entry.to_string());
    }

    let mut path = PathBuf::from(entry);

    if config.make_absolute {
        if path.is_relative() {
            let joined = base.join(&path);
            path = std::path::absolute(&joined).map_err(|e| PlaylistError::Absolute {
                path: joined.clone(),
                source: e,
            })?;
        }
    } else {
        if let Some(relative_to) = &config.relative_to {
            if path.is_absolute() {
                path = path
                    .strip_prefix(relative_to)
                    .map_err(|_| PlaylistError::OutsideBase {
                        entry: path.clone(),
                        base: relative_to.clone(),
                    })?
                    .to_path_buf();
            }
        }
        if let Some(prefix) = &config.relative_prefix {
            if path.is_relative() {
                path = prefix.join(&path);
            }
        }
    }

    Ok(path.to_string_lossy().into_owned())
}

/// Rewrites every entry of a playlist. Comments, directives and blank lines
/// are kept as they are.
pub fn rewrite_playlist(
    config: &PlaylistConfig,
    base: &Path,
    contents: &str,
) -> Result<String, PlaylistError> {
    config.validate()?;

    let mut output = String::with_capacity(contents.len());
    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            output.push_str(line);
        } else {
            output.push_str(&rewrite_entry(config, base, trimmed)?);
        }
        output.push('\n');
    }

    Ok(output)
}

/// Reads the playlist at `input`, rewrites it and writes it atomically to
/// `output`. Returns the number of rewritten entries.
pub async fn rewrite_file(
    config: &PlaylistConfig,
    placer: &FsPlacer,
    input: &Path,
    output: &Path,
) -> Result<usize, PlaylistError> {
    config.validate()?;

    let bytes = tokio::fs::read(input)
        .await
        .map_err(|e| PlaylistError::Read {
            path: input.to_path_buf(),
            source: e,
        })?;
    let contents = String::from_utf8(bytes).map_err(|_| PlaylistError::Encoding {
        path: input.to_path_buf(),
    })?;
    // M3U8 files may start with a byte order mark
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);

    let base = config.absolute_base(input);
    let rewritten = rewrite_playlist(config, &base, contents)?;
    let entries = rewritten
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .count();

    placer.write_atomic(output, rewritten.as_bytes()).await?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        entries,
        "Rewrote playlist"
    );

    Ok(entries)
}
