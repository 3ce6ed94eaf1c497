//! Per-file decision policy.
//!
//! Pure functions of the run configuration, the file's content type and the
//! state of its copy destination. No I/O happens here.

use serde::Serialize;

use crate::classifier::ContentType;

use super::config::{AudioMode, MirrorConfig};

/// What happens to one regular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Non-audio file dropped by `skip_non_audio`.
    SkipNonAudio,
    /// Audio file with no copy and no metadata requested.
    SkipAudio,
    /// Copy destination exists and `skip_existing` is set.
    SkipExistingOutput,
    /// Existing transcode has the same duration as the input.
    SkipEquivalentDuration,
    /// Byte-for-byte copy.
    RawCopy,
    /// Byte-for-byte copy plus metadata sidecars.
    RawCopyAndMetadata,
    /// Audio transcode.
    Transcode,
    /// Audio transcode plus metadata sidecars.
    TranscodeAndMetadata,
    /// Metadata sidecars only.
    MetadataOnly,
}

impl Action {
    /// Whether the action writes nothing.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Action::SkipNonAudio
                | Action::SkipAudio
                | Action::SkipExistingOutput
                | Action::SkipEquivalentDuration
        )
    }

    /// Whether the action transcodes.
    pub fn is_transcode(&self) -> bool {
        matches!(self, Action::Transcode | Action::TranscodeAndMetadata)
    }

    /// Whether the action copies bytes.
    pub fn is_raw_copy(&self) -> bool {
        matches!(self, Action::RawCopy | Action::RawCopyAndMetadata)
    }

    /// Whether the action writes metadata sidecars.
    pub fn emits_metadata(&self) -> bool {
        matches!(
            self,
            Action::RawCopyAndMetadata | Action::TranscodeAndMetadata | Action::MetadataOnly
        )
    }
}

/// Kind of the main output of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKind {
    /// Output is a copy under the same name.
    Raw,
    /// Output is a transcode with the profile's extension appended.
    Transcode,
}

/// Returns the kind of copy a file of this content type gets, if any.
pub fn copy_kind(config: &MirrorConfig, content_type: &ContentType) -> Option<CopyKind> {
    if !content_type.is_audio() {
        return if config.skip_non_audio {
            None
        } else {
            Some(CopyKind::Raw)
        };
    }

    match config.audio_mode {
        AudioMode::None => None,
        AudioMode::Raw => Some(CopyKind::Raw),
        AudioMode::Compress => Some(CopyKind::Transcode),
    }
}

/// Chooses the action for a regular file.
///
/// `destination_exists` refers to the destination of [`copy_kind`]; it is
/// ignored when the file gets no copy.
pub fn decide(config: &MirrorConfig, content_type: &ContentType, destination_exists: bool) -> Action {
    let is_audio = content_type.is_audio();

    let Some(kind) = copy_kind(config, content_type) else {
        return if !is_audio {
            Action::SkipNonAudio
        } else if config.emit_metadata {
            Action::MetadataOnly
        } else {
            Action::SkipAudio
        };
    };

    if destination_exists && config.skip_existing {
        return Action::SkipExistingOutput;
    }

    // Non-audio files never get metadata
    let metadata = is_audio && config.emit_metadata;
    match (kind, metadata) {
        (CopyKind::Raw, false) => Action::RawCopy,
        (CopyKind::Raw, true) => Action::RawCopyAndMetadata,
        (CopyKind::Transcode, false) => Action::Transcode,
        (CopyKind::Transcode, true) => Action::TranscodeAndMetadata,
    }
}
