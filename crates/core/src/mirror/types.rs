//! Types for the mirror engine.

use serde::Serialize;
use std::path::PathBuf;

use super::policy::Action;

/// Why a file produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Non-audio file with `skip_non_audio`.
    NonAudio,
    /// Audio file with nothing requested for it.
    AudioDisabled,
    /// Output exists and `skip_existing` is set.
    ExistingOutput,
    /// Existing transcode matches the input duration.
    EquivalentDuration,
    /// Output exists and overwriting is disabled.
    NoOverwrite,
}

impl SkipReason {
    /// Skip reason of a skip action.
    pub fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::SkipNonAudio => Some(Self::NonAudio),
            Action::SkipAudio => Some(Self::AudioDisabled),
            Action::SkipExistingOutput => Some(Self::ExistingOutput),
            Action::SkipEquivalentDuration => Some(Self::EquivalentDuration),
            _ => None,
        }
    }
}

/// Result of processing one regular file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// At least one output was written.
    Written {
        source: PathBuf,
        action: Action,
        outputs: Vec<PathBuf>,
    },
    /// Nothing was written.
    Skipped { source: PathBuf, reason: SkipReason },
    /// Processing failed; siblings go on.
    Failed { source: PathBuf, error: String },
}

impl FileOutcome {
    pub fn source(&self) -> &PathBuf {
        match self {
            Self::Written { source, .. } | Self::Skipped { source, .. } | Self::Failed { source, .. } => {
                source
            }
        }
    }
}

/// A per-file failure kept in the run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Summary of a mirror run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Directories visited.
    pub directories: usize,
    /// Regular files handled.
    pub files_seen: usize,
    /// Files with at least one output written.
    pub files_processed: usize,
    /// Files that produced no output.
    pub files_skipped: usize,
    /// Output files written (copies, transcodes, sidecars, artwork).
    pub outputs_written: usize,
    /// Transcodes performed.
    pub transcodes: usize,
    /// Entries that are neither regular files nor directories.
    pub unknown_entries: usize,
    /// Per-file failures.
    pub failures: Vec<FileFailure>,
    /// Whether the run was interrupted.
    pub cancelled: bool,
}

impl RunReport {
    /// Adds the outcome of one file.
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_seen += 1;
        match outcome {
            FileOutcome::Written {
                action, outputs, ..
            } => {
                self.files_processed += 1;
                self.outputs_written += outputs.len();
                if action.is_transcode() {
                    self.transcodes += 1;
                }
            }
            FileOutcome::Skipped { .. } => self.files_skipped += 1,
            FileOutcome::Failed { source, error } => self.failures.push(FileFailure {
                path: source.clone(),
                error: error.clone(),
            }),
        }
    }

    /// Records a failure not tied to a regular file (unreadable directory).
    pub fn record_failure(&mut self, path: PathBuf, error: impl ToString) {
        self.failures.push(FileFailure {
            path,
            error: error.to_string(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record() {
        let mut report = RunReport::default();
        report.record(&FileOutcome::Written {
            source: PathBuf::from("/in/a.wav"),
            action: Action::TranscodeAndMetadata,
            outputs: vec![
                PathBuf::from("/out/a.wav.mp3"),
                PathBuf::from("/out/a.wav.metadata.json"),
            ],
        });
        report.record(&FileOutcome::Skipped {
            source: PathBuf::from("/in/b.txt"),
            reason: SkipReason::NonAudio,
        });
        report.record(&FileOutcome::Failed {
            source: PathBuf::from("/in/c.flac"),
            error: "boom".to_string(),
        });

        assert_eq!(report.files_seen, 3);
        assert_eq!(report.files_processed, 1);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(report.outputs_written, 2);
        assert_eq!(report.transcodes, 1);
        assert!(report.has_failures());
        assert_eq!(report.failures[0].path, PathBuf::from("/in/c.flac"));
    }

    #[test]
    fn test_skip_reason_from_action() {
        assert_eq!(
            SkipReason::from_action(Action::SkipEquivalentDuration),
            Some(SkipReason::EquivalentDuration)
        );
        assert_eq!(SkipReason::from_action(Action::RawCopy), None);
    }

    #[test]
    fn test_outcome_serializes_with_status() {
        let outcome = FileOutcome::Skipped {
            source: PathBuf::from("/in/a.mp3"),
            reason: SkipReason::ExistingOutput,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"], "existing_output");
    }
}
