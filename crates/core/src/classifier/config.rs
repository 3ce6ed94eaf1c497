//! Configuration for the classifier module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the `file` command classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Path to the `file` binary.
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,

    /// Timeout for a single classification in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_file_path() -> PathBuf {
    PathBuf::from("file")
}

fn default_timeout() -> u64 {
    30
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            file_path: default_file_path(),
            timeout_secs: default_timeout(),
        }
    }
}
