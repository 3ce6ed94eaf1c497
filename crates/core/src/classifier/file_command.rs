//! Classifier backed by libmagic's `file` command.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::config::ClassifierConfig;
use super::error::ClassifierError;
use super::traits::ContentClassifier;
use super::types::ContentType;

/// Runs `file --brief --mime-type` on each path.
///
/// MIME mode is used instead of the free-form description because the
/// description of an MP3 with ID3 tags ("Audio file with ID3...") does not
/// contain a lowercase `audio`.
pub struct FileCommandClassifier {
    config: ClassifierConfig,
}

impl FileCommandClassifier {
    /// Creates a new classifier with the given configuration.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Creates a classifier with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ClassifierConfig::default())
    }

    fn unavailable_or_io(&self, e: std::io::Error) -> ClassifierError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ClassifierError::Unavailable {
                path: self.config.file_path.clone(),
            }
        } else {
            ClassifierError::Io(e)
        }
    }

    /// Parses the output of `file --brief --mime-type`.
    fn parse_output(path: &Path, stdout: &str) -> Result<ContentType, ClassifierError> {
        let mime = stdout.lines().next().unwrap_or_default().trim();

        if mime.is_empty() {
            return Err(ClassifierError::classification_failed(
                path,
                "empty output from file",
            ));
        }
        if mime.starts_with("cannot open") {
            return Err(ClassifierError::classification_failed(path, mime));
        }

        Ok(ContentType::new(mime))
    }
}

#[async_trait]
impl ContentClassifier for FileCommandClassifier {
    fn name(&self) -> &str {
        "file"
    }

    async fn classify(&self, path: &Path) -> Result<ContentType, ClassifierError> {
        // `file` reports missing paths on stdout with a zero exit code
        if !path.exists() {
            return Err(ClassifierError::classification_failed(
                path,
                "file does not exist",
            ));
        }

        let child = Command::new(&self.config.file_path)
            .args(["--brief", "--mime-type", "--"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.unavailable_or_io(e))?;

        let output = timeout(
            Duration::from_secs(self.config.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| ClassifierError::Timeout {
            path: path.to_path_buf(),
            timeout_secs: self.config.timeout_secs,
        })??;

        if !output.status.success() {
            return Err(ClassifierError::classification_failed(
                path,
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }

        Self::parse_output(path, &String::from_utf8_lossy(&output.stdout))
    }

    async fn validate(&self) -> Result<(), ClassifierError> {
        let output = Command::new(&self.config.file_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.unavailable_or_io(e))?;

        if !output.status.success() {
            return Err(ClassifierError::Unavailable {
                path: self.config.file_path.clone(),
            });
        }
        Ok(())
    }
}
