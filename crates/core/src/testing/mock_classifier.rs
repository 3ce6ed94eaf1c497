//! Mock content classifier for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::classifier::{ClassifierError, ContentClassifier, ContentType};

/// Mock implementation of the ContentClassifier trait.
///
/// Classifies by file extension unless a path has an explicit content type.
/// Can simulate a missing `file` binary. Clones share state.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    /// Explicit content types by path.
    overrides: Arc<RwLock<HashMap<PathBuf, ContentType>>>,
    /// Paths that fail to classify.
    failures: Arc<RwLock<HashMap<PathBuf, String>>>,
    /// Classified paths, in call order.
    classified: Arc<RwLock<Vec<PathBuf>>>,
    /// Whether the classifier behaves as if its binary were missing.
    unavailable: Arc<RwLock<bool>>,
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClassifier {
    /// Create a new mock classifier.
    pub fn new() -> Self {
        Self {
            overrides: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            classified: Arc::new(RwLock::new(Vec::new())),
            unavailable: Arc::new(RwLock::new(false)),
        }
    }

    /// Set the content type reported for a specific path.
    pub async fn set_content_type(&self, path: impl AsRef<Path>, content_type: &str) {
        self.overrides
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), ContentType::new(content_type));
    }

    /// Make classification of a specific path fail.
    pub async fn fail_on(&self, path: impl AsRef<Path>, reason: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), reason.into());
    }

    /// Behave as if the `file` binary were missing.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Get the classified paths, in call order.
    pub async fn classified_paths(&self) -> Vec<PathBuf> {
        self.classified.read().await.clone()
    }

    /// MIME type guessed from the extension.
    fn guess(path: &Path) -> ContentType {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let mime = match extension.as_str() {
            "mp3" => "audio/mpeg",
            "flac" => "audio/flac",
            "wav" => "audio/x-wav",
            "ogg" | "opus" => "audio/ogg",
            "m4a" => "audio/x-m4a",
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "txt" | "cue" | "log" => "text/plain",
            "m3u" | "m3u8" => "audio/x-mpegurl",
            _ => "application/octet-stream",
        };
        ContentType::new(mime)
    }
}

#[async_trait]
impl ContentClassifier for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn classify(&self, path: &Path) -> Result<ContentType, ClassifierError> {
        self.classified.write().await.push(path.to_path_buf());

        if *self.unavailable.read().await {
            return Err(ClassifierError::Unavailable {
                path: PathBuf::from("file"),
            });
        }
        if let Some(reason) = self.failures.read().await.get(path) {
            return Err(ClassifierError::classification_failed(path, reason.clone()));
        }
        if let Some(content_type) = self.overrides.read().await.get(path) {
            return Ok(content_type.clone());
        }

        Ok(Self::guess(path))
    }

    async fn validate(&self) -> Result<(), ClassifierError> {
        if *self.unavailable.read().await {
            return Err(ClassifierError::Unavailable {
                path: PathBuf::from("file"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guess_by_extension() {
        let classifier = MockClassifier::new();

        let ct = classifier.classify(Path::new("/m/a.FLAC")).await.unwrap();
        assert!(ct.is_audio());

        let ct = classifier.classify(Path::new("/m/notes.txt")).await.unwrap();
        assert!(!ct.is_audio());
    }

    #[tokio::test]
    async fn test_override_and_failure() {
        let classifier = MockClassifier::new();
        classifier.set_content_type("/m/track", "audio/flac").await;
        classifier.fail_on("/m/bad.mp3", "cannot open").await;

        assert!(classifier
            .classify(Path::new("/m/track"))
            .await
            .unwrap()
            .is_audio());
        assert!(classifier.classify(Path::new("/m/bad.mp3")).await.is_err());
        assert_eq!(classifier.classified_paths().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let classifier = MockClassifier::new();
        classifier.set_unavailable(true).await;

        assert!(classifier.validate().await.unwrap_err().is_unavailable());
        let err = classifier.classify(Path::new("/m/a.mp3")).await.unwrap_err();
        assert!(err.is_unavailable());
    }
}
