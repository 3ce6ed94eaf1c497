//! Trait definitions for the classifier module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ClassifierError;
use super::types::ContentType;

/// Detects the coarse content type of a file.
#[async_trait]
pub trait ContentClassifier: Send + Sync {
    /// Returns the name of this classifier implementation.
    fn name(&self) -> &str;

    /// Classifies a single file.
    async fn classify(&self, path: &Path) -> Result<ContentType, ClassifierError>;

    /// Checks that the classifier can run at all.
    ///
    /// Fails with [`ClassifierError::Unavailable`] when the underlying
    /// facility is missing.
    async fn validate(&self) -> Result<(), ClassifierError>;
}
