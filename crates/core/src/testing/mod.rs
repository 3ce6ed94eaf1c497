//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the collaborator traits,
//! allowing the mirror engine to be tested without ffmpeg or libmagic.
//!
//! # Example
//!
//! ```rust,ignore
//! use msic_core::testing::{MockClassifier, MockConverter};
//!
//! let converter = MockConverter::new();
//! let classifier = MockClassifier::new();
//!
//! // Configure mock responses
//! converter.set_default_duration(200.0).await;
//! classifier.set_content_type("/music/track", "audio/flac").await;
//!
//! // Hand clones to the engine, keep the originals for assertions...
//! ```

mod mock_classifier;
mod mock_converter;

pub use mock_classifier::MockClassifier;
pub use mock_converter::{MockConverter, RecordedConversion};
