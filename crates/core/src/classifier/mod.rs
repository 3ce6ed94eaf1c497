//! Classifier module: coarse content-type detection for input files.
//!
//! The engine only asks one question of a classifier: does the content type
//! of this file contain `audio`? The production implementation shells out to
//! libmagic's `file` command in MIME-type mode.
//!
//! A missing classifier is a configuration failure of the whole run, never a
//! per-file error; callers should run [`ContentClassifier::validate`] before
//! touching the filesystem.

mod config;
mod error;
mod file_command;
mod traits;
mod types;

pub use config::ClassifierConfig;
pub use error::ClassifierError;
pub use file_command::FileCommandClassifier;
pub use traits::ContentClassifier;
pub use types::ContentType;
