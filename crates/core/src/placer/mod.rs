//! Placer module: puts finished outputs at their final destination.
//!
//! Every output of a run is first written under a partial name next to its
//! destination and then renamed into place, so a file under its final name is
//! always complete. A failed or abandoned write removes its partial file.
//!
//! # Features
//!
//! - Atomic rename into place, with a copy fallback across filesystems
//! - Lazy parent directory creation
//! - SHA-256 digests of placed files
//!
//! # Example
//!
//! ```ignore
//! use msic_core::placer::FsPlacer;
//!
//! let placer = FsPlacer::with_defaults();
//! placer.copy_atomic(Path::new("/music/notes.txt"), Path::new("/mirror/notes.txt")).await?;
//! placer.write_atomic(Path::new("/mirror/a.flac.metadata.json"), b"{}").await?;
//! ```

mod config;
mod error;
mod fs_placer;
mod partial;
mod types;

pub use config::PlacerConfig;
pub use error::PlacerError;
pub use fs_placer::FsPlacer;
pub use partial::{is_partial_path, partial_path, PartialFile};
pub use types::PlacedFile;
