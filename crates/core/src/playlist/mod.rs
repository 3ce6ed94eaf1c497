//! Playlist module: rewrites the paths of M3U/M3U8 playlists.
//!
//! Entries can be made relative to a directory (optionally under a prefix)
//! or absolute. URLs, comments and directives pass through unchanged.
//!
//! # Example
//!
//! ```ignore
//! use msic_core::placer::FsPlacer;
//! use msic_core::playlist::{rewrite_file, PlaylistConfig};
//!
//! let config = PlaylistConfig {
//!     relative_to: Some(PathBuf::from("/music")),
//!     relative_prefix: Some(PathBuf::from("../mirror")),
//!     make_absolute: false,
//! };
//! rewrite_file(&config, &FsPlacer::with_defaults(), input, output).await?;
//! ```

mod config;
mod error;
mod rewrite;

pub use config::PlaylistConfig;
pub use error::PlaylistError;
pub use rewrite::{is_url, rewrite_entry, rewrite_file, rewrite_playlist};
