//! Converter module: the media prober and transcoder collaborators.
//!
//! The engine never decodes audio itself. It talks to a `Converter`, which
//! probes files for stream information, transcodes audio into the configured
//! format, and pulls embedded cover art out of audio files.
//!
//! # Example
//!
//! ```ignore
//! use msic_core::converter::{Converter, ConversionJob, EncodingProfile, FfmpegConverter};
//!
//! let converter = FfmpegConverter::with_defaults();
//! converter.validate().await?;
//!
//! let info = converter.probe(Path::new("/music/track.flac")).await?;
//! println!("Duration: {} seconds", info.audio_duration_secs()?);
//!
//! let job = ConversionJob {
//!     input_path: PathBuf::from("/music/track.flac"),
//!     output_path: PathBuf::from("/mirror/track.flac.mp3"),
//!     profile: EncodingProfile::copy_preset(),
//!     overwrite: true,
//! };
//! converter.convert(job).await?;
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{
    AudioFormat, ConversionJob, ConversionResult, EncodingProfile, MediaInfo, StreamInfo,
};
