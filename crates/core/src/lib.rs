pub mod classifier;
pub mod config;
pub mod converter;
pub mod mirror;
pub mod placer;
pub mod playlist;
pub mod testing;

pub use classifier::{
    ClassifierConfig, ClassifierError, ContentClassifier, ContentType, FileCommandClassifier,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, EngineConfig, PresetsConfig,
};
pub use converter::{
    AudioFormat, ConversionJob, ConversionResult, Converter, ConverterConfig, ConverterError,
    EncodingProfile, FfmpegConverter, MediaInfo, StreamInfo,
};
pub use mirror::{
    Action, AudioMode, FileOutcome, MirrorConfig, MirrorEngine, MirrorError, RunReport,
    SkipReason,
};
pub use placer::{FsPlacer, PlacedFile, PlacerConfig, PlacerError};
pub use playlist::{rewrite_file, PlaylistConfig, PlaylistError};
