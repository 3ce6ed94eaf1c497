use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use msic_core::AudioMode;

#[derive(Parser)]
#[command(name = "msic")]
#[command(author, version, about = "Mirror a music library, transcoding audio on the way")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "MSIC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mirror input directories into an output directory
    Copy {
        #[command(flatten)]
        mirror: MirrorArgs,

        /// How audio files are handled
        #[arg(long, value_enum, default_value_t = AudioArg::Compress)]
        audio: AudioArg,

        /// Write probe metadata and cover art next to audio files
        #[arg(long)]
        metadata: bool,
    },

    /// Mirror input directories, compressing every audio file
    Compress {
        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Rewrite the paths of an M3U playlist
    Playlist(PlaylistArgs),
}

/// Options shared by the mirroring commands.
#[derive(Args)]
pub struct MirrorArgs {
    /// Input directories followed by the output directory
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Overwrite output files (the default)
    #[arg(short = 'y')]
    pub overwrite: bool,

    /// Don't overwrite output files
    #[arg(short = 'n')]
    pub no_overwrite: bool,

    /// Keep existing outputs without checking them
    #[arg(long)]
    pub skip_existing: bool,

    /// Don't copy files that are not audio
    #[arg(long)]
    pub skip_non_audio: bool,

    /// Bitrate of transcoded audio in kbps
    #[arg(long, value_name = "KBPS")]
    pub bitrate: Option<u32>,

    /// Files processed concurrently per directory
    #[arg(short = 'j', long = "jobs", value_name = "JOBS")]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct PlaylistArgs {
    /// Input m3u file
    pub input: PathBuf,

    /// Output m3u file
    pub output: PathBuf,

    /// Make the files relative to this directory. When not specified, paths
    /// are not altered unless --absolute is set
    #[arg(long, value_name = "DIR")]
    pub relative_to: Option<PathBuf>,

    /// Prefix added to all relative paths. Not valid with --absolute
    #[arg(long, value_name = "PREFIX")]
    pub relative_prefix: Option<PathBuf>,

    /// Make the entries absolute, relative to the input playlist's directory
    /// unless --relative-to is given
    #[arg(long)]
    pub absolute: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AudioArg {
    /// Skip audio files
    None,
    /// Copy audio files unchanged
    Raw,
    /// Transcode audio files
    Compress,
}

impl From<AudioArg> for AudioMode {
    fn from(arg: AudioArg) -> Self {
        match arg {
            AudioArg::None => AudioMode::None,
            AudioArg::Raw => AudioMode::Raw,
            AudioArg::Compress => AudioMode::Compress,
        }
    }
}

/// Invalid command line. Reported before anything touches the filesystem.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("You must provide inputs")]
    MissingInputs,

    #[error("You cannot use both -y and -n at the same time!")]
    ConflictingOverwrite,

    #[error("Input is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("--jobs must be at least 1")]
    ZeroJobs,

    #[error("--bitrate must be greater than 0")]
    ZeroBitrate,
}

impl MirrorArgs {
    /// Splits the positionals into inputs and the output (the last one).
    pub fn split_paths(&self) -> Result<(Vec<PathBuf>, PathBuf), UsageError> {
        match self.paths.split_last() {
            Some((output, inputs)) if !inputs.is_empty() => Ok((inputs.to_vec(), output.clone())),
            _ => Err(UsageError::MissingInputs),
        }
    }

    /// Effective overwrite flag. `-y` is the default.
    pub fn overwrite(&self) -> Result<bool, UsageError> {
        if self.overwrite && self.no_overwrite {
            return Err(UsageError::ConflictingOverwrite);
        }
        Ok(!self.no_overwrite)
    }

    /// Checks everything that doesn't need configuration.
    pub fn validate(&self) -> Result<(Vec<PathBuf>, PathBuf, bool), UsageError> {
        let (inputs, output) = self.split_paths()?;
        let overwrite = self.overwrite()?;

        if self.jobs == Some(0) {
            return Err(UsageError::ZeroJobs);
        }
        if self.bitrate == Some(0) {
            return Err(UsageError::ZeroBitrate);
        }
        if let Some(input) = inputs.iter().find(|input| !input.is_dir()) {
            return Err(UsageError::NotADirectory(input.clone()));
        }

        Ok((inputs, output, overwrite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn mirror_args(cli: Cli) -> MirrorArgs {
        match cli.command {
            Commands::Copy { mirror, .. } | Commands::Compress { mirror } => mirror,
            Commands::Playlist(_) => panic!("not a mirror command"),
        }
    }

    #[test]
    fn test_last_positional_is_output() {
        let args = mirror_args(parse(&["msic", "compress", "a", "b", "out"]));
        let (inputs, output) = args.split_paths().unwrap();
        assert_eq!(inputs, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(output, PathBuf::from("out"));
    }

    #[test]
    fn test_missing_inputs() {
        let args = mirror_args(parse(&["msic", "copy", "out"]));
        assert!(matches!(args.split_paths(), Err(UsageError::MissingInputs)));

        let args = mirror_args(parse(&["msic", "copy"]));
        assert!(matches!(args.split_paths(), Err(UsageError::MissingInputs)));
    }

    #[test]
    fn test_overwrite_flags() {
        let args = mirror_args(parse(&["msic", "copy", "in", "out"]));
        assert!(args.overwrite().unwrap());

        let args = mirror_args(parse(&["msic", "copy", "-n", "in", "out"]));
        assert!(!args.overwrite().unwrap());

        let args = mirror_args(parse(&["msic", "copy", "-y", "-n", "in", "out"]));
        assert!(matches!(
            args.overwrite(),
            Err(UsageError::ConflictingOverwrite)
        ));
    }

    #[test]
    fn test_copy_defaults_and_globals() {
        let cli = parse(&["msic", "copy", "in", "out", "-v", "--config", "msic.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("msic.toml")));
        match cli.command {
            Commands::Copy {
                audio, metadata, ..
            } => {
                assert!(audio == AudioArg::Compress);
                assert!(!metadata);
            }
            _ => panic!("expected copy"),
        }
    }

    #[test]
    fn test_audio_none() {
        let cli = parse(&["msic", "copy", "--audio", "none", "--metadata", "in", "out"]);
        match cli.command {
            Commands::Copy { audio, .. } => {
                assert_eq!(AudioMode::from(audio), AudioMode::None)
            }
            _ => panic!("expected copy"),
        }
    }

    #[test]
    fn test_zero_jobs() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().to_str().unwrap();
        let args = mirror_args(parse(&["msic", "compress", "-j", "0", input, "out"]));
        assert!(matches!(args.validate(), Err(UsageError::ZeroJobs)));
    }

    #[test]
    fn test_input_must_be_directory() {
        let args = mirror_args(parse(&["msic", "compress", "/nonexistent/in", "out"]));
        assert!(matches!(
            args.validate(),
            Err(UsageError::NotADirectory(_))
        ));
    }
}
