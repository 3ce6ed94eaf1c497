mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use msic_core::{ConfigError, MirrorError, PlaylistError};

use cli::{Cli, Commands, UsageError};
use commands::{Completion, Preset};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose, cli.json_logs);

    match run(cli).await {
        Ok(completion) => ExitCode::from(completion.exit_code()),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<Completion> {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping");
            let _ = cancel_tx.send(true);
        }
    });

    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Copy {
            mirror,
            audio,
            metadata,
        } => {
            commands::mirror(
                config_path,
                mirror,
                (*audio).into(),
                *metadata,
                Preset::Copy,
                cancel_rx,
            )
            .await
        }
        Commands::Compress { mirror } => {
            commands::mirror(
                config_path,
                mirror,
                msic_core::AudioMode::Compress,
                false,
                Preset::Compress,
                cancel_rx,
            )
            .await
        }
        Commands::Playlist(args) => commands::playlist(args).await,
    }
}

/// Maps a failed command to its exit code.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<UsageError>().is_some() {
        return 1;
    }
    if let Some(e) = err.downcast_ref::<PlaylistError>() {
        return if e.is_usage() { 1 } else { 2 };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return 3;
    }
    if let Some(e) = err.downcast_ref::<MirrorError>() {
        return match e {
            MirrorError::InputNotDirectory { .. } => 1,
            e if e.is_fatal() => 3,
            _ => 2,
        };
    }
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_for() {
        let err = anyhow::Error::from(UsageError::MissingInputs);
        assert_eq!(exit_code_for(&err), 1);

        let err = Err::<(), _>(ConfigError::FileNotFound("msic.toml".to_string()))
            .context("Failed to load configuration")
            .unwrap_err();
        assert_eq!(exit_code_for(&err), 3);

        let err = anyhow::Error::from(MirrorError::Configuration("ffmpeg missing".to_string()));
        assert_eq!(exit_code_for(&err), 3);

        let err = anyhow::Error::from(MirrorError::InputNotDirectory {
            path: PathBuf::from("/in"),
        });
        assert_eq!(exit_code_for(&err), 1);

        let err = anyhow::Error::from(PlaylistError::PrefixWithAbsolute);
        assert_eq!(exit_code_for(&err), 1);
    }
}
