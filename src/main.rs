//! Ambience CLI - an ambient sound mixer for the terminal
//!
//! Mixes a small set of looping ambient sounds (white noise, rain, birds,
//! waves, road) with per-sound volume, a play/pause/stop transport, and a
//! sleep timer that stops everything when it expires. A background daemon
//! owns the audio session; this CLI is its control surface.

use anyhow::Result;
use clap::{CommandFactory, Parser};

pub mod audio;
pub mod cli;
pub mod daemon;
pub mod session;
pub mod types;

use cli::{minutes_to_millis, Cli, Commands, DaemonArgs, Display, IpcClient};
use types::SessionConfig;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    // Set verbose logging if requested
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Add(args)) => {
            let client = IpcClient::new()?;
            let response = client.add(args.sound, args.file).await?;
            Display::show_add_success(&response);
        }
        Some(Commands::Remove { sound }) => {
            let client = IpcClient::new()?;
            let response = client.remove(sound).await?;
            Display::show_remove_success(&response);
        }
        Some(Commands::Volume { sound, percent }) => {
            let client = IpcClient::new()?;
            let response = client.volume(sound, percent).await?;
            Display::show_volume_success(&response);
        }
        Some(Commands::Play) => {
            let client = IpcClient::new()?;
            let response = client.play().await?;
            Display::show_play_success(&response);
        }
        Some(Commands::Pause) => {
            let client = IpcClient::new()?;
            let response = client.pause().await?;
            Display::show_pause_success(&response);
        }
        Some(Commands::Stop) => {
            let client = IpcClient::new()?;
            let response = client.stop().await?;
            Display::show_stop_success(&response);
        }
        Some(Commands::Status) => {
            let client = IpcClient::new()?;
            let response = client.status().await?;
            Display::show_status(&response);
        }
        Some(Commands::Timer(args)) => {
            let client = IpcClient::new()?;
            let response = client.timer(minutes_to_millis(args.minutes)).await?;
            Display::show_timer_success(&response);
        }
        Some(Commands::Daemon(args)) => {
            run_daemon(args).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs the daemon with the given arguments.
async fn run_daemon(args: DaemonArgs) -> Result<()> {
    let socket_path = match args.socket {
        Some(path) => path,
        None => daemon::default_socket_path()?,
    };

    let mut config = SessionConfig::default().with_default_volume(args.default_volume);
    if let Some(dir) = args.sounds_dir {
        config = config.with_sounds_dir(dir);
    }

    let options = daemon::DaemonOptions {
        socket_path,
        config,
        no_audio: args.no_audio,
    };

    daemon::run(options).await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use types::SoundId;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["ambience"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["ambience", "status"]);
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_cli_parse_add_with_file() {
        let cli = Cli::parse_from(["ambience", "add", "rain", "--file", "/tmp/rain.ogg"]);
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.sound, SoundId::Rain);
                assert!(args.file.is_some());
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_cli_parse_timer_minutes() {
        let cli = Cli::parse_from(["ambience", "timer", "30"]);
        match cli.command {
            Some(Commands::Timer(args)) => {
                assert_eq!(minutes_to_millis(args.minutes), 1_800_000);
            }
            _ => panic!("Expected Timer command"),
        }
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["ambience", "--verbose", "status"]);
        assert!(cli.verbose);
    }
}
