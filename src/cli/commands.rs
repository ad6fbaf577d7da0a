//! Command definitions for the ambient sound mixer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::SoundId;

// ============================================================================
// CLI Structure
// ============================================================================

/// Ambience - an ambient sound mixer for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "ambience",
    version,
    about = "環境音ミキサーCLI",
    long_about = "ターミナルから操作する環境音ミキサー。\n\
                  ホワイトノイズ・雨・鳥・波・道路の5種類の環境音を個別の音量で\n\
                  ミックス再生し、スリープタイマーで自動停止できます。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a sound to the mix
    Add(AddArgs),

    /// Remove a sound from the mix
    Remove {
        /// Sound name (white-noise, rain, birds, waves, road)
        #[arg(value_parser = parse_sound_name)]
        sound: SoundId,
    },

    /// Set the volume of a sound in the mix
    Volume {
        /// Sound name (white-noise, rain, birds, waves, road)
        #[arg(value_parser = parse_sound_name)]
        sound: SoundId,

        /// Volume percentage (0-100)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },

    /// Start playback of the mix
    Play,

    /// Pause playback, keeping the mix and timer remainder
    Pause,

    /// Stop playback and shut the session down
    Stop,

    /// Show the current mix and timer status
    Status,

    /// Set the sleep timer (takes effect on the next play)
    Timer(TimerArgs),

    /// Run as daemon (background service)
    #[command(hide = true)]
    Daemon(DaemonArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for the add command
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Sound name (white-noise, rain, birds, waves, road)
    #[arg(value_parser = parse_sound_name)]
    pub sound: SoundId,

    /// Audio file to use instead of the sound library
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Arguments for the timer command
#[derive(Args, Debug, Clone)]
pub struct TimerArgs {
    /// Timer duration in minutes (0 = off, max 12 hours)
    #[arg(value_parser = clap::value_parser!(u64).range(0..=720))]
    pub minutes: u64,
}

/// Arguments for the daemon command
#[derive(Args, Debug, Clone)]
pub struct DaemonArgs {
    /// Socket path to listen on (default: ~/.ambience/ambience.sock)
    #[arg(long)]
    pub socket: Option<PathBuf>,

    /// Directory holding the sound library
    #[arg(long)]
    pub sounds_dir: Option<PathBuf>,

    /// Volume percentage assigned to newly added sounds (0-100)
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub default_volume: u8,

    /// Run without audio hardware (silent session)
    #[arg(long)]
    pub no_audio: bool,
}

// ============================================================================
// Conversion Functions
// ============================================================================

/// Converts the UI-facing minute choice to the raw milliseconds the
/// session accepts.
#[must_use]
pub const fn minutes_to_millis(minutes: u64) -> u64 {
    minutes * 60 * 1000
}

/// Parses and validates a sound name argument.
fn parse_sound_name(s: &str) -> Result<SoundId, String> {
    s.parse()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["ambience"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["ambience", "--verbose"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_play_command() {
            let cli = Cli::parse_from(["ambience", "play"]);
            assert!(matches!(cli.command, Some(Commands::Play)));
        }

        #[test]
        fn test_parse_pause_command() {
            let cli = Cli::parse_from(["ambience", "pause"]);
            assert!(matches!(cli.command, Some(Commands::Pause)));
        }

        #[test]
        fn test_parse_stop_command() {
            let cli = Cli::parse_from(["ambience", "stop"]);
            assert!(matches!(cli.command, Some(Commands::Stop)));
        }

        #[test]
        fn test_parse_status_command() {
            let cli = Cli::parse_from(["ambience", "status"]);
            assert!(matches!(cli.command, Some(Commands::Status)));
        }

        #[test]
        fn test_parse_daemon_command() {
            let cli = Cli::parse_from(["ambience", "daemon"]);
            match cli.command {
                Some(Commands::Daemon(args)) => {
                    assert!(args.socket.is_none());
                    assert!(args.sounds_dir.is_none());
                    assert_eq!(args.default_volume, 50);
                    assert!(!args.no_audio);
                }
                _ => panic!("Expected Daemon command"),
            }
        }

        #[test]
        fn test_parse_daemon_options() {
            let cli = Cli::parse_from([
                "ambience",
                "daemon",
                "--socket",
                "/tmp/test.sock",
                "--sounds-dir",
                "/srv/sounds",
                "--default-volume",
                "30",
                "--no-audio",
            ]);
            match cli.command {
                Some(Commands::Daemon(args)) => {
                    assert_eq!(args.socket, Some(PathBuf::from("/tmp/test.sock")));
                    assert_eq!(args.sounds_dir, Some(PathBuf::from("/srv/sounds")));
                    assert_eq!(args.default_volume, 30);
                    assert!(args.no_audio);
                }
                _ => panic!("Expected Daemon command"),
            }
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["ambience", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Add / Remove / Volume Tests
    // ------------------------------------------------------------------------

    mod mix_command_tests {
        use super::*;

        #[test]
        fn test_parse_add() {
            let cli = Cli::parse_from(["ambience", "add", "rain"]);
            match cli.command {
                Some(Commands::Add(args)) => {
                    assert_eq!(args.sound, SoundId::Rain);
                    assert!(args.file.is_none());
                }
                _ => panic!("Expected Add command"),
            }
        }

        #[test]
        fn test_parse_add_kebab_case_sound() {
            let cli = Cli::parse_from(["ambience", "add", "white-noise"]);
            match cli.command {
                Some(Commands::Add(args)) => {
                    assert_eq!(args.sound, SoundId::WhiteNoise);
                }
                _ => panic!("Expected Add command"),
            }
        }

        #[test]
        fn test_parse_add_with_file() {
            let cli = Cli::parse_from(["ambience", "add", "rain", "--file", "/tmp/rain.ogg"]);
            match cli.command {
                Some(Commands::Add(args)) => {
                    assert_eq!(args.file, Some(PathBuf::from("/tmp/rain.ogg")));
                }
                _ => panic!("Expected Add command"),
            }
        }

        #[test]
        fn test_parse_remove() {
            let cli = Cli::parse_from(["ambience", "remove", "waves"]);
            match cli.command {
                Some(Commands::Remove { sound }) => {
                    assert_eq!(sound, SoundId::Waves);
                }
                _ => panic!("Expected Remove command"),
            }
        }

        #[test]
        fn test_parse_volume() {
            let cli = Cli::parse_from(["ambience", "volume", "birds", "80"]);
            match cli.command {
                Some(Commands::Volume { sound, percent }) => {
                    assert_eq!(sound, SoundId::Birds);
                    assert_eq!(percent, 80);
                }
                _ => panic!("Expected Volume command"),
            }
        }

        #[test]
        fn test_parse_volume_boundaries() {
            let cli = Cli::parse_from(["ambience", "volume", "rain", "0"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Volume { percent: 0, .. })
            ));

            let cli = Cli::parse_from(["ambience", "volume", "rain", "100"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Volume { percent: 100, .. })
            ));
        }
    }

    // ------------------------------------------------------------------------
    // Timer Tests
    // ------------------------------------------------------------------------

    mod timer_command_tests {
        use super::*;

        #[test]
        fn test_parse_timer() {
            let cli = Cli::parse_from(["ambience", "timer", "15"]);
            match cli.command {
                Some(Commands::Timer(args)) => {
                    assert_eq!(args.minutes, 15);
                }
                _ => panic!("Expected Timer command"),
            }
        }

        #[test]
        fn test_parse_timer_off() {
            let cli = Cli::parse_from(["ambience", "timer", "0"]);
            match cli.command {
                Some(Commands::Timer(args)) => {
                    assert_eq!(args.minutes, 0);
                }
                _ => panic!("Expected Timer command"),
            }
        }

        #[test]
        fn test_minutes_to_millis_presets() {
            // The discrete UI choices map to these raw durations
            assert_eq!(minutes_to_millis(0), 0);
            assert_eq!(minutes_to_millis(15), 900_000);
            assert_eq!(minutes_to_millis(30), 1_800_000);
            assert_eq!(minutes_to_millis(45), 2_700_000);
            assert_eq!(minutes_to_millis(60), 3_600_000);
        }
    }

    // ------------------------------------------------------------------------
    // Error Case Tests (using try_parse)
    // ------------------------------------------------------------------------

    mod error_tests {
        use super::*;

        #[test]
        fn test_parse_add_unknown_sound() {
            let result = Cli::try_parse_from(["ambience", "add", "thunder"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_volume_over_100() {
            let result = Cli::try_parse_from(["ambience", "volume", "rain", "101"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_volume_not_number() {
            let result = Cli::try_parse_from(["ambience", "volume", "rain", "loud"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_volume_missing_percent() {
            let result = Cli::try_parse_from(["ambience", "volume", "rain"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_timer_too_long() {
            let result = Cli::try_parse_from(["ambience", "timer", "721"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_timer_negative() {
            let result = Cli::try_parse_from(["ambience", "timer", "-5"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_daemon_default_volume_over_100() {
            let result =
                Cli::try_parse_from(["ambience", "daemon", "--default-volume", "101"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_unknown_command() {
            let result = Cli::try_parse_from(["ambience", "unknown"]);
            assert!(result.is_err());
        }
    }
}
