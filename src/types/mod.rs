//! Core data types for the ambient sound mixer.
//!
//! This module defines the data structures used for:
//! - Sound track identification
//! - Session configuration with validation
//! - Countdown timer state
//! - IPC request/response serialization

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ============================================================================
// SoundId
// ============================================================================

/// Identifies one of the fixed set of ambient sounds.
///
/// There is no mechanism to register an arbitrary sound name beyond this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundId {
    /// White noise
    WhiteNoise,
    /// Rain sound
    Rain,
    /// Bird song
    Birds,
    /// Ocean waves
    Waves,
    /// Road / traffic rumble
    Road,
}

impl SoundId {
    /// Every known sound, in display order.
    pub const ALL: [SoundId; 5] = [
        SoundId::WhiteNoise,
        SoundId::Rain,
        SoundId::Birds,
        SoundId::Waves,
        SoundId::Road,
    ];

    /// Returns the canonical string representation of the sound id.
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundId::WhiteNoise => "white_noise",
            SoundId::Rain => "rain",
            SoundId::Birds => "birds",
            SoundId::Waves => "waves",
            SoundId::Road => "road",
        }
    }
}

impl std::fmt::Display for SoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SoundId {
    type Err = String;

    /// Parses a sound name, accepting both `snake_case` and `kebab-case`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "white_noise" => Ok(SoundId::WhiteNoise),
            "rain" => Ok(SoundId::Rain),
            "birds" => Ok(SoundId::Birds),
            "waves" => Ok(SoundId::Waves),
            "road" => Ok(SoundId::Road),
            _ => Err(format!(
                "不明なサウンド名です: '{}' (white-noise, rain, birds, waves, road から選択してください)",
                s
            )),
        }
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Configuration for the sound session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Volume percentage assigned to a track on registration (0-100)
    pub default_volume: u8,
    /// Directory holding the sound library (None = platform default)
    pub sounds_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_volume: 50,
            sounds_dir: None,
        }
    }
}

impl SessionConfig {
    /// Creates a new configuration with the specified default volume.
    pub fn with_default_volume(mut self, volume: u8) -> Self {
        self.default_volume = volume;
        self
    }

    /// Creates a new configuration with the specified sound library directory.
    pub fn with_sounds_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sounds_dir = Some(dir.into());
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_volume > 100 {
            return Err("デフォルト音量は0-100の範囲で指定してください".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// TimerInfo
// ============================================================================

/// State of the countdown timer.
///
/// Invariants:
/// - `running` implies `remaining_ms > 0`
/// - `total_ms == 0` implies `remaining_ms == 0` and `!running`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerInfo {
    /// Duration last requested by the caller, in milliseconds (0 = disabled)
    #[serde(rename = "totalMs")]
    pub total_ms: u64,
    /// Remainder when paused, 0 when disabled or freshly fired
    #[serde(rename = "remainingMs")]
    pub remaining_ms: u64,
    /// True only while the countdown is actively ticking
    pub running: bool,
}

impl TimerInfo {
    /// Returns true if no countdown duration is configured.
    pub fn is_disabled(&self) -> bool {
        self.total_ms == 0
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// IPC request from client to daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum IpcRequest {
    /// Register a sound track
    Add {
        /// Which sound to add
        sound: SoundId,
        /// Explicit audio file overriding library resolution
        #[serde(skip_serializing_if = "Option::is_none")]
        file: Option<PathBuf>,
    },
    /// Unregister a sound track
    Remove {
        /// Which sound to remove
        sound: SoundId,
    },
    /// Set the volume of a registered track
    Volume {
        /// Which sound to adjust
        sound: SoundId,
        /// Volume percentage (0-100)
        percent: u8,
    },
    /// Start playback of all registered tracks
    Play,
    /// Pause playback, preserving the timer remainder
    Pause,
    /// Stop playback, release all tracks and reset the timer
    Stop,
    /// Configure the countdown duration (0 = disable)
    Timer {
        /// Duration in milliseconds
        #[serde(rename = "durationMs")]
        duration_ms: u64,
    },
    /// Query the current session state
    Status,
}

/// One registered track in a status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackData {
    /// The sound id
    pub sound: SoundId,
    /// Stored volume percentage
    pub volume: u8,
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    /// Short status classification ("stopped", "paused", "playing")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Global play flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playing: Option<bool>,
    /// Registered tracks with their volumes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<TrackData>>,
    /// Countdown timer state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerInfo>,
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // SoundId Tests
    // ------------------------------------------------------------------------

    mod sound_id_tests {
        use super::*;

        #[test]
        fn test_as_str() {
            assert_eq!(SoundId::WhiteNoise.as_str(), "white_noise");
            assert_eq!(SoundId::Rain.as_str(), "rain");
            assert_eq!(SoundId::Birds.as_str(), "birds");
            assert_eq!(SoundId::Waves.as_str(), "waves");
            assert_eq!(SoundId::Road.as_str(), "road");
        }

        #[test]
        fn test_all_has_five_distinct_sounds() {
            assert_eq!(SoundId::ALL.len(), 5);
            for (i, a) in SoundId::ALL.iter().enumerate() {
                for b in &SoundId::ALL[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }

        #[test]
        fn test_from_str_snake_case() {
            assert_eq!("white_noise".parse::<SoundId>(), Ok(SoundId::WhiteNoise));
            assert_eq!("rain".parse::<SoundId>(), Ok(SoundId::Rain));
        }

        #[test]
        fn test_from_str_kebab_case() {
            assert_eq!("white-noise".parse::<SoundId>(), Ok(SoundId::WhiteNoise));
        }

        #[test]
        fn test_from_str_trims_and_lowercases() {
            assert_eq!(" Waves ".parse::<SoundId>(), Ok(SoundId::Waves));
            assert_eq!("ROAD".parse::<SoundId>(), Ok(SoundId::Road));
        }

        #[test]
        fn test_from_str_unknown() {
            let result = "thunder".parse::<SoundId>();
            assert!(result.is_err());
            assert!(result.unwrap_err().contains("thunder"));
        }

        #[test]
        fn test_display_matches_as_str() {
            for id in SoundId::ALL {
                assert_eq!(format!("{}", id), id.as_str());
            }
        }

        #[test]
        fn test_serialize_deserialize() {
            let json = serde_json::to_string(&SoundId::WhiteNoise).unwrap();
            assert_eq!(json, "\"white_noise\"");

            let deserialized: SoundId = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, SoundId::WhiteNoise);
        }
    }

    // ------------------------------------------------------------------------
    // SessionConfig Tests
    // ------------------------------------------------------------------------

    mod session_config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = SessionConfig::default();
            assert_eq!(config.default_volume, 50);
            assert!(config.sounds_dir.is_none());
        }

        #[test]
        fn test_builder_pattern() {
            let config = SessionConfig::default()
                .with_default_volume(80)
                .with_sounds_dir("/tmp/sounds");

            assert_eq!(config.default_volume, 80);
            assert_eq!(config.sounds_dir, Some(PathBuf::from("/tmp/sounds")));
        }

        #[test]
        fn test_validate_success() {
            assert!(SessionConfig::default().validate().is_ok());
            assert!(SessionConfig::default()
                .with_default_volume(0)
                .validate()
                .is_ok());
            assert!(SessionConfig::default()
                .with_default_volume(100)
                .validate()
                .is_ok());
        }

        #[test]
        fn test_validate_volume_too_high() {
            let config = SessionConfig::default().with_default_volume(101);
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_serialize_deserialize() {
            let config = SessionConfig::default().with_sounds_dir("/var/lib/sounds");
            let json = serde_json::to_string(&config).unwrap();
            let deserialized: SessionConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(config, deserialized);
        }
    }

    // ------------------------------------------------------------------------
    // TimerInfo Tests
    // ------------------------------------------------------------------------

    mod timer_info_tests {
        use super::*;

        #[test]
        fn test_default_is_disabled() {
            let timer = TimerInfo::default();
            assert_eq!(timer.total_ms, 0);
            assert_eq!(timer.remaining_ms, 0);
            assert!(!timer.running);
            assert!(timer.is_disabled());
        }

        #[test]
        fn test_is_disabled() {
            let timer = TimerInfo {
                total_ms: 900_000,
                remaining_ms: 900_000,
                running: false,
            };
            assert!(!timer.is_disabled());
        }

        #[test]
        fn test_serialize_camel_case() {
            let timer = TimerInfo {
                total_ms: 1_800_000,
                remaining_ms: 600_000,
                running: true,
            };
            let json = serde_json::to_string(&timer).unwrap();
            assert!(json.contains("\"totalMs\":1800000"));
            assert!(json.contains("\"remainingMs\":600000"));
            assert!(json.contains("\"running\":true"));
        }
    }

    // ------------------------------------------------------------------------
    // IPC Types Tests
    // ------------------------------------------------------------------------

    mod ipc_tests {
        use super::*;

        #[test]
        fn test_ipc_request_add_serialize() {
            let request = IpcRequest::Add {
                sound: SoundId::Rain,
                file: None,
            };
            let json = serde_json::to_string(&request).unwrap();
            assert_eq!(json, r#"{"command":"add","sound":"rain"}"#);
        }

        #[test]
        fn test_ipc_request_add_with_file() {
            let request = IpcRequest::Add {
                sound: SoundId::Birds,
                file: Some(PathBuf::from("/tmp/birds.ogg")),
            };
            let json = serde_json::to_string(&request).unwrap();
            assert!(json.contains("\"file\":\"/tmp/birds.ogg\""));
        }

        #[test]
        fn test_ipc_request_add_deserialize() {
            let json = r#"{"command":"add","sound":"waves"}"#;
            let request: IpcRequest = serde_json::from_str(json).unwrap();
            assert_eq!(
                request,
                IpcRequest::Add {
                    sound: SoundId::Waves,
                    file: None
                }
            );
        }

        #[test]
        fn test_ipc_request_volume_serialize() {
            let request = IpcRequest::Volume {
                sound: SoundId::Rain,
                percent: 80,
            };
            let json = serde_json::to_string(&request).unwrap();
            assert_eq!(json, r#"{"command":"volume","sound":"rain","percent":80}"#);
        }

        #[test]
        fn test_ipc_request_timer_serialize() {
            let request = IpcRequest::Timer {
                duration_ms: 900_000,
            };
            let json = serde_json::to_string(&request).unwrap();
            assert_eq!(json, r#"{"command":"timer","durationMs":900000}"#);
        }

        #[test]
        fn test_ipc_request_transport_serialize() {
            assert_eq!(
                serde_json::to_string(&IpcRequest::Play).unwrap(),
                r#"{"command":"play"}"#
            );
            assert_eq!(
                serde_json::to_string(&IpcRequest::Pause).unwrap(),
                r#"{"command":"pause"}"#
            );
            assert_eq!(
                serde_json::to_string(&IpcRequest::Stop).unwrap(),
                r#"{"command":"stop"}"#
            );
            assert_eq!(
                serde_json::to_string(&IpcRequest::Status).unwrap(),
                r#"{"command":"status"}"#
            );
        }

        #[test]
        fn test_ipc_request_all_commands_deserialize() {
            let commands = vec![
                (r#"{"command":"add","sound":"rain"}"#, "add"),
                (r#"{"command":"remove","sound":"rain"}"#, "remove"),
                (
                    r#"{"command":"volume","sound":"rain","percent":50}"#,
                    "volume",
                ),
                (r#"{"command":"play"}"#, "play"),
                (r#"{"command":"pause"}"#, "pause"),
                (r#"{"command":"stop"}"#, "stop"),
                (r#"{"command":"timer","durationMs":0}"#, "timer"),
                (r#"{"command":"status"}"#, "status"),
            ];

            for (json, expected) in commands {
                let request: IpcRequest = serde_json::from_str(json).unwrap();
                match (&request, expected) {
                    (IpcRequest::Add { .. }, "add") => {}
                    (IpcRequest::Remove { .. }, "remove") => {}
                    (IpcRequest::Volume { .. }, "volume") => {}
                    (IpcRequest::Play, "play") => {}
                    (IpcRequest::Pause, "pause") => {}
                    (IpcRequest::Stop, "stop") => {}
                    (IpcRequest::Timer { .. }, "timer") => {}
                    (IpcRequest::Status, "status") => {}
                    _ => panic!("Unexpected request type for {}", json),
                }
            }
        }

        #[test]
        fn test_response_data_skips_empty_fields() {
            let data = ResponseData::default();
            let json = serde_json::to_string(&data).unwrap();
            assert_eq!(json, "{}");
        }

        #[test]
        fn test_ipc_response_success() {
            let response = IpcResponse::success(
                "再生を開始しました",
                Some(ResponseData {
                    status: Some("playing".to_string()),
                    playing: Some(true),
                    tracks: Some(vec![TrackData {
                        sound: SoundId::Rain,
                        volume: 80,
                    }]),
                    timer: None,
                }),
            );

            assert_eq!(response.status, "success");
            assert_eq!(response.message, "再生を開始しました");

            let data = response.data.unwrap();
            assert_eq!(data.playing, Some(true));
            assert_eq!(data.tracks.unwrap().len(), 1);
        }

        #[test]
        fn test_ipc_response_error() {
            let response = IpcResponse::error("再生できるサウンドがありません");
            assert_eq!(response.status, "error");
            assert!(response.data.is_none());
        }

        #[test]
        fn test_ipc_response_serialize_round_trip() {
            let response = IpcResponse::success(
                "OK",
                Some(ResponseData {
                    status: Some("paused".to_string()),
                    playing: Some(false),
                    tracks: Some(vec![]),
                    timer: Some(TimerInfo {
                        total_ms: 900_000,
                        remaining_ms: 450_000,
                        running: false,
                    }),
                }),
            );

            let json = serde_json::to_string(&response).unwrap();
            assert!(json.contains("\"remainingMs\":450000"));

            let deserialized: IpcResponse = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized.status, "success");
            assert_eq!(
                deserialized.data.unwrap().timer.unwrap().remaining_ms,
                450_000
            );
        }
    }
}
