//! Display utilities for the ambient sound mixer CLI.
//!
//! This module provides formatted output for:
//! - Success messages
//! - Error messages
//! - Status display with the track mix and timer remainder

use crate::types::{IpcResponse, ResponseData, SoundId};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a success message for adding a sound.
    pub fn show_add_success(response: &IpcResponse) {
        println!("+ {}", response.message);
        Self::show_mix_line(response.data.as_ref());
    }

    /// Shows a success message for removing a sound.
    pub fn show_remove_success(response: &IpcResponse) {
        println!("- {}", response.message);
        Self::show_mix_line(response.data.as_ref());
    }

    /// Shows a success message for a volume change.
    pub fn show_volume_success(response: &IpcResponse) {
        println!("~ {}", response.message);
    }

    /// Shows a success message for playback start.
    pub fn show_play_success(response: &IpcResponse) {
        println!("> {}", response.message);

        if let Some(data) = &response.data {
            if let Some(timer) = &data.timer {
                if timer.running {
                    let (minutes, seconds) = Self::format_time(timer.remaining_ms);
                    println!("  タイマー残り: {}:{:02}", minutes, seconds);
                }
            }
        }
    }

    /// Shows a success message for pause.
    pub fn show_pause_success(response: &IpcResponse) {
        println!("|| {}", response.message);

        if let Some(data) = &response.data {
            if let Some(timer) = &data.timer {
                if !timer.is_disabled() {
                    let (minutes, seconds) = Self::format_time(timer.remaining_ms);
                    println!("  タイマー残り: {}:{:02}", minutes, seconds);
                }
            }
        }
    }

    /// Shows a success message for stop.
    pub fn show_stop_success(response: &IpcResponse) {
        println!("[] {}", response.message);
    }

    /// Shows a success message for the timer configuration.
    pub fn show_timer_success(response: &IpcResponse) {
        println!("@ {}", response.message);
    }

    /// Shows the current session status.
    pub fn show_status(response: &IpcResponse) {
        println!("環境音ミキサー ステータス");
        println!("─────────────────────────────");

        let Some(data) = &response.data else {
            println!("状態: 不明");
            return;
        };

        let state = data.status.as_deref().unwrap_or("unknown");
        let state_display = match state {
            "playing" => "再生中",
            "paused" => "一時停止中",
            "stopped" => "停止中",
            _ => state,
        };
        println!("状態: {}", state_display);

        match &data.tracks {
            Some(tracks) if !tracks.is_empty() => {
                println!("ミックス:");
                for track in tracks {
                    println!(
                        "  {:<12} {:>3}%",
                        Self::sound_display(track.sound),
                        track.volume
                    );
                }
            }
            _ => println!("ミックス: (なし)"),
        }

        if let Some(timer) = &data.timer {
            if timer.is_disabled() {
                println!("タイマー: なし");
            } else {
                let (minutes, seconds) = Self::format_time(timer.remaining_ms);
                let state = if timer.running { "作動中" } else { "待機中" };
                println!("タイマー: 残り {}:{:02} ({})", minutes, seconds, state);
            }
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Returns the display name for a sound.
    fn sound_display(sound: SoundId) -> &'static str {
        match sound {
            SoundId::WhiteNoise => "ホワイトノイズ",
            SoundId::Rain => "雨",
            SoundId::Birds => "鳥",
            SoundId::Waves => "波",
            SoundId::Road => "道路",
        }
    }

    /// Shows a one-line summary of the current mix size.
    fn show_mix_line(data: Option<&ResponseData>) {
        if let Some(tracks) = data.and_then(|d| d.tracks.as_ref()) {
            println!("  ミックス中のサウンド: {}", tracks.len());
        }
    }

    /// Converts milliseconds to (minutes, seconds).
    fn format_time(ms: u64) -> (u64, u64) {
        let total_seconds = ms / 1000;
        (total_seconds / 60, total_seconds % 60)
    }
}

// ============================================================================
// Tests
// ============================================================================
