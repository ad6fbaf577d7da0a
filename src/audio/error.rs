//! Audio system error types.
//!
//! This module defines the error types for the playback resource boundary.
//! All errors are non-fatal to the session: creation failures leave the
//! registry unchanged and invalid transitions skip the offending track.

use thiserror::Error;

/// Errors that can occur at the playback resource boundary.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Audio device is not available (e.g., no output device connected).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the specified path.
    #[error("サウンドファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// Path does not point at a usable audio file.
    #[error("サウンドファイルのパスが不正です: {0}")]
    InvalidPath(String),

    /// Failed to decode the audio file.
    #[error("サウンドファイルのデコードに失敗しました: {0}")]
    DecodeError(String),

    /// Failed to create the audio output sink.
    #[error("オーディオストリームの作成に失敗しました: {0}")]
    StreamError(String),

    /// The playback resource rejected a state transition.
    #[error("無効な状態遷移です: {state} の状態で {op} はできません")]
    InvalidState {
        /// The rejected operation
        op: &'static str,
        /// The state the resource was in
        state: &'static str,
    },

    /// Generic playback error.
    #[error("サウンド再生エラー: {0}")]
    PlaybackError(String),
}

impl AudioError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the source file.
    #[must_use]
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::InvalidPath(_) | Self::DecodeError(_)
        )
    }

    /// Returns true if this error is a rejected state transition.
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}
