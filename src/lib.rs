//! Ambience Library
//!
//! This library provides the core functionality for the ambient sound
//! mixer CLI. It includes:
//! - Session manager owning the track mix, volumes, play state and timer
//! - Per-track playback state machine over an opaque player resource
//! - Audio backends (rodio playback, silent no-op, test mock)
//! - IPC server/client for daemon-CLI communication
//! - CLI command parsing and display utilities
//! - Type definitions for configuration and the wire protocol

pub mod audio;
pub mod cli;
pub mod daemon;
pub mod session;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    IpcRequest, IpcResponse, ResponseData, SessionConfig, SoundId, TimerInfo, TrackData,
};

// Re-export session types
pub use session::{
    PlaybackState, SessionError, SessionEvent, SessionManager, SessionStatus, StatusSnapshot,
    Track, TIMER_TICK_MS,
};

// Re-export audio types
pub use audio::{
    resolve_source, AudioBackend, AudioError, MockAudioBackend, NullAudioBackend, PlayerHandle,
    RodioAudioBackend, SoundSource,
};

// Re-export daemon types
pub use daemon::{default_socket_path, DaemonOptions, IpcServer, RequestHandler};
