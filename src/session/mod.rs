//! Session management for the ambient sound mixer.
//!
//! This module contains the core of the application:
//! - `manager`: the session manager owning tracks, volumes, play flag and timer
//! - `track`: per-track playback state machine over the opaque player handle
//! - `events`: the outbound observer protocol

pub mod events;
pub mod manager;
pub mod track;

pub use events::{SessionEvent, SessionStatus, StatusSnapshot};
pub use manager::{SessionError, SessionManager, TIMER_TICK_MS};
pub use track::{PlaybackState, Track};
