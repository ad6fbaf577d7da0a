//! Outbound observer protocol for the sound session.
//!
//! The session manager notifies a passive observer after every state
//! change by sending events on an unbounded channel. The observer renders
//! them (the daemon logs the status label); the session only guarantees
//! the notification happens synchronously with the state change.

// ============================================================================
// SessionStatus
// ============================================================================

/// Short classification of the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No tracks registered
    Stopped,
    /// Tracks registered but not audible
    Paused,
    /// Tracks registered and audible
    Playing,
}

impl SessionStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Stopped => "stopped",
            SessionStatus::Paused => "paused",
            SessionStatus::Playing => "playing",
        }
    }
}

// ============================================================================
// StatusSnapshot
// ============================================================================

/// Snapshot of the observable session state, emitted on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Number of registered tracks
    pub track_count: usize,
    /// Global play flag
    pub playing: bool,
}

impl StatusSnapshot {
    /// Returns true if any track is registered.
    #[must_use]
    pub fn has_tracks(&self) -> bool {
        self.track_count > 0
    }

    /// Derives the short status classification.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.track_count == 0 {
            SessionStatus::Stopped
        } else if !self.playing {
            SessionStatus::Paused
        } else {
            SessionStatus::Playing
        }
    }

    /// Returns the human-readable status label.
    #[must_use]
    pub fn label(&self) -> String {
        match self.status() {
            SessionStatus::Stopped => "停止中".to_string(),
            SessionStatus::Paused => "一時停止中".to_string(),
            SessionStatus::Playing => format!("再生中 ({}音源)", self.track_count),
        }
    }
}

// ============================================================================
// SessionEvent
// ============================================================================

/// Session events for the notification observer and the hosting process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The observable session state changed
    StatusChanged(StatusSnapshot),
    /// One second of the countdown elapsed
    TimerTick {
        /// Remaining milliseconds
        remaining_ms: u64,
    },
    /// The countdown reached zero
    TimerFinished,
    /// The session stopped; the hosting process may shut down
    ShutdownRequested,
}

// ============================================================================
// Tests
// ============================================================================
