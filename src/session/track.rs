//! Per-track playback state machine.
//!
//! The underlying playback primitive has its own implicit lifecycle and
//! rejects calls made in the wrong state. `Track` makes that lifecycle
//! explicit with a state tag checked before each transition, so the
//! session can skip invalid transitions instead of trapping errors from
//! the primitive.

use tracing::debug;

use crate::audio::{AudioError, PlayerHandle};

// ============================================================================
// PlaybackState
// ============================================================================

/// Explicit lifecycle state of one playback resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Created, looping source queued, not yet started
    Idle,
    /// Audibly running
    Playing,
    /// Started at least once, currently silent
    Paused,
    /// Stopped and released; no further transitions are valid
    Released,
}

impl PlaybackState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Released => "released",
        }
    }
}

// ============================================================================
// Track
// ============================================================================

/// One registered, looping sound track.
///
/// Owns its playback resource exclusively; dropping the track releases it.
pub struct Track {
    handle: Box<dyn PlayerHandle>,
    state: PlaybackState,
}

impl Track {
    /// Wraps a freshly created playback resource.
    pub fn new(handle: Box<dyn PlayerHandle>) -> Self {
        Self {
            handle,
            state: PlaybackState::Idle,
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Starts or resumes the track.
    ///
    /// Starting an already playing track is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::InvalidState` if the track was released, or the
    /// resource's own error if the start call fails.
    pub fn start(&mut self) -> Result<(), AudioError> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Idle | PlaybackState::Paused => {
                self.handle.start()?;
                self.state = PlaybackState::Playing;
                Ok(())
            }
            PlaybackState::Released => Err(AudioError::InvalidState {
                op: "start",
                state: self.state.as_str(),
            }),
        }
    }

    /// Pauses the track.
    ///
    /// Pausing a track that is not running is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::InvalidState` if the track was released, or the
    /// resource's own error if the pause call fails.
    pub fn pause(&mut self) -> Result<(), AudioError> {
        match self.state {
            PlaybackState::Idle | PlaybackState::Paused => Ok(()),
            PlaybackState::Playing => {
                self.handle.pause()?;
                self.state = PlaybackState::Paused;
                Ok(())
            }
            PlaybackState::Released => Err(AudioError::InvalidState {
                op: "pause",
                state: self.state.as_str(),
            }),
        }
    }

    /// Stops the track and releases the underlying resource.
    ///
    /// Idempotent: stopping a released track is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the resource's own error if the stop call fails; the track
    /// is marked released either way so it is never stopped twice.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        if self.state == PlaybackState::Released {
            return Ok(());
        }
        let result = self.handle.stop();
        self.state = PlaybackState::Released;
        result
    }

    /// Applies a volume percentage to the resource's native gain scale.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::InvalidState` if the track was released, or the
    /// resource's own error if the call fails.
    pub fn set_volume(&mut self, percent: u8) -> Result<(), AudioError> {
        if self.state == PlaybackState::Released {
            return Err(AudioError::InvalidState {
                op: "set_volume",
                state: self.state.as_str(),
            });
        }
        // The resource's gain scale is 0.0..=1.0
        let gain = f32::from(percent.min(100)) / 100.0;
        self.handle.set_volume(gain)
    }

    /// Returns true if the track is audibly running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing && self.handle.is_playing()
    }
}

impl Drop for Track {
    fn drop(&mut self) {
        if self.state != PlaybackState::Released {
            debug!("Releasing track on drop");
            let _ = self.handle.stop();
            self.state = PlaybackState::Released;
        }
    }
}

impl std::fmt::Debug for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
