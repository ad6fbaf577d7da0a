//! The playback/timer session manager.
//!
//! This is the component owning the set of active sound tracks, their
//! volumes, the global play state, and the countdown timer, plus the rules
//! that couple them:
//!
//! - a track added mid-session joins playback immediately
//! - removing the last track ends playback, and without a pending countdown
//!   ends the whole session
//! - `play` resumes or restarts the countdown, `pause` freezes it, `stop`
//!   is the only operation that resets the configured duration
//! - countdown expiry stops and releases everything exactly once
//!
//! All mutation is synchronous; the hosting process serializes calls
//! (including timer ticks) behind one mutex, so no internal locking is
//! needed here.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::audio::{AudioBackend, AudioError, SoundSource};
use crate::types::{SessionConfig, SoundId, TimerInfo};

use super::events::{SessionEvent, StatusSnapshot};
use super::track::Track;

// ============================================================================
// Constants
// ============================================================================

/// Countdown tick cadence in milliseconds.
pub const TIMER_TICK_MS: u64 = 1000;

// ============================================================================
// SessionError
// ============================================================================

/// Session-level error types.
///
/// Every error here is non-fatal to the hosting process: it is reported to
/// the caller and the session state stays consistent.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `play` was called with nothing to play and no timer pending.
    #[error("再生できるサウンドがありません。先にサウンドを追加してください")]
    NothingToPlay,

    /// The playback resource for a track could not be created.
    #[error("サウンド {sound} の作成に失敗しました: {source}")]
    TrackCreation {
        /// The track that failed
        sound: SoundId,
        /// The underlying failure
        source: AudioError,
    },
}

// ============================================================================
// SessionManager
// ============================================================================

/// Owns the track registry, volume table, global play flag and timer state.
///
/// Invariants upheld by every operation:
/// - a volume entry exists if and only if the track is registered
/// - an empty registry implies the global play flag is false
/// - `timer.running` implies `timer.remaining_ms > 0`
/// - `timer.total_ms == 0` implies the timer is fully disabled
pub struct SessionManager {
    /// Creates playback resources; the manager owns every handle it creates
    backend: Box<dyn AudioBackend>,
    /// Registered tracks
    tracks: HashMap<SoundId, Track>,
    /// Stored volume percentage per registered track
    volumes: HashMap<SoundId, u8>,
    /// True iff the session intends all registered tracks to be audible
    playing: bool,
    /// Countdown timer state
    timer: TimerInfo,
    /// Session configuration
    config: SessionConfig,
    /// Observer event channel
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionManager {
    /// Creates a new, empty session.
    pub fn new(
        backend: Box<dyn AudioBackend>,
        config: SessionConfig,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            backend,
            tracks: HashMap::new(),
            volumes: HashMap::new(),
            playing: false,
            timer: TimerInfo::default(),
            config,
            event_tx,
        }
    }

    /// Registers a sound track and creates its looping resource.
    ///
    /// Idempotent: adding an already registered sound is a logged no-op.
    /// If the session is already playing, the new track starts immediately
    /// instead of waiting for the next `play`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::TrackCreation` if the playback resource could
    /// not be created; the registry is left unchanged in that case.
    pub fn add_track(&mut self, id: SoundId, source: &SoundSource) -> Result<(), SessionError> {
        if self.tracks.contains_key(&id) {
            debug!("add_track: {} is already registered", id);
            return Ok(());
        }

        let handle = match self.backend.create_looping(source) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("add_track: failed to create resource for {}: {}", id, e);
                return Err(SessionError::TrackCreation {
                    sound: id,
                    source: e,
                });
            }
        };

        let mut track = Track::new(handle);
        let volume = self.config.default_volume;
        if let Err(e) = track.set_volume(volume) {
            warn!("add_track: failed to apply default volume to {}: {}", id, e);
        }

        if self.playing {
            // Joins the in-progress session instead of waiting for play()
            if let Err(e) = track.start() {
                warn!("add_track: failed to start {} mid-session: {}", id, e);
            }
        }

        self.tracks.insert(id, track);
        self.volumes.insert(id, volume);
        debug!("add_track: {} registered", id);
        self.notify_status();
        Ok(())
    }

    /// Unregisters a sound track, stopping and releasing its resource.
    ///
    /// Removing a sound that is not registered is a logged no-op. When the
    /// last track is removed the play flag is cleared, and unless a
    /// countdown is still running the whole session stops.
    pub fn remove_track(&mut self, id: SoundId) {
        let Some(mut track) = self.tracks.remove(&id) else {
            warn!("remove_track: {} is not registered", id);
            return;
        };

        if let Err(e) = track.stop() {
            warn!("remove_track: failed to stop {}: {}", id, e);
        }
        self.volumes.remove(&id);
        debug!("remove_track: {} removed", id);

        if self.tracks.is_empty() {
            self.playing = false;
            if !self.timer.running {
                // Nothing left to play and no countdown pending
                self.stop();
                return;
            }
        }

        self.notify_status();
    }

    /// Sets the volume of a registered track, in percent (0-100).
    ///
    /// Unregistered sounds are not auto-created; the call is a logged no-op.
    pub fn set_volume(&mut self, id: SoundId, percent: u8) {
        let percent = percent.min(100);
        let Some(track) = self.tracks.get_mut(&id) else {
            warn!("set_volume: {} is not registered", id);
            return;
        };

        match track.set_volume(percent) {
            Ok(()) => {
                self.volumes.insert(id, percent);
                debug!("set_volume: {} set to {}%", id, percent);
            }
            Err(e) => warn!("set_volume: failed to apply volume to {}: {}", id, e),
        }
    }

    /// Returns the stored volume for a sound, or the configured default
    /// when the sound is not registered.
    #[must_use]
    pub fn get_volume(&self, id: SoundId) -> u8 {
        self.volumes
            .get(&id)
            .copied()
            .unwrap_or(self.config.default_volume)
    }

    /// Returns true iff the sound is registered.
    #[must_use]
    pub fn is_track_active(&self, id: SoundId) -> bool {
        self.tracks.contains_key(&id)
    }

    /// Starts playback of every registered track and the countdown.
    ///
    /// Idempotent while playing. With a configured countdown, a non-zero
    /// remainder is resumed; otherwise a fresh countdown starts from the
    /// configured duration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingToPlay` if the registry is empty and
    /// no timer duration is pending; no state changes in that case.
    pub fn play(&mut self) -> Result<(), SessionError> {
        if self.playing {
            debug!("play: already playing");
            return Ok(());
        }
        if self.tracks.is_empty() && self.timer.is_disabled() {
            warn!("play: no tracks registered and no timer pending");
            return Err(SessionError::NothingToPlay);
        }

        for (id, track) in &mut self.tracks {
            if let Err(e) = track.start() {
                warn!("play: failed to start {}: {}", id, e);
            }
        }
        // An empty registry keeps the flag false even while a countdown runs
        if !self.tracks.is_empty() {
            self.playing = true;
        }

        if !self.timer.is_disabled() {
            if self.timer.remaining_ms == 0 {
                self.timer.remaining_ms = self.timer.total_ms;
            }
            self.timer.running = true;
            debug!("play: countdown running, {} ms left", self.timer.remaining_ms);
        }

        self.notify_status();
        Ok(())
    }

    /// Pauses every running track and freezes the countdown.
    ///
    /// The timer remainder and configured duration are preserved; only
    /// `stop` resets them. A no-op when neither playback nor the countdown
    /// is active.
    pub fn pause(&mut self) {
        if !self.playing && !self.timer.running {
            debug!("pause: nothing to pause");
            return;
        }

        for (id, track) in &mut self.tracks {
            if let Err(e) = track.pause() {
                warn!("pause: failed to pause {}: {}", id, e);
            }
        }
        self.playing = false;
        self.timer.running = false;

        self.notify_status();
    }

    /// Stops the session: releases every track, clears the registry and
    /// volume table, resets the timer, and signals the host to shut down.
    ///
    /// Unconditional and idempotent.
    pub fn stop(&mut self) {
        for (id, mut track) in self.tracks.drain() {
            if let Err(e) = track.stop() {
                warn!("stop: failed to stop {}: {}", id, e);
            }
        }
        self.volumes.clear();
        self.playing = false;
        self.timer = TimerInfo::default();

        self.notify_status();
        if self.event_tx.send(SessionEvent::ShutdownRequested).is_err() {
            debug!("stop: host is gone, dropping shutdown signal");
        }
    }

    /// Returns the global play flag.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Configures the countdown duration without starting it.
    ///
    /// Ticking begins on the next `play`. Zero disables the timer and
    /// cancels any running countdown.
    pub fn set_initial_timer(&mut self, duration_ms: u64) {
        self.timer.total_ms = duration_ms;
        self.timer.remaining_ms = duration_ms;
        self.timer.running = false;
        if duration_ms == 0 {
            debug!("set_initial_timer: timer disabled");
        } else {
            debug!(
                "set_initial_timer: {} ms, countdown starts on next play",
                duration_ms
            );
        }
    }

    /// Advances the countdown by one tick.
    ///
    /// Called by the host at a fixed cadence of [`TIMER_TICK_MS`]. A no-op
    /// unless the countdown is running, so a cancelled countdown can never
    /// tick or fire. Reaching zero stops the whole session; `stop`'s
    /// idempotence makes a concurrent user stop safe.
    pub fn tick_timer(&mut self) {
        if !self.timer.running {
            return;
        }

        self.timer.remaining_ms = self.timer.remaining_ms.saturating_sub(TIMER_TICK_MS);
        let remaining_ms = self.timer.remaining_ms;
        if self
            .event_tx
            .send(SessionEvent::TimerTick { remaining_ms })
            .is_err()
        {
            debug!("tick_timer: observer is gone, dropping tick");
        }

        if remaining_ms == 0 {
            debug!("tick_timer: countdown finished, stopping session");
            self.timer.running = false;
            self.timer.total_ms = 0;
            if self.event_tx.send(SessionEvent::TimerFinished).is_err() {
                debug!("tick_timer: observer is gone, dropping finish event");
            }
            self.stop();
        }
    }

    /// Returns the current timer state.
    #[must_use]
    pub fn timer_info(&self) -> TimerInfo {
        self.timer
    }

    /// Returns the registered sounds in display order.
    #[must_use]
    pub fn registered(&self) -> Vec<SoundId> {
        SoundId::ALL
            .into_iter()
            .filter(|id| self.tracks.contains_key(id))
            .collect()
    }

    /// Returns a snapshot of the observable session state.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            track_count: self.tracks.len(),
            playing: self.playing,
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn notify_status(&self) {
        let snapshot = self.snapshot();
        if self
            .event_tx
            .send(SessionEvent::StatusChanged(snapshot))
            .is_err()
        {
            debug!("notify_status: observer is gone, dropping notification");
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("tracks", &self.registered())
            .field("playing", &self.playing)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
