//! Playback resource boundary for the ambient sound mixer.
//!
//! The session manager never talks to an audio library directly; it goes
//! through the two traits defined here:
//!
//! - [`AudioBackend`] creates one looping playback resource per track
//! - [`PlayerHandle`] is the opaque per-track resource with the primitives
//!   the session orchestrates: start, pause, stop, set-volume, is-playing
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  SessionManager  │ ← owns one PlayerHandle per registered track
//! └────────┬─────────┘
//!          │ AudioBackend::create_looping
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundSource    │────▶│  Library files   │
//! │                  │     │  (rain.ogg, ...) │
//! │                  │     ├──────────────────┤
//! │                  │────▶│ Synthesized tone │
//! └──────────────────┘     │  (fallback)      │
//!                          └──────────────────┘
//! ```
//!
//! Three backends exist: [`RodioAudioBackend`] for real playback,
//! [`NullAudioBackend`] for headless operation, and [`MockAudioBackend`]
//! for tests.

mod error;
mod output;
mod source;

pub use error::AudioError;
pub use output::{RodioAudioBackend, RodioTrackHandle};
pub use source::{
    default_sounds_dir, discover_sounds, fallback_frequency, resolve_source, SoundSource,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Traits
// ============================================================================

/// One opaque playback resource, owned exclusively by the session manager.
///
/// Implementations are expected to return promptly from every call; these
/// are thin wrappers over local playback primitives, not I/O.
pub trait PlayerHandle: Send {
    /// Starts or resumes playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying resource rejects the transition.
    fn start(&self) -> Result<(), AudioError>;

    /// Pauses playback, keeping the resource ready to resume.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying resource rejects the transition.
    fn pause(&self) -> Result<(), AudioError>;

    /// Stops playback and releases the underlying resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying resource rejects the transition.
    fn stop(&self) -> Result<(), AudioError>;

    /// Applies a gain in the resource's native 0.0..=1.0 scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying resource rejects the call.
    fn set_volume(&self, gain: f32) -> Result<(), AudioError>;

    /// Returns true if the resource is audibly running.
    fn is_playing(&self) -> bool;
}

/// Creates looping playback resources from sound sources.
pub trait AudioBackend: Send {
    /// Creates a looping resource for the given source.
    ///
    /// The resource is created in the paused state; the caller decides
    /// when to start it.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be instantiated.
    fn create_looping(&self, source: &SoundSource) -> Result<Box<dyn PlayerHandle>, AudioError>;
}

// ============================================================================
// NullAudioBackend
// ============================================================================

/// A backend whose handles do nothing.
///
/// Used when no audio device is available or when the daemon runs with
/// `--no-audio`; the session state machine behaves identically either way.
#[derive(Debug, Default)]
pub struct NullAudioBackend;

impl NullAudioBackend {
    /// Creates a new no-op backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for NullAudioBackend {
    fn create_looping(&self, _source: &SoundSource) -> Result<Box<dyn PlayerHandle>, AudioError> {
        Ok(Box::new(NullPlayerHandle {
            playing: AtomicBool::new(false),
        }))
    }
}

struct NullPlayerHandle {
    playing: AtomicBool,
}

impl PlayerHandle for NullPlayerHandle {
    fn start(&self) -> Result<(), AudioError> {
        self.playing.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn pause(&self) -> Result<(), AudioError> {
        self.playing.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn stop(&self) -> Result<(), AudioError> {
        self.playing.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn set_volume(&self, _gain: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }
}

// ============================================================================
// MockAudioBackend
// ============================================================================

/// Observable state of one mock playback resource.
#[derive(Debug, Default)]
struct ProbeState {
    playing: bool,
    stopped: bool,
    gain: f32,
    ops: Vec<&'static str>,
    fail_start: bool,
    fail_pause: bool,
    fail_stop: bool,
}

/// Test probe exposing what happened to one created resource.
#[derive(Debug, Default)]
pub struct TrackProbe {
    state: Mutex<ProbeState>,
}

impl TrackProbe {
    /// Returns true if the resource is currently started.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    /// Returns true if the resource has been stopped/released.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state.lock().unwrap().stopped
    }

    /// Returns the last gain applied to the resource.
    #[must_use]
    pub fn gain(&self) -> f32 {
        self.state.lock().unwrap().gain
    }

    /// Returns the sequence of operations invoked on the resource.
    #[must_use]
    pub fn ops(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().ops.clone()
    }

    /// Makes the next and all following start calls fail.
    pub fn set_fail_start(&self, fail: bool) {
        self.state.lock().unwrap().fail_start = fail;
    }

    /// Makes the next and all following pause calls fail.
    pub fn set_fail_pause(&self, fail: bool) {
        self.state.lock().unwrap().fail_pause = fail;
    }

    /// Makes the next and all following stop calls fail.
    pub fn set_fail_stop(&self, fail: bool) {
        self.state.lock().unwrap().fail_stop = fail;
    }
}

struct MockPlayerHandle {
    probe: Arc<TrackProbe>,
}

impl PlayerHandle for MockPlayerHandle {
    fn start(&self) -> Result<(), AudioError> {
        let mut state = self.probe.state.lock().unwrap();
        state.ops.push("start");
        if state.fail_start {
            return Err(AudioError::PlaybackError("mock start failure".to_string()));
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&self) -> Result<(), AudioError> {
        let mut state = self.probe.state.lock().unwrap();
        state.ops.push("pause");
        if state.fail_pause {
            return Err(AudioError::PlaybackError("mock pause failure".to_string()));
        }
        state.playing = false;
        Ok(())
    }

    fn stop(&self) -> Result<(), AudioError> {
        let mut state = self.probe.state.lock().unwrap();
        state.ops.push("stop");
        if state.fail_stop {
            return Err(AudioError::PlaybackError("mock stop failure".to_string()));
        }
        state.playing = false;
        state.stopped = true;
        Ok(())
    }

    fn set_volume(&self, gain: f32) -> Result<(), AudioError> {
        let mut state = self.probe.state.lock().unwrap();
        state.ops.push("set_volume");
        state.gain = gain;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.probe.state.lock().unwrap().playing
    }
}

#[derive(Debug, Default)]
struct MockBackendInner {
    probes: Mutex<Vec<(String, Arc<TrackProbe>)>>,
    fail_create: AtomicBool,
}

/// Mock backend for testing the session manager.
///
/// Records every created resource behind a [`TrackProbe`] and supports
/// creation-failure injection. Clones share state, so tests can keep a
/// handle while the session owns the backend.
#[derive(Debug, Clone, Default)]
pub struct MockAudioBackend {
    inner: Arc<MockBackendInner>,
}

impl MockAudioBackend {
    /// Creates a new mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next and all following create calls fail.
    pub fn set_fail_create(&self, fail: bool) {
        self.inner.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Returns how many resources have been created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.inner.probes.lock().unwrap().len()
    }

    /// Returns the probe of the most recently created resource.
    #[must_use]
    pub fn last_probe(&self) -> Option<Arc<TrackProbe>> {
        self.inner
            .probes
            .lock()
            .unwrap()
            .last()
            .map(|(_, probe)| probe.clone())
    }

    /// Returns the probe of the most recent resource created for a name.
    #[must_use]
    pub fn probe_named(&self, name: &str) -> Option<Arc<TrackProbe>> {
        self.inner
            .probes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, probe)| probe.clone())
    }
}

impl AudioBackend for MockAudioBackend {
    fn create_looping(&self, source: &SoundSource) -> Result<Box<dyn PlayerHandle>, AudioError> {
        if self.inner.fail_create.load(Ordering::SeqCst) {
            return Err(AudioError::DeviceNotAvailable(
                "mock creation failure".to_string(),
            ));
        }

        let probe = Arc::new(TrackProbe::default());
        self.inner
            .probes
            .lock()
            .unwrap()
            .push((source.name().to_string(), probe.clone()));

        Ok(Box::new(MockPlayerHandle { probe }))
    }
}

// ============================================================================
// Tests
// ============================================================================
