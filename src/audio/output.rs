//! Rodio-backed playback resources.
//!
//! This module provides the `RodioAudioBackend` which uses the rodio v0.20
//! audio library for cross-platform playback. Each track gets its own
//! `Sink`, created paused and fed an infinitely looping source.

use std::fs::File;
use std::io::BufReader;

use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::debug;

use super::error::AudioError;
use super::source::SoundSource;
use super::{AudioBackend, PlayerHandle};

/// Gain applied to the synthesized fallback tone so it stays unobtrusive
/// relative to real recordings.
const SYNTH_BASE_GAIN: f32 = 0.25;

// ============================================================================
// RodioAudioBackend
// ============================================================================

/// An audio backend that creates one rodio `Sink` per track.
pub struct RodioAudioBackend {
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioAudioBackend {
    /// Creates a backend for the default audio output device.
    ///
    /// The returned `OutputStream` must be kept alive for as long as any
    /// track is expected to produce sound; dropping it silences every sink.
    /// It is returned separately because it cannot be sent across threads,
    /// while the backend itself can.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn try_default() -> Result<(OutputStream, Self), AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok((stream, Self { stream_handle }))
    }

    /// Creates a backend from an existing stream handle.
    #[must_use]
    pub fn new(stream_handle: OutputStreamHandle) -> Self {
        Self { stream_handle }
    }

    fn new_sink(&self) -> Result<Sink, AudioError> {
        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| AudioError::StreamError(e.to_string()))?;
        // Created paused; the session decides when the track starts.
        sink.pause();
        Ok(sink)
    }
}

impl AudioBackend for RodioAudioBackend {
    fn create_looping(&self, source: &SoundSource) -> Result<Box<dyn PlayerHandle>, AudioError> {
        let sink = self.new_sink()?;

        match source {
            SoundSource::File { name, path } => {
                debug!("Creating looping track '{}' from {}", name, path.display());
                let file = File::open(path).map_err(|e| {
                    AudioError::FileNotFound(format!("{}: {}", path.display(), e))
                })?;
                let decoder = Decoder::new(BufReader::new(file))
                    .map_err(|e| AudioError::DecodeError(e.to_string()))?;
                sink.append(decoder.repeat_infinite());
            }
            SoundSource::Synth { name, frequency } => {
                debug!("Creating synthesized track '{}' at {} Hz", name, frequency);
                sink.append(SineWave::new(*frequency).amplify(SYNTH_BASE_GAIN));
            }
        }

        Ok(Box::new(RodioTrackHandle { sink }))
    }
}

impl std::fmt::Debug for RodioAudioBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAudioBackend").finish_non_exhaustive()
    }
}

// ============================================================================
// RodioTrackHandle
// ============================================================================

/// One looping track backed by a rodio `Sink`.
pub struct RodioTrackHandle {
    sink: Sink,
}

impl PlayerHandle for RodioTrackHandle {
    fn start(&self) -> Result<(), AudioError> {
        self.sink.play();
        Ok(())
    }

    fn pause(&self) -> Result<(), AudioError> {
        self.sink.pause();
        Ok(())
    }

    fn stop(&self) -> Result<(), AudioError> {
        self.sink.stop();
        Ok(())
    }

    fn set_volume(&self, gain: f32) -> Result<(), AudioError> {
        self.sink.set_volume(gain.clamp(0.0, 1.0));
        Ok(())
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }
}

impl std::fmt::Debug for RodioTrackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioTrackHandle")
            .field("paused", &self.sink.is_paused())
            .field("volume", &self.sink.volume())
            .finish()
    }
}
