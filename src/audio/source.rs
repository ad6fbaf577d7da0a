//! Sound source resolution.
//!
//! Each [`SoundId`] resolves to an audio file in the sound library
//! directory. When no matching file exists the source falls back to a
//! synthesized tone so a track can always be created.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::SoundId;

use super::error::AudioError;

/// Represents the source a looping track is created from.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    /// An audio file from the sound library or an explicit path.
    File {
        /// The sound name (e.g., "rain").
        name: String,
        /// The full path to the audio file.
        path: PathBuf,
    },
    /// A synthesized fallback tone, used when no file is available.
    Synth {
        /// The sound name (e.g., "rain").
        name: String,
        /// Tone frequency in Hz.
        frequency: f32,
    },
}

impl SoundSource {
    /// Creates a new file-backed sound source.
    ///
    /// This constructor does not validate the path. Use `file_validated`
    /// for existence and extension checks.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates a new file-backed sound source, validating the path.
    ///
    /// The file must exist and carry one of the supported audio extensions.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::FileNotFound` if the file does not exist and
    /// `AudioError::InvalidPath` if the extension is unsupported.
    pub fn file_validated(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, AudioError> {
        let path = path.into();
        if !path.is_file() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }
        if !has_supported_extension(&path) {
            return Err(AudioError::InvalidPath(format!(
                "'{}' は対応していない形式です ({} のいずれかを指定してください)",
                path.display(),
                SUPPORTED_EXTENSIONS.join(", ")
            )));
        }
        Ok(Self::File {
            name: name.into(),
            path,
        })
    }

    /// Creates a new synthesized sound source.
    #[must_use]
    pub fn synth(name: impl Into<String>, frequency: f32) -> Self {
        Self::Synth {
            name: name.into(),
            frequency,
        }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Synth { name, .. } => name,
        }
    }

    /// Returns the file path if this is a file-backed source.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Synth { .. } => None,
        }
    }

    /// Returns true if this is a file-backed source.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns true if this is a synthesized source.
    #[must_use]
    pub fn is_synth(&self) -> bool {
        matches!(self, Self::Synth { .. })
    }
}

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "ogg", "mp3", "flac", "m4a"];

/// Fallback tone frequency per sound, in Hz.
///
/// Low frequencies for the broadband sounds, a high one for the birds.
const FALLBACK_FREQUENCIES: &[(SoundId, f32)] = &[
    (SoundId::WhiteNoise, 120.0),
    (SoundId::Rain, 90.0),
    (SoundId::Birds, 880.0),
    (SoundId::Waves, 70.0),
    (SoundId::Road, 55.0),
];

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Returns the default sound library directory, if the platform has one.
#[must_use]
pub fn default_sounds_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("ambience").join("sounds"))
}

/// Returns the fallback tone frequency for a sound.
#[must_use]
pub fn fallback_frequency(id: SoundId) -> f32 {
    FALLBACK_FREQUENCIES
        .iter()
        .find(|(sound, _)| *sound == id)
        .map(|(_, freq)| *freq)
        .unwrap_or(440.0)
}

/// Discovers available sound files in the library directory.
///
/// Returns an empty vector if the directory does not exist.
#[must_use]
pub fn discover_sounds(dir: &Path) -> Vec<SoundSource> {
    let mut sounds = Vec::new();

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let file_path = entry.path();
            if has_supported_extension(&file_path) {
                if let Some(stem) = file_path.file_stem() {
                    sounds.push(SoundSource::File {
                        name: stem.to_string_lossy().into_owned(),
                        path: file_path,
                    });
                }
            }
        }
    }

    // Sort by name for consistent ordering
    sounds.sort_by(|a, b| a.name().cmp(b.name()));
    sounds
}

/// Resolves the source for a sound id.
///
/// Looks for a file named after the sound in the library directory
/// (`sounds_dir` or the platform default); falls back to the synthesized
/// tone when no file matches.
#[must_use]
pub fn resolve_source(id: SoundId, sounds_dir: Option<&Path>) -> SoundSource {
    let dir = sounds_dir
        .map(Path::to_path_buf)
        .or_else(default_sounds_dir);

    if let Some(dir) = dir {
        for source in discover_sounds(&dir) {
            if source.name() == id.as_str() {
                debug!("resolved {} to {:?}", id, source.path());
                return source;
            }
        }
    }

    debug!("no library file for {}, using synthesized fallback", id);
    SoundSource::synth(id.as_str(), fallback_frequency(id))
}
