//! Click asset service
//!
//! This module provides the audio side of the metronome:
//! - [`ClickTone`] synthesis of short Hann-enveloped sine clicks
//! - [`ClickBank`], which writes the WAV assets on first use, loads them once
//!   and restarts a sample (stop, then play) on every trigger
//! - the [`SoundBackend`] seam for whatever actually plays a loaded sample
//!
//! Failures here never stop the metronome; the caller logs and carries on.

mod bank;
pub mod mock;
mod synth;

pub use bank::{
    ClickBank, HoundBackend, LoadedSample, SoundBackend, HIGH_CLICK_FILE, LOW_CLICK_FILE,
};
pub use synth::ClickTone;

use crate::tempo::Click;
use std::error::Error;
use std::fmt;
use std::io;

/// Error type for click asset operations
#[derive(Debug)]
pub enum AudioError {
    /// Filesystem error while writing or reading an asset
    Io(io::Error),
    /// Malformed or unwritable WAV data
    Wav(hound::Error),
    /// The asset for this click was never loaded
    MissingAsset(Click),
    /// The playback backend refused the request
    Playback(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Io(e) => write!(f, "click asset I/O error: {}", e),
            AudioError::Wav(e) => write!(f, "click asset WAV error: {}", e),
            AudioError::MissingAsset(click) => write!(f, "click asset not loaded: {:?}", click),
            AudioError::Playback(msg) => write!(f, "click playback error: {}", msg),
        }
    }
}

impl Error for AudioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AudioError::Io(e) => Some(e),
            AudioError::Wav(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for AudioError {
    fn from(e: io::Error) -> Self {
        AudioError::Io(e)
    }
}

impl From<hound::Error> for AudioError {
    fn from(e: hound::Error) -> Self {
        AudioError::Wav(e)
    }
}

/// Result type for click asset operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// What the metronome needs from the audio side.
pub trait ClickOutput {
    /// Make both click assets ready. Cheap once they are.
    fn prepare(&mut self) -> Result<()>;

    /// Restart the sample for `click` from its beginning.
    fn play(&mut self, click: Click) -> Result<()>;
}
