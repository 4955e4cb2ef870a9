use super::{AudioError, ClickOutput, Result};
use crate::tempo::Click;

/// Click output that remembers what it was asked to play.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    played: Vec<Click>,
    prepared: u32,
    fail_prepare: bool,
    fail_play: bool,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `prepare()` fail as if the assets could not be created.
    pub fn fail_prepare(&mut self, fail: bool) {
        self.fail_prepare = fail;
    }

    pub fn fail_play(&mut self, fail: bool) {
        self.fail_play = fail;
    }

    pub fn played(&self) -> Vec<Click> {
        self.played.clone()
    }

    pub fn prepare_calls(&self) -> u32 {
        self.prepared
    }
}

impl ClickOutput for RecordingOutput {
    fn prepare(&mut self) -> Result<()> {
        self.prepared += 1;
        if self.fail_prepare {
            return Err(AudioError::Playback("mock prepare failure".to_string()));
        }
        Ok(())
    }

    fn play(&mut self, click: Click) -> Result<()> {
        if self.fail_play {
            return Err(AudioError::Playback("mock play failure".to_string()));
        }
        self.played.push(click);
        Ok(())
    }
}
