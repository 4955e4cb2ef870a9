use super::{AudioError, ClickOutput, ClickTone, Result};
use crate::tempo::Click;
use hound::WavReader;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub const HIGH_CLICK_FILE: &str = "rc_tick_hi.wav";
pub const LOW_CLICK_FILE: &str = "rc_tick_lo.wav";

/// Loads sample files and plays them on demand.
pub trait SoundBackend {
    type Sound;

    fn load(&mut self, path: &Path) -> Result<Self::Sound>;

    fn stop(&mut self, sound: &mut Self::Sound);

    fn play(&mut self, sound: &mut Self::Sound) -> Result<()>;
}

/// A decoded click held in memory together with its play cursor.
#[derive(Debug, Clone)]
pub struct LoadedSample {
    pub path: PathBuf,
    pub sample_rate: u32,
    samples: Vec<i16>,
    cursor: Option<usize>,
    plays: u64,
}

impl LoadedSample {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn plays(&self) -> u64 {
        self.plays
    }

    /// Next frame for whatever drains the sample into an output stream.
    pub fn next_frame(&mut self) -> Option<i16> {
        let pos = self.cursor?;
        match self.samples.get(pos) {
            Some(&frame) => {
                self.cursor = Some(pos + 1);
                Some(frame)
            }
            None => {
                self.cursor = None;
                None
            }
        }
    }
}

/// Backend that decodes WAV files with `hound` and keeps them in memory.
#[derive(Debug, Default)]
pub struct HoundBackend;

impl HoundBackend {
    pub fn new() -> Self {
        HoundBackend
    }
}

impl SoundBackend for HoundBackend {
    type Sound = LoadedSample;

    fn load(&mut self, path: &Path) -> Result<LoadedSample> {
        let mut reader = WavReader::open(path)?;
        let sample_rate = reader.spec().sample_rate;
        let samples = reader.samples::<i16>().collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Loaded {} frames from {}", samples.len(), path.display());
        Ok(LoadedSample {
            path: path.to_path_buf(),
            sample_rate,
            samples,
            cursor: None,
            plays: 0,
        })
    }

    fn stop(&mut self, sound: &mut LoadedSample) {
        sound.cursor = None;
    }

    fn play(&mut self, sound: &mut LoadedSample) -> Result<()> {
        if sound.is_empty() {
            return Err(AudioError::Playback(format!(
                "{} contains no frames",
                sound.path.display()
            )));
        }
        sound.cursor = Some(0);
        sound.plays += 1;
        Ok(())
    }
}

/// The two metronome clicks, synthesized to disk on first use.
pub struct ClickBank<B: SoundBackend> {
    dir: PathBuf,
    high_tone: ClickTone,
    low_tone: ClickTone,
    backend: B,
    high: Option<B::Sound>,
    low: Option<B::Sound>,
}

impl<B: SoundBackend> ClickBank<B> {
    pub fn new(dir: impl Into<PathBuf>, backend: B) -> Self {
        Self::with_tones(dir, ClickTone::high(), ClickTone::low(), backend)
    }

    pub fn with_tones(
        dir: impl Into<PathBuf>,
        high_tone: ClickTone,
        low_tone: ClickTone,
        backend: B,
    ) -> Self {
        ClickBank {
            dir: dir.into(),
            high_tone,
            low_tone,
            backend,
            high: None,
            low: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.high.is_some() && self.low.is_some()
    }

    pub fn path_for(&self, click: Click) -> PathBuf {
        match click {
            Click::High => self.dir.join(HIGH_CLICK_FILE),
            Click::Low => self.dir.join(LOW_CLICK_FILE),
        }
    }

    pub fn sound(&self, click: Click) -> Option<&B::Sound> {
        match click {
            Click::High => self.high.as_ref(),
            Click::Low => self.low.as_ref(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn ensure_asset(&self, click: Click) -> Result<PathBuf> {
        let path = self.path_for(click);
        if !path.exists() {
            let tone = match click {
                Click::High => &self.high_tone,
                Click::Low => &self.low_tone,
            };
            tone.write_wav(&path)?;
            info!("Synthesized click asset {}", path.display());
        }
        Ok(path)
    }
}

impl<B: SoundBackend> ClickOutput for ClickBank<B> {
    fn prepare(&mut self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;
        let high_path = self.ensure_asset(Click::High)?;
        let low_path = self.ensure_asset(Click::Low)?;
        if self.high.is_none() {
            self.high = Some(self.backend.load(&high_path)?);
        }
        if self.low.is_none() {
            self.low = Some(self.backend.load(&low_path)?);
        }
        Ok(())
    }

    fn play(&mut self, click: Click) -> Result<()> {
        let sound = match click {
            Click::High => self.high.as_mut(),
            Click::Low => self.low.as_mut(),
        }
        .ok_or(AudioError::MissingAsset(click))?;
        // Restart rather than layer a retrigger over a still-ringing click.
        self.backend.stop(sound);
        self.backend.play(sound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_before_prepare_reports_missing_asset() {
        let mut bank = ClickBank::new("unused", HoundBackend::new());
        match bank.play(Click::Low) {
            Err(AudioError::MissingAsset(Click::Low)) => {}
            other => panic!("Expected MissingAsset, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_synthesizes_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let mut bank = ClickBank::new(dir.path(), HoundBackend::new());
        bank.prepare().unwrap();

        assert!(bank.is_ready());
        assert!(dir.path().join(HIGH_CLICK_FILE).exists());
        assert!(dir.path().join(LOW_CLICK_FILE).exists());
        assert_eq!(bank.sound(Click::High).unwrap().len(), 1764);
    }

    #[test]
    fn test_play_restarts_sample() {
        let dir = tempfile::tempdir().unwrap();
        let mut bank = ClickBank::new(dir.path(), HoundBackend::new());
        bank.prepare().unwrap();

        bank.play(Click::High).unwrap();
        bank.high.as_mut().unwrap().next_frame();
        bank.high.as_mut().unwrap().next_frame();
        bank.play(Click::High).unwrap();

        let sound = bank.sound(Click::High).unwrap();
        assert_eq!(sound.plays(), 2);
        assert_eq!(sound.cursor, Some(0));
    }
}
