use super::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use log::debug;
use std::f64::consts::PI;
use std::path::Path;

/// A short sine click shaped by a raised-cosine (Hann) envelope so it starts
/// and ends at zero amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickTone {
    pub frequency_hz: f64,
    pub duration_ms: u32,
    pub volume: f64,
    pub sample_rate: u32,
}

impl ClickTone {
    pub const SAMPLE_RATE: u32 = 44_100;

    /// Higher "tick" used on even beats.
    pub fn high() -> Self {
        Self::new(1200.0)
    }

    /// Lower "tock" used on odd beats.
    pub fn low() -> Self {
        Self::new(800.0)
    }

    pub fn new(frequency_hz: f64) -> Self {
        ClickTone {
            frequency_hz,
            duration_ms: 40,
            volume: 0.35,
            sample_rate: Self::SAMPLE_RATE,
        }
    }

    pub fn frame_count(&self) -> usize {
        (u64::from(self.sample_rate) * u64::from(self.duration_ms) / 1000) as usize
    }

    /// Mono 16-bit PCM frames.
    pub fn render(&self) -> Vec<i16> {
        let frames = self.frame_count();
        let sr = f64::from(self.sample_rate);
        (0..frames)
            .map(|n| {
                let env = if frames > 1 {
                    0.5 * (1.0 - (2.0 * PI * n as f64 / (frames - 1) as f64).cos())
                } else {
                    1.0
                };
                let t = n as f64 / sr;
                let value = self.volume * env * (2.0 * PI * self.frequency_hz * t).sin();
                (value.clamp(-1.0, 1.0) * 32767.0) as i16
            })
            .collect()
    }

    /// Writes the rendered click as an uncompressed mono WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec)?;
        for sample in self.render() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        debug!(
            "Wrote {} Hz click ({} ms) to {}",
            self.frequency_hz,
            self.duration_ms,
            path.display()
        );
        Ok(())
    }
}
