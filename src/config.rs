// config.rs

use crate::audio::ClickTone;
use crate::cli::Args;
use crate::mode::{ModeError, TimerMode};
use crate::tempo::{Bpm, DEFAULT_BPM};
use config::{Config, ConfigError, Environment, File};
use log::{debug, LevelFilter};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_PREFIX: &str = "METRODIAL";
pub const DEFAULT_FRAME_RATE_HZ: u32 = 60;
pub const DEFAULT_TICK_FREQUENCY_HZ: f64 = 1200.0;
pub const DEFAULT_TOCK_FREQUENCY_HZ: f64 = 800.0;
pub const DEFAULT_CLICK_MS: u32 = 40;
pub const DEFAULT_CLICK_VOLUME: f64 = 0.35;
pub const DEFAULT_LOG_LEVEL: &str = "debug";

#[derive(Debug)]
pub enum SettingsError {
    Config(ConfigError),
    Invalid { key: &'static str, reason: String },
    Mode(ModeError),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Config(e) => write!(f, "settings error: {}", e),
            SettingsError::Invalid { key, reason } => {
                write!(f, "invalid setting '{}': {}", key, reason)
            }
            SettingsError::Mode(e) => write!(f, "invalid setting 'mode': {}", e),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SettingsError::Config(e) => Some(e),
            SettingsError::Mode(e) => Some(e),
            SettingsError::Invalid { .. } => None,
        }
    }
}

impl From<ConfigError> for SettingsError {
    fn from(e: ConfigError) -> Self {
        SettingsError::Config(e)
    }
}

impl From<ModeError> for SettingsError {
    fn from(e: ModeError) -> Self {
        SettingsError::Mode(e)
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        key,
        reason: reason.into(),
    }
}

fn in_range(key: &'static str, value: i64, min: i64, max: i64) -> Result<u32, SettingsError> {
    if value < min || value > max {
        return Err(invalid(key, format!("{} is outside {}..={}", value, min, max)));
    }
    Ok(value as u32)
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bpm: Bpm,
    pub asset_dir: PathBuf,
    pub frame_rate_hz: u32,
    pub tick_frequency_hz: f64,
    pub tock_frequency_hz: f64,
    pub click_ms: u32,
    pub click_volume: f64,
    pub sample_rate: u32,
    pub log_level: LevelFilter,
    pub start: bool,
    pub mode: TimerMode,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bpm: Bpm::default(),
            asset_dir: PathBuf::from("."),
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
            tick_frequency_hz: DEFAULT_TICK_FREQUENCY_HZ,
            tock_frequency_hz: DEFAULT_TOCK_FREQUENCY_HZ,
            click_ms: DEFAULT_CLICK_MS,
            click_volume: DEFAULT_CLICK_VOLUME,
            sample_rate: ClickTone::SAMPLE_RATE,
            log_level: LevelFilter::Debug,
            start: false,
            mode: TimerMode::default(),
        }
    }
}

impl Settings {
    /// Defaults, then the settings file, then `METRODIAL_*` variables, then
    /// command-line flags.
    pub fn load(args: &Args) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .set_default("bpm", i64::from(DEFAULT_BPM))?
            .set_default("asset_dir", ".")?
            .set_default("frame_rate_hz", i64::from(DEFAULT_FRAME_RATE_HZ))?
            .set_default("tick_frequency_hz", DEFAULT_TICK_FREQUENCY_HZ)?
            .set_default("tock_frequency_hz", DEFAULT_TOCK_FREQUENCY_HZ)?
            .set_default("click_ms", i64::from(DEFAULT_CLICK_MS))?
            .set_default("click_volume", DEFAULT_CLICK_VOLUME)?
            .set_default("sample_rate", i64::from(ClickTone::SAMPLE_RATE))?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("start", false)?
            .set_default("mode", TimerMode::default().name())?
            .add_source(File::from(args.config.as_path()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));

        if let Some(bpm) = args.bpm {
            builder = builder.set_override("bpm", bpm)?;
        }
        if let Some(dir) = &args.asset_dir {
            builder = builder.set_override("asset_dir", dir.to_string_lossy().into_owned())?;
        }
        if args.start {
            builder = builder.set_override("start", true)?;
        }
        if let Some(mode) = &args.mode {
            builder = builder.set_override("mode", mode.as_str())?;
        }
        if let Some(level) = &args.log_level {
            builder = builder.set_override("log_level", level.as_str())?;
        }

        let settings = Self::from_config(&builder.build()?)?;
        debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }

    /// Reads and validates every key. BPM is clamped rather than rejected.
    pub fn from_config(cfg: &Config) -> Result<Self, SettingsError> {
        let log_name = cfg.get_string("log_level")?;
        let log_level = LevelFilter::from_str(&log_name)
            .map_err(|_| invalid("log_level", format!("unknown level '{}'", log_name)))?;

        let click_volume = cfg.get_float("click_volume")?;
        if !(0.0..=1.0).contains(&click_volume) {
            return Err(invalid("click_volume", format!("{} is outside 0..=1", click_volume)));
        }

        let tick_frequency_hz = cfg.get_float("tick_frequency_hz")?;
        let tock_frequency_hz = cfg.get_float("tock_frequency_hz")?;
        for (key, hz) in [
            ("tick_frequency_hz", tick_frequency_hz),
            ("tock_frequency_hz", tock_frequency_hz),
        ] {
            if hz.is_nan() || hz <= 0.0 {
                return Err(invalid(key, format!("{} Hz is not a positive frequency", hz)));
            }
        }

        Ok(Settings {
            bpm: Bpm::new(cfg.get_int("bpm")?),
            asset_dir: PathBuf::from(cfg.get_string("asset_dir")?),
            frame_rate_hz: in_range("frame_rate_hz", cfg.get_int("frame_rate_hz")?, 1, 240)?,
            tick_frequency_hz,
            tock_frequency_hz,
            click_ms: in_range("click_ms", cfg.get_int("click_ms")?, 1, 1000)?,
            click_volume,
            sample_rate: in_range("sample_rate", cfg.get_int("sample_rate")?, 8000, 192_000)?,
            log_level,
            start: cfg.get_bool("start")?,
            mode: cfg.get_string("mode")?.parse()?,
        })
    }

    fn tone(&self, frequency_hz: f64) -> ClickTone {
        ClickTone {
            frequency_hz,
            duration_ms: self.click_ms,
            volume: self.click_volume,
            sample_rate: self.sample_rate,
        }
    }

    pub fn high_tone(&self) -> ClickTone {
        self.tone(self.tick_frequency_hz)
    }

    pub fn low_tone(&self) -> ClickTone {
        self.tone(self.tock_frequency_hz)
    }
}
