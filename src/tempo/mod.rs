//! Tempo values and the metronome timing engine
//!
//! This module provides:
//! - [`Bpm`], an integer tempo that is always inside 30..=300
//! - tick interval derivation (60/bpm seconds, floored at 1 ms)
//! - beat parity ([`Click::High`] on even beats, [`Click::Low`] on odd)
//! - the phase-preserving [`TempoController`]

mod controller;

pub use controller::{RunState, TempoController, TempoListener};

use std::fmt;
use std::time::Duration;

pub const MIN_BPM: u32 = 30;
pub const MAX_BPM: u32 = 300;
pub const DEFAULT_BPM: u32 = 60;

/// Shortest delay the engine will ever schedule.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

const NANOS_PER_MINUTE: u64 = 60_000_000_000;

/// Beats per minute, clamped to [`MIN_BPM`]..=[`MAX_BPM`] on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bpm(u32);

impl Bpm {
    /// Builds a tempo, clamping out-of-range input to the nearest bound.
    pub fn new(value: i64) -> Self {
        Bpm(value.clamp(i64::from(MIN_BPM), i64::from(MAX_BPM)) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Tempo shifted by `delta` beats per minute, clamped.
    pub fn offset(self, delta: i64) -> Self {
        Bpm::new(i64::from(self.0) + delta)
    }

    pub fn tick_interval(self) -> Duration {
        tick_interval(self.0)
    }
}

impl Default for Bpm {
    fn default() -> Self {
        Bpm(DEFAULT_BPM)
    }
}

impl fmt::Display for Bpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.0)
    }
}

/// Seconds between beats at `bpm`, never shorter than [`MIN_TICK_INTERVAL`].
/// A zero tempo is treated as 1 BPM.
pub fn tick_interval(bpm: u32) -> Duration {
    let interval = Duration::from_nanos(NANOS_PER_MINUTE / u64::from(bpm.max(1)));
    interval.max(MIN_TICK_INTERVAL)
}

/// A tempo adjustment: absolute target or relative step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BpmChange {
    To(i64),
    By(i64),
}

impl BpmChange {
    pub fn apply(self, current: Bpm) -> Bpm {
        match self {
            BpmChange::To(value) => Bpm::new(value),
            BpmChange::By(delta) => current.offset(delta),
        }
    }
}

/// Which click sample marks a beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Click {
    /// Higher-pitched "tick", even beats.
    High,
    /// Lower-pitched "tock", odd beats.
    Low,
}

impl Click {
    pub fn for_beat(beat_index: u64) -> Self {
        if beat_index % 2 == 0 {
            Click::High
        } else {
            Click::Low
        }
    }
}
