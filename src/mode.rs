use log::info;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Sub-screens of the timer tab, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerMode {
    #[default]
    Metronome,
    Timer,
    Stopwatch,
}

impl TimerMode {
    pub const ORDER: [TimerMode; 3] = [
        TimerMode::Metronome,
        TimerMode::Timer,
        TimerMode::Stopwatch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TimerMode::Metronome => "metronome",
            TimerMode::Timer => "timer",
            TimerMode::Stopwatch => "stopwatch",
        }
    }

    fn position(self) -> usize {
        Self::ORDER.iter().position(|m| *m == self).unwrap_or(0)
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised for a mode name that does not exist. This is a caller bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    Unknown(String),
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeError::Unknown(name) => write!(f, "Unknown timer mode: {}", name),
        }
    }
}

impl Error for ModeError {}

impl FromStr for TimerMode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimerMode::ORDER
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| ModeError::Unknown(s.to_string()))
    }
}

/// Direction the incoming screen slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    Left,
    Right,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: TimerMode,
    pub to: TimerMode,
    pub slide: Slide,
}

/// Tracks the active timer sub-mode.
#[derive(Debug, Default)]
pub struct ModeSwitcher {
    current: TimerMode,
}

impl ModeSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_mode(&self) -> TimerMode {
        self.current
    }

    pub fn is_active(&self, mode: TimerMode) -> bool {
        self.current == mode
    }

    pub fn switch(&mut self, to: TimerMode) -> ModeTransition {
        let from = self.current;
        let slide = match to.position().cmp(&from.position()) {
            std::cmp::Ordering::Greater => Slide::Left,
            std::cmp::Ordering::Less => Slide::Right,
            std::cmp::Ordering::Equal => Slide::None,
        };
        self.current = to;
        info!("Timer mode {} -> {}", from, to);
        ModeTransition { from, to, slide }
    }

    /// Switches by name; unknown names are rejected without changing state.
    pub fn switch_named(&mut self, name: &str) -> Result<ModeTransition, ModeError> {
        let to = name.parse::<TimerMode>()?;
        Ok(self.switch(to))
    }
}
