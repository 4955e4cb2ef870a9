use std::collections::VecDeque;
use std::time::Duration;

/// Finger travel (px) below which a press still counts as a tap.
pub const TOUCH_SLOP: f64 = 8.0;

/// Free-scroll speed (px/s) under which momentum hands over to the snap.
pub const SETTLE_VELOCITY: f64 = 50.0;

/// Exponential velocity decay rate while coasting, per second.
pub const FRICTION: f64 = 4.0;

pub const SNAP_DURATION: Duration = Duration::from_millis(200);

/// Only samples this recent contribute to the release velocity.
const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

/// Estimates scroll velocity from recent drag samples.
#[derive(Debug, Default, Clone)]
pub struct VelocityTracker {
    samples: VecDeque<(Duration, f64)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn push(&mut self, at: Duration, position: f64) {
        self.samples.push_back((at, position));
        while let Some(&(oldest, _)) = self.samples.front() {
            if at.saturating_sub(oldest) > VELOCITY_WINDOW && self.samples.len() > 2 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Pixels per second between the oldest and newest retained samples.
    /// `None` without two samples spread over time.
    pub fn velocity(&self) -> Option<f64> {
        let (t0, p0) = *self.samples.front()?;
        let (t1, p1) = *self.samples.back()?;
        let dt = t1.saturating_sub(t0).as_secs_f64();
        if dt <= 0.0 {
            return None;
        }
        Some((p1 - p0) / dt)
    }

    /// Velocity as seen at `now`. A finger that has rested longer than the
    /// window is not moving, whatever the last drag samples say.
    pub fn velocity_at(&self, now: Duration) -> Option<f64> {
        let &(newest, _) = self.samples.back()?;
        if now.saturating_sub(newest) > VELOCITY_WINDOW {
            return Some(0.0);
        }
        self.velocity()
    }
}

/// Coasting scroll after a fling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coast {
    pub velocity: f64,
    pub last_frame: Duration,
}

impl Coast {
    /// Advances to `now`; returns the distance travelled.
    pub fn step(&mut self, now: Duration) -> f64 {
        let dt = now.saturating_sub(self.last_frame).as_secs_f64();
        self.last_frame = now;
        let travelled = self.velocity * dt;
        self.velocity *= (-FRICTION * dt).exp();
        travelled
    }

    pub fn is_settled(&self) -> bool {
        self.velocity.abs() < SETTLE_VELOCITY
    }
}

/// Eased transition of the normalised offset to a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapAnimation {
    pub from: f64,
    pub to: f64,
    pub target_index: usize,
    pub started: Duration,
    pub duration: Duration,
}

impl SnapAnimation {
    pub fn new(from: f64, to: f64, target_index: usize, started: Duration) -> Self {
        SnapAnimation {
            from,
            to,
            target_index,
            started,
            duration: SNAP_DURATION,
        }
    }

    /// Offset at `now` and whether the animation has finished.
    pub fn sample(&self, now: Duration) -> (f64, bool) {
        let elapsed = now.saturating_sub(self.started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.from + (self.to - self.from) * ease_out_cubic(t), false)
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
