//! Rotary tempo dial
//!
//! Turns a press-drag-release gesture around a circular control into tempo
//! steps. The drag is integrated as a cumulative angle so that crossing the
//! 0°/360° seam never produces a jump; one BPM step per 22.5° (1/16 turn),
//! clockwise raises the tempo.

use crate::audio::ClickOutput;
use crate::scheduler::Scheduler;
use crate::tempo::{Bpm, BpmChange, TempoController};
use log::{debug, trace};

/// Degrees of drag per BPM step.
pub const DEGREES_PER_BPM: f64 = 22.5;

/// A pointer or widget-centre position in the host's coordinate space
/// (x to the right, y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Angle of `pointer` around `center` in degrees, in `[0, 360)`.
pub fn wrapped_angle(center: Point, pointer: Point) -> f64 {
    let deg = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees();
    if deg < 0.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// Folds a raw difference between two wrapped angles into `(-180, 180]`.
///
/// Exactly `+180` is kept and exactly `-180` becomes `+180`, so a pointer
/// sitting on the seam resolves the same way every time.
pub fn normalize_delta(raw: f64) -> f64 {
    if raw > 180.0 {
        raw - 360.0
    } else if raw <= -180.0 {
        raw + 360.0
    } else {
        raw
    }
}

/// Needle rotation for a tempo. Unbounded, so it never snaps back a turn.
pub fn needle_angle(bpm: Bpm) -> f64 {
    f64::from(bpm.get()) * DEGREES_PER_BPM
}

/// BPM offset for a cumulative (clockwise-positive) drag. Exact half steps
/// round to the even neighbour.
pub fn steps_for(cumulative_deg: f64) -> i64 {
    (cumulative_deg / DEGREES_PER_BPM).round_ties_even() as i64
}

/// State of one gesture; dropped on release.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DialGesture {
    base_bpm: Bpm,
    last_angle: f64,
    cumulative: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialUpdate {
    pub bpm: Bpm,
    pub needle_angle: f64,
    pub changed: bool,
}

/// Decoder for the dial. The center is an environment input supplied by
/// the host layout.
#[derive(Debug, Default)]
pub struct RotaryDecoder {
    center: Option<Point>,
    gesture: Option<DialGesture>,
}

impl RotaryDecoder {
    pub fn new(center: Point) -> Self {
        RotaryDecoder {
            center: Some(center),
            gesture: None,
        }
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = Some(center);
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Cumulative clockwise drag of the current gesture, if any.
    pub fn cumulative_degrees(&self) -> Option<f64> {
        self.gesture.map(|g| g.cumulative)
    }

    /// Anchors a new gesture at `pointer` on the current tempo.
    pub fn begin(&mut self, pointer: Point, current: Bpm) {
        let center = self.center.unwrap_or(Point::new(0.0, 0.0));
        let angle = wrapped_angle(center, pointer);
        debug!("Dial gesture started at {:.1}° on {}", angle, current);
        self.gesture = Some(DialGesture {
            base_bpm: current,
            last_angle: angle,
            cumulative: 0.0,
        });
    }

    /// Integrates one move sample and returns the tempo it implies. `None`
    /// when no gesture is active.
    pub fn track(&mut self, pointer: Point) -> Option<Bpm> {
        let center = self.center.unwrap_or(Point::new(0.0, 0.0));
        let gesture = self.gesture.as_mut()?;
        let angle = wrapped_angle(center, pointer);
        let delta = normalize_delta(angle - gesture.last_angle);
        // atan2 grows counter-clockwise; clockwise drags raise the tempo.
        gesture.cumulative -= delta;
        gesture.last_angle = angle;
        trace!(
            "Dial sample {:.1}° delta {:.1}° cumulative {:.1}°",
            angle,
            delta,
            gesture.cumulative
        );
        Some(gesture.base_bpm.offset(steps_for(gesture.cumulative)))
    }

    /// Integrates a move and pushes the resulting tempo into the controller.
    pub fn drag<O: ClickOutput>(
        &mut self,
        pointer: Point,
        controller: &mut TempoController<O>,
        scheduler: &mut dyn Scheduler,
    ) -> Option<DialUpdate> {
        let target = self.track(pointer)?;
        let changed = target != controller.bpm()
            && controller.set_bpm(BpmChange::To(i64::from(target.get())), scheduler);
        let bpm = controller.bpm();
        Some(DialUpdate {
            bpm,
            needle_angle: needle_angle(bpm),
            changed,
        })
    }

    /// Ends the gesture. Later move samples have no effect.
    pub fn end(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            debug!(
                "Dial gesture ended after {:.1}° from {}",
                gesture.cumulative, gesture.base_bpm
            );
        }
    }
}
