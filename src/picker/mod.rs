//! Momentum-scroll value picker
//!
//! A vertical wheel of string values in a fixed-height viewport with an
//! invisible centre selection line. Taps select the row under the finger;
//! drags coast with friction once released and then snap to the row nearest
//! the centre line. The committed selection only changes when a snap lands.

mod duration;
mod geometry;
mod motion;

pub use duration::DurationWheels;
pub use geometry::{Origin, WheelGeometry};
pub use motion::{
    Coast, SnapAnimation, VelocityTracker, FRICTION, SETTLE_VELOCITY, SNAP_DURATION, TOUCH_SLOP,
};

use crate::event_loop::EngineMessage;
use crate::scheduler::{Scheduler, TimerHandle};
use log::{debug, trace};
use std::fmt;

/// Which wheel a frame poll belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelId {
    Hours,
    Minutes,
    Seconds,
    Custom(u16),
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelId::Hours => write!(f, "hours"),
            WheelId::Minutes => write!(f, "minutes"),
            WheelId::Seconds => write!(f, "seconds"),
            WheelId::Custom(n) => write!(f, "wheel-{}", n),
        }
    }
}

/// Display surface for one wheel. The picker only ever writes to it.
pub trait WheelDisplay {
    fn set_scroll_offset(&mut self, offset: f64);
    fn set_selected(&mut self, index: usize, value: &str);
    /// Rows were regenerated for a new value list or size.
    fn rebuild(&mut self, _values: &[String]) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    start_offset: f64,
    last_depth: f64,
    moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Coasting(Coast),
    Snapping(SnapAnimation),
}

pub struct InertialPicker {
    id: WheelId,
    values: Vec<String>,
    geometry: WheelGeometry,
    selected: usize,
    offset: f64,
    press: Option<Press>,
    tracker: VelocityTracker,
    motion: Motion,
    watch: Option<TimerHandle>,
    display: Option<Box<dyn WheelDisplay>>,
}

impl fmt::Debug for InertialPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InertialPicker")
            .field("id", &self.id)
            .field("rows", &self.values.len())
            .field("selected", &self.selected)
            .field("offset", &self.offset)
            .field("motion", &self.motion)
            .finish()
    }
}

impl InertialPicker {
    pub fn new(
        id: WheelId,
        values: Vec<String>,
        viewport_height: f64,
        row_height: f64,
        origin: Origin,
    ) -> Self {
        let geometry = WheelGeometry::new(viewport_height, row_height, values.len(), origin);
        InertialPicker {
            id,
            values,
            geometry,
            selected: 0,
            offset: 0.0,
            press: None,
            tracker: VelocityTracker::new(),
            motion: Motion::Idle,
            watch: None,
            display: None,
        }
    }

    pub fn attach_display(&mut self, mut display: Box<dyn WheelDisplay>) {
        display.rebuild(&self.values);
        display.set_scroll_offset(self.offset);
        if let Some(value) = self.values.get(self.selected) {
            display.set_selected(self.selected, value);
        }
        self.display = Some(display);
    }

    pub fn id(&self) -> WheelId {
        self.id
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.values.get(self.selected).map(String::as_str)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_touch_active(&self) -> bool {
        self.press.is_some()
    }

    /// Whether the current touch has travelled past the tap slop.
    pub fn has_moved(&self) -> bool {
        self.press.map(|p| p.moved).unwrap_or(false)
    }

    pub fn is_coasting(&self) -> bool {
        matches!(self.motion, Motion::Coasting(_))
    }

    pub fn is_snapping(&self) -> bool {
        matches!(self.motion, Motion::Snapping(_))
    }

    pub fn frame_watch(&self) -> Option<TimerHandle> {
        self.watch
    }

    /// Row currently under the centre line.
    pub fn centered_index(&self) -> usize {
        self.geometry.index_for_offset(self.offset, self.selected)
    }

    fn set_offset(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, 1.0);
        if let Some(display) = self.display.as_mut() {
            display.set_scroll_offset(self.offset);
        }
    }

    fn commit(&mut self, index: usize) {
        self.selected = index;
        if let (Some(display), Some(value)) = (self.display.as_mut(), self.values.get(index)) {
            display.set_selected(index, value);
        }
    }

    fn halt(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.watch.take() {
            scheduler.cancel(handle);
        }
        self.motion = Motion::Idle;
    }

    fn ensure_watch(&mut self, scheduler: &mut dyn Scheduler) {
        if self.watch.is_none() {
            self.watch = Some(scheduler.poll_each_frame(EngineMessage::WheelFrame(self.id)));
        }
    }

    /// Finger down at viewport-local `y`. Stops any coast or snap in flight.
    pub fn press(&mut self, y: f64, scheduler: &mut dyn Scheduler) {
        self.halt(scheduler);
        self.press = Some(Press {
            start_offset: self.offset,
            last_depth: self.geometry.depth_from_top(y),
            moved: false,
        });
        self.tracker.reset();
        self.tracker
            .push(scheduler.now(), self.geometry.scroll_px(self.offset));
    }

    /// Finger moved to viewport-local `y`; content follows the finger.
    pub fn drag(&mut self, y: f64, scheduler: &mut dyn Scheduler) {
        let Some(mut press) = self.press else {
            return;
        };
        let depth = self.geometry.depth_from_top(y);
        let px = self.geometry.scroll_px(self.offset) - (depth - press.last_depth);
        press.last_depth = depth;
        self.set_offset(self.geometry.offset_for_px(px));

        let travelled = (self.geometry.scroll_px(self.offset)
            - self.geometry.scroll_px(press.start_offset))
        .abs();
        if travelled > TOUCH_SLOP {
            press.moved = true;
        }
        self.press = Some(press);
        self.tracker
            .push(scheduler.now(), self.geometry.scroll_px(self.offset));
    }

    /// Finger up at viewport-local `y`.
    pub fn release(&mut self, y: f64, scheduler: &mut dyn Scheduler) {
        let Some(press) = self.press.take() else {
            return;
        };
        if !press.moved {
            if let Some(index) = self.geometry.index_at(self.offset, y) {
                debug!("{} tapped row {}", self.id, index);
                self.snap_to(index, scheduler);
            }
            return;
        }
        let now = scheduler.now();
        self.tracker.push(now, self.geometry.scroll_px(self.offset));
        match self.tracker.velocity_at(now) {
            Some(velocity) if velocity.abs() >= SETTLE_VELOCITY => {
                debug!("{} released at {:.0} px/s, coasting", self.id, velocity);
                self.motion = Motion::Coasting(Coast {
                    velocity,
                    last_frame: now,
                });
                self.ensure_watch(scheduler);
            }
            _ => {
                let index = self.centered_index();
                self.snap_to(index, scheduler);
            }
        }
    }

    /// Animates to `index`, replacing any motion in progress.
    pub fn snap_to(&mut self, index: usize, scheduler: &mut dyn Scheduler) {
        if self.values.is_empty() {
            return;
        }
        let index = index.min(self.values.len() - 1);
        let target = self.geometry.offset_for_index(index);
        self.halt(scheduler);
        self.motion = Motion::Snapping(SnapAnimation::new(
            self.offset,
            target,
            index,
            scheduler.now(),
        ));
        self.ensure_watch(scheduler);
    }

    /// Jumps straight to `index` without animation.
    pub fn select_now(&mut self, index: usize, scheduler: &mut dyn Scheduler) {
        self.halt(scheduler);
        if self.values.is_empty() {
            self.set_offset(0.0);
            self.selected = 0;
            return;
        }
        let index = index.min(self.values.len() - 1);
        self.set_offset(self.geometry.offset_for_index(index));
        self.commit(index);
    }

    /// Frame poll. Returns the newly committed index when a snap lands.
    pub fn on_frame(
        &mut self,
        handle: TimerHandle,
        scheduler: &mut dyn Scheduler,
    ) -> Option<usize> {
        if self.watch != Some(handle) {
            trace!("{} ignoring stale frame {}", self.id, handle);
            return None;
        }
        let now = scheduler.now();
        match self.motion {
            Motion::Idle => {
                self.halt(scheduler);
                None
            }
            Motion::Coasting(mut coast) => {
                let px = self.geometry.scroll_px(self.offset) + coast.step(now);
                self.set_offset(self.geometry.offset_for_px(px));
                if px <= 0.0 || px >= self.geometry.scroll_span() {
                    // Ran into an end of the list.
                    coast.velocity = 0.0;
                }
                if coast.is_settled() {
                    let index = self.centered_index();
                    trace!("{} settled near row {}", self.id, index);
                    self.motion = Motion::Snapping(SnapAnimation::new(
                        self.offset,
                        self.geometry.offset_for_index(index),
                        index,
                        now,
                    ));
                } else {
                    self.motion = Motion::Coasting(coast);
                }
                None
            }
            Motion::Snapping(anim) => {
                let (offset, done) = anim.sample(now);
                self.set_offset(offset);
                if !done {
                    return None;
                }
                self.halt(scheduler);
                self.commit(anim.target_index);
                debug!("{} snapped to row {}", self.id, anim.target_index);
                Some(anim.target_index)
            }
        }
    }

    /// Replaces the value list, regenerating rows and re-snapping to the
    /// previous selection (clamped).
    pub fn set_values(&mut self, values: Vec<String>, scheduler: &mut dyn Scheduler) {
        self.values = values;
        self.rebuild(scheduler);
    }

    pub fn resize(&mut self, viewport_height: f64, row_height: f64, scheduler: &mut dyn Scheduler) {
        self.geometry.viewport_height = viewport_height;
        self.geometry.row_height = row_height;
        self.rebuild(scheduler);
    }

    fn rebuild(&mut self, scheduler: &mut dyn Scheduler) {
        self.press = None;
        self.geometry.rows = self.values.len();
        if let Some(display) = self.display.as_mut() {
            display.rebuild(&self.values);
        }
        let previous = self.selected;
        self.select_now(previous, scheduler);
        debug!(
            "{} rebuilt with {} rows, selection {}",
            self.id,
            self.values.len(),
            self.selected
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::event_loop::{Dispatch, EventLoop, Fired};
    use std::time::Duration;

    struct Harness {
        picker: InertialPicker,
        settled: Vec<usize>,
    }

    impl Dispatch for Harness {
        fn dispatch(&mut self, fired: Fired, scheduler: &mut dyn Scheduler) {
            if let Some(index) = self.picker.on_frame(fired.handle, scheduler) {
                self.settled.push(index);
            }
        }
    }

    fn numbers(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{:02}", i)).collect()
    }

    fn setup() -> (EventLoop<ManualClock>, Harness) {
        let lp = EventLoop::new(ManualClock::new(), 60);
        let picker = InertialPicker::new(WheelId::Minutes, numbers(60), 150.0, 50.0, Origin::Top);
        (
            lp,
            Harness {
                picker,
                settled: Vec::new(),
            },
        )
    }

    #[test]
    fn test_small_jitter_is_still_a_tap() {
        let (mut lp, mut h) = setup();
        h.picker.press(75.0, &mut lp);
        h.picker.drag(72.0, &mut lp);
        assert!(!h.picker.has_moved());
        h.picker.release(125.0, &mut lp);

        lp.advance(Duration::from_millis(300), &mut h);
        // Started 3 px in; the bottom band still lands on row 1.
        assert_eq!(h.settled, vec![1]);
    }

    #[test]
    fn test_slow_drag_snaps_to_nearest() {
        let (mut lp, mut h) = setup();
        h.picker.press(140.0, &mut lp);
        for step in 1..=12 {
            lp.clock().advance(Duration::from_millis(50));
            h.picker.drag(140.0 - 10.0 * step as f64, &mut lp);
        }
        lp.clock().advance(Duration::from_millis(200));
        h.picker.drag(20.0, &mut lp);
        h.picker.release(20.0, &mut lp);
        assert!(h.picker.is_snapping());

        lp.advance(Duration::from_millis(300), &mut h);
        // 120 px scrolled: row 2 (100 px) is closer than row 3 (150 px).
        assert_eq!(h.settled, vec![2]);
        assert_eq!(h.picker.selected(), 2);
        assert_eq!(h.picker.frame_watch(), None);
    }

    #[test]
    fn test_release_after_holding_still_snaps_under_centre() {
        let (mut lp, mut h) = setup();
        h.picker.select_now(20, &mut lp);
        h.picker.press(75.0, &mut lp);
        for step in 1..=5 {
            lp.clock().advance(Duration::from_millis(10));
            h.picker.drag(75.0 - 20.0 * step as f64, &mut lp);
        }
        lp.advance(Duration::from_secs(1), &mut h);
        h.picker.release(-25.0, &mut lp);

        assert!(h.picker.is_snapping());
        assert!(!h.picker.is_coasting());
        lp.advance(Duration::from_millis(300), &mut h);
        // 100 px past row 20 puts row 22 on the centre line.
        assert_eq!(h.settled, vec![22]);
    }

    #[test]
    fn test_mid_list_flings_coast_until_settled() {
        for speed in [10.0, 13.0, 17.0, 20.0, 25.0, 30.0] {
            let (mut lp, mut h) = setup();
            h.picker.select_now(20, &mut lp);
            h.picker.press(100.0, &mut lp);
            for step in 1..=3 {
                lp.clock().advance(Duration::from_millis(10));
                h.picker.drag(100.0 - speed * step as f64, &mut lp);
            }
            h.picker.release(100.0 - speed * 3.0, &mut lp);
            assert!(h.picker.is_coasting(), "speed {}", speed);

            lp.advance(Duration::from_secs(3), &mut h);
            assert_eq!(h.settled.len(), 1, "speed {}", speed);
            // Release velocity v = 100 * speed px/s coasts at least (v - 50) / 4 px,
            // on top of the 3 * speed px dragged; the snap may pull back half a row.
            let travelled = (h.settled[0] - 20) as f64 * 50.0;
            assert!(
                travelled >= 28.0 * speed - 37.5,
                "speed {} stopped after {} px",
                speed,
                travelled
            );
        }
    }

    #[test]
    fn test_selection_commits_only_when_snap_lands() {
        let (mut lp, mut h) = setup();
        h.picker.snap_to(30, &mut lp);
        lp.advance(Duration::from_millis(100), &mut h);
        assert_eq!(h.picker.selected(), 0);
        assert!(h.picker.offset() > 0.0);
        lp.advance(Duration::from_millis(150), &mut h);
        assert_eq!(h.picker.selected(), 30);
    }

    #[test]
    fn test_new_press_replaces_running_snap() {
        let (mut lp, mut h) = setup();
        h.picker.snap_to(10, &mut lp);
        let first = h.picker.frame_watch();
        lp.advance(Duration::from_millis(50), &mut h);
        h.picker.press(75.0, &mut lp);
        assert_eq!(h.picker.frame_watch(), None);
        h.picker.release(75.0, &mut lp);
        assert_ne!(h.picker.frame_watch(), first);
        assert_eq!(lp.active_pollers(), 1);

        lp.advance(Duration::from_millis(400), &mut h);
        assert_eq!(h.settled.len(), 1);
    }

    #[test]
    fn test_rebuild_keeps_selection_clamped() {
        let (mut lp, mut h) = setup();
        h.picker.select_now(45, &mut lp);
        h.picker.set_values(numbers(24), &mut lp);
        assert_eq!(h.picker.selected(), 23);
        assert_eq!(h.picker.offset(), 1.0);

        h.picker.resize(250.0, 25.0, &mut lp);
        assert_eq!(h.picker.selected(), 23);
        assert_eq!(h.picker.centered_index(), 23);
    }
}
