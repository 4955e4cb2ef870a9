//! Top-level owner of the metronome, the tempo dial and the duration wheels
//!
//! The session builds the [`TempoController`] once and lends it to the dial
//! decoder for each drag; display surfaces are attached as explicit handles.
//! Setup that depends on those surfaces is queued on a [`ReadySignal`] and
//! runs exactly once when the host reports it is ready.

use crate::audio::ClickOutput;
use crate::dial::{needle_angle, DialUpdate, Point, RotaryDecoder};
use crate::event_loop::{Dispatch, EngineMessage, Fired};
use crate::mode::{ModeError, ModeSwitcher, ModeTransition, TimerMode};
use crate::picker::{DurationWheels, Origin, WheelId};
use crate::scheduler::Scheduler;
use crate::tempo::{Bpm, BpmChange, TempoController, TempoListener};
use log::{debug, info};
use std::time::Duration;

/// Display surface for the dial needle.
pub trait DialDisplay {
    /// Unbounded rotation in degrees.
    fn set_needle_angle(&mut self, degrees: f64);
}

/// Keeps a dial display in step with the tempo.
struct NeedleSync(Box<dyn DialDisplay>);

impl TempoListener for NeedleSync {
    fn tempo_changed(&mut self, bpm: Bpm) {
        self.0.set_needle_angle(needle_angle(bpm));
    }
}

/// One-shot initialisation latch. Work deferred before it fires is handed
/// back exactly once; work deferred afterwards is handed straight back.
#[derive(Debug)]
pub struct ReadySignal<A> {
    waiting: Option<Vec<A>>,
}

impl<A> Default for ReadySignal<A> {
    fn default() -> Self {
        ReadySignal {
            waiting: Some(Vec::new()),
        }
    }
}

impl<A> ReadySignal<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.waiting.is_none()
    }

    /// Queues `action`, or returns it if the signal has already fired.
    pub fn defer(&mut self, action: A) -> Option<A> {
        match self.waiting.as_mut() {
            Some(queue) => {
                queue.push(action);
                None
            }
            None => Some(action),
        }
    }

    /// Fires the signal. Only the first call returns the queued work.
    pub fn fire(&mut self) -> Vec<A> {
        self.waiting.take().unwrap_or_default()
    }
}

pub type SetupAction<O> = Box<dyn FnOnce(&mut Session<O>, &mut dyn Scheduler)>;

/// Layout inputs supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub dial_center: Point,
    pub wheel_viewport_height: f64,
    pub wheel_row_height: f64,
    pub origin: Origin,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            dial_center: Point::new(160.0, 300.0),
            wheel_viewport_height: 150.0,
            wheel_row_height: 50.0,
            origin: Origin::Top,
        }
    }
}

pub struct Session<O: ClickOutput> {
    tempo: TempoController<O>,
    dial: RotaryDecoder,
    wheels: DurationWheels,
    modes: ModeSwitcher,
    ready: ReadySignal<SetupAction<O>>,
    settled: Vec<(WheelId, usize)>,
}

impl<O: ClickOutput> Session<O> {
    pub fn new(bpm: Bpm, output: O, layout: Layout) -> Self {
        info!("Session created at {}", bpm);
        Session {
            tempo: TempoController::new(bpm, output),
            dial: RotaryDecoder::new(layout.dial_center),
            wheels: DurationWheels::new(
                layout.wheel_viewport_height,
                layout.wheel_row_height,
                layout.origin,
            ),
            modes: ModeSwitcher::new(),
            ready: ReadySignal::new(),
            settled: Vec::new(),
        }
    }

    pub fn tempo(&self) -> &TempoController<O> {
        &self.tempo
    }

    pub fn tempo_mut(&mut self) -> &mut TempoController<O> {
        &mut self.tempo
    }

    pub fn wheels(&self) -> &DurationWheels {
        &self.wheels
    }

    pub fn wheels_mut(&mut self) -> &mut DurationWheels {
        &mut self.wheels
    }

    pub fn bpm(&self) -> Bpm {
        self.tempo.bpm()
    }

    pub fn add_tempo_listener(&mut self, listener: Box<dyn TempoListener>) {
        self.tempo.add_listener(listener);
    }

    /// Attaches the dial's needle; it is synced to the current tempo at once
    /// and on every change after that.
    pub fn attach_dial_display(&mut self, display: Box<dyn DialDisplay>) {
        self.tempo.add_listener(Box::new(NeedleSync(display)));
    }

    pub fn set_dial_center(&mut self, center: Point) {
        self.dial.set_center(center);
    }

    // Initialisation

    pub fn is_ready(&self) -> bool {
        self.ready.is_ready()
    }

    /// Runs `action` once the host has signalled readiness.
    pub fn when_ready(&mut self, action: SetupAction<O>, scheduler: &mut dyn Scheduler) {
        if let Some(action) = self.ready.defer(action) {
            action(self, scheduler);
        }
    }

    pub fn mark_ready(&mut self, scheduler: &mut dyn Scheduler) {
        let queued = self.ready.fire();
        if !queued.is_empty() {
            debug!("Running {} deferred setup steps", queued.len());
        }
        for action in queued {
            action(self, scheduler);
        }
    }

    // Metronome

    pub fn start(&mut self, scheduler: &mut dyn Scheduler) {
        self.tempo.start(scheduler);
    }

    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        self.tempo.stop(scheduler);
    }

    pub fn toggle(&mut self, scheduler: &mut dyn Scheduler) {
        self.tempo.toggle(scheduler);
    }

    pub fn set_bpm(&mut self, change: BpmChange, scheduler: &mut dyn Scheduler) -> bool {
        self.tempo.set_bpm(change, scheduler)
    }

    // Dial gesture

    pub fn dial_press(&mut self, pointer: Point) {
        self.dial.begin(pointer, self.tempo.bpm());
    }

    pub fn dial_move(
        &mut self,
        pointer: Point,
        scheduler: &mut dyn Scheduler,
    ) -> Option<DialUpdate> {
        self.dial.drag(pointer, &mut self.tempo, scheduler)
    }

    pub fn dial_release(&mut self) {
        self.dial.end();
    }

    // Wheels

    pub fn wheel_press(&mut self, id: WheelId, y: f64, scheduler: &mut dyn Scheduler) {
        if let Some(wheel) = self.wheels.wheel_mut(id) {
            wheel.press(y, scheduler);
        }
    }

    pub fn wheel_drag(&mut self, id: WheelId, y: f64, scheduler: &mut dyn Scheduler) {
        if let Some(wheel) = self.wheels.wheel_mut(id) {
            wheel.drag(y, scheduler);
        }
    }

    pub fn wheel_release(&mut self, id: WheelId, y: f64, scheduler: &mut dyn Scheduler) {
        if let Some(wheel) = self.wheels.wheel_mut(id) {
            wheel.release(y, scheduler);
        }
    }

    /// Wheel selections committed since the last call.
    pub fn take_settled(&mut self) -> Vec<(WheelId, usize)> {
        std::mem::take(&mut self.settled)
    }

    pub fn timer_duration(&self) -> Duration {
        self.wheels.duration()
    }

    // Modes

    pub fn active_mode(&self) -> TimerMode {
        self.modes.active_mode()
    }

    pub fn switch_to(&mut self, mode: TimerMode) -> ModeTransition {
        self.modes.switch(mode)
    }

    pub fn switch_mode(&mut self, name: &str) -> Result<ModeTransition, ModeError> {
        self.modes.switch_named(name)
    }
}

impl<O: ClickOutput> Dispatch for Session<O> {
    fn dispatch(&mut self, fired: Fired, scheduler: &mut dyn Scheduler) {
        match fired.message {
            EngineMessage::MetronomeTick => self.tempo.on_tick(fired.handle, scheduler),
            EngineMessage::WheelFrame(id) => {
                if let Some(index) = self.wheels.on_frame(id, fired.handle, scheduler) {
                    info!("{} wheel settled on {}", id, index);
                    self.settled.push((id, index));
                }
            }
        }
    }
}
