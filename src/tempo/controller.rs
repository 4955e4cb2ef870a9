use super::{Bpm, BpmChange, Click, MIN_TICK_INTERVAL};
use crate::audio::ClickOutput;
use crate::event_loop::EngineMessage;
use crate::scheduler::{Scheduler, TimerHandle};
use log::{debug, info, trace, warn};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// Observer for tempo and beat events. Every method has an empty default.
pub trait TempoListener {
    fn tempo_changed(&mut self, _bpm: Bpm) {}
    fn beat(&mut self, _click: Click, _beat_index: u64) {}
    fn running_changed(&mut self, _running: bool) {}
}

/// Owns the tempo and the single outstanding metronome timer.
///
/// Tempo changes while running keep the phase of the current beat: the next
/// tick lands `new_interval - elapsed_since_last_tick` from now (at least
/// 1 ms), so a change mid-beat neither double-clicks nor goes silent.
pub struct TempoController<O: ClickOutput> {
    bpm: Bpm,
    state: RunState,
    beat_index: u64,
    last_tick: Option<Duration>,
    pending: Option<TimerHandle>,
    output: O,
    audio_ok: bool,
    listeners: Vec<Box<dyn TempoListener>>,
}

impl<O: ClickOutput> TempoController<O> {
    pub fn new(bpm: Bpm, output: O) -> Self {
        info!("Creating TempoController at {}", bpm);
        TempoController {
            bpm,
            state: RunState::Stopped,
            beat_index: 0,
            last_tick: None,
            pending: None,
            output,
            audio_ok: false,
            listeners: Vec::new(),
        }
    }

    /// Registers an observer and immediately reports the current tempo to it.
    pub fn add_listener(&mut self, mut listener: Box<dyn TempoListener>) {
        listener.tempo_changed(self.bpm);
        self.listeners.push(listener);
    }

    pub fn bpm(&self) -> Bpm {
        self.bpm
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Beats fired since the last `start()`.
    pub fn beat_index(&self) -> u64 {
        self.beat_index
    }

    pub fn last_tick(&self) -> Option<Duration> {
        self.last_tick
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.pending
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Applies a tempo change. Returns whether the tempo actually moved.
    pub fn set_bpm(&mut self, change: BpmChange, scheduler: &mut dyn Scheduler) -> bool {
        let next = change.apply(self.bpm);
        if next == self.bpm {
            return false;
        }
        debug!("Tempo {} -> {}", self.bpm, next);
        self.bpm = next;
        for listener in self.listeners.iter_mut() {
            listener.tempo_changed(next);
        }

        if self.is_running() {
            let delay = match self.last_tick {
                Some(last) => {
                    let elapsed = scheduler.now().saturating_sub(last);
                    next.tick_interval()
                        .saturating_sub(elapsed)
                        .max(MIN_TICK_INTERVAL)
                }
                None => next.tick_interval(),
            };
            debug!("Rescheduling next tick in {:?}", delay);
            self.arm(delay, scheduler);
        }
        true
    }

    pub fn start(&mut self, scheduler: &mut dyn Scheduler) {
        if self.is_running() {
            debug!("Metronome already running, start ignored");
            return;
        }
        self.audio_ok = match self.output.prepare() {
            Ok(()) => true,
            Err(e) => {
                warn!("Click assets unavailable, running silently: {}", e);
                false
            }
        };
        self.state = RunState::Running;
        self.beat_index = 0;
        self.last_tick = None;
        info!("Metronome started at {}", self.bpm);
        for listener in self.listeners.iter_mut() {
            listener.running_changed(true);
        }
        self.tick(scheduler);
    }

    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        if self.is_running() {
            self.state = RunState::Stopped;
            info!("Metronome stopped after {} beats", self.beat_index);
            for listener in self.listeners.iter_mut() {
                listener.running_changed(false);
            }
        }
    }

    pub fn toggle(&mut self, scheduler: &mut dyn Scheduler) {
        match self.state {
            RunState::Running => self.stop(scheduler),
            RunState::Stopped => self.start(scheduler),
        }
    }

    /// Timer callback. Anything that is not the currently armed tick of a
    /// running metronome is stale and ignored.
    pub fn on_tick(&mut self, handle: TimerHandle, scheduler: &mut dyn Scheduler) {
        if !self.is_running() || self.pending != Some(handle) {
            trace!("Ignoring stale tick {}", handle);
            return;
        }
        self.pending = None;
        self.tick(scheduler);
    }

    fn tick(&mut self, scheduler: &mut dyn Scheduler) {
        let click = Click::for_beat(self.beat_index);
        if self.audio_ok {
            if let Err(e) = self.output.play(click) {
                debug!("Click playback failed: {}", e);
            }
        }
        for listener in self.listeners.iter_mut() {
            listener.beat(click, self.beat_index);
        }
        trace!("Beat {} ({:?})", self.beat_index, click);
        self.beat_index += 1;
        self.last_tick = Some(scheduler.now());
        // Re-read the tempo here so a change made since arming applies now.
        self.arm(self.bpm.tick_interval(), scheduler);
    }

    fn arm(&mut self, delay: Duration, scheduler: &mut dyn Scheduler) {
        if let Some(previous) = self.pending.take() {
            scheduler.cancel(previous);
        }
        self.pending = Some(scheduler.schedule_once(delay, EngineMessage::MetronomeTick));
    }
}
