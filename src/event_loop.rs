// event_loop.rs

use crate::clock::{Clock, ManualClock};
use crate::picker::WheelId;
use crate::scheduler::{Scheduler, TimerHandle};
use log::{debug, trace};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Payload carried by a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMessage {
    MetronomeTick,
    WheelFrame(WheelId),
}

/// A callback that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TimerHandle,
    pub message: EngineMessage,
}

/// Receiver of fired callbacks. The scheduler is handed back so the target
/// can re-arm or cancel while handling the event.
pub trait Dispatch {
    fn dispatch(&mut self, fired: Fired, scheduler: &mut dyn Scheduler);
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    deadline: Duration,
    handle: TimerHandle,
}

/// Single-threaded cooperative loop: a deadline-ordered queue of one-shot
/// timers plus a set of per-frame pollers.
///
/// Cancelled one-shots stay in the heap until they surface and are skipped
/// there; the live set is `messages`.
pub struct EventLoop<C: Clock> {
    clock: C,
    timers: BinaryHeap<Reverse<Pending>>,
    messages: HashMap<TimerHandle, EngineMessage>,
    pollers: Vec<(TimerHandle, EngineMessage)>,
    next_id: u64,
    frame_interval: Duration,
    next_frame: Duration,
}

impl<C: Clock> EventLoop<C> {
    pub fn new(clock: C, frame_rate_hz: u32) -> Self {
        let frame_interval = Duration::from_secs_f64(1.0 / f64::from(frame_rate_hz.max(1)));
        let next_frame = clock.now() + frame_interval;
        debug!("Event loop created with frame interval {:?}", frame_interval);
        EventLoop {
            clock,
            timers: BinaryHeap::new(),
            messages: HashMap::new(),
            pollers: Vec::new(),
            next_id: 0,
            frame_interval,
            next_frame,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Number of live one-shot timers.
    pub fn pending_timers(&self) -> usize {
        self.messages.len()
    }

    pub fn active_pollers(&self) -> usize {
        self.pollers.len()
    }

    fn allocate(&mut self) -> TimerHandle {
        self.next_id += 1;
        TimerHandle::new(self.next_id)
    }

    fn next_deadline(&mut self) -> Option<Duration> {
        while let Some(Reverse(top)) = self.timers.peek() {
            if self.messages.contains_key(&top.handle) {
                return Some(top.deadline);
            }
            self.timers.pop();
        }
        None
    }

    /// Pop the earliest one-shot whose deadline has passed.
    pub fn pop_due(&mut self) -> Option<Fired> {
        let now = self.clock.now();
        while let Some(Reverse(top)) = self.timers.peek() {
            if top.deadline > now {
                return None;
            }
            let Some(Reverse(pending)) = self.timers.pop() else {
                return None;
            };
            if let Some(message) = self.messages.remove(&pending.handle) {
                trace!("Timer {} due at {:?}", pending.handle, pending.deadline);
                return Some(Fired {
                    handle: pending.handle,
                    message,
                });
            }
        }
        None
    }

    fn drain_due(&mut self, target: &mut dyn Dispatch) {
        while let Some(fired) = self.pop_due() {
            target.dispatch(fired, self);
        }
    }

    fn fire_pollers(&mut self, target: &mut dyn Dispatch) {
        let snapshot: Vec<(TimerHandle, EngineMessage)> = self.pollers.clone();
        for (handle, message) in snapshot {
            // A poller cancelled earlier in this frame must not run.
            if self.pollers.iter().any(|(h, _)| *h == handle) {
                target.dispatch(Fired { handle, message }, self);
            }
        }
    }

    /// Runs everything due at the current clock reading: expired timers
    /// first, then one round of frame pollers if a frame boundary has passed.
    /// Early wake-ups only drain timers.
    pub fn run_frame(&mut self, target: &mut dyn Dispatch) {
        self.drain_due(target);
        let now = self.clock.now();
        if now < self.next_frame {
            return;
        }
        self.fire_pollers(target);
        while self.next_frame <= now {
            self.next_frame += self.frame_interval;
        }
    }

    /// How long the host may sleep before something needs attention.
    pub fn time_until_wakeup(&mut self) -> Duration {
        let now = self.clock.now();
        let frame = self.next_frame;
        let wake = match self.next_deadline() {
            Some(deadline) if deadline < frame => deadline,
            _ => frame,
        };
        wake.saturating_sub(now)
    }
}

impl EventLoop<ManualClock> {
    /// Moves virtual time forward by `dt`, delivering every timer at its
    /// exact deadline and every frame poll at its frame boundary.
    pub fn advance(&mut self, dt: Duration, target: &mut dyn Dispatch) {
        let start = self.clock.now();
        let end = start + dt;
        // The clock may have been moved by hand; skip frames already passed.
        while self.next_frame < start {
            self.next_frame += self.frame_interval;
        }
        loop {
            let deadline = self.next_deadline();
            let frame = self.next_frame;
            let (at, is_frame) = match deadline {
                Some(d) if d <= frame => (d, false),
                _ => (frame, true),
            };
            if at > end {
                break;
            }
            self.clock.set(at);
            if is_frame {
                self.fire_pollers(target);
                self.next_frame += self.frame_interval;
            } else {
                self.drain_due(target);
            }
        }
        self.clock.set(end);
        // Zero-delay timers scheduled for exactly `end` still belong here.
        self.drain_due(target);
    }
}

impl<C: Clock> Scheduler for EventLoop<C> {
    fn now(&self) -> Duration {
        self.clock.now()
    }

    fn schedule_once(&mut self, delay: Duration, message: EngineMessage) -> TimerHandle {
        let handle = self.allocate();
        let deadline = self.clock.now() + delay;
        self.timers.push(Reverse(Pending { deadline, handle }));
        self.messages.insert(handle, message);
        trace!("Scheduled {:?} as {} in {:?}", message, handle, delay);
        handle
    }

    fn poll_each_frame(&mut self, message: EngineMessage) -> TimerHandle {
        let handle = self.allocate();
        self.pollers.push((handle, message));
        trace!("Frame poller {} registered for {:?}", handle, message);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.messages.remove(&handle).is_some() {
            trace!("Cancelled timer {}", handle);
        }
        self.pollers.retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        fired: Vec<(Duration, EngineMessage)>,
        cancel_on_fire: Option<TimerHandle>,
    }

    impl Dispatch for Recorder {
        fn dispatch(&mut self, fired: Fired, scheduler: &mut dyn Scheduler) {
            self.fired.push((scheduler.now(), fired.message));
            if let Some(handle) = self.cancel_on_fire.take() {
                scheduler.cancel(handle);
            }
        }
    }

    fn manual_loop() -> EventLoop<ManualClock> {
        EventLoop::new(ManualClock::new(), 100)
    }

    #[test]
    fn test_timers_fire_at_their_deadlines() {
        let mut lp = manual_loop();
        let mut rec = Recorder::default();
        lp.schedule_once(Duration::from_millis(250), EngineMessage::MetronomeTick);
        lp.schedule_once(Duration::from_millis(100), EngineMessage::MetronomeTick);

        lp.advance(Duration::from_secs(1), &mut rec);

        let times: Vec<Duration> = rec.fired.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            times,
            vec![Duration::from_millis(100), Duration::from_millis(250)]
        );
        assert_eq!(lp.pending_timers(), 0);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut lp = manual_loop();
        let mut rec = Recorder::default();
        let handle = lp.schedule_once(Duration::from_millis(50), EngineMessage::MetronomeTick);
        lp.cancel(handle);

        lp.advance(Duration::from_millis(200), &mut rec);
        assert!(rec.fired.is_empty());
    }

    #[test]
    fn test_pollers_fire_once_per_frame_until_cancelled() {
        let mut lp = manual_loop();
        let mut rec = Recorder::default();
        let handle = lp.poll_each_frame(EngineMessage::WheelFrame(WheelId::Minutes));

        lp.advance(Duration::from_millis(50), &mut rec);
        assert_eq!(rec.fired.len(), 5);

        lp.cancel(handle);
        lp.advance(Duration::from_millis(50), &mut rec);
        assert_eq!(rec.fired.len(), 5);
        assert_eq!(lp.active_pollers(), 0);
    }

    #[test]
    fn test_poller_cancelled_mid_frame_is_skipped() {
        let mut lp = manual_loop();
        let first = lp.poll_each_frame(EngineMessage::WheelFrame(WheelId::Hours));
        let second = lp.poll_each_frame(EngineMessage::WheelFrame(WheelId::Seconds));
        let mut rec = Recorder {
            cancel_on_fire: Some(second),
            ..Recorder::default()
        };

        lp.advance(Duration::from_millis(10), &mut rec);
        assert_eq!(rec.fired.len(), 1);
        assert_eq!(rec.fired[0].1, EngineMessage::WheelFrame(WheelId::Hours));
        lp.cancel(first);
    }

    #[test]
    fn test_run_frame_polls_once_per_frame_boundary() {
        let mut lp = manual_loop();
        let mut rec = Recorder::default();
        lp.poll_each_frame(EngineMessage::WheelFrame(WheelId::Seconds));

        lp.run_frame(&mut rec);
        assert!(rec.fired.is_empty());

        lp.clock().advance(Duration::from_millis(10));
        lp.run_frame(&mut rec);
        lp.run_frame(&mut rec);
        assert_eq!(rec.fired.len(), 1);

        lp.clock().advance(Duration::from_millis(4));
        lp.run_frame(&mut rec);
        assert_eq!(rec.fired.len(), 1);
        assert_eq!(lp.time_until_wakeup(), Duration::from_millis(6));
    }

    #[test]
    fn test_time_until_wakeup_prefers_earlier_timer() {
        let mut lp = manual_loop();
        assert_eq!(lp.time_until_wakeup(), Duration::from_millis(10));
        lp.schedule_once(Duration::from_millis(3), EngineMessage::MetronomeTick);
        assert_eq!(lp.time_until_wakeup(), Duration::from_millis(3));
    }
}
