extern crate metrodial;

use metrodial::clock::{Clock, ManualClock, MonotonicClock};
use metrodial::event_loop::{Dispatch, EngineMessage, EventLoop, Fired};
use metrodial::picker::WheelId;
use metrodial::scheduler::{Scheduler, TimerHandle};
use std::time::Duration;

/// Re-arms a metronome-style tick and counts frames, recording the time of
/// every event it receives.
#[derive(Default)]
struct Recorder {
    ticks: Vec<Duration>,
    frames: usize,
    tick: Option<TimerHandle>,
}

impl Dispatch for Recorder {
    fn dispatch(&mut self, fired: Fired, scheduler: &mut dyn Scheduler) {
        match fired.message {
            EngineMessage::MetronomeTick => {
                if self.tick != Some(fired.handle) {
                    return;
                }
                self.ticks.push(scheduler.now());
                let next = Duration::from_millis(250);
                self.tick = Some(scheduler.schedule_once(next, EngineMessage::MetronomeTick));
            }
            EngineMessage::WheelFrame(_) => self.frames += 1,
        }
    }
}

#[test]
fn integration_test_ticks_and_frames_interleave() {
    let mut event_loop = EventLoop::new(ManualClock::new(), 50);
    let mut recorder = Recorder::default();

    recorder.tick = Some(event_loop.schedule_once(Duration::ZERO, EngineMessage::MetronomeTick));
    let poller = event_loop.poll_each_frame(EngineMessage::WheelFrame(WheelId::Minutes));

    event_loop.advance(Duration::from_millis(1000), &mut recorder);

    let expected: Vec<Duration> = (0..=4).map(|i| Duration::from_millis(250 * i)).collect();
    assert_eq!(recorder.ticks, expected, "ticks land on their deadlines");
    assert_eq!(recorder.frames, 50, "one poll per 20 ms frame");

    event_loop.cancel(poller);
    event_loop.advance(Duration::from_millis(100), &mut recorder);
    assert_eq!(recorder.frames, 50);
}

#[test]
fn integration_test_stale_handle_is_ignored() {
    let mut event_loop = EventLoop::new(ManualClock::new(), 60);
    let mut recorder = Recorder::default();

    // Superseded before it fired; the recorder no longer owns it.
    event_loop.schedule_once(Duration::from_millis(100), EngineMessage::MetronomeTick);
    let current =
        event_loop.schedule_once(Duration::from_millis(300), EngineMessage::MetronomeTick);
    recorder.tick = Some(current);
    event_loop.advance(Duration::from_millis(400), &mut recorder);

    assert_eq!(recorder.ticks, vec![Duration::from_millis(300)]);
    assert_eq!(event_loop.pending_timers(), 1);
}

#[test]
fn integration_test_run_frame_on_real_clock() {
    let mut event_loop = EventLoop::new(MonotonicClock::new(), 60);
    let mut recorder = Recorder::default();

    recorder.tick = Some(event_loop.schedule_once(Duration::ZERO, EngineMessage::MetronomeTick));
    event_loop.run_frame(&mut recorder);

    assert_eq!(recorder.ticks.len(), 1);
    assert!(event_loop.time_until_wakeup() <= event_loop.frame_interval());
    assert!(event_loop.clock().now() >= recorder.ticks[0]);
}
