use crate::event_loop::EngineMessage;
use std::fmt;
use std::time::Duration;

/// Identifies one scheduled callback. Handles are never reused within a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub(crate) fn new(id: u64) -> Self {
        TimerHandle(id)
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Timer services the core needs from its host loop.
///
/// Nothing here blocks: scheduling only queues a future callback which the
/// loop later delivers as a [`crate::event_loop::Fired`] event.
pub trait Scheduler {
    /// Monotonic time used for phase calculations.
    fn now(&self) -> Duration;

    /// Queue `message` to be delivered once after `delay`.
    fn schedule_once(&mut self, delay: Duration, message: EngineMessage) -> TimerHandle;

    /// Deliver `message` once per frame until the handle is cancelled.
    fn poll_each_frame(&mut self, message: EngineMessage) -> TimerHandle;

    /// Cancel a pending callback. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}
