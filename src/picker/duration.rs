use super::{InertialPicker, Origin, WheelDisplay, WheelId};
use crate::scheduler::{Scheduler, TimerHandle};
use std::time::Duration;

fn two_digit(range: std::ops::Range<u32>) -> Vec<String> {
    range.map(|v| format!("{:02}", v)).collect()
}

/// Hours, minutes and seconds wheels for setting a countdown.
#[derive(Debug)]
pub struct DurationWheels {
    hours: InertialPicker,
    minutes: InertialPicker,
    seconds: InertialPicker,
}

impl DurationWheels {
    pub fn new(viewport_height: f64, row_height: f64, origin: Origin) -> Self {
        let wheel =
            |id, values| InertialPicker::new(id, values, viewport_height, row_height, origin);
        DurationWheels {
            hours: wheel(WheelId::Hours, two_digit(0..24)),
            minutes: wheel(WheelId::Minutes, two_digit(0..60)),
            seconds: wheel(WheelId::Seconds, two_digit(0..60)),
        }
    }

    pub fn wheel(&self, id: WheelId) -> Option<&InertialPicker> {
        match id {
            WheelId::Hours => Some(&self.hours),
            WheelId::Minutes => Some(&self.minutes),
            WheelId::Seconds => Some(&self.seconds),
            WheelId::Custom(_) => None,
        }
    }

    pub fn wheel_mut(&mut self, id: WheelId) -> Option<&mut InertialPicker> {
        match id {
            WheelId::Hours => Some(&mut self.hours),
            WheelId::Minutes => Some(&mut self.minutes),
            WheelId::Seconds => Some(&mut self.seconds),
            WheelId::Custom(_) => None,
        }
    }

    pub fn attach_display(&mut self, id: WheelId, display: Box<dyn WheelDisplay>) {
        if let Some(wheel) = self.wheel_mut(id) {
            wheel.attach_display(display);
        }
    }

    /// Routes a frame poll to its wheel.
    pub fn on_frame(
        &mut self,
        id: WheelId,
        handle: TimerHandle,
        scheduler: &mut dyn Scheduler,
    ) -> Option<usize> {
        self.wheel_mut(id)?.on_frame(handle, scheduler)
    }

    /// The committed selection as a duration.
    pub fn duration(&self) -> Duration {
        let secs = self.hours.selected() as u64 * 3600
            + self.minutes.selected() as u64 * 60
            + self.seconds.selected() as u64;
        Duration::from_secs(secs)
    }

    /// Shows `duration` on the wheels without animating. Hours beyond the
    /// wheel's range clamp to its last row.
    pub fn set_duration(&mut self, duration: Duration, scheduler: &mut dyn Scheduler) {
        let total = duration.as_secs();
        self.hours.select_now((total / 3600) as usize, scheduler);
        self.minutes.select_now((total / 60 % 60) as usize, scheduler);
        self.seconds.select_now((total % 60) as usize, scheduler);
    }

    pub fn resize(&mut self, viewport_height: f64, row_height: f64, scheduler: &mut dyn Scheduler) {
        for wheel in [&mut self.hours, &mut self.minutes, &mut self.seconds] {
            wheel.resize(viewport_height, row_height, scheduler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::event_loop::EventLoop;

    #[test]
    fn test_wheel_ranges() {
        let wheels = DurationWheels::new(150.0, 50.0, Origin::Top);
        assert_eq!(wheels.wheel(WheelId::Hours).unwrap().values().len(), 24);
        assert_eq!(wheels.wheel(WheelId::Minutes).unwrap().values()[59], "59");
        assert_eq!(wheels.wheel(WheelId::Seconds).unwrap().values()[5], "05");
        assert!(wheels.wheel(WheelId::Custom(1)).is_none());
    }

    #[test]
    fn test_set_duration_round_trip() {
        let mut lp = EventLoop::new(ManualClock::new(), 60);
        let mut wheels = DurationWheels::new(150.0, 50.0, Origin::Top);
        wheels.set_duration(Duration::from_secs(2 * 3600 + 5 * 60 + 9), &mut lp);
        assert_eq!(wheels.duration(), Duration::from_secs(7509));

        wheels.set_duration(Duration::from_secs(100 * 3600), &mut lp);
        assert_eq!(wheels.wheel(WheelId::Hours).unwrap().selected(), 23);
    }
}
