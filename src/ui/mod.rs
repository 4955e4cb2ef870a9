//! Terminal display surfaces
//!
//! The binary draws the metronome with indicatif: a two-step beat bar that
//! alternates tick and tock, a tempo line carrying the dial needle angle, and
//! one line per duration wheel. Each surface is a cheap clone of a
//! [`ProgressBar`] handed to the session as a listener or display.

mod progress;

pub use progress::{
    create_beat_progress, create_tempo_spinner, create_wheel_spinner, BEATS_PER_CYCLE,
};

use crate::picker::{WheelDisplay, WheelId};
use crate::session::DialDisplay;
use crate::tempo::{Bpm, Click, TempoListener};
use indicatif::{MultiProgress, ProgressBar};

pub fn beat_label(click: Click) -> &'static str {
    match click {
        Click::High => "TICK",
        Click::Low => "tock",
    }
}

/// Beat bar; follows every click and run-state change.
pub struct BeatBar(ProgressBar);

impl TempoListener for BeatBar {
    fn beat(&mut self, click: Click, beat_index: u64) {
        self.0.set_position(beat_index % BEATS_PER_CYCLE + 1);
        self.0.set_message(beat_label(click));
    }

    fn running_changed(&mut self, running: bool) {
        if !running {
            self.0.set_position(0);
            self.0.set_message("stopped");
        }
    }
}

/// Tempo line: BPM from the controller, needle angle from the dial sync.
#[derive(Clone)]
pub struct TempoLine {
    pb: ProgressBar,
}

impl TempoLine {
    fn redraw(&self, bpm: Option<Bpm>, needle: Option<f64>) {
        let current = self.pb.message();
        let (old_bpm, old_needle) = current.split_once(" | ").unwrap_or((current.as_str(), ""));
        let bpm = bpm.map(|b| b.to_string()).unwrap_or_else(|| old_bpm.to_string());
        let needle = needle
            .map(|deg| format!("needle {:.1}°", deg))
            .unwrap_or_else(|| old_needle.to_string());
        self.pb.set_message(format!("{} | {}", bpm, needle));
    }
}

impl TempoListener for TempoLine {
    fn tempo_changed(&mut self, bpm: Bpm) {
        self.redraw(Some(bpm), None);
    }
}

impl DialDisplay for TempoLine {
    fn set_needle_angle(&mut self, degrees: f64) {
        self.redraw(None, Some(degrees));
    }
}

/// One duration wheel rendered as its selected value and scroll offset.
pub struct WheelLine {
    pb: ProgressBar,
    selected: String,
    offset: f64,
}

impl WheelLine {
    fn redraw(&self) {
        self.pb
            .set_message(format!("{} (scroll {:.3})", self.selected, self.offset));
    }
}

impl WheelDisplay for WheelLine {
    /// `offset` is normalised to 0..=1 over the scrollable span.
    fn set_scroll_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.redraw();
    }

    fn set_selected(&mut self, _index: usize, value: &str) {
        self.selected = value.to_string();
        self.redraw();
    }
}

pub struct TerminalDisplay {
    multi: MultiProgress,
    beat: ProgressBar,
    tempo: ProgressBar,
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDisplay {
    pub fn new() -> Self {
        let multi = MultiProgress::new();
        let beat = multi.add(create_beat_progress());
        let tempo = multi.add(create_tempo_spinner());
        TerminalDisplay { multi, beat, tempo }
    }

    pub fn beat_bar(&self) -> Box<dyn TempoListener> {
        Box::new(BeatBar(self.beat.clone()))
    }

    pub fn tempo_line(&self) -> TempoLine {
        TempoLine {
            pb: self.tempo.clone(),
        }
    }

    pub fn wheel_line(&self, id: WheelId) -> Box<dyn WheelDisplay> {
        Box::new(WheelLine {
            pb: self.multi.add(create_wheel_spinner(&id.to_string())),
            selected: String::new(),
            offset: 0.0,
        })
    }

    /// Prints above the bars without tearing them.
    pub fn println(&self, msg: &str) {
        if self.multi.println(msg).is_err() {
            println!("{}", msg);
        }
    }

    pub fn finish(&self) {
        self.beat.finish_and_clear();
        self.tempo.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    fn hidden_line() -> TempoLine {
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        TempoLine { pb }
    }

    #[test]
    fn test_tempo_line_keeps_both_halves() {
        let mut line = hidden_line();
        line.tempo_changed(Bpm::new(100));
        line.set_needle_angle(2250.0);
        assert_eq!(line.pb.message(), "100 BPM | needle 2250.0°");

        line.tempo_changed(Bpm::new(90));
        assert_eq!(line.pb.message(), "90 BPM | needle 2250.0°");
    }

    #[test]
    fn test_wheel_line_shows_value_and_offset() {
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        let mut line = WheelLine {
            pb: pb.clone(),
            selected: String::new(),
            offset: 0.0,
        };
        line.set_selected(7, "07");
        line.set_scroll_offset(0.347);
        assert_eq!(pb.message(), "07 (scroll 0.347)");

        line.set_selected(8, "08");
        assert_eq!(pb.message(), "08 (scroll 0.347)");
    }

    #[test]
    fn test_beat_bar_alternates() {
        let pb =
            ProgressBar::with_draw_target(Some(BEATS_PER_CYCLE), ProgressDrawTarget::hidden());
        let mut bar = BeatBar(pb.clone());
        bar.beat(Click::High, 0);
        assert_eq!(pb.position(), 1);
        assert_eq!(pb.message(), "TICK");
        bar.beat(Click::Low, 1);
        assert_eq!(pb.position(), 2);
        bar.running_changed(false);
        assert_eq!(pb.message(), "stopped");
    }
}
