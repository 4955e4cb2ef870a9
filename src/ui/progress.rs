use indicatif::{ProgressBar, ProgressStyle};

/// Beats per displayed cycle: one high click and one low click.
pub const BEATS_PER_CYCLE: u64 = 2;

pub fn create_beat_progress() -> ProgressBar {
    let pb = ProgressBar::new(BEATS_PER_CYCLE);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:20.cyan}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("⣀⣤⣦⣶⣷⣿ "),
    );
    pb.set_prefix("Beat");
    pb.set_message("stopped");
    pb
}

pub fn create_tempo_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {wide_msg}")
            .unwrap(),
    );
    pb.set_prefix("Tempo");
    pb
}

pub fn create_wheel_spinner(name: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{prefix:>8.bold.dim} {wide_msg}")
            .unwrap(),
    );
    pb.set_prefix(name.to_string());
    pb
}
