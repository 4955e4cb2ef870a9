use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "metrodial.toml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Starting tempo in beats per minute (clamped to 30-300)
    #[arg(short, long)]
    pub bpm: Option<i64>,

    /// Settings file; ignored if it does not exist
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory holding the click WAV assets
    #[arg(long)]
    pub asset_dir: Option<PathBuf>,

    /// Start the metronome immediately
    #[arg(long)]
    pub start: bool,

    /// Initial timer mode (metronome, timer or stopwatch)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}
