//! Line-oriented commands for the terminal binary
//!
//! A reader thread prompts with dialoguer and forwards parsed [`Command`]s
//! over a crossbeam channel; the event loop drains the channel between
//! frames, so every state change still happens on the loop's thread.

use crate::audio::ClickOutput;
use crate::dial::Point;
use crate::mode::{ModeError, ModeTransition};
use crate::scheduler::Scheduler;
use crate::session::Session;
use crate::tempo::BpmChange;
use crossbeam::channel::{unbounded, Receiver, Sender};
use dialoguer::Input;
use log::{debug, warn};
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::thread;

/// Degrees between simulated pointer samples; under 180 so each step
/// unwraps unambiguously.
const DRAG_STEP_DEG: f64 = 10.0;

/// Distance of simulated drag samples from the dial centre.
const DRAG_RADIUS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Stop,
    Toggle,
    SetBpm(i64),
    Nudge(i64),
    /// Clockwise-positive dial drag in degrees.
    Drag(f64),
    Mode(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    BadArgument { command: &'static str, value: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "no command given"),
            CommandError::Unknown(word) => write!(
                f,
                "unknown command '{}' (try start, stop, toggle, bpm <n>, +, -, drag <deg>, mode <name>, quit)",
                word
            ),
            CommandError::BadArgument { command, value } => {
                write!(f, "bad argument for '{}': '{}'", command, value)
            }
        }
    }
}

impl Error for CommandError {}

fn argument<T: FromStr>(command: &'static str, value: Option<&str>) -> Result<T, CommandError> {
    let value = value.unwrap_or("");
    value.parse().map_err(|_| CommandError::BadArgument {
        command,
        value: value.to_string(),
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let arg = words.next();
        match head.to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "toggle" | "t" => Ok(Command::Toggle),
            "bpm" => argument("bpm", arg).map(Command::SetBpm),
            "+" => Ok(Command::Nudge(1)),
            "-" => Ok(Command::Nudge(-1)),
            "drag" => argument("drag", arg).map(Command::Drag),
            "mode" => match arg {
                Some(name) => Ok(Command::Mode(name.to_string())),
                None => Err(CommandError::BadArgument {
                    command: "mode",
                    value: String::new(),
                }),
            },
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Pointer samples for a drag of `degrees` around `center`, starting at the
/// top of the dial. Clockwise is positive in dial terms, which is a
/// decreasing atan2 angle.
pub fn drag_path(center: Point, radius: f64, degrees: f64) -> Vec<Point> {
    let start = 90.0_f64;
    let steps = (degrees.abs() / DRAG_STEP_DEG).ceil().max(1.0) as usize;
    let step = degrees / steps as f64;
    (0..=steps)
        .map(|i| {
            let angle = (start - step * i as f64).to_radians();
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Applies one prompt command to the session. A mode switch reports its
/// transition; a bad mode name is returned for the caller to show, leaving
/// the session as it was. [`Command::Quit`] is the caller's to handle.
pub fn apply<O: ClickOutput>(
    command: Command,
    session: &mut Session<O>,
    dial_center: Point,
    scheduler: &mut dyn Scheduler,
) -> Result<Option<ModeTransition>, ModeError> {
    match command {
        Command::Start => session.start(scheduler),
        Command::Stop => session.stop(scheduler),
        Command::Toggle => session.toggle(scheduler),
        Command::SetBpm(bpm) => {
            session.set_bpm(BpmChange::To(bpm), scheduler);
        }
        Command::Nudge(delta) => {
            session.set_bpm(BpmChange::By(delta), scheduler);
        }
        Command::Drag(degrees) => {
            let path = drag_path(dial_center, DRAG_RADIUS, degrees);
            if let Some((first, rest)) = path.split_first() {
                session.dial_press(*first);
                for point in rest {
                    session.dial_move(*point, scheduler);
                }
                session.dial_release();
            }
        }
        Command::Mode(name) => return session.switch_mode(&name).map(Some),
        Command::Quit => {}
    }
    Ok(None)
}

/// Spawns the prompt thread. It sends [`Command::Quit`] when stdin closes.
pub fn spawn_reader() -> Receiver<Command> {
    let (tx, rx) = unbounded();
    thread::spawn(move || read_commands(tx));
    rx
}

fn read_commands(tx: Sender<Command>) {
    loop {
        let line = match Input::<String>::new()
            .with_prompt("metrodial")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) => {
                warn!("Input closed: {}", e);
                let _ = tx.send(Command::Quit);
                return;
            }
        };

        match line.parse::<Command>() {
            Ok(command) => {
                debug!("Parsed command {:?}", command);
                let quit = command == Command::Quit;
                if tx.send(command).is_err() || quit {
                    return;
                }
            }
            Err(CommandError::Empty) => {}
            Err(e) => eprintln!("{}", e),
        }
    }
}
