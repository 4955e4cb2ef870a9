use clap::Parser;
use crossbeam::channel::RecvTimeoutError;
use metrodial::{
    audio::{ClickBank, HoundBackend},
    clock::MonotonicClock,
    event_loop::EventLoop,
    input::{self, Command},
    logging,
    picker::WheelId,
    scheduler::Scheduler,
    session::{Layout, Session},
    ui::TerminalDisplay,
    Args, Settings,
};

type TerminalSession = Session<ClickBank<HoundBackend>>;

fn main() {
    let args = Args::parse();
    let settings = match Settings::load(&args) {
        Ok(settings) => settings,
        Err(e) => exit_with_error(&e.to_string()),
    };
    initialize_logging(&settings);

    let display = TerminalDisplay::new();
    let layout = Layout::default();
    let mut event_loop = EventLoop::new(MonotonicClock::new(), settings.frame_rate_hz);
    let mut session = build_session(&settings, layout, &display);

    let initial_mode = settings.mode;
    let autostart = settings.start;
    session.when_ready(
        Box::new(move |session: &mut TerminalSession, scheduler: &mut dyn Scheduler| {
            session.switch_to(initial_mode);
            if autostart {
                session.start(scheduler);
            }
        }),
        &mut event_loop,
    );
    session.mark_ready(&mut event_loop);

    let commands = input::spawn_reader();
    log::info!("Application running at {}", session.bpm());

    loop {
        event_loop.run_frame(&mut session);
        for (id, index) in session.take_settled() {
            log::debug!("{} wheel committed row {}", id, index);
        }

        match commands.recv_timeout(event_loop.time_until_wakeup()) {
            Ok(Command::Quit) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(command) => {
                match input::apply(command, &mut session, layout.dial_center, &mut event_loop) {
                    Ok(Some(transition)) => display.println(&format!(
                        "{} -> {} (slide {:?})",
                        transition.from, transition.to, transition.slide
                    )),
                    Ok(None) => {}
                    Err(e) => {
                        log::warn!("Rejected command: {}", e);
                        display.println(&e.to_string());
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    session.stop(&mut event_loop);
    display.finish();
    log::info!("Application exiting");
}

fn initialize_logging(settings: &Settings) {
    if let Err(e) = logging::init_logger(settings.log_level) {
        logging::init_fallback(settings.log_level);
        log::warn!("File logging unavailable ({}); logging to stderr", e);
    }
    log::info!("Application starting");
}

fn build_session(
    settings: &Settings,
    layout: Layout,
    display: &TerminalDisplay,
) -> TerminalSession {
    let bank = ClickBank::with_tones(
        settings.asset_dir.clone(),
        settings.high_tone(),
        settings.low_tone(),
        HoundBackend::new(),
    );
    let mut session = Session::new(settings.bpm, bank, layout);
    session.add_tempo_listener(display.beat_bar());
    session.add_tempo_listener(Box::new(display.tempo_line()));
    session.attach_dial_display(Box::new(display.tempo_line()));
    for id in [WheelId::Hours, WheelId::Minutes, WheelId::Seconds] {
        session.wheels_mut().attach_display(id, display.wheel_line(id));
    }
    session
}

fn exit_with_error(msg: &str) -> ! {
    log::error!("{}", msg);
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}
