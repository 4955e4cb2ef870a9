use metrodial::audio::{ClickBank, ClickTone, HoundBackend, HIGH_CLICK_FILE, LOW_CLICK_FILE};
use metrodial::clock::ManualClock;
use metrodial::event_loop::EventLoop;
use metrodial::session::{Layout, Session};
use metrodial::tempo::{Bpm, Click};
use std::time::Duration;

#[test]
fn test_start_synthesizes_and_plays_clicks() {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    let bank = ClickBank::new(&assets, HoundBackend::new());
    let mut session = Session::new(Bpm::new(60), bank, Layout::default());
    let mut lp = EventLoop::new(ManualClock::new(), 60);

    session.start(&mut lp);
    assert!(assets.join(HIGH_CLICK_FILE).exists());
    assert!(assets.join(LOW_CLICK_FILE).exists());

    lp.advance(Duration::from_millis(2000), &mut session);
    let bank = session.tempo().output();
    let high = bank.sound(Click::High).unwrap();
    let low = bank.sound(Click::Low).unwrap();
    assert_eq!(high.plays(), 2);
    assert_eq!(low.plays(), 1);
    assert_eq!(high.len(), ClickTone::high().frame_count());
}

#[test]
fn test_existing_asset_is_reused() {
    let dir = tempfile::tempdir().unwrap();
    let short = ClickTone {
        duration_ms: 10,
        ..ClickTone::high()
    };
    short.write_wav(&dir.path().join(HIGH_CLICK_FILE)).unwrap();

    let bank = ClickBank::new(dir.path(), HoundBackend::new());
    let mut session = Session::new(Bpm::new(60), bank, Layout::default());
    let mut lp = EventLoop::new(ManualClock::new(), 60);
    session.start(&mut lp);

    let bank = session.tempo().output();
    assert_eq!(bank.sound(Click::High).unwrap().len(), 441);
    assert_eq!(
        bank.sound(Click::Low).unwrap().len(),
        ClickTone::low().frame_count()
    );
}

#[test]
fn test_unwritable_asset_dir_runs_silently() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let bank = ClickBank::new(blocker.join("assets"), HoundBackend::new());
    let mut session = Session::new(Bpm::new(120), bank, Layout::default());
    let mut lp = EventLoop::new(ManualClock::new(), 60);
    session.start(&mut lp);
    lp.advance(Duration::from_millis(1000), &mut session);

    assert!(session.tempo().is_running());
    assert_eq!(session.tempo().beat_index(), 3);
    assert!(!session.tempo().output().is_ready());
}
