use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use keyrush::clock::ManualScheduler;
use keyrush::config::GameConfig;
use keyrush::persistence::MemoryProfileStore;
use keyrush::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use keyrush::session::{Command, GameSession, Phase};
use keyrush::words::{Difficulty, ScriptedWordSource};

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless integration using the runtime + GameSession without a TTY.
// Key presses and clock ticks share one channel, the way the binary wires them.
#[test]
fn headless_round_completes_through_runner() {
    let config = GameConfig {
        difficulty: Difficulty::Normal,
        duration_secs: 2,
    };
    let mut session = GameSession::new(
        config,
        ScriptedWordSource::new(["hi", "yo"]),
        ManualScheduler::new(),
        MemoryProfileStore::new(),
    );
    session.handle(Command::Start);
    let handle = session.tick_handle().unwrap();

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let runner = Runner::new(es, ticker);

    for ev in [key('h'), key('i'), key(' '), AppEvent::Tick(handle), AppEvent::Tick(handle)] {
        tx.send(ev).unwrap();
    }

    let mut buffer = String::new();
    let mut finished = None;
    for _ in 0..100u32 {
        match runner.step() {
            None | Some(AppEvent::Resize) => {}
            Some(AppEvent::Tick(h)) => {
                let view = session.handle(Command::Tick(h));
                if view.finished.is_some() {
                    finished = view.finished;
                    break;
                }
            }
            Some(AppEvent::Key(key)) => match key.code {
                KeyCode::Char(' ') => {
                    session.handle(Command::Submit);
                    buffer.clear();
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    session.handle(Command::Keystroke(buffer.clone()));
                }
                _ => {}
            },
        }
    }

    let entry = finished.expect("round should end when the clock runs out");
    assert_eq!(session.phase(), Phase::Ended);
    assert_eq!(entry.final_score, 2);
    assert_eq!(entry.accuracy_percent, 100);
    assert_eq!(entry.max_streak, 1);
    assert_eq!(session.hud().best_score, 2);
}

#[test]
fn headless_ticks_from_cancelled_round_are_dropped() {
    let mut session = GameSession::new(
        GameConfig::default(),
        ScriptedWordSource::new(["cat"]),
        ManualScheduler::new(),
        MemoryProfileStore::new(),
    );
    session.handle(Command::Start);
    let stale = session.tick_handle().unwrap();
    session.handle(Command::Reset);
    session.handle(Command::Start);
    let live = session.tick_handle().unwrap();
    assert_ne!(stale, live);

    for _ in 0..5 {
        session.handle(Command::Tick(stale));
    }
    assert_eq!(session.hud().time_left, 60);

    session.handle(Command::Tick(live));
    assert_eq!(session.hud().time_left, 59);
}
