use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tracing::debug;

use crate::clock::{Scheduler, TickHandle};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick(TickHandle),
}

/// Source of app events (keyboard, resize, clock ticks)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm. Clock ticks are fed into the same
/// channel through [`CrosstermEventSource::sender`].
pub struct CrosstermEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let key_tx = tx.clone();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if key_tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if key_tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Wall-clock scheduler: one sleeper thread per registration posting
/// `AppEvent::Tick` into the event channel. Cancelling flips a flag the thread
/// checks before every send, so nothing is posted after `cancel` returns.
#[derive(Debug)]
pub struct IntervalScheduler {
    tx: Sender<AppEvent>,
    next_id: u64,
    live: HashMap<TickHandle, Arc<AtomicBool>>,
}

impl IntervalScheduler {
    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self {
            tx,
            next_id: 0,
            live: HashMap::new(),
        }
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        let cancelled = Arc::new(AtomicBool::new(false));
        self.live.insert(handle, Arc::clone(&cancelled));

        let tx = self.tx.clone();
        std::thread::spawn(move || loop {
            std::thread::sleep(period);
            if cancelled.load(Ordering::SeqCst) || tx.send(AppEvent::Tick(handle)).is_err() {
                break;
            }
        });
        debug!(?handle, ?period, "tick thread spawned");
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(flag) = self.live.remove(&handle) {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for flag in self.live.values() {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to the ticker interval; `None` means nothing arrived and the
    /// caller may simply redraw.
    pub fn step(&self) -> Option<AppEvent> {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
