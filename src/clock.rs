use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies one repeating tick registration. Ticks from a cancelled
/// registration are stale and must be ignored by whoever receives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

/// Source of periodic ticks. Implementations deliver `TickHandle`s back to the
/// session out of band (event channel, test driver).
pub trait Scheduler {
    fn schedule_repeating(&mut self, period: Duration) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
}

/// Scheduler that never fires on its own; tests decide when ticks happen.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    active: HashSet<TickHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, handle: TickHandle) -> bool {
        self.active.contains(&handle)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// The single live registration, if exactly one exists.
    pub fn current(&self) -> Option<TickHandle> {
        match self.active.len() {
            1 => self.active.iter().next().copied(),
            _ => None,
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, _period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.active.insert(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.active.remove(&handle);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale handle, clock stopped, or paused.
    Ignored,
    Counted { remaining: u32 },
    /// Remaining time hit zero. Reported exactly once per run.
    Expired,
}

/// One-second countdown with pause/resume. While paused, ticks keep arriving
/// and are dropped; they are never banked for later.
#[derive(Debug)]
pub struct SessionClock<S: Scheduler> {
    scheduler: S,
    active: Option<TickHandle>,
    remaining: u32,
    paused: bool,
}

impl<S: Scheduler> SessionClock<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            active: None,
            remaining: 0,
            paused: false,
        }
    }

    pub fn start(&mut self, initial_secs: u32) {
        self.stop();
        self.remaining = initial_secs;
        self.paused = false;
        let handle = self.scheduler.schedule_repeating(TICK_PERIOD);
        debug!(?handle, initial_secs, "clock started");
        self.active = Some(handle);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            self.scheduler.cancel(handle);
            debug!(?handle, "clock stopped");
        }
        self.paused = false;
    }

    pub fn on_tick(&mut self, handle: TickHandle) -> TickOutcome {
        if self.active != Some(handle) || self.paused {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stop();
            return TickOutcome::Expired;
        }
        TickOutcome::Counted {
            remaining: self.remaining,
        }
    }

    #[cfg(test)]
    fn remaining(&self) -> u32 {
        self.remaining
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn handle(&self) -> Option<TickHandle> {
        self.active
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
