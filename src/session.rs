use tracing::{debug, info, warn};

use crate::clock::{Scheduler, SessionClock, TickHandle, TickOutcome};
use crate::config::GameConfig;
use crate::history::{CsvHistoryLog, History, HistoryEntry, UNNAMED_PLAYER};
use crate::matching::{is_exact_match, match_prefix, PromptRender};
use crate::persistence::{Profile, ProfileStore};
use crate::score::ScoreKeeper;
use crate::words::{Difficulty, WordSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    Ended,
}

/// Inputs the session understands. Every command is accepted in every phase;
/// the ones that make no sense for the current phase are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    PauseToggle,
    Reset,
    /// The full input buffer after an edit.
    Keystroke(String),
    Submit,
    Tick(TickHandle),
    SaveName(String),
}

/// Live state of the current round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    pub phase: Phase,
    pub time_left_secs: u32,
    pub target_word: String,
    pub typed_buffer: String,
    pub counters: ScoreKeeper,
    /// Survives resets; only ever goes up.
    pub best_score: u32,
    pub duration_secs: u32,
    pub difficulty: Difficulty,
}

impl RoundState {
    fn idle(config: &GameConfig, best_score: u32) -> Self {
        Self {
            phase: Phase::Idle,
            time_left_secs: config.duration_secs,
            target_word: String::new(),
            typed_buffer: String::new(),
            counters: ScoreKeeper::new(),
            best_score,
            duration_secs: config.duration_secs,
            difficulty: config.difficulty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub time_left: u32,
    pub score: u32,
    pub accuracy_percent: u32,
    pub streak: u32,
    pub best_score: u32,
}

/// What the front end needs after each command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub phase: Phase,
    pub hud: Hud,
    pub prompt: PromptRender,
    /// Set only by the command that ended the round.
    pub finished: Option<HistoryEntry>,
}

/// Round orchestrator. Owns the round state and drives the clock, the word
/// source and the profile store.
#[derive(Debug)]
pub struct GameSession<W: WordSource, S: Scheduler, P: ProfileStore> {
    state: RoundState,
    config: GameConfig,
    words: W,
    clock: SessionClock<S>,
    store: P,
    player_name: String,
    history: History,
    history_log: Option<CsvHistoryLog>,
}

impl<W: WordSource, S: Scheduler, P: ProfileStore> GameSession<W, S, P> {
    /// Loads the profile once; its best score seeds the session.
    pub fn new(config: GameConfig, words: W, scheduler: S, store: P) -> Self {
        let config = config.normalized();
        let profile = store.load();
        let best_score = profile.best_score.unwrap_or(0);
        debug!(?profile, "profile loaded");

        Self {
            state: RoundState::idle(&config, best_score),
            config,
            words,
            clock: SessionClock::new(scheduler),
            store,
            player_name: profile.name.unwrap_or_default(),
            history: History::new(),
            history_log: None,
        }
    }

    pub fn with_history_log(mut self, log: CsvHistoryLog) -> Self {
        self.history_log = Some(log);
        self
    }

    pub fn handle(&mut self, cmd: Command) -> SessionView {
        let finished = match cmd {
            Command::Start => {
                self.start();
                None
            }
            Command::PauseToggle => {
                self.toggle_pause();
                None
            }
            Command::Reset => {
                self.reset();
                None
            }
            Command::Keystroke(buffer) => {
                self.keystroke(buffer);
                None
            }
            Command::Submit => {
                self.submit();
                None
            }
            Command::Tick(handle) => self.tick(handle),
            Command::SaveName(name) => {
                self.save_name(&name);
                None
            }
        };

        SessionView {
            finished,
            ..self.view()
        }
    }

    fn start(&mut self) {
        if !matches!(self.state.phase, Phase::Idle | Phase::Ended) {
            debug!(phase = %self.state.phase, "start ignored");
            return;
        }

        self.clock.stop();
        self.state = RoundState::idle(&self.config, self.state.best_score);
        self.state.target_word = self.words.next(self.state.difficulty);
        self.state.phase = Phase::Running;
        self.clock.start(self.state.duration_secs);
        info!(
            difficulty = %self.state.difficulty,
            duration_secs = self.state.duration_secs,
            "round started"
        );
    }

    fn keystroke(&mut self, buffer: String) {
        if self.state.phase != Phase::Running {
            debug!(phase = %self.state.phase, "keystroke ignored");
            return;
        }

        let m = match_prefix(&buffer, &self.state.target_word);
        self.state.counters.on_live_keystroke(m.fully_matched);
        self.state.typed_buffer = buffer;
    }

    fn submit(&mut self) {
        if self.state.phase != Phase::Running {
            debug!(phase = %self.state.phase, "submit ignored");
            return;
        }
        if self.state.typed_buffer.trim().is_empty() {
            return;
        }

        if is_exact_match(&self.state.typed_buffer, &self.state.target_word) {
            let delta = self
                .state
                .counters
                .on_correct_submit(self.state.target_word.chars().count());
            debug!(word = %self.state.target_word, delta, "correct word");
        } else {
            self.state.counters.on_incorrect_submit();
            debug!(word = %self.state.target_word, typed = %self.state.typed_buffer, "missed word");
        }

        self.state.typed_buffer.clear();
        self.state.target_word = self.words.next(self.state.difficulty);
    }

    fn toggle_pause(&mut self) {
        match self.state.phase {
            Phase::Running => {
                self.state.phase = Phase::Paused;
                self.clock.pause();
            }
            Phase::Paused => {
                self.state.phase = Phase::Running;
                self.clock.resume();
            }
            phase => debug!(%phase, "pause toggle ignored"),
        }
    }

    fn tick(&mut self, handle: TickHandle) -> Option<HistoryEntry> {
        if !matches!(self.state.phase, Phase::Running | Phase::Paused) {
            return None;
        }

        match self.clock.on_tick(handle) {
            TickOutcome::Ignored => None,
            TickOutcome::Counted { remaining } => {
                self.state.time_left_secs = remaining;
                None
            }
            TickOutcome::Expired => {
                self.state.time_left_secs = 0;
                Some(self.end_round())
            }
        }
    }

    fn end_round(&mut self) -> HistoryEntry {
        self.clock.stop();
        self.state.phase = Phase::Ended;

        let score = self.state.counters.score();
        if score > self.state.best_score {
            info!(score, previous = self.state.best_score, "new best score");
            self.state.best_score = score;
            self.persist();
        }

        let entry = HistoryEntry {
            player_name: if self.player_name.is_empty() {
                UNNAMED_PLAYER.to_string()
            } else {
                self.player_name.clone()
            },
            final_score: score,
            accuracy_percent: self.state.counters.accuracy(),
            max_streak: self.state.counters.streak(),
            duration_secs: self.state.duration_secs,
        };
        info!(?entry, "round ended");

        if let Some(ref log) = self.history_log {
            if let Err(err) = log.append(&entry) {
                warn!(%err, path = %log.path().display(), "could not append to history log");
            }
        }
        self.history.record(entry.clone());
        entry
    }

    fn reset(&mut self) {
        self.clock.stop();
        self.state = RoundState::idle(&self.config, self.state.best_score);
    }

    fn save_name(&mut self, name: &str) {
        self.player_name = name.trim().to_string();
        self.persist();
    }

    fn persist(&self) {
        let profile = Profile {
            name: Some(self.player_name.clone()),
            best_score: Some(self.state.best_score),
        };
        if let Err(err) = self.store.save(&profile) {
            warn!(%err, "could not save profile");
        }
    }

    /// Settings for the next round; the current round keeps what it started with.
    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config.normalized();
        if self.state.phase == Phase::Idle {
            self.state.time_left_secs = self.config.duration_secs;
            self.state.duration_secs = self.config.duration_secs;
            self.state.difficulty = self.config.difficulty;
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.state.phase,
            hud: self.hud(),
            prompt: self.prompt(),
            finished: None,
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            time_left: self.state.time_left_secs,
            score: self.state.counters.score(),
            accuracy_percent: self.state.counters.accuracy(),
            streak: self.state.counters.streak(),
            best_score: self.state.best_score,
        }
    }

    pub fn prompt(&self) -> PromptRender {
        PromptRender::split(&self.state.typed_buffer, &self.state.target_word)
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Handle of the live tick registration, if a round is counting down.
    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.clock.handle()
    }

    pub fn scheduler(&self) -> &S {
        self.clock.scheduler()
    }
}
