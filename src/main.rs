use std::{
    error::Error,
    fs::{self, File},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keyrush::{
    app_dirs::AppDirs,
    clock::Scheduler,
    config::{ConfigStore, FileConfigStore, GameConfig},
    history::CsvHistoryLog,
    persistence::{FileProfileStore, ProfileStore},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, IntervalScheduler, Runner},
    session::{Command, GameSession, Phase},
    ui::GameScreen,
    words::{RandomWordSource, WordSource},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn, Level};

const REDRAW_MS: u64 = 250;

/// timed typing game: type the prompt, keep the streak, beat your best score
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// word pool: easy, normal or hard (anything else means normal)
    #[clap(short = 'd', long)]
    difficulty: Option<String>,

    /// round length in seconds (invalid values mean 60)
    #[clap(short = 's', long)]
    duration: Option<String>,

    /// player name to save with your best score
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// where the name and best score are kept
    #[clap(long)]
    profile: Option<PathBuf>,

    /// append finished rounds to this csv file
    #[clap(long)]
    history_log: Option<PathBuf>,

    /// log debug events
    #[clap(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    /// CLI values win over the remembered settings.
    fn game_config(&self, remembered: GameConfig) -> GameConfig {
        GameConfig::from_raw(
            self.difficulty
                .as_deref()
                .unwrap_or(&remembered.difficulty.to_string()),
            self.duration
                .as_deref()
                .unwrap_or(&remembered.duration_secs.to_string()),
        )
    }
}

pub struct App<
    W: WordSource = RandomWordSource,
    S: Scheduler = IntervalScheduler,
    P: ProfileStore = FileProfileStore,
> {
    session: GameSession<W, S, P>,
    typed: String,
    /// Name being edited after Ctrl-S; keys go here instead of the round.
    name_draft: Option<String>,
}

impl<W: WordSource, S: Scheduler, P: ProfileStore> App<W, S, P> {
    fn new(session: GameSession<W, S, P>) -> Self {
        Self {
            session,
            typed: String::new(),
            name_draft: None,
        }
    }

    /// The session owns the buffer; mirror it back after every command.
    fn apply(&mut self, cmd: Command) {
        self.session.handle(cmd);
        self.typed = self.session.state().typed_buffer.clone();
    }

    fn edit(&mut self, f: impl FnOnce(&mut String)) {
        if self.session.phase() != Phase::Running {
            return;
        }
        let before = self.typed.clone();
        f(&mut self.typed);
        // nothing changed (backspace on an empty buffer): not a keystroke
        if self.typed == before {
            return;
        }
        self.apply(Command::Keystroke(self.typed.clone()));
    }

    fn open_name_editor(&mut self) {
        if self.session.phase() == Phase::Running {
            return;
        }
        self.name_draft = Some(self.session.player_name().to_string());
    }

    /// Keys while the name editor is open. Returns false on quit.
    fn on_name_key(&mut self, key: KeyEvent, ctrl: bool) -> bool {
        let Some(draft) = self.name_draft.as_mut() else {
            return true;
        };
        match key.code {
            KeyCode::Char('c') if ctrl => return false,
            KeyCode::Esc => self.name_draft = None,
            KeyCode::Enter => {
                if let Some(name) = self.name_draft.take() {
                    info!(name = %name.trim(), "saving player name");
                    self.apply(Command::SaveName(name));
                }
            }
            KeyCode::Backspace => {
                draft.pop();
            }
            KeyCode::Char(c) if !ctrl => draft.push(c),
            _ => {}
        }
        true
    }
}

fn init_tracing(verbose: bool) -> Result<(), Box<dyn Error>> {
    let Some(path) = AppDirs::log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_tracing(cli.verbose)?;

    let config_store = FileConfigStore::new();
    let config = cli.game_config(config_store.load());
    if let Err(err) = config_store.save(&config) {
        warn!(%err, "could not remember settings");
    }

    let events = CrosstermEventSource::new();
    let scheduler = IntervalScheduler::new(events.sender());
    let store = cli
        .profile
        .as_ref()
        .map(FileProfileStore::with_path)
        .unwrap_or_default();
    info!(?config, profile = %store.path().display(), "starting");

    let mut session = GameSession::new(config, RandomWordSource::new()?, scheduler, store);
    if let Some(path) = cli.history_log.as_ref() {
        session = session.with_history_log(CsvHistoryLog::new(path));
    }
    if let Some(name) = cli.name.as_deref() {
        session.handle(Command::SaveName(name.to_string()));
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(REDRAW_MS)));
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<CrosstermEventSource, FixedTicker>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| {
            let view = app.session.view();
            let screen = GameScreen {
                view: &view,
                typed: &app.typed,
                name_draft: app.name_draft.as_deref(),
                history: app.session.history(),
                player_name: app.session.player_name(),
                config: app.session.config(),
            };
            f.render_widget(&screen, f.area());
        })?;

        match runner.step() {
            None | Some(AppEvent::Resize) => {}
            Some(AppEvent::Tick(handle)) => app.apply(Command::Tick(handle)),
            Some(AppEvent::Key(key)) => {
                if !on_key(app, key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns false when the user asked to quit.
fn on_key<W: WordSource, S: Scheduler, P: ProfileStore>(
    app: &mut App<W, S, P>,
    key: KeyEvent,
) -> bool {
    if key.kind != KeyEventKind::Press {
        return true;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if app.name_draft.is_some() {
        return app.on_name_key(key, ctrl);
    }

    match key.code {
        KeyCode::Esc => return false,
        KeyCode::Char('c') if ctrl => return false,
        KeyCode::Char('r') if ctrl => app.apply(Command::Reset),
        KeyCode::Char('s') if ctrl => app.open_name_editor(),
        KeyCode::Tab => app.apply(Command::PauseToggle),
        KeyCode::Enter => match app.session.phase() {
            Phase::Idle | Phase::Ended => app.apply(Command::Start),
            _ => app.apply(Command::Submit),
        },
        KeyCode::Char(' ') => app.apply(Command::Submit),
        KeyCode::Backspace => app.edit(|buf| {
            buf.pop();
        }),
        KeyCode::Char(c) if !ctrl => app.edit(|buf| buf.push(c)),
        _ => {}
    }
    true
}
