//! fpick — a terminal file picker built with ratatui.
//!
//! This binary initialises the terminal, mounts a browser over the local
//! filesystem, runs the main event loop, and restores the terminal on exit
//! or panic. The picked path is printed to stdout.

mod input;
mod provider;
mod render;

use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fpick_core::{
    Browser, BrowserCaches, BrowserOptions, Command, Config, CoreError, Event, FileEntry,
    Provider,
};
use ratatui::{backend::CrosstermBackend, widgets::ListState, Terminal};
use tracing_subscriber::EnvFilter;

use crate::input::{
    handle_key, pointer_command, InputAction, InputState, ListViewport, MouseTracker,
};
use crate::provider::LocalProvider;
use crate::render::render;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "FPICK_LOG";

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Logs go to a file so they never corrupt the terminal.
fn init_tracing() -> anyhow::Result<()> {
    let log_path = std::env::temp_dir().join("fpick.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(filter)
        .with_ansi(false)
        .init();
    Ok(())
}

fn config_path() -> Option<PathBuf> {
    let dir = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
    };
    Some(dir.join("fpick").join("config.toml"))
}

fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    match Config::load(&path) {
        Ok(config) => config,
        Err(CoreError::NotFound(_)) => Config::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to load config; using defaults");
            Config::default()
        }
    }
}

/// `fpick [DIR] [QUERY]`
fn parse_options() -> anyhow::Result<BrowserOptions> {
    let mut args = std::env::args().skip(1);
    let base = match args.next() {
        Some(dir) => std::fs::canonicalize(dir)?,
        None => std::env::current_dir()?,
    };
    let mut options = BrowserOptions::new(base.to_string_lossy().into_owned());
    if let Some(query) = args.next() {
        options = options.with_query(query);
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    install_panic_hook();

    let options = parse_options()?;
    let config = load_config();

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, options, &config).await;
    restore_terminal(&mut terminal)?;

    match result {
        Ok(Some(entry)) => {
            println!("{}", entry.path());
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "fpick exited with an error");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    options: BrowserOptions,
    config: &Config,
) -> anyhow::Result<Option<FileEntry>> {
    // The caches and their sweeper outlive any one browser.
    let caches = BrowserCaches::new(&config.cache);
    let _sweeper = caches.spawn_sweeper(config.cache.sweep_interval());

    let provider: Arc<dyn Provider> = Arc::new(LocalProvider::new());
    let mut input_state = InputState::with_query(options.initial_query.clone().unwrap_or_default());
    let (mut browser, mut channels) = Browser::mount(options, config, provider, &caches);

    let mut mouse = MouseTracker::new();
    let mut list_state = ListState::default();
    let mut viewport = ListViewport::default();
    let mut flash: Option<String> = None;

    loop {
        // 1. Drain background completions
        while let Ok(message) = channels.messages.try_recv() {
            browser.handle_message(message);
        }

        // 2. Drain browser events
        while let Ok(event) = channels.events.try_recv() {
            match event {
                Event::Selected(entry) => return Ok(Some(entry)),
                Event::Closed => return Ok(None),
                Event::DirectoryLoaded { path, count } => {
                    tracing::debug!(%path, count, "directory loaded");
                    flash = Some(format!("Loaded {count} items"));
                }
                Event::SearchCompleted { query, count } => {
                    flash = Some(format!("{count} matches for \"{query}\""));
                }
                Event::FetchFailed { operation, message } => {
                    flash = Some(format!("{operation} failed: {message}"));
                }
            }
        }

        // 3. Render
        terminal.draw(|f| viewport = render(f, &browser, flash.as_deref(), &mut list_state))?;

        // 4. Poll for crossterm events
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    let (action, next) = handle_key(key, &input_state);
                    input_state = next;
                    match action {
                        InputAction::Command(command) => browser.handle_command(command),
                        InputAction::Quit => return Ok(None),
                        InputAction::None => {}
                    }
                }
                TermEvent::Mouse(m) => {
                    if let Some(command) = mouse.handle(m, &viewport) {
                        let target = match command {
                            Command::Click(i) | Command::DoubleClick(i) => browser.active().get(i),
                            _ => None,
                        };
                        let command = pointer_command(command, target);
                        browser.handle_command(command);
                    }
                }
                _ => {}
            }
        }
    }
}
