use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use reflexcade::app::App;
use reflexcade::config::{Config, LogConfig};
use reflexcade::event::{Event, EventHandler};
use reflexcade::pose::KeyboardPose;
use reflexcade::ui;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    init_logging(&config.log)?;
    match config_path {
        Some(path) => log::info!("config loaded from {}", path.display()),
        None => {
            let path = Config::default_path();
            if path.exists() {
                log::info!("config loaded from {}", path.display());
            } else {
                log::warn!("no config at {}, using defaults", path.display());
            }
        }
    }
    log::info!(
        "reflexcade starting: {}x{} playfield, sky variant {}, tick {}ms",
        config.playfield.width,
        config.playfield.height,
        config.sky_defender.variant.name(),
        config.tick_rate_ms
    );

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if release_events {
        execute!(stdout, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))?;
    }
    log::debug!("key release events reported: {release_events}");
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(&config, Box::new(KeyboardPose::new()), release_events);
    let event_handler = EventHandler::new(config.tick_rate_ms);

    let result = run(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    if release_events {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => log::info!("reflexcade exiting"),
        Err(err) => log::error!("reflexcade aborted: {err:#}"),
    }
    result
}

fn run(terminal: &mut Term, app: &mut App, events: &EventHandler) -> anyhow::Result<()> {
    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .context("drawing frame")?;

        match events.next().context("event channel closed")? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
            Event::Mouse(mouse) => app.on_mouse(mouse),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// The terminal is in raw mode while running, so log records go to a file.
fn init_logging(cfg: &LogConfig) -> anyhow::Result<()> {
    let file = File::create(&cfg.file)
        .with_context(|| format!("creating log file {}", cfg.file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cfg.level.as_str()))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();
    Ok(())
}
