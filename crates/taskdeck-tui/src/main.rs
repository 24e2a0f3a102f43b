use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use taskdeck_service::{BlockingHttpService, SessionContext};
use taskdeck_tui::app::{App, Route};
use taskdeck_tui::config::Config;
use tracing::info;

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    info!(server = %config.server_url, "taskdeck starting");
    let session = SessionContext::new(config.session_store());
    let service = BlockingHttpService::new(&config.server_url, session)
        .context("failed to set up HTTP client")?;

    run_tui(service, config.start_route())
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(config: &Config) -> Result<()> {
    let path = config.log_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("taskdeck=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_tui(service: BlockingHttpService, start: Route) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, service, start);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    service: BlockingHttpService,
    start: Route,
) -> Result<()> {
    let mut app = App::new(service, start);

    loop {
        terminal.draw(|frame| app.render(frame))?;

        // The loading indicator is on screen now; fetch.
        if app.is_loading() {
            app.load();
            continue;
        }

        if let Event::Key(key) = event::read()? {
            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            // q quits unless we're typing
            if key.code == KeyCode::Char('q') && !app.is_input_mode() {
                break;
            }
            app.handle_key(key);
        }
    }

    info!("taskdeck exiting");
    Ok(())
}
