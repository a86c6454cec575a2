//! olaris - Olaris Consulting contact and newsletter forms
//!
//! A terminal front end for the consultancy's two site forms. Each form is
//! validated locally, delivered as one JSON POST off the UI thread, and
//! reports its outcome in place.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use olaris::application::{App, AppMode};
use olaris::infrastructure::{load_settings, logging, HttpTransport};
use olaris::presentation::{render_ui, InputHandler};

const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "olaris", version, about = "Contact Olaris Consulting or join the newsletter")]
struct Cli {
    /// Settings file (defaults to ./olaris.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where to write logs
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Site the newsletter path is resolved against
    #[arg(long)]
    site_url: Option<String>,
    /// Form-relay URL for contact messages
    #[arg(long)]
    contact_endpoint: Option<String>,
}

/// Entry point.
///
/// Loads settings and logging before touching the terminal so that startup
/// errors are printed normally, then runs the UI until the user quits.
///
/// # Errors
///
/// Returns an error if configuration or logging setup fails, or if the
/// terminal cannot be set up.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    settings.apply_env(|key| std::env::var(key).ok())?;
    if let Some(path) = cli.log_file {
        settings.log_file = path;
    }
    if let Some(url) = cli.site_url {
        settings.site_url = url;
    }
    if let Some(url) = cli.contact_endpoint {
        settings.contact_endpoint = url;
    }

    logging::init(&settings.log_file, &settings.log_level)?;
    let transport = HttpTransport::new(settings.request_timeout())?;
    let mut app = App::from_settings(&settings, Arc::new(transport))?;
    info!(site = %settings.site_url, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "event loop failed");
    }
    info!("exiting");

    Ok(res?)
}

/// Main application event loop.
///
/// Polls for keys with a short timeout so delivery outcomes and banner
/// expiry are applied even while the user is idle. Returns when the user
/// presses 'q' in normal mode; in-flight requests are abandoned.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => return Ok(()),
                        _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                    }
                }
            }
        }

        app.on_tick(Instant::now());
    }
}
