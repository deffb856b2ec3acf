//! SignalBoard TUI: disclaimer, symbol, signal group, annotated chart.
//!
//! Usage: `signalboard-tui [config.toml]`. Without an argument, defaults are
//! used and the data file is read from the working directory.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use signalboard_core::{AppConfig, Catalog, JsonSignalStore};
use signalboard_tui::{input, logging, persistence, ui, AppState};

fn main() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let log_path = logging::default_log_path();
    logging::init(&log_path)?;

    let config = AppConfig::load_or_default(config_path.as_deref())
        .context("loading configuration")?;
    let catalog = Catalog::load_or_builtin(config.catalog_file.as_deref())
        .context("loading symbol catalog")?;
    let store = JsonSignalStore::open_or_empty(&config.data_file);
    tracing::info!(
        data_file = %config.data_file.display(),
        records = store.total_records(),
        "starting tui"
    );

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Build app state and apply persisted preferences
    let state_path = persistence::default_state_path();
    let mut app = AppState::new(config, catalog, store, state_path.clone());
    persistence::apply(&mut app, persistence::load(&state_path));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        tracing::warn!(path = %state_path.display(), error = %e, "could not save ui state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 3. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
