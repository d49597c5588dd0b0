//! citywx - City weather dashboard for the terminal
//!
//! A terminal UI application that looks up a US city and displays current
//! conditions, a 10-day forecast and the next 24 hours from Open-Meteo.

use std::io;
use std::panic;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use citywx::app::App;
use citywx::cli::{Cli, StartupConfig};
use citywx::data::{ForecastClient, GeocoderClient};
use citywx::logging;
use citywx::pipeline::{Command, Pipeline};
use citywx::store::{KeyValueStore, LastLocationStore};
use citywx::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Sends a command to the pipeline if there is one
fn dispatch(pipeline: &mut Pipeline, command: Option<Command>) {
    if let Some(command) = command {
        pipeline.dispatch(command);
    }
}

/// Runs the draw / input / results loop until the user quits
fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    pipeline: &mut Pipeline,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &*app))?;

        // Apply every finished request before reading input
        while let Some(event) = pipeline.try_recv() {
            let follow_up = app.handle_event(event);
            dispatch(pipeline, follow_up);
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let command = app.handle_key(key);
                    dispatch(pipeline, command);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let kv = config
        .data_dir
        .clone()
        .map(KeyValueStore::with_dir)
        .or_else(KeyValueStore::new);
    let log_file = logging::log_path(config.log_file.as_deref(), kv.as_ref().map(|s| s.dir()));
    match logging::init(log_file.as_deref()) {
        Some(path) => {
            tracing::info!(version = env!("CARGO_PKG_VERSION"), path = %path.display(), "citywx starting");
        }
        None => eprintln!("warning: log file unavailable, logging disabled"),
    }
    if kv.is_none() {
        tracing::warn!("no data directory, last location will not be remembered");
    }

    let store = LastLocationStore::with_store(kv);
    if config.forget {
        tracing::info!("forgetting last location");
        store.clear();
    }

    let mut pipeline = Pipeline::new(
        GeocoderClient::with_base_url(config.geocoding_url.clone()),
        ForecastClient::with_base_url(config.forecast_url.clone()),
    );
    let mut app = App::new(store);
    let initial = app.startup(config.initial_location.clone());
    dispatch(&mut pipeline, initial);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut pipeline);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    tracing::info!("citywx exiting");
    result.map_err(Into::into)
}
