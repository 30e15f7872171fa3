use std::{fs, fs::File, io, sync::Mutex};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wxboard::{
    app::{run_app, App},
    cli::Args,
    config::Config,
    fetcher::Fetcher,
    prefs::{FileStore, Preferences},
    template::Template,
};

/// Log to a file, the terminal belongs to the UI
fn init_logging(config: &Config) -> anyhow::Result<()> {
    if let Some(parent) = config.log_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Error creating log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Error opening log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_args(args)?;
    init_logging(&config)?;
    info!(data_dir = %config.data_dir.display(), "Starting");

    let client = config.weather_client()?;
    let locator = config.locator()?;
    let prefs = Preferences::new(FileStore::load(config.preferences_path()));
    let (tx, rx) = mpsc::unbounded_channel();
    let fetcher = Fetcher::new(client, tx.clone());
    let app = App::new(prefs, Template::dashboard(), config.pin_placeholder_hour);

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(
        &mut terminal,
        app,
        fetcher,
        tx,
        rx,
        locator,
        config.startup_city.clone(),
    )
    .await;

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("UI error: {err:?}");
        println!("{:?}", err)
    }
    info!("Exiting");

    Ok(())
}
