use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::clock::Ticker;
use crate::fetcher::{Fetcher, Update};
use crate::locate::Locator;
use crate::openweather::Query;
use crate::prefs::{KeyValueStore, Preferences};
use crate::render;
use crate::template::{Field, Template};
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Side effects requested by input or results, carried out by the run loop
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Search(Query),
    Locate,
    Quit,
}

/// Everything the dashboard shows, plus the preferences behind it
pub struct App<S> {
    pub template: Template,
    /// Contents of the search field
    pub search: String,
    /// Blocking message; input is ignored until it's dismissed
    pub alert: Option<String>,
    /// Non-blocking one-line message
    pub status: Option<String>,
    /// Visual mode currently applied
    pub light_mode: bool,
    /// Checked state of the theme switch
    pub theme_switch: bool,
    prefs: Preferences<S>,
    pin_placeholder_hour: bool,
    clock: Ticker,
    quit: bool,
}

impl<S: KeyValueStore> App<S> {
    /// Set up the dashboard for a fresh launch: apply the saved theme, count
    /// the run and start the clock
    pub fn new(prefs: Preferences<S>, template: Template, pin_placeholder_hour: bool) -> Self {
        let theme = prefs.theme_enabled();
        let mut app = Self {
            template,
            search: String::new(),
            alert: None,
            status: None,
            light_mode: theme,
            theme_switch: theme,
            prefs,
            pin_placeholder_hour,
            clock: Ticker::default(),
            quit: false,
        };
        app.count_run();
        app.tick();
        app
    }

    pub fn prefs(&self) -> &Preferences<S> {
        &self.prefs
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Refresh the clock fields if a second has passed
    pub fn tick(&mut self) -> bool {
        self.clock.tick(&mut self.template)
    }

    fn count_run(&mut self) {
        let count = match self.prefs.bump_run_count() {
            Ok(count) => count,
            Err(err) => {
                error!("Error saving run count: {err:?}");
                self.prefs.run_count().saturating_add(1)
            }
        };
        info!(count, "Counted run");
        *self.template.overlay_mut() = format!("Live Runs: {count}");
    }

    pub fn toggle_theme(&mut self) {
        self.theme_switch = !self.theme_switch;
        self.light_mode = self.theme_switch;
        if let Err(err) = self.prefs.set_theme_enabled(self.theme_switch) {
            error!("Error saving theme: {err:?}");
        }
    }

    /// Submit the search field. Blank input is ignored; otherwise the field
    /// is cleared.
    pub fn submit_search(&mut self) -> Option<Command> {
        let city = self.search.trim().to_string();
        if city.is_empty() {
            return None;
        }
        self.search.clear();
        self.status = Some(format!("Searching for {city}..."));
        Some(Command::Search(Query::City(city)))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            self.quit = true;
            return Some(Command::Quit);
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return None;
        }

        match key.code {
            KeyCode::Char('l') if ctrl => {
                self.status = Some("Locating...".to_string());
                Some(Command::Locate)
            }
            KeyCode::F(2) => {
                self.status = Some("Locating...".to_string());
                Some(Command::Locate)
            }
            KeyCode::Char('t') if ctrl => {
                self.toggle_theme();
                None
            }
            KeyCode::Char(c) if !ctrl => {
                self.search.push(c);
                None
            }
            KeyCode::Backspace => {
                self.search.pop();
                None
            }
            KeyCode::Enter => self.submit_search(),
            KeyCode::Esc if !self.search.is_empty() => {
                self.search.clear();
                None
            }
            KeyCode::Esc => {
                self.quit = true;
                Some(Command::Quit)
            }
            _ => None,
        }
    }

    /// Apply a pipeline or location result to the template
    pub fn apply(&mut self, update: Update) -> Option<Command> {
        match update {
            Update::Current { result, .. } => match result {
                Ok(snapshot) => {
                    render::current::render(&mut self.template, &snapshot);
                    self.status = None;
                }
                Err(err) => {
                    error!("Error fetching weather: {err}");
                    self.status = err.is_user_visible().then(|| err.to_string());
                }
            },
            Update::Daily { result, .. } => match result {
                Ok(entries) => render::daily::render(&mut self.template, &entries),
                Err(err) => error!("Error fetching forecast: {err}"),
            },
            Update::Hourly { result, .. } => match result {
                Ok(entries) => {
                    render::hourly::render(&mut self.template, &entries, self.pin_placeholder_hour)
                }
                Err(err) => {
                    error!("Error fetching hourly forecast: {err}");
                    self.template.clear_hourly();
                }
            },
            Update::Located { result, .. } => match result {
                Ok(coords) => {
                    info!(?coords, "Located");
                    return Some(Command::Search(Query::Coords {
                        lat: coords.lat,
                        lon: coords.lon,
                    }));
                }
                Err(err) => {
                    warn!(code = ?err.code(), "Location lookup failed: {err}");
                    self.status = None;
                    self.alert = Some(err.to_string());
                }
            },
        }
        None
    }

    /// City currently on display, if any weather has loaded
    pub fn city(&self) -> Option<&str> {
        self.template.get(Field::City).filter(|city| *city != "--")
    }
}

/// Drive the dashboard until the user quits
pub async fn run_app<B, S, L>(
    terminal: &mut Terminal<B>,
    mut app: App<S>,
    mut fetcher: Fetcher,
    tx: mpsc::UnboundedSender<Update>,
    mut rx: mpsc::UnboundedReceiver<Update>,
    locator: L,
    startup_city: Option<String>,
) -> io::Result<()>
where
    B: Backend,
    S: KeyValueStore,
    L: Locator + Clone + 'static,
{
    if let Some(city) = startup_city {
        app.status = Some(format!("Searching for {city}..."));
        fetcher.search(Query::City(city));
    }

    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, &app))?;

        while let Ok(update) = rx.try_recv() {
            if !fetcher.is_current(&update) {
                debug!(generation = update.generation(), "Dropping stale update");
                continue;
            }
            if let Some(command) = app.apply(update) {
                execute(command, &mut fetcher, &tx, &locator);
            }
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = app.handle_key(key) {
                    execute(command, &mut fetcher, &tx, &locator);
                }
            }
        }

        if app.should_quit() {
            fetcher.cancel();
            return Ok(());
        }
    }
}

fn execute<L: Locator + Clone + 'static>(
    command: Command,
    fetcher: &mut Fetcher,
    tx: &mpsc::UnboundedSender<Update>,
    locator: &L,
) {
    match command {
        Command::Search(query) => {
            fetcher.search(query);
        }
        Command::Locate => {
            let generation = fetcher.generation();
            let locator = locator.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = locator.locate().await;
                let _ = tx.send(Update::Located { generation, result });
            });
        }
        Command::Quit => {}
    }
}
