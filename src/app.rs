//! Application state management for citywx
//!
//! This module contains the main application state: the search input, the
//! candidate picker, keyboard handling, and the glue between user actions,
//! the request pipeline and the presenter. Every outbound request leaves
//! this module as a `Command`; every result comes back as a
//! `PipelineEvent`, and only the one matching the latest command is applied.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::data::{
    parse_location, place_display, GeocodeCandidate, GeocodeOutcome, ResolvedLocation,
    StateTable, WeatherCodeTable,
};
use crate::pipeline::{Command, PipelineEvent, Seq};
use crate::presenter::Presenter;
use crate::store::{LastLocationStore, StoredLocation};

/// Modal list of places to choose from
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePicker {
    /// Candidates in the order the geocoder returned them
    pub candidates: Vec<GeocodeCandidate>,
    /// Index of the highlighted candidate
    pub selected: usize,
}

impl CandidatePicker {
    fn new(candidates: Vec<GeocodeCandidate>) -> Self {
        Self {
            candidates,
            selected: 0,
        }
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if self.selected + 1 < self.candidates.len() {
            self.selected += 1;
        }
    }

    /// Entry text for each candidate: display label plus coordinates
    pub fn labels(&self, states: StateTable) -> Vec<String> {
        self.candidates
            .iter()
            .map(|c| {
                format!(
                    "{} ({:.2}, {:.2})",
                    place_display(c, states),
                    c.latitude,
                    c.longitude
                )
            })
            .collect()
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Text currently in the search box
    pub input: String,
    /// Open candidate picker, if the last search was ambiguous
    pub picker: Option<CandidatePicker>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    presenter: Presenter,
    store: LastLocationStore,
    states: StateTable,
    /// Raw text of the search the pending results belong to
    search_raw: String,
    /// Sequence number of the only command whose result is still wanted
    active_seq: Option<Seq>,
    next_seq: Seq,
}

impl App {
    /// Creates an idle app persisting through `store`
    pub fn new(store: LastLocationStore) -> Self {
        Self::with_tables(store, StateTable::US, WeatherCodeTable::WMO)
    }

    /// Creates an idle app with explicit lookup tables
    pub fn with_tables(
        store: LastLocationStore,
        states: StateTable,
        codes: WeatherCodeTable,
    ) -> Self {
        Self {
            input: String::new(),
            picker: None,
            show_help: false,
            should_quit: false,
            presenter: Presenter::new(codes),
            store,
            states,
            search_raw: String::new(),
            active_seq: None,
            next_seq: 0,
        }
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn states(&self) -> StateTable {
        self.states
    }

    /// Sequence number of the outstanding command, if any
    pub fn active_seq(&self) -> Option<Seq> {
        self.active_seq
    }

    /// Decides what to show first
    ///
    /// An explicit location is searched; otherwise the remembered location is
    /// restored: full coordinates go straight to a forecast fetch, raw text
    /// alone is searched again. With nothing remembered the app stays idle.
    pub fn startup(&mut self, initial_location: Option<String>) -> Option<Command> {
        if let Some(location) = initial_location {
            self.input = location;
            return self.submit_search();
        }

        match self.store.load() {
            StoredLocation::Resolved(location) => {
                tracing::info!(display = %location.display, "restoring last location");
                self.input = location.raw.clone();
                self.search_raw = location.raw;
                self.presenter.show_location(&location.display);
                Some(self.forecast_command(location.latitude, location.longitude))
            }
            StoredLocation::RawOnly(raw) => {
                tracing::info!(%raw, "re-resolving last search");
                self.input = raw;
                self.submit_search()
            }
            StoredLocation::Empty => None,
        }
    }

    /// Starts a search for the text in the input box
    ///
    /// Returns `None` without changing anything if the input has no city.
    pub fn submit_search(&mut self) -> Option<Command> {
        let raw = self.input.trim().to_string();
        let query = parse_location(&raw);
        if query.city.is_empty() {
            return None;
        }

        self.picker = None;
        self.store.save_raw(&raw);
        self.presenter.show_searching();
        self.search_raw = raw;

        let seq = self.issue();
        tracing::info!(seq, city = %query.city, state = %query.state, "searching");
        Some(Command::Geocode {
            seq,
            city: query.city,
            state: query.state,
        })
    }

    /// Commits to `candidate`: remembers it and fetches its forecast
    pub fn choose_candidate(&mut self, candidate: &GeocodeCandidate) -> Command {
        self.picker = None;
        let resolved = ResolvedLocation::from_candidate(&self.search_raw, candidate, self.states);
        self.presenter.show_location(&resolved.display);
        self.store.save(&resolved);
        self.forecast_command(resolved.latitude, resolved.longitude)
    }

    /// Applies a finished request, returning the follow-up command if any
    ///
    /// Events for anything but the latest command are discarded.
    pub fn handle_event(&mut self, event: PipelineEvent) -> Option<Command> {
        if self.active_seq != Some(event.seq()) {
            tracing::debug!(
                seq = event.seq(),
                active = ?self.active_seq,
                "discarding stale result"
            );
            return None;
        }
        self.active_seq = None;

        match event {
            PipelineEvent::Geocoded { result, .. } => match result {
                Ok(GeocodeOutcome::AutoSelected(candidate)) => {
                    Some(self.choose_candidate(&candidate))
                }
                Ok(GeocodeOutcome::CandidateList(candidates)) => {
                    tracing::info!(count = candidates.len(), "several places match");
                    self.picker = Some(CandidatePicker::new(candidates));
                    None
                }
                Ok(GeocodeOutcome::NotFound) => {
                    self.presenter.show_not_found();
                    None
                }
                Err(_) => {
                    self.presenter.show_find_error();
                    None
                }
            },
            PipelineEvent::Forecasted { result, .. } => {
                match result {
                    Ok(snapshot) => {
                        self.presenter.show_snapshot(&snapshot, snapshot.local_now());
                    }
                    Err(_) => self.presenter.show_forecast_error(),
                }
                None
            }
        }
    }

    /// Handles keyboard input, returning a command to dispatch if any
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Option<Command> {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key_event.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return None;
        }

        if let Some(picker) = &mut self.picker {
            match key_event.code {
                KeyCode::Up | KeyCode::Char('k') => picker.move_up(),
                KeyCode::Down | KeyCode::Char('j') => picker.move_down(),
                KeyCode::Enter => {
                    let chosen = picker.candidates.get(picker.selected).cloned();
                    if let Some(candidate) = chosen {
                        return Some(self.choose_candidate(&candidate));
                    }
                }
                KeyCode::Esc => {
                    self.picker = None;
                }
                _ => {}
            }
            return None;
        }

        match key_event.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::F(1) => {
                self.show_help = true;
            }
            KeyCode::Enter => return self.submit_search(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char('u') if ctrl => {
                self.input.clear();
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
            }
            _ => {}
        }
        None
    }

    fn forecast_command(&mut self, latitude: f64, longitude: f64) -> Command {
        let seq = self.issue();
        tracing::info!(seq, latitude, longitude, "loading forecast");
        Command::Forecast {
            seq,
            latitude,
            longitude,
        }
    }

    /// Allocates a sequence number and makes it the active one
    fn issue(&mut self) -> Seq {
        self.next_seq += 1;
        self.active_seq = Some(self.next_seq);
        self.next_seq
    }
}
