//! Application state and the controller that drives it.
//!
//! All state changes go through the transition methods on [`AppState`]. Each
//! fetch cycle carries a sequence number so a response for a coordinate that
//! has since been replaced is dropped instead of overwriting newer data.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::{
    error::ResolveError,
    fetch::{FetchOutcome, fetch_all},
    location::LocationResolver,
    model::{Coordinate, LocationRecord, ViewModel},
    provider::{Geocoder, WeatherSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Dashboard,
    HourlyDetail,
}

/// Identifies one fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CycleTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    location: LocationRecord,
    view: ViewModel,
    error: Option<String>,
    screen: Screen,
    province_picker_open: bool,
    cycle: u64,
}

impl AppState {
    pub fn new(location: LocationRecord) -> Self {
        Self {
            location,
            view: ViewModel::default(),
            error: None,
            screen: Screen::default(),
            province_picker_open: false,
            cycle: 0,
        }
    }

    pub fn location(&self) -> &LocationRecord {
        &self.location
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn province_picker_open(&self) -> bool {
        self.province_picker_open
    }

    pub fn begin_resolve(&mut self) {
        self.error = None;
    }

    /// Replace the location on success; on failure record the error and keep
    /// the current location. Returns whether the location changed.
    pub fn apply_resolution(&mut self, result: Result<LocationRecord, ResolveError>) -> bool {
        match result {
            Ok(record) => {
                self.location = record;
                self.error = None;
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Start a new cycle for the current coordinate: previous data and error
    /// are dropped immediately.
    pub fn begin_fetch_cycle(&mut self) -> (CycleTicket, Coordinate) {
        self.cycle += 1;
        self.view = ViewModel::default();
        self.error = None;
        (CycleTicket(self.cycle), self.location.coordinate)
    }

    pub fn is_latest(&self, ticket: CycleTicket) -> bool {
        ticket.0 == self.cycle
    }

    /// Store a finished cycle. Results of superseded cycles are discarded and
    /// `false` is returned.
    pub fn complete_fetch_cycle(&mut self, ticket: CycleTicket, outcome: FetchOutcome) -> bool {
        if !self.is_latest(ticket) {
            debug!("Discarding fetch cycle {} (latest is {})", ticket.0, self.cycle);
            return false;
        }

        self.view = outcome.view;
        self.error = outcome.error;
        true
    }

    pub fn show_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn toggle_province_picker(&mut self) -> bool {
        self.province_picker_open = !self.province_picker_open;
        self.province_picker_open
    }
}

/// Owns the application state and the remote source.
#[derive(Debug)]
pub struct Dashboard<S> {
    source: S,
    state: Mutex<AppState>,
}

impl<S: WeatherSource + Geocoder> Dashboard<S> {
    pub fn new(source: S, location: LocationRecord) -> Self {
        Self { source, state: Mutex::new(AppState::new(location)) }
    }

    pub fn snapshot(&self) -> AppState {
        self.state().clone()
    }

    /// Run one fetch cycle for the current location. Returns `false` when a
    /// newer cycle started meanwhile and this result was dropped.
    pub async fn refresh(&self) -> bool {
        let (ticket, at) = self.state().begin_fetch_cycle();
        let outcome = fetch_all(&self.source, at).await;
        self.state().complete_fetch_cycle(ticket, outcome)
    }

    /// Resolve `query`, switch to it and fetch its data. On failure the current
    /// location and data stay as they were.
    pub async fn search(&self, query: &str) -> Result<LocationRecord, ResolveError> {
        self.state().begin_resolve();

        let result = LocationResolver::new(&self.source).resolve(query).await;
        let changed = self.state().apply_resolution(result.clone());

        if changed {
            info!("Location changed to {}", self.state().location().name);
            self.refresh().await;
        }
        result
    }

    /// Pick a place from the province list; closes the picker.
    pub async fn select_province(&self, name: &str) -> Result<LocationRecord, ResolveError> {
        {
            let mut state = self.state();
            if state.province_picker_open() {
                state.toggle_province_picker();
            }
        }
        self.search(name).await
    }

    pub fn show_screen(&self, screen: Screen) {
        self.state().show_screen(screen);
    }

    pub fn toggle_province_picker(&self) -> bool {
        self.state().toggle_province_picker()
    }

    fn state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
