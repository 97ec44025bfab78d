//! Lookup pipeline: geocode, persist, fetch and render, plus startup restore
//! and day selection.
//!
//! Every submission takes a ticket from a generation counter. Results that
//! come back after a newer submission has started are dropped, so a slow
//! first lookup can never overwrite a faster second one.

use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    LookupError,
    format::title_case,
    forecast::{DAYS_FORECASTED, Forecast, MeasurementSystem, UnitsOutcome},
    model::{Coordinates, DailyRecord, ForecastBundle, LocationQuery, PersistedLocation},
    provider::{ForecastClient, GeocodingClient},
    render::{DaySelector, KeyPress, RenderPort},
    store::LocationStore,
};

/// Shown for every failed lookup, whatever the cause.
pub const INVALID_FORM_MESSAGE: &str =
    "Unable to find weather for that location. Check the city, state and country and try again.";

/// How a submission or restore ended.
#[derive(Debug)]
#[must_use]
pub enum Outcome {
    Rendered,
    /// No stored or current location to show; cards stay hidden.
    NothingStored,
    Failed(LookupError),
    /// A newer submission started while this one was in flight.
    Superseded,
}

impl Outcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Outcome::Rendered)
    }
}

struct Session {
    forecast: Forecast,
    selector: DaySelector,
    /// Day the next completed fetch opens on, instead of day 0.
    pending_day: Option<usize>,
    renderer: Box<dyn RenderPort>,
}

impl Session {
    fn render(&mut self) {
        let active = self.selector.active();
        if let Some(view) = self.forecast.daily_view(active) {
            self.renderer.render_weather_panel(&view);
        }
        let days = self.forecast.day_summaries();
        self.renderer.render_day_list(&days, active);
    }

    fn apply_location(&mut self, location: &PersistedLocation) -> MeasurementSystem {
        self.forecast.set_city(location.city.as_str());
        self.forecast.set_state(location.state.as_str());
        self.forecast.set_country(location.country.as_str());
        self.forecast.set_coords(location.coords());
        self.forecast.clear_list();
        self.forecast.measurement_system()
    }
}

/// Application controller. Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct App {
    geocoder: Arc<dyn GeocodingClient>,
    forecaster: Arc<dyn ForecastClient>,
    store: Arc<dyn LocationStore>,
    session: Arc<Mutex<Session>>,
    generation: Arc<AtomicU64>,
}

impl App {
    pub fn new(
        geocoder: Arc<dyn GeocodingClient>,
        forecaster: Arc<dyn ForecastClient>,
        store: Arc<dyn LocationStore>,
        renderer: Box<dyn RenderPort>,
    ) -> Self {
        Self {
            geocoder,
            forecaster,
            store,
            session: Arc::new(Mutex::new(Session {
                forecast: Forecast::new(),
                selector: DaySelector::default(),
                pending_day: None,
                renderer,
            })),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Snapshot of the current view-model.
    pub fn forecast(&self) -> Forecast {
        self.session.lock().forecast.clone()
    }

    pub fn active_day(&self) -> usize {
        self.session.lock().selector.active()
    }

    /// Takes effect on the next fetch.
    pub fn set_measurement_system(&self, value: &str) -> UnitsOutcome {
        let outcome = self.session.lock().forecast.set_measurement_system(value);
        if let UnitsOutcome::Rejected { value } = &outcome {
            tracing::warn!(%value, "ignoring unknown measurement system");
        }
        outcome
    }

    /// Open the next completed fetch on `day` rather than day 0. Used once.
    pub fn preselect_day(&self, day: usize) -> bool {
        if day >= DAYS_FORECASTED {
            return false;
        }
        self.session.lock().pending_day = Some(day);
        true
    }

    /// Look up a location typed by the user and render its forecast.
    pub async fn submit(&self, city: &str, state: &str, country: &str) -> Outcome {
        let query = LocationQuery::normalized(city, state, country);
        let ticket = self.next_ticket();

        self.session.lock().renderer.announce(&format!(
            "Searching for {}, {} {}",
            query.city, query.state, query.country
        ));

        let geocoded = match self.geocoder.geocode(&query).await {
            Ok(geocoded) => geocoded,
            Err(err) => return self.fail(ticket, err),
        };

        let location = PersistedLocation {
            country: geocoded.country.unwrap_or_else(|| query.country.clone()),
            city: query.city,
            state: query.state,
            lat: geocoded.coords.latitude,
            lon: geocoded.coords.longitude,
        };

        let units = {
            let mut session = self.session.lock();
            if !self.is_current(ticket) {
                return Outcome::Superseded;
            }
            // Saved under the lock so a superseded lookup cannot write after a newer one.
            if let Err(err) = self.store.save(&location) {
                tracing::warn!(error = %format!("{err:#}"), "failed to persist location");
            }
            session.apply_location(&location)
        };

        self.fetch_and_render(ticket, location.coords(), units).await
    }

    /// Reload the last stored location, skipping geocoding.
    pub async fn restore(&self) -> Outcome {
        let ticket = self.next_ticket();

        {
            let mut session = self.session.lock();
            session.renderer.clear_location_input();
            session.renderer.focus_location_input();
            session.renderer.hide_cards();
        }

        let stored = match self.store.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => return Outcome::NothingStored,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "ignoring unreadable stored location");
                return Outcome::NothingStored;
            }
        };

        let location = PersistedLocation {
            city: title_case(&stored.city),
            state: stored.state.to_uppercase(),
            country: stored.country.to_uppercase(),
            ..stored
        };

        let units = {
            let mut session = self.session.lock();
            if !self.is_current(ticket) {
                return Outcome::Superseded;
            }
            session.apply_location(&location)
        };

        tracing::info!(city = %location.city, country = %location.country, "restoring location");
        self.fetch_and_render(ticket, location.coords(), units).await
    }

    /// Fetch again for the location already shown, with the current units.
    /// Neither geocodes nor reads the store.
    pub async fn refresh(&self) -> Outcome {
        let ticket = self.next_ticket();

        let (coords, units) = {
            let mut session = self.session.lock();
            let Some(coords) = session.forecast.coords() else {
                return Outcome::NothingStored;
            };
            session.forecast.clear_list();
            (coords, session.forecast.measurement_system())
        };

        self.fetch_and_render(ticket, coords, units).await
    }

    /// Show an already fetched day. No network.
    pub fn select_day(&self, day: usize) -> bool {
        let mut session = self.session.lock();
        let available = session.forecast.list().len();
        if !session.selector.select(day, available) {
            return false;
        }
        session.render();
        true
    }

    /// Keyboard equivalent of clicking a day entry.
    pub fn activate_day_with_key(&self, day: usize, key: KeyPress) -> bool {
        key.activates() && self.select_day(day)
    }

    /// Reset the form so a new location can be typed.
    pub fn change_location(&self) {
        let mut session = self.session.lock();
        session.renderer.clear_location_input();
        session.renderer.focus_location_input();
    }

    /// Hide lookup feedback once the user starts editing again.
    pub fn clear_feedback(&self) {
        let mut session = self.session.lock();
        session.renderer.hide_error();
        session.renderer.announce("");
    }

    async fn fetch_and_render(
        &self,
        ticket: u64,
        coords: Coordinates,
        units: MeasurementSystem,
    ) -> Outcome {
        let records = match self.forecaster.forecast(coords, units).await {
            Ok(bundle) => match forecast_records(bundle) {
                Ok(records) => records,
                Err(err) => return self.fail(ticket, err),
            },
            Err(err) => return self.fail(ticket, err),
        };

        let mut session = self.session.lock();
        if !self.is_current(ticket) {
            tracing::debug!(ticket, "discarding stale forecast");
            return Outcome::Superseded;
        }

        session.forecast.clear_list();
        for record in records {
            session.forecast.add_to_list(record);
        }
        session.selector.reset();
        if let Some(day) = session.pending_day.take() {
            let available = session.forecast.list().len();
            session.selector.select(day, available);
        }
        session.render();

        Outcome::Rendered
    }

    fn fail(&self, ticket: u64, err: LookupError) -> Outcome {
        let mut session = self.session.lock();
        if !self.is_current(ticket) {
            tracing::debug!(ticket, error = %err, "discarding stale failure");
            return Outcome::Superseded;
        }

        tracing::warn!(error = %err, "lookup failed");
        session.pending_day = None;
        session.renderer.show_error(INVALID_FORM_MESSAGE);
        Outcome::Failed(err)
    }

    fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }
}

/// Current conditions followed by the next four days.
fn forecast_records(bundle: ForecastBundle) -> Result<Vec<DailyRecord>, LookupError> {
    let ForecastBundle { current, mut daily } = bundle;
    if daily.len() < DAYS_FORECASTED {
        return Err(LookupError::MissingField {
            endpoint: "onecall",
            field: "daily",
        });
    }

    let mut records = Vec::with_capacity(DAYS_FORECASTED);
    records.push(current);
    records.extend(daily.drain(1..DAYS_FORECASTED));
    Ok(records)
}
