//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - The forecast view-model (location, unit system, daily records)
//! - OpenWeather geocoding and forecast clients
//! - Persistence of the last searched location
//! - The lookup pipeline that drives a [`RenderPort`]
//!
//! It is used by `forecast-cli`, but any front end that implements
//! [`RenderPort`] can drive [`App`].

pub mod app;
pub mod config;
pub mod error;
pub mod forecast;
pub mod format;
pub mod model;
pub mod provider;
pub mod render;
pub mod store;

pub use app::{App, INVALID_FORM_MESSAGE, Outcome};
pub use config::{Config, Endpoints};
pub use error::LookupError;
pub use forecast::{DAYS_FORECASTED, Forecast, MeasurementSystem, UnitsOutcome};
pub use model::{Coordinates, DailyRecord, LocationQuery, PersistedLocation};
pub use provider::{ForecastClient, GeocodingClient, openweather::OpenWeatherClient};
pub use render::{DailyWeatherView, DaySelector, DaySummary, KeyPress, RenderPort};
pub use store::{FileLocationStore, LocationStore, MemoryLocationStore};
