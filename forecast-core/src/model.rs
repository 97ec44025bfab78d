use serde::{Deserialize, Deserializer, Serialize};

use crate::format::title_case;

/// Latitude/longitude pair. Always set together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// `current.temp` is a plain number, `daily[i].temp` is an object keyed by
/// part of day. Only the `day` reading is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Temperature {
    Scalar(f64),
    Daily { day: f64 },
}

impl Temperature {
    pub fn value(&self) -> f64 {
        match self {
            Temperature::Scalar(t) => *t,
            Temperature::Daily { day } => *day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub icon: String,
    pub description: String,
}

/// One day's raw weather as returned by the one-call endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Unix seconds.
    pub dt: i64,
    pub temp: Temperature,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub clouds: u32,
    pub humidity: u32,
    pub wind_speed: f64,
}

impl DailyRecord {
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

/// What the user typed, trimmed and case-normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl LocationQuery {
    /// City is title-cased; state and country are upper-cased.
    pub fn normalized(city: &str, state: &str, country: &str) -> Self {
        Self {
            city: title_case(city.trim()),
            state: state.trim().to_uppercase(),
            country: country.trim().to_uppercase(),
        }
    }

    /// Value of the `q` query parameter.
    pub fn q(&self) -> String {
        format!("{},{},{}", self.city, self.state, self.country)
    }
}

/// Result of a successful geocode.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    pub coords: Coordinates,
    /// Canonical country code, when the API reports one.
    pub country: Option<String>,
}

/// Current conditions plus the daily series, straight from the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastBundle {
    pub current: DailyRecord,
    pub daily: Vec<DailyRecord>,
}

/// The last searched location, as kept in the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedLocation {
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(deserialize_with = "number_or_string")]
    pub lat: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub lon: f64,
}

impl PersistedLocation {
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

// Older records carry coordinates as strings.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
