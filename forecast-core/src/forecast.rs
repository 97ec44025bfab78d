use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    format::{day_name_full, day_name_short, format_day_text, icon_url, location_text, title_case},
    model::{Coordinates, DailyRecord},
    render::{DailyWeatherView, DaySummary},
};

/// Current conditions plus the next four days.
pub const DAYS_FORECASTED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    #[default]
    Imperial,
    Metric,
}

impl MeasurementSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementSystem::Imperial => "imperial",
            MeasurementSystem::Metric => "metric",
        }
    }

    /// Case-insensitive match against `imperial` / `metric`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "imperial" => Some(MeasurementSystem::Imperial),
            "metric" => Some(MeasurementSystem::Metric),
            _ => None,
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            MeasurementSystem::Imperial => "mph",
            MeasurementSystem::Metric => "m/s",
        }
    }

    pub fn temp_unit(&self) -> &'static str {
        match self {
            MeasurementSystem::Imperial => "°F",
            MeasurementSystem::Metric => "°C",
        }
    }

    pub const fn all() -> &'static [MeasurementSystem] {
        &[MeasurementSystem::Imperial, MeasurementSystem::Metric]
    }
}

impl std::fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of asking the forecast to switch unit systems.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum UnitsOutcome {
    Accepted(MeasurementSystem),
    /// Not a known system; the previous one stays in effect.
    Rejected { value: String },
}

impl UnitsOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, UnitsOutcome::Accepted(_))
    }
}

/// View-model for one searched location: identity, unit preference and the
/// day-indexed records (index 0 is the current day).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    city: String,
    state: String,
    country: String,
    coords: Option<Coordinates>,
    measurement_system: MeasurementSystem,
    records: Vec<DailyRecord>,
}

impl Forecast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn set_country(&mut self, country: impl Into<String>) {
        self.country = country.into();
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn set_coords(&mut self, coords: Coordinates) {
        self.coords = Some(coords);
    }

    pub fn coords(&self) -> Option<Coordinates> {
        self.coords
    }

    pub fn set_measurement_system(&mut self, value: &str) -> UnitsOutcome {
        match MeasurementSystem::parse(value) {
            Some(system) => {
                self.measurement_system = system;
                UnitsOutcome::Accepted(system)
            }
            None => UnitsOutcome::Rejected {
                value: value.to_string(),
            },
        }
    }

    pub fn measurement_system(&self) -> MeasurementSystem {
        self.measurement_system
    }

    pub fn speed_unit(&self) -> &'static str {
        self.measurement_system.speed_unit()
    }

    pub fn temp_unit(&self) -> &'static str {
        self.measurement_system.temp_unit()
    }

    /// Truncates toward zero, then appends the unit label: `72.9` → `72 °F`.
    pub fn format_temp(&self, temp: f64) -> String {
        format!("{} {}", temp.trunc() as i64, self.temp_unit())
    }

    pub fn add_to_list(&mut self, record: DailyRecord) {
        self.records.push(record);
    }

    pub fn clear_list(&mut self) {
        self.records.clear();
    }

    pub fn list(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn weather(&self, index: usize) -> Option<&DailyRecord> {
        self.records.get(index)
    }

    pub fn location_text(&self) -> String {
        location_text(&self.city, &self.country)
    }

    /// Everything the weather and info panels show for `day`.
    pub fn daily_view(&self, day: usize) -> Option<DailyWeatherView> {
        let record = self.weather(day)?;
        let date = local_date(record.dt);
        let condition = record.condition();

        Some(DailyWeatherView {
            icon_url: icon_url(condition.map(|c| c.icon.as_str())),
            temperature: self.format_temp(record.temp.value()),
            description: title_case(condition.map(|c| c.description.as_str()).unwrap_or("")),
            day_name: day_name_full(date).to_string(),
            date_text: format_day_text(date),
            date,
            location: self.location_text(),
            cloudiness_pct: record.clouds,
            humidity_pct: record.humidity,
            wind_speed: format!("{} {}", record.wind_speed, self.speed_unit()),
        })
    }

    /// One entry per stored record, for the day selector.
    pub fn day_summaries(&self) -> Vec<DaySummary> {
        self.records
            .iter()
            .enumerate()
            .map(|(day, record)| {
                let date = local_date(record.dt);
                let temperature = self.format_temp(record.temp.value());
                DaySummary {
                    day,
                    icon_url: icon_url(record.condition().map(|c| c.icon.as_str())),
                    label: format!("{} {}", day_name_full(date), temperature),
                    day_name: day_name_short(date).to_string(),
                    temperature,
                }
            })
            .collect()
    }
}

fn local_date(dt: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp(dt, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
        .date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, Temperature};

    fn record(dt: i64, temp: f64) -> DailyRecord {
        DailyRecord {
            dt,
            temp: Temperature::Scalar(temp),
            weather: vec![Condition {
                icon: "04d".into(),
                description: "broken clouds".into(),
            }],
            clouds: 75,
            humidity: 60,
            wind_speed: 4.5,
        }
    }

    #[test]
    fn defaults_to_imperial() {
        let f = Forecast::new();
        assert_eq!(f.measurement_system(), MeasurementSystem::Imperial);
        assert_eq!(f.speed_unit(), "mph");
        assert_eq!(f.temp_unit(), "°F");
        assert!(f.coords().is_none());
        assert!(f.list().is_empty());
    }

    #[test]
    fn measurement_system_is_case_insensitive() {
        let mut f = Forecast::new();
        let outcome = f.set_measurement_system("METRIC");
        assert_eq!(outcome, UnitsOutcome::Accepted(MeasurementSystem::Metric));
        assert_eq!(f.speed_unit(), "m/s");
        assert_eq!(f.temp_unit(), "°C");
    }

    #[test]
    fn bogus_measurement_system_is_rejected_and_ignored() {
        let mut f = Forecast::new();
        let _ = f.set_measurement_system("metric");

        let outcome = f.set_measurement_system("bogus");
        assert!(!outcome.is_accepted());
        assert_eq!(
            outcome,
            UnitsOutcome::Rejected {
                value: "bogus".into()
            }
        );
        assert_eq!(f.measurement_system(), MeasurementSystem::Metric);
    }

    #[test]
    fn format_temp_truncates() {
        let mut f = Forecast::new();
        assert_eq!(f.format_temp(72.9), "72 °F");
        assert_eq!(f.format_temp(-3.7), "-3 °F");

        let _ = f.set_measurement_system("metric");
        assert_eq!(f.format_temp(21.99), "21 °C");
    }

    #[test]
    fn clear_list_empties_records() {
        let mut f = Forecast::new();
        for i in 0..5 {
            f.add_to_list(record(1_700_000_000 + i * 86_400, 60.0));
        }
        assert_eq!(f.list().len(), 5);

        f.clear_list();
        assert_eq!(f.list().len(), 0);
    }

    #[test]
    fn out_of_range_index_is_absent() {
        let mut f = Forecast::new();
        f.add_to_list(record(1_700_000_000, 60.0));
        assert!(f.weather(0).is_some());
        assert!(f.weather(7).is_none());
        assert!(f.daily_view(7).is_none());
    }

    #[test]
    fn coords_are_set_together() {
        let mut f = Forecast::new();
        f.set_coords(Coordinates::new(48.85, 2.35));
        assert_eq!(f.coords(), Some(Coordinates::new(48.85, 2.35)));
    }

    #[test]
    fn daily_view_combines_record_and_identity() {
        let mut f = Forecast::new();
        f.set_city("Paris");
        f.set_country("FR");
        let _ = f.set_measurement_system("metric");
        // Noon UTC so the local date is the same in any reasonable zone.
        f.add_to_list(record(1_709_812_800, 12.6));

        let view = f.daily_view(0).unwrap();
        assert_eq!(view.temperature, "12 °C");
        assert_eq!(view.description, "Broken Clouds");
        assert_eq!(view.location, "Paris, FR");
        assert_eq!(view.icon_url, "http://openweathermap.org/img/wn/04d@2x.png");
        assert_eq!(view.cloudiness_pct, 75);
        assert_eq!(view.humidity_pct, 60);
        assert_eq!(view.wind_speed, "4.5 m/s");
        assert_eq!(view.date_text, "Mar 7, 2024");
        assert_eq!(view.day_name, "Thursday");
    }

    #[test]
    fn day_summaries_label_each_day() {
        let mut f = Forecast::new();
        f.add_to_list(record(1_709_812_800, 72.9));
        f.add_to_list(record(1_709_899_200, 68.1));

        let days = f.day_summaries();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_name, "Thu");
        assert_eq!(days[0].label, "Thursday 72 °F");
        assert_eq!(days[1].day, 1);
        assert_eq!(days[1].temperature, "68 °F");
    }
}
