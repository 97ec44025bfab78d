use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    config::Endpoints,
    error::{LookupError, truncate_body},
    forecast::{DAYS_FORECASTED, MeasurementSystem},
    model::{Coordinates, DailyRecord, ForecastBundle, GeocodedLocation, LocationQuery},
};

use super::{ForecastClient, GeocodingClient};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the OpenWeather `forecast` (used for geocoding) and `onecall` endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoints(api_key, Endpoints::default())
    }

    /// Point the client somewhere other than the public API, e.g. a mock server.
    pub fn with_endpoints(api_key: String, endpoints: Endpoints) -> Self {
        Self {
            api_key,
            endpoints,
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, LookupError> {
        tracing::debug!(endpoint, url, "sending request");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|source| LookupError::Http { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| LookupError::Http { endpoint, source })?;

        if !status.is_success() {
            return Err(LookupError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| LookupError::Parse { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    coord: Option<OwCoord>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwGeocodeResponse {
    city: Option<OwCity>,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    current: Option<DailyRecord>,
    #[serde(default)]
    daily: Vec<DailyRecord>,
}

#[async_trait]
impl GeocodingClient for OpenWeatherClient {
    async fn geocode(&self, query: &LocationQuery) -> Result<GeocodedLocation, LookupError> {
        const ENDPOINT: &str = "geocode";

        let parsed: OwGeocodeResponse = self
            .get_json(
                ENDPOINT,
                &self.endpoints.geocode,
                &[("q", query.q()), ("cnt", "1".to_string())],
            )
            .await?;

        let city = parsed.city.ok_or(LookupError::MissingField {
            endpoint: ENDPOINT,
            field: "city",
        })?;
        let coord = city.coord.ok_or(LookupError::MissingField {
            endpoint: ENDPOINT,
            field: "city.coord",
        })?;

        let country = city.country.filter(|c| !c.trim().is_empty());

        tracing::info!(
            q = %query.q(),
            lat = coord.lat,
            lon = coord.lon,
            country = country.as_deref().unwrap_or(""),
            "resolved location"
        );

        Ok(GeocodedLocation {
            coords: Coordinates::new(coord.lat, coord.lon),
            country,
        })
    }
}

#[async_trait]
impl ForecastClient for OpenWeatherClient {
    async fn forecast(
        &self,
        coords: Coordinates,
        units: MeasurementSystem,
    ) -> Result<ForecastBundle, LookupError> {
        const ENDPOINT: &str = "onecall";

        let parsed: OwOneCallResponse = self
            .get_json(
                ENDPOINT,
                &self.endpoints.onecall,
                &[
                    ("lat", coords.latitude.to_string()),
                    ("lon", coords.longitude.to_string()),
                    ("exclude", "minutely,hourly,alerts".to_string()),
                    ("units", units.as_str().to_string()),
                ],
            )
            .await?;

        let current = parsed.current.ok_or(LookupError::MissingField {
            endpoint: ENDPOINT,
            field: "current",
        })?;

        if parsed.daily.len() < DAYS_FORECASTED {
            return Err(LookupError::MissingField {
                endpoint: ENDPOINT,
                field: "daily",
            });
        }

        Ok(ForecastBundle {
            current,
            daily: parsed.daily,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocode_response_tolerates_missing_coord() {
        let parsed: OwGeocodeResponse =
            serde_json::from_str(r#"{"cod":"200","city":{"name":"Nowhere"}}"#).unwrap();
        let city = parsed.city.unwrap();
        assert!(city.coord.is_none());
        assert!(city.country.is_none());
    }

    #[test]
    fn onecall_response_parses_current_and_daily() {
        let raw = r#"{
            "current": {"dt": 1709812800, "temp": 55.4, "clouds": 20, "humidity": 81,
                        "wind_speed": 6.2, "weather": [{"icon": "02d", "description": "few clouds"}]},
            "daily": [
                {"dt": 1709812800, "temp": {"day": 56.0, "min": 44.1}, "clouds": 20, "humidity": 70,
                 "wind_speed": 7.0, "weather": [{"icon": "02d", "description": "few clouds"}]}
            ]
        }"#;
        let parsed: OwOneCallResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.current.unwrap().temp.value(), 55.4);
        assert_eq!(parsed.daily[0].temp.value(), 56.0);
    }
}
