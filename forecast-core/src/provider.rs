use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config, LookupError,
    forecast::MeasurementSystem,
    model::{Coordinates, ForecastBundle, GeocodedLocation, LocationQuery},
    provider::openweather::OpenWeatherClient,
};

pub mod openweather;

/// Resolves a free-text location to coordinates.
#[async_trait]
pub trait GeocodingClient: Send + Sync + Debug {
    async fn geocode(&self, query: &LocationQuery) -> Result<GeocodedLocation, LookupError>;
}

/// Fetches current conditions and the daily series for a coordinate pair.
#[async_trait]
pub trait ForecastClient: Send + Sync + Debug {
    async fn forecast(
        &self,
        coords: Coordinates,
        units: MeasurementSystem,
    ) -> Result<ForecastBundle, LookupError>;
}

/// Construct the OpenWeather client from config (API key and endpoints).
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key()?;
    Ok(OpenWeatherClient::with_endpoints(
        api_key.to_owned(),
        config.endpoints.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = client_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn client_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let client = client_from_config(&cfg);
        assert!(client.is_ok());
    }
}
