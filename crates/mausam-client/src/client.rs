//! OpenWeatherMap REST client

use crate::wire;
use mausam_core::{
    Coordinates, CurrentConditions, Forecast, Geocoder, Location, SourceError, UnitSystem,
    WeatherSource,
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Geocoding matches requested per search
pub const SEARCH_LIMIT: u8 = 5;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Weather and geocoding client for the OpenWeatherMap API
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(settings: ClientSettings) -> Result<Self, SourceError> {
        if settings.api_key.trim().is_empty() {
            return Err(SourceError::Config("missing API key".into()));
        }
        Url::parse(&settings.base_url)
            .map_err(|e| SourceError::Config(format!("invalid base url: {e}")))?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_key: settings.api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, SourceError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| SourceError::Config(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            for (k, v) in params {
                query.append_pair(k, v);
            }
            query.append_pair("appid", &self.api_key);
        }
        Ok(url)
    }

    /// GET the URL and return the body of a successful response
    async fn get(&self, url: Url) -> Result<String, SourceError> {
        let path = url.path().to_string();
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = wire::error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();
            warn!(%path, status = status.as_u16(), %message, "weather api request failed");
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!(%path, bytes = body.len(), "weather api response");
        Ok(body)
    }

    fn weather_params(coords: Coordinates, units: UnitSystem) -> [(&'static str, String); 3] {
        [
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
            ("units", units.as_str().to_string()),
        ]
    }
}

#[async_trait::async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current(
        &self,
        coords: Coordinates,
        units: UnitSystem,
    ) -> Result<CurrentConditions, SourceError> {
        let url = self.url("/data/2.5/weather", &Self::weather_params(coords, units))?;
        let body = self.get(url).await?;
        wire::parse_current(&body)
    }

    #[instrument(skip(self))]
    async fn forecast(
        &self,
        coords: Coordinates,
        units: UnitSystem,
    ) -> Result<Forecast, SourceError> {
        let url = self.url("/data/2.5/forecast", &Self::weather_params(coords, units))?;
        let body = self.get(url).await?;
        let forecast = wire::parse_forecast(&body)?;
        debug!(samples = forecast.samples.len(), "forecast decoded");
        Ok(forecast)
    }
}

#[async_trait::async_trait]
impl Geocoder for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Location>, SourceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.url(
            "/geo/1.0/direct",
            &[("q", query.to_string()), ("limit", SEARCH_LIMIT.to_string())],
        )?;
        let body = self.get(url).await?;
        wire::parse_locations(&body)
    }

    #[instrument(skip(self))]
    async fn reverse(&self, coords: Coordinates) -> Result<Option<Location>, SourceError> {
        let url = self.url(
            "/geo/1.0/reverse",
            &[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("limit", "1".to_string()),
            ],
        )?;
        let body = self.get(url).await?;
        Ok(wire::parse_locations(&body)?.into_iter().next())
    }
}
