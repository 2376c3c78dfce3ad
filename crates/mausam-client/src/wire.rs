//! OpenWeatherMap response schemas and their validation into core types

use mausam_core::{CurrentConditions, Forecast, Location, SourceError, WeatherSample};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// OpenWeatherMap reports at most 10 km of visibility
const MAX_VISIBILITY_M: f64 = 10_000.0;

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    id: i32,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
    #[serde(default)]
    humidity: u8,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    #[serde(default)]
    country: String,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: Sys,
    main: MainBlock,
    weather: Vec<Condition>,
    #[serde(default)]
    wind: Wind,
    #[serde(default)]
    visibility: Option<f64>,
    dt: i64,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainBlock,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct City {
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    city: City,
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    state: Option<String>,
    lat: f64,
    lon: f64,
}

impl From<GeoEntry> for Location {
    fn from(entry: GeoEntry) -> Self {
        Location {
            name: entry.name,
            country: entry.country,
            state: entry.state,
            lat: entry.lat,
            lon: entry.lon,
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))
}

fn first_condition(weather: Vec<Condition>, dt: i64) -> Result<Condition, SourceError> {
    weather
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Parse(format!("no weather condition for record at {dt}")))
}

/// Message from an error body, if the body carries one
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

pub(crate) fn parse_current(body: &str) -> Result<CurrentConditions, SourceError> {
    let raw: CurrentResponse = decode(body)?;
    let condition = first_condition(raw.weather, raw.dt)?;
    let temperature = raw.main.temp;

    Ok(CurrentConditions {
        place: raw.name,
        country: raw.sys.country,
        temperature,
        feels_like: raw.main.feels_like.unwrap_or(temperature),
        temperature_min: raw.main.temp_min.unwrap_or(temperature),
        temperature_max: raw.main.temp_max.unwrap_or(temperature),
        humidity: raw.main.humidity,
        pressure: raw.main.pressure,
        visibility: raw.visibility.unwrap_or(MAX_VISIBILITY_M),
        wind_speed: raw.wind.speed,
        wind_deg: raw.wind.deg,
        condition_code: condition.id,
        description: condition.description,
        icon: condition.icon,
        sunrise: raw.sys.sunrise,
        sunset: raw.sys.sunset,
        observed_at: raw.dt,
        utc_offset_seconds: raw.timezone,
    })
}

pub(crate) fn parse_forecast(body: &str) -> Result<Forecast, SourceError> {
    let raw: ForecastResponse = decode(body)?;
    let samples = raw
        .list
        .into_iter()
        .map(|entry| {
            let condition = first_condition(entry.weather, entry.dt)?;
            Ok(WeatherSample {
                timestamp: entry.dt,
                temperature: entry.main.temp,
                condition_code: condition.id,
                description: condition.description,
                icon: condition.icon,
            })
        })
        .collect::<Result<Vec<_>, SourceError>>()?;

    Ok(Forecast {
        place: raw.city.name,
        country: raw.city.country,
        utc_offset_seconds: raw.city.timezone,
        samples,
    })
}

/// Geocoding answers with a bare array; `null` counts as no match.
pub(crate) fn parse_locations(body: &str) -> Result<Vec<Location>, SourceError> {
    let raw: Option<Vec<GeoEntry>> = decode(body)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(Location::from)
        .collect())
}
