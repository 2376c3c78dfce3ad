//! Core data types for forecast samples, daily summaries, and places

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Timestamp type (Unix epoch seconds, UTC)
pub type Timestamp = i64;

/// Provider condition code (OpenWeatherMap `weather[0].id`)
pub type ConditionCode = i32;

/// One sub-daily forecast reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSample {
    /// Unix timestamp of the reading
    pub timestamp: Timestamp,

    /// Temperature in the unit system the data was requested in
    pub temperature: f64,

    /// Condition classification of the reading
    pub condition_code: ConditionCode,

    /// Provider description for the condition at this reading
    pub description: String,

    /// Provider icon identifier (e.g. "10d")
    pub icon: String,
}

/// Aggregated view of one calendar date of samples
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    /// UTC calendar date of the bucket
    pub date: NaiveDate,

    pub temperature_min: f64,
    pub temperature_max: f64,

    /// Most frequent condition code of the day
    pub representative_condition: ConditionCode,

    /// Description of the midday-preferring representative sample
    pub representative_description: String,

    /// Icon of the midday-preferring representative sample
    pub representative_icon: String,

    /// Timestamp of the first sample of the day
    pub representative_timestamp: Timestamp,
}

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A named place resolved by the geocoder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }

    /// "Name, Country" display label
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Current observed conditions at a place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    /// Reporting place name and country code
    pub place: String,
    pub country: String,

    pub temperature: f64,
    pub feels_like: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,

    /// Relative humidity (%)
    pub humidity: u8,

    /// Sea-level pressure (hPa)
    pub pressure: f64,

    /// Visibility (meters)
    pub visibility: f64,

    pub wind_speed: f64,
    pub wind_deg: f64,

    pub condition_code: ConditionCode,
    pub description: String,
    pub icon: String,

    pub sunrise: Timestamp,
    pub sunset: Timestamp,
    pub observed_at: Timestamp,

    /// Place offset from UTC in seconds
    #[serde(default)]
    pub utc_offset_seconds: i32,
}

/// Raw multi-day forecast for a place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    pub place: String,
    pub country: String,

    /// Place offset from UTC in seconds
    pub utc_offset_seconds: i32,

    /// Sub-daily samples in provider order
    pub samples: Vec<WeatherSample>,
}
