//! Unit systems, conversions, and display labels

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit system error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("Unknown unit system: {0}")]
    UnknownUnitSystem(String),
}

/// Unit system requested from the weather API and used for labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn toggle(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    /// Query parameter value understood by the weather API
    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(UnitSystem::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(UnitSystem::Imperial),
            other => Err(UnitError::UnknownUnitSystem(other.to_string())),
        }
    }
}

pub fn celsius_to_fahrenheit(value: f64) -> f64 {
    value * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(value: f64) -> f64 {
    (value - 32.0) * 5.0 / 9.0
}

/// Convert a temperature between unit systems
pub fn convert_temperature(value: f64, from: UnitSystem, to: UnitSystem) -> f64 {
    match (from, to) {
        (UnitSystem::Metric, UnitSystem::Imperial) => celsius_to_fahrenheit(value),
        (UnitSystem::Imperial, UnitSystem::Metric) => fahrenheit_to_celsius(value),
        _ => value,
    }
}

/// Rounded temperature with unit symbol, e.g. "21°C"
pub fn format_temperature(value: f64, units: UnitSystem) -> String {
    format!("{}{}", value.round() as i64, units.temperature_symbol())
}

/// Rounded temperature without the unit letter, e.g. "21°"
pub fn format_degrees(value: f64) -> String {
    format!("{}°", value.round() as i64)
}

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// 8-point compass direction for a bearing in degrees
pub fn wind_direction(degrees: f64) -> &'static str {
    let index = (degrees / 45.0).round().rem_euclid(8.0) as usize;
    COMPASS[index % COMPASS.len()]
}

/// Qualitative label for a visibility distance in meters
pub fn visibility_label(meters: f64) -> &'static str {
    let km = meters / 1000.0;
    if km < 1.0 {
        "Poor"
    } else if km < 4.0 {
        "Moderate"
    } else if km < 10.0 {
        "Good"
    } else {
        "Excellent"
    }
}

fn local_time(timestamp: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .with_timezone(&offset)
}

/// Short date label, e.g. "Fri, Mar 1"
pub fn format_date(timestamp: i64, offset: FixedOffset) -> String {
    local_time(timestamp, offset).format("%a, %b %-d").to_string()
}

/// Long date label, e.g. "Friday, March 1, 2024"
pub fn format_long_date(timestamp: i64, offset: FixedOffset) -> String {
    local_time(timestamp, offset)
        .format("%A, %B %-d, %Y")
        .to_string()
}

/// Short weekday label, e.g. "Fri"
pub fn format_weekday(timestamp: i64, offset: FixedOffset) -> String {
    local_time(timestamp, offset).format("%a").to_string()
}

/// 12-hour clock label, e.g. "3:05 PM"
pub fn format_time(timestamp: i64, offset: FixedOffset) -> String {
    local_time(timestamp, offset).format("%-I:%M %p").to_string()
}
