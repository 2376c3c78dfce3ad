//! Condition code bands, icon names, and decorative backgrounds
//!
//! Codes follow the OpenWeatherMap grouping: 2xx thunderstorm, 3xx drizzle,
//! 5xx rain, 6xx snow, 7xx atmosphere, 800 clear, 80x clouds.

use crate::types::{ConditionCode, Timestamp};
use serde::{Deserialize, Serialize};

/// Broad weather band for a condition code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionBand {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    Clouds,
    Unknown,
}

impl ConditionBand {
    pub fn from_code(code: ConditionCode) -> Self {
        match code {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Atmosphere,
            800 => Self::Clear,
            801.. => Self::Clouds,
            _ => Self::Unknown,
        }
    }
}

/// Icon name for a condition code
pub fn icon_name(code: ConditionCode) -> &'static str {
    match ConditionBand::from_code(code) {
        ConditionBand::Thunderstorm => "cloud-lightning",
        ConditionBand::Drizzle => "cloud-drizzle",
        ConditionBand::Rain => "cloud-rain",
        ConditionBand::Snow => "cloud-snow",
        ConditionBand::Atmosphere => "cloud-fog",
        ConditionBand::Clear => "sun",
        ConditionBand::Clouds => match code {
            801 => "cloud-sun",
            802 => "cloud",
            _ => "clouds",
        },
        ConditionBand::Unknown => "cloud",
    }
}

/// Whether `now` falls between sunrise and sunset (inclusive)
pub fn is_daytime(sunrise: Timestamp, sunset: Timestamp, now: Timestamp) -> bool {
    now >= sunrise && now <= sunset
}

/// Background scene selected from the current condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    Clear,
    Clouds,
    Rain,
    Snow,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Day,
    Night,
}

/// Animated precipitation overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precipitation {
    Rain,
    Snow,
}

/// Decorative background for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    pub scene: Scene,
    pub period: Period,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<Precipitation>,
}

fn is_wet(code: ConditionCode) -> bool {
    matches!(code, 300..=321 | 500..=531)
}

fn is_snowy(code: ConditionCode) -> bool {
    matches!(code, 600..=622)
}

/// Pick the background scene, period, and precipitation effect
pub fn background(code: ConditionCode, is_day: bool) -> Background {
    let scene = match code {
        800 => Scene::Clear,
        801..=804 => Scene::Clouds,
        c if is_wet(c) => Scene::Rain,
        c if is_snowy(c) => Scene::Snow,
        _ => Scene::Default,
    };
    let effect = if is_wet(code) {
        Some(Precipitation::Rain)
    } else if is_snowy(code) {
        Some(Precipitation::Snow)
    } else {
        None
    };
    Background {
        scene,
        period: if is_day { Period::Day } else { Period::Night },
        effect,
    }
}
