//! Display labels derived from dashboard state

use crate::state::{DashboardState, Phase, Snapshot, Target};
use chrono::{FixedOffset, Offset, Utc};
use mausam_core::{
    background, format_degrees, format_long_date, format_temperature, format_time,
    format_weekday, icon_name, is_daytime, visibility_label, wind_direction, Background,
    ConditionCode, DailySummary, UnitSystem,
};
use serde::Serialize;

pub const APP_NAME: &str = "Mausam";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Idle,
    Loading,
    Error,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub place: String,
    pub country: String,
    pub date: String,
    pub unit_symbol: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentCard {
    pub temperature: String,
    pub feels_like: String,
    pub description: String,
    pub icon: &'static str,
    pub provider_icon: String,
    pub condition_code: ConditionCode,
    pub high: String,
    pub low: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub visibility: String,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    /// ISO date of the UTC bucket
    pub date: String,
    pub weekday: String,
    pub icon: &'static str,
    pub provider_icon: String,
    pub description: String,
    pub condition_code: ConditionCode,
    pub high: String,
    pub low: String,
}

/// Everything the page renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub units: UnitSystem,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Target>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentCard>,
    pub forecast: Vec<ForecastCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
}

impl DashboardView {
    pub fn from_state(state: &DashboardState) -> Self {
        let mut view = DashboardView {
            title: APP_NAME.to_string(),
            units: state.units,
            status: Status::Idle,
            error: None,
            location: state.target.clone(),
            header: None,
            current: None,
            forecast: Vec::new(),
            background: None,
        };

        match &state.phase {
            Phase::Idle => {}
            Phase::Loading => view.status = Status::Loading,
            Phase::Failed { message } => {
                view.status = Status::Error;
                view.error = Some(message.clone());
            }
            Phase::Ready(snapshot) => {
                view.status = Status::Ready;
                view.fill(snapshot);
            }
        }
        view
    }

    fn fill(&mut self, snapshot: &Snapshot) {
        let current = &snapshot.current;
        let units = snapshot.units;
        let offset = FixedOffset::east_opt(current.utc_offset_seconds).unwrap_or_else(|| Utc.fix());

        self.title = format!("{} | {}", APP_NAME, current.place);
        self.units = units;
        self.header = Some(Header {
            place: current.place.clone(),
            country: current.country.clone(),
            date: format_long_date(current.observed_at, offset),
            unit_symbol: units.temperature_symbol(),
        });
        self.current = Some(CurrentCard {
            temperature: format_temperature(current.temperature, units),
            feels_like: format_temperature(current.feels_like, units),
            description: current.description.clone(),
            icon: icon_name(current.condition_code),
            provider_icon: current.icon.clone(),
            condition_code: current.condition_code,
            high: format_degrees(current.temperature_max),
            low: format_degrees(current.temperature_min),
            humidity: format!("{}%", current.humidity),
            wind: format!(
                "{} {} {}",
                current.wind_speed.round(),
                units.speed_label(),
                wind_direction(current.wind_deg)
            ),
            pressure: format!("{} hPa", current.pressure.round()),
            visibility: format!(
                "{:.1} km ({})",
                current.visibility / 1_000.0,
                visibility_label(current.visibility)
            ),
            sunrise: format_time(current.sunrise, offset),
            sunset: format_time(current.sunset, offset),
        });
        self.forecast = snapshot.daily.iter().map(forecast_card).collect();
        self.background = Some(background(
            current.condition_code,
            is_daytime(current.sunrise, current.sunset, current.observed_at),
        ));
    }
}

// Buckets are UTC dates, so weekday labels are too.
fn forecast_card(summary: &DailySummary) -> ForecastCard {
    ForecastCard {
        date: summary.date.to_string(),
        weekday: format_weekday(summary.representative_timestamp, Utc.fix()),
        icon: icon_name(summary.representative_condition),
        provider_icon: summary.representative_icon.clone(),
        description: summary.representative_description.clone(),
        condition_code: summary.representative_condition,
        high: format_degrees(summary.temperature_max),
        low: format_degrees(summary.temperature_min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mausam_core::{CurrentConditions, Location, Precipitation, Scene};

    // 2024-03-01T15:05:00Z
    const NOW: i64 = 1_709_305_500;

    fn snapshot(units: UnitSystem) -> Snapshot {
        Snapshot {
            units,
            current: CurrentConditions {
                place: "London".into(),
                country: "GB".into(),
                temperature: 9.6,
                feels_like: 7.2,
                temperature_min: 8.1,
                temperature_max: 11.4,
                humidity: 81,
                pressure: 1012.0,
                visibility: 8_500.0,
                wind_speed: 4.4,
                wind_deg: 225.0,
                condition_code: 500,
                description: "light rain".into(),
                icon: "10d".into(),
                sunrise: NOW - 8 * 3_600,
                sunset: NOW + 3 * 3_600,
                observed_at: NOW,
                utc_offset_seconds: 0,
            },
            daily: vec![DailySummary {
                date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                temperature_min: 4.4,
                temperature_max: 10.6,
                representative_condition: 803,
                representative_description: "broken clouds".into(),
                representative_icon: "04d".into(),
                representative_timestamp: NOW + 9 * 3_600 + 55 * 60,
            }],
        }
    }

    fn ready(units: UnitSystem) -> DashboardState {
        DashboardState {
            units,
            target: Some(Target::Place(Location {
                name: "London".into(),
                country: "GB".into(),
                state: None,
                lat: 51.5,
                lon: -0.12,
            })),
            phase: Phase::Ready(Box::new(snapshot(units))),
            request: 1,
        }
    }

    #[test]
    fn test_idle_view() {
        let view = DashboardView::from_state(&DashboardState::default());
        assert_eq!(view.title, "Mausam");
        assert_eq!(view.status, Status::Idle);
        assert!(view.current.is_none());
        assert!(view.forecast.is_empty());
    }

    #[test]
    fn test_failed_view_keeps_no_snapshot() {
        let state = DashboardState {
            phase: Phase::Failed {
                message: "Failed to load weather data. 401 Invalid API key".into(),
            },
            ..Default::default()
        };
        let view = DashboardView::from_state(&state);
        assert_eq!(view.status, Status::Error);
        assert_eq!(
            view.error.as_deref(),
            Some("Failed to load weather data. 401 Invalid API key")
        );
        assert!(view.header.is_none());
        assert!(view.background.is_none());
    }

    #[test]
    fn test_ready_view_labels() {
        let view = DashboardView::from_state(&ready(UnitSystem::Metric));
        assert_eq!(view.title, "Mausam | London");

        let header = view.header.unwrap();
        assert_eq!(header.date, "Friday, March 1, 2024");
        assert_eq!(header.unit_symbol, "°C");

        let current = view.current.unwrap();
        assert_eq!(current.temperature, "10°C");
        assert_eq!(current.feels_like, "7°C");
        assert_eq!(current.high, "11°");
        assert_eq!(current.low, "8°");
        assert_eq!(current.icon, "cloud-rain");
        assert_eq!(current.humidity, "81%");
        assert_eq!(current.wind, "4 m/s SW");
        assert_eq!(current.pressure, "1012 hPa");
        assert_eq!(current.visibility, "8.5 km (Good)");
        assert_eq!(current.sunset, "6:05 PM");
    }

    #[test]
    fn test_forecast_cards() {
        let view = DashboardView::from_state(&ready(UnitSystem::Metric));
        assert_eq!(view.forecast.len(), 1);
        let card = &view.forecast[0];
        assert_eq!(card.date, "2024-03-02");
        assert_eq!(card.weekday, "Sat");
        assert_eq!(card.icon, "clouds");
        assert_eq!(card.high, "11°");
        assert_eq!(card.low, "4°");
    }

    #[test]
    fn test_imperial_labels() {
        let view = DashboardView::from_state(&ready(UnitSystem::Imperial));
        let current = view.current.unwrap();
        assert!(current.temperature.ends_with("°F"));
        assert!(current.wind.contains("mph"));
    }

    #[test]
    fn test_background_follows_condition() {
        let view = DashboardView::from_state(&ready(UnitSystem::Metric));
        let bg = view.background.unwrap();
        assert_eq!(bg.scene, Scene::Rain);
        assert_eq!(bg.effect, Some(Precipitation::Rain));
    }
}
