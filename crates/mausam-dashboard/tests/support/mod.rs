#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use mausam_core::{
    Coordinates, CurrentConditions, Forecast, Geocoder, Location, LocationError,
    LocationProvider, SourceError, UnitSystem, WeatherSample, WeatherSource,
};
use mausam_dashboard::{AppState, DashboardSettings, FixedPosition, Services};

// 2024-03-01T00:00:00Z
pub const DAY1: i64 = 1_709_251_200;

/// Weather source with switchable failure that records requested units
#[derive(Default)]
pub struct StubWeather {
    pub failing: AtomicBool,
    pub calls: AtomicUsize,
    pub units: Mutex<Vec<UnitSystem>>,
}

impl StubWeather {
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self, units: UnitSystem) -> Result<(), SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.units.lock() {
            seen.push(units);
        }
        if self.failing.load(Ordering::SeqCst) {
            Err(SourceError::Status {
                status: 503,
                message: "Service Unavailable".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl WeatherSource for StubWeather {
    async fn current(
        &self,
        _coords: Coordinates,
        units: UnitSystem,
    ) -> Result<CurrentConditions, SourceError> {
        self.check(units)?;
        Ok(CurrentConditions {
            place: "New York".into(),
            country: "US".into(),
            temperature: 21.4,
            feels_like: 20.6,
            temperature_min: 18.0,
            temperature_max: 24.0,
            humidity: 55,
            pressure: 1016.0,
            visibility: 10_000.0,
            wind_speed: 3.6,
            wind_deg: 90.0,
            condition_code: 800,
            description: "clear sky".into(),
            icon: "01d".into(),
            sunrise: DAY1 + 11 * 3_600,
            sunset: DAY1 + 23 * 3_600,
            observed_at: DAY1 + 15 * 3_600,
            utc_offset_seconds: -18_000,
        })
    }

    async fn forecast(
        &self,
        _coords: Coordinates,
        units: UnitSystem,
    ) -> Result<Forecast, SourceError> {
        self.check(units)?;
        // three-hourly samples over seven days
        let samples = (0..56)
            .map(|i| WeatherSample {
                timestamp: DAY1 + i * 3 * 3_600,
                temperature: 10.0 + (i % 8) as f64,
                condition_code: if i % 8 < 4 { 800 } else { 500 },
                description: if i % 8 < 4 { "clear sky" } else { "light rain" }.into(),
                icon: if i % 8 < 4 { "01d" } else { "10n" }.into(),
            })
            .collect();
        Ok(Forecast {
            place: "New York".into(),
            country: "US".into(),
            utc_offset_seconds: -18_000,
            samples,
        })
    }
}

/// Geocoder with canned answers that counts search calls
#[derive(Default)]
pub struct StubGeocoder {
    pub searches: AtomicUsize,
    pub failing: AtomicBool,
}

pub fn london() -> Location {
    Location {
        name: "London".into(),
        country: "GB".into(),
        state: Some("England".into()),
        lat: 51.5073,
        lon: -0.1276,
    }
}

#[async_trait::async_trait]
impl Geocoder for StubGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<Location>, SourceError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Transport("connection refused".into()));
        }
        if query.eq_ignore_ascii_case("london") {
            Ok(vec![london()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<Location>, SourceError> {
        if coords.lat > 50.0 {
            Ok(Some(london()))
        } else {
            Ok(None)
        }
    }
}

/// Location provider that answers with a fixed point after a delay
pub struct SlowLocator {
    pub delay: Duration,
    pub coords: Coordinates,
}

#[async_trait::async_trait]
impl LocationProvider for SlowLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.coords)
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub weather: Arc<StubWeather>,
    pub geocoder: Arc<StubGeocoder>,
}

pub fn test_app() -> TestApp {
    test_app_with_locator(Arc::new(FixedPosition(Coordinates::new(40.7128, -74.006))))
}

pub fn test_app_with_locator(locator: Arc<dyn LocationProvider>) -> TestApp {
    let weather = Arc::new(StubWeather::default());
    let geocoder = Arc::new(StubGeocoder::default());
    let services = Services {
        weather: weather.clone(),
        geocoder: geocoder.clone(),
        locator,
    };
    let settings = DashboardSettings {
        units: UnitSystem::Metric,
        forecast_days: 5,
        locate_timeout: Duration::from_secs(1),
    };
    let (router, state) = mausam_dashboard::build_app(services, settings).unwrap();
    TestApp {
        router,
        state,
        weather,
        geocoder,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body(res: Response<Body>) -> serde_json::Value {
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
