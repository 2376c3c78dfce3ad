use mausam_core::{Location, UnitSystem, DEFAULT_FORECAST_DAYS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOCATE_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    pub key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HttpConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    pub units: Option<UnitSystem>,
    pub forecast_days: Option<usize>,
    pub locate_timeout_secs: Option<u64>,
    pub default_location: Option<Location>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub api: Option<ApiConfig>,
    pub http: Option<HttpConfig>,
    pub dashboard: Option<DashboardConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from MAUSAM_CONFIG path (TOML) if present, with reasonable defaults.
    /// MAUSAM_API_KEY overrides `api.key`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MAUSAM_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = Self::from_path(&path)?;
        if let Ok(key) = std::env::var("MAUSAM_API_KEY") {
            cfg.api.get_or_insert_with(ApiConfig::default).key = Some(key);
        }
        Ok(cfg)
    }

    /// Parse the TOML file at `path`; a missing file yields the defaults
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let s = fs::read_to_string(path)?;
        Ok(toml::from_str::<AppConfig>(&s)?)
    }

    /// Get HTTP bind address (default 0.0.0.0:8080)
    pub fn http_bind(&self) -> String {
        self.http
            .as_ref()
            .and_then(|h| h.bind.clone())
            .unwrap_or_else(|| DEFAULT_HTTP_BIND.to_string())
    }

    pub fn api_key(&self) -> Option<String> {
        self.api
            .as_ref()
            .and_then(|a| a.key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn api_base_url(&self) -> String {
        self.api
            .as_ref()
            .and_then(|a| a.base_url.clone())
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn api_timeout_secs(&self) -> u64 {
        self.api
            .as_ref()
            .and_then(|a| a.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn units(&self) -> UnitSystem {
        self.dashboard
            .as_ref()
            .and_then(|d| d.units)
            .unwrap_or_default()
    }

    /// Number of daily summaries kept (default 5, never below 1)
    pub fn forecast_days(&self) -> usize {
        self.dashboard
            .as_ref()
            .and_then(|d| d.forecast_days)
            .unwrap_or(DEFAULT_FORECAST_DAYS)
            .max(1)
    }

    pub fn locate_timeout_secs(&self) -> u64 {
        self.dashboard
            .as_ref()
            .and_then(|d| d.locate_timeout_secs)
            .unwrap_or(DEFAULT_LOCATE_TIMEOUT_SECS)
    }

    /// Place shown before the user picks one (default New York)
    pub fn default_location(&self) -> Location {
        self.dashboard
            .as_ref()
            .and_then(|d| d.default_location.clone())
            .unwrap_or_else(|| Location {
                name: "New York".to_string(),
                country: "US".to_string(),
                state: Some("New York".to_string()),
                lat: 40.7128,
                lon: -74.0060,
            })
    }
}
