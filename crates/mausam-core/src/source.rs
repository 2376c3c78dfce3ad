//! Async seams for the data collaborators the dashboard depends on

use crate::types::{Coordinates, CurrentConditions, Forecast, Location};
use crate::units::UnitSystem;

/// Failure talking to a remote data source
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SourceError {
    /// Source unreachable or the request did not complete
    #[error("Request failed: {0}")]
    Transport(String),

    /// Source answered with a non-success status
    #[error("{status} {message}")]
    Status { status: u16, message: String },

    /// Response did not match the expected schema
    #[error("Invalid response: {0}")]
    Parse(String),

    #[error("Source misconfigured: {0}")]
    Config(String),
}

/// Failure obtaining the device position
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable")]
    Unavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error")]
    Unknown,
}

impl LocationError {
    /// Classify a browser geolocation error code (1 denied, 2 unavailable, 3 timeout)
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::Unavailable,
            3 => Self::Timeout,
            _ => Self::Unknown,
        }
    }

    /// Message shown to the user, suggesting a fallback where one exists
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Please allow location access in your browser settings.",
            Self::Unavailable => "Location information is unavailable.",
            Self::Timeout => "The request to get your location timed out.",
            Self::Unknown => "Please search for a city.",
        }
    }
}

/// Current conditions and forecast provider
#[async_trait::async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(
        &self,
        coords: Coordinates,
        units: UnitSystem,
    ) -> Result<CurrentConditions, SourceError>;

    async fn forecast(&self, coords: Coordinates, units: UnitSystem)
        -> Result<Forecast, SourceError>;
}

/// Place name lookup
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Places matching a free-text query; no match is an empty list
    async fn search(&self, query: &str) -> Result<Vec<Location>, SourceError>;

    /// Place at the given coordinates, if any
    async fn reverse(&self, coords: Coordinates) -> Result<Option<Location>, SourceError>;
}

/// Device position provider
#[async_trait::async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<Coordinates, LocationError>);

    #[async_trait::async_trait]
    impl LocationProvider for Fixed {
        async fn locate(&self) -> Result<Coordinates, LocationError> {
            self.0
        }
    }

    #[test]
    fn test_location_error_codes() {
        assert_eq!(LocationError::from_code(1), LocationError::PermissionDenied);
        assert_eq!(LocationError::from_code(2), LocationError::Unavailable);
        assert_eq!(LocationError::from_code(3), LocationError::Timeout);
        assert_eq!(LocationError::from_code(0), LocationError::Unknown);
        assert_eq!(LocationError::from_code(99), LocationError::Unknown);
    }

    #[test]
    fn test_location_messages_are_distinct() {
        let all = [
            LocationError::PermissionDenied,
            LocationError::Unavailable,
            LocationError::Timeout,
            LocationError::Unknown,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.user_message(), b.user_message());
            }
        }
    }

    #[test]
    fn test_status_error_display() {
        let err = SourceError::Status {
            status: 401,
            message: "Invalid API key".into(),
        };
        assert_eq!(err.to_string(), "401 Invalid API key");
    }

    #[tokio::test]
    async fn test_provider_trait_object() {
        let provider: Box<dyn LocationProvider> =
            Box::new(Fixed(Err(LocationError::Unavailable)));
        assert_eq!(provider.locate().await, Err(LocationError::Unavailable));

        let provider: Box<dyn LocationProvider> = Box::new(Fixed(Ok(Coordinates::new(1.0, 2.0))));
        assert_eq!(provider.locate().await, Ok(Coordinates::new(1.0, 2.0)));
    }
}
