//! Effect runners: the I/O behind each reducer effect

use crate::state::{Snapshot, Target};
use chrono::{FixedOffset, Offset, Utc};
use mausam_core::{
    Coordinates, DailyAggregator, Geocoder, LocationError, LocationProvider, SourceError,
    UnitSystem, WeatherSource,
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Place offset for midday selection; offsets outside ±24h fall back to UTC
fn place_offset(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

/// Fetch current conditions and forecast together. Either failure fails
/// the whole load; no partial snapshot is produced.
pub async fn load_snapshot(
    source: &dyn WeatherSource,
    coords: Coordinates,
    units: UnitSystem,
    forecast_days: usize,
) -> Result<Snapshot, SourceError> {
    let (current, forecast) = tokio::try_join!(
        source.current(coords, units),
        source.forecast(coords, units)
    )?;

    let daily = DailyAggregator::new(forecast_days)
        .with_utc_offset(place_offset(forecast.utc_offset_seconds))
        .aggregate(&forecast.samples);

    info!(
        place = %current.place,
        samples = forecast.samples.len(),
        days = daily.len(),
        "weather loaded"
    );

    Ok(Snapshot {
        units,
        current,
        daily,
    })
}

/// Name device coordinates; lookup failures keep the raw coordinates.
pub async fn resolve_place(geocoder: &dyn Geocoder, coords: Coordinates) -> Target {
    match geocoder.reverse(coords).await {
        Ok(Some(location)) => Target::Place(location),
        Ok(None) => {
            debug!(lat = coords.lat, lon = coords.lon, "no place at coordinates");
            Target::Coordinates(coords)
        }
        Err(e) => {
            warn!(error = %e, "reverse geocoding failed, using coordinates");
            Target::Coordinates(coords)
        }
    }
}

/// Ask the provider for a position, giving up after `timeout`
pub async fn locate_with_timeout(
    provider: &dyn LocationProvider,
    timeout: Duration,
) -> Result<Coordinates, LocationError> {
    match tokio::time::timeout(timeout, provider.locate()).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    }
}

/// Position provider that always answers with a configured point
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait::async_trait]
impl LocationProvider for FixedPosition {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}
