//! OpenWeatherMap collaborator
//!
//! Implements the [`WeatherSource`](mausam_core::WeatherSource) and
//! [`Geocoder`](mausam_core::Geocoder) seams over the OpenWeatherMap REST API.
//! Responses are validated against explicit schemas, so a malformed payload
//! surfaces as [`SourceError::Parse`](mausam_core::SourceError::Parse) rather
//! than a transport failure.

pub mod client;
mod wire;

pub use client::*;
