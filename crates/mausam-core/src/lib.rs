//! Core data types, units, and daily forecast aggregation for Mausam
//!
//! This crate provides the fundamental data structures and pure operations
//! for weather dashboard processing, plus the async seams that data
//! collaborators (weather API, geocoder, device location) implement.

pub mod conditions;
pub mod daily;
pub mod source;
pub mod types;
pub mod units;

pub use conditions::*;
pub use daily::*;
pub use source::*;
pub use types::*;
pub use units::*;
