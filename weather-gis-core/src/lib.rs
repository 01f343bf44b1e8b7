//! Core library for the `weather-gis` dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - The remote API client and the traits it implements
//! - Parallel fetch orchestration and the application-state controller
//! - Location resolution against a built-in table of Vietnamese places
//! - Pure derivations: weather classification, chart geometry, gauges, map tiles
//!
//! It is used by `weather-gis-cli`, but can also be reused by other front-ends.

pub mod app;
pub mod chart;
pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gauge;
pub mod location;
pub mod map;
pub mod model;
pub mod provider;
pub mod summary;

pub use app::{AppState, Dashboard, Screen};
pub use config::Config;
pub use error::{ApiError, ResolveError};
pub use model::{Coordinate, LocationRecord, ViewModel};
pub use provider::{Geocoder, WeatherSource, backend::BackendClient};
