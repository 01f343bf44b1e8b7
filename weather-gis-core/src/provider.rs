use crate::{
    Config,
    error::ApiError,
    model::{Coordinate, CurrentConditions, DailySeries, HourlySeries},
    provider::backend::BackendClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod backend;

/// The remote API's read-only endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Predict,
    Daily,
    Geocode,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Predict => "predict",
            Endpoint::Daily => "daily",
            Endpoint::Geocode => "geocode",
        }
    }

    pub const fn all() -> &'static [Endpoint] {
        &[Endpoint::Current, Endpoint::Predict, Endpoint::Daily, Endpoint::Geocode]
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A place returned by the geocoding endpoint. Coordinates may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeHit {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Source of the three weather slices for a coordinate.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, at: Coordinate) -> Result<CurrentConditions, ApiError>;
    async fn predict(&self, at: Coordinate) -> Result<HourlySeries, ApiError>;
    async fn daily(&self, at: Coordinate) -> Result<DailySeries, ApiError>;
}

/// Free-text place lookup. `Ok(None)` means the service answered but found nothing.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeHit>, ApiError>;
}

/// Construct the backend client from config.
pub fn client_from_config(config: &Config) -> BackendClient {
    BackendClient::new(&config.api)
}
