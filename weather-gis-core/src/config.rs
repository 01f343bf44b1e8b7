use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    error::InvalidCoordinate,
    map::{DEFAULT_ZOOM, MAX_ZOOM},
    model::{Coordinate, LocationRecord},
    provider::Endpoint,
};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "WEATHER_GIS_API_URL";

pub const DEFAULT_BASE_URL: &str = "https://weatherai-gis.onrender.com";
pub const DEFAULT_LOCATION_NAME: &str = "Thành phố Hồ Chí Minh";
pub const DEFAULT_LATITUDE: f64 = 10.76;
pub const DEFAULT_LONGITUDE: f64 = 106.66;

/// Paths of the backend endpoints, relative to `base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub current: String,
    pub predict: String,
    pub daily: String,
    pub geocode: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            current: "/weather/current".into(),
            predict: "/predict".into(),
            daily: "/weather/daily".into(),
            geocode: "/geocode".into(),
        }
    }
}

impl Endpoints {
    pub fn path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Current => &self.current,
            Endpoint::Predict => &self.predict,
            Endpoint::Daily => &self.daily,
            Endpoint::Geocode => &self.geocode,
        }
    }
}

/// Remote API address.
///
/// Example TOML:
/// [api]
/// base_url = "http://localhost:8000"
/// [api.endpoints]
/// daily = "/api/weather/daily"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub endpoints: Endpoints,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.into(), endpoints: Endpoints::default() }
    }
}

/// Place shown on start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_LOCATION_NAME.into(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

impl LocationConfig {
    pub fn to_record(&self) -> Result<LocationRecord, InvalidCoordinate> {
        Coordinate::new(self.latitude, self.longitude)
            .map(|coordinate| LocationRecord::new(self.name.clone(), coordinate))
    }
}

impl From<&LocationRecord> for LocationConfig {
    fn from(record: &LocationRecord) -> Self {
        Self {
            name: record.name.clone(),
            latitude: record.coordinate.latitude(),
            longitude: record.coordinate.longitude(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Zoom level for the map tile and link.
    pub map_zoom: u8,

    pub api: ApiConfig,

    /// Optional start-up location; Ho Chi Minh City when absent.
    pub default_location: Option<LocationConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self { map_zoom: DEFAULT_ZOOM, api: ApiConfig::default(), default_location: None }
    }
}

impl Config {
    /// Load config from disk (or defaults if it doesn't exist yet), then apply
    /// the environment override.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            // First run: no config file.
            Self::default()
        };

        Ok(cfg.with_base_url_override(std::env::var(API_URL_ENV).ok()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if cfg.api.base_url.trim().is_empty() {
            return Err(anyhow!("api.base_url must not be empty"));
        }
        if cfg.map_zoom > MAX_ZOOM {
            return Err(anyhow!("map_zoom must be at most {MAX_ZOOM}, got {}", cfg.map_zoom));
        }
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-gis", "weather-gis")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        self
    }

    /// The configured start-up location, falling back to Ho Chi Minh City.
    pub fn start_location(&self) -> Result<LocationRecord> {
        self.default_location
            .clone()
            .unwrap_or_default()
            .to_record()
            .context("Invalid default_location in config")
    }

    pub fn set_default_location(&mut self, record: &LocationRecord) {
        self.default_location = Some(LocationConfig::from(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_hosted_backend() {
        let cfg = Config::default();
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.api.endpoints.path(Endpoint::Daily), "/weather/daily");
        assert_eq!(cfg.map_zoom, 11);

        let start = cfg.start_location().unwrap();
        assert_eq!(start.name, DEFAULT_LOCATION_NAME);
        assert_eq!(start.coordinate.latitude(), 10.76);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = Config::from_toml(
            r#"
            [api]
            base_url = "http://localhost:8000"

            [api.endpoints]
            daily = "/api/weather/daily"
            geocode = "/api/geocode"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api.base_url, "http://localhost:8000");
        assert_eq!(cfg.api.endpoints.daily, "/api/weather/daily");
        assert_eq!(cfg.api.endpoints.current, "/weather/current");
        assert!(cfg.default_location.is_none());
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = Config::from_toml("[api]\nbase_url = \"  \"").unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn zoom_beyond_tile_server_is_rejected() {
        assert!(Config::from_toml("map_zoom = 40").is_err());
        assert_eq!(Config::from_toml("map_zoom = 19").unwrap().map_zoom, MAX_ZOOM);
    }

    #[test]
    fn env_override_replaces_base_url() {
        let cfg = Config::default().with_base_url_override(Some("http://127.0.0.1:9000".into()));
        assert_eq!(cfg.api.base_url, "http://127.0.0.1:9000");

        let cfg = Config::default().with_base_url_override(Some(String::new()));
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_default_location_errors() {
        let mut cfg = Config::default();
        cfg.default_location =
            Some(LocationConfig { name: "Broken".into(), latitude: 123.0, longitude: 0.0 });

        let err = cfg.start_location().unwrap_err();
        assert!(err.to_string().contains("Invalid default_location"));
    }

    #[test]
    fn set_default_location_roundtrips_through_toml() {
        let mut cfg = Config::default();
        let record = LocationRecord::new("Hà Nội", Coordinate::new(21.0285, 105.8542).unwrap());
        cfg.set_default_location(&record);

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.start_location().unwrap(), record);
    }
}
