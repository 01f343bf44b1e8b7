use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};

use crate::{
    config::{ApiConfig, Endpoints},
    error::ApiError,
    model::{Coordinate, CurrentConditions, DailySeries, HourlySeries},
};

use super::{Endpoint, GeocodeHit, Geocoder, WeatherSource};

/// HTTP client for the dashboard backend (current, predict, daily, geocode).
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    endpoints: Endpoints,
    http: Client,
}

impl BackendClient {
    pub fn new(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            endpoints: api.endpoints.clone(),
            http: Client::new(),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, self.endpoints.path(endpoint))
    }

    /// GET `endpoint` and return the body of a successful response.
    async fn get(&self, endpoint: Endpoint, query: &[(&str, String)]) -> Result<String, ApiError> {
        let url = self.url(endpoint);
        debug!("GET {url} {query:?}");

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| ApiError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
                detail: extract_detail(&body),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        at: Coordinate,
    ) -> Result<T, ApiError> {
        let query = [("lat", at.latitude().to_string()), ("lon", at.longitude().to_string())];
        let body = self.get(endpoint, &query).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[async_trait]
impl WeatherSource for BackendClient {
    async fn current(&self, at: Coordinate) -> Result<CurrentConditions, ApiError> {
        let parsed: CurrentEnvelope = self.get_json(Endpoint::Current, at).await?;
        Ok(parsed.into())
    }

    async fn predict(&self, at: Coordinate) -> Result<HourlySeries, ApiError> {
        let parsed: PredictResponse = self.get_json(Endpoint::Predict, at).await?;
        Ok(parsed.into())
    }

    async fn daily(&self, at: Coordinate) -> Result<DailySeries, ApiError> {
        let parsed: DailyEnvelope = self.get_json(Endpoint::Daily, at).await?;
        Ok(parsed.into())
    }
}

#[async_trait]
impl Geocoder for BackendClient {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeHit>, ApiError> {
        let body = self.get(Endpoint::Geocode, &[("city", query.to_string())]).await?;
        decode_geocode(&body).map_err(|source| ApiError::Decode { endpoint: Endpoint::Geocode, source })
    }
}

#[derive(Debug, Default, Deserialize)]
struct WireMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct WireWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireWeather {
    icon: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct WireClouds {
    all: Option<f64>,
}

/// `current` object of the current-conditions endpoint. The backend sends both
/// the nested OpenWeather groups and a few flattened copies.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireCurrent {
    main: Option<WireMain>,
    wind: Option<WireWind>,
    #[serde(deserialize_with = "null_as_empty")]
    weather: Vec<WireWeather>,
    sys: Option<WireSys>,
    visibility: Option<f64>,
    clouds: Option<WireClouds>,
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
    wind_speed: Option<f64>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CurrentEnvelope {
    current: Option<WireCurrent>,
}

impl From<CurrentEnvelope> for CurrentConditions {
    fn from(envelope: CurrentEnvelope) -> Self {
        let c = envelope.current.unwrap_or_default();
        let main = c.main.unwrap_or_default();
        let wind = c.wind.unwrap_or_default();
        let sys = c.sys.unwrap_or_default();
        let weather = c.weather.into_iter().next();

        CurrentConditions {
            temperature_c: main.temp.or(c.temp),
            feels_like_c: main.feels_like.or(c.feels_like),
            humidity_pct: main.humidity.or(c.humidity),
            pressure_hpa: main.pressure,
            visibility_m: c.visibility,
            wind_speed_mps: wind.speed.or(c.wind_speed),
            wind_direction_deg: wind.deg,
            cloud_cover_pct: c.clouds.and_then(|clouds| clouds.all),
            sunrise: sys.sunrise.or(c.sunrise),
            sunset: sys.sunset.or(c.sunset),
            icon: weather.as_ref().and_then(|w| w.icon.clone()),
            description: weather.and_then(|w| w.description),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PredictResponse {
    #[serde(deserialize_with = "null_as_empty")]
    forecast_time: Vec<Option<String>>,
    #[serde(deserialize_with = "null_as_empty")]
    temp: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_empty")]
    humidity: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_empty")]
    precipitation: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_empty")]
    wind_speed: Vec<Option<f64>>,
}

impl From<PredictResponse> for HourlySeries {
    fn from(r: PredictResponse) -> Self {
        HourlySeries {
            forecast_time: r
                .forecast_time
                .iter()
                .map(|t| t.as_deref().and_then(parse_timestamp))
                .collect(),
            temperature_c: r.temp,
            humidity_pct: r.humidity,
            precipitation_mm: r.precipitation,
            wind_speed_mps: r.wind_speed,
        }
    }
}

/// Open-Meteo `daily` block, passed through by the backend.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireDaily {
    #[serde(deserialize_with = "null_as_empty")]
    time: Vec<Option<String>>,
    #[serde(deserialize_with = "null_as_empty")]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_empty")]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_empty")]
    weather_code: Vec<Option<f64>>,
    #[serde(deserialize_with = "null_as_empty")]
    precipitation_probability_max: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DailyEnvelope {
    daily: Option<WireDaily>,
}

impl From<DailyEnvelope> for DailySeries {
    fn from(envelope: DailyEnvelope) -> Self {
        let d = envelope.daily.unwrap_or_default();
        DailySeries {
            date: d
                .time
                .iter()
                .map(|t| t.as_deref().and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
                .collect(),
            temperature_min_c: d.temperature_2m_min,
            temperature_max_c: d.temperature_2m_max,
            weather_code: d
                .weather_code
                .iter()
                .map(|c| c.filter(|c| c.is_finite()).map(|c| c.round() as i32))
                .collect(),
            precipitation_probability_pct: d.precipitation_probability_max,
        }
    }
}

/// A `null` array decodes the same as a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct WireGeocode {
    name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

fn decode_geocode(body: &str) -> Result<Option<GeocodeHit>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let parsed: Option<WireGeocode> = serde_json::from_str(body)?;
    Ok(parsed.map(|g| GeocodeHit { name: g.name, latitude: g.lat, longitude: g.lon }))
}

/// Forecast timestamps come either naive (`2025-06-01T13:00:00`) or with an offset.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Pull `detail` out of an error body (`{"detail": "..."}` or a nested object).
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// True for the status the backend uses when geocoding finds nothing.
pub(crate) fn is_not_found(status: u16) -> bool {
    status == StatusCode::NOT_FOUND.as_u16()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn current_prefers_nested_groups() {
        let body = r#"{
            "current": {
                "main": {"temp": 31.2, "feels_like": 36.0, "humidity": 70, "pressure": 1008},
                "wind": {"speed": 4.1, "deg": 220},
                "weather": [{"icon": "04n", "description": "mây đen u ám", "main": "Clouds"}],
                "sys": {"sunrise": 1717020000, "sunset": 1717066000},
                "visibility": 10000,
                "clouds": {"all": 75},
                "temp": 99.0,
                "wind_speed": 99.0
            }
        }"#;

        let parsed: CurrentEnvelope = serde_json::from_str(body).unwrap();
        let current = CurrentConditions::from(parsed);

        assert_eq!(current.temperature_c, Some(31.2));
        assert_eq!(current.wind_speed_mps, Some(4.1));
        assert_eq!(current.pressure_hpa, Some(1008.0));
        assert_eq!(current.visibility_m, Some(10000.0));
        assert_eq!(current.cloud_cover_pct, Some(75.0));
        assert_eq!(current.sunset, Some(1717066000));
        assert_eq!(current.icon.as_deref(), Some("04n"));
    }

    #[test]
    fn current_tolerates_missing_groups() {
        let parsed: CurrentEnvelope =
            serde_json::from_str(r#"{"current": {"temp": 28.0, "sunrise": 5}}"#).unwrap();
        let current = CurrentConditions::from(parsed);

        assert_eq!(current.temperature_c, Some(28.0));
        assert_eq!(current.sunrise, Some(5));
        assert_eq!(current.humidity_pct, None);
        assert_eq!(current.icon, None);

        let empty: CurrentEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(CurrentConditions::from(empty), CurrentConditions::default());
    }

    #[test]
    fn predict_keeps_parallel_arrays() {
        let body = r#"{
            "forecast_time": ["2025-06-01T13:00:00", "2025-06-01T14:00:00+07:00", "garbage"],
            "temp": [30.5, 31.0, null],
            "humidity": [65.0, 70.0, 72.0],
            "precipitation": [0.0, 0.2, 1.4],
            "wind_speed": [3.0, 3.5, 4.0]
        }"#;

        let parsed: PredictResponse = serde_json::from_str(body).unwrap();
        let series = HourlySeries::from(parsed);

        assert_eq!(series.len(), 3);
        assert!(series.is_aligned());
        assert_eq!(series.forecast_time[0].map(|t| t.hour()), Some(13));
        assert_eq!(series.forecast_time[1].map(|t| t.hour()), Some(14));
        assert_eq!(series.forecast_time[2], None);
        assert_eq!(series.temperature_c[2], None);
    }

    #[test]
    fn daily_reads_open_meteo_block() {
        let body = r#"{
            "latitude": 21.0,
            "daily": {
                "time": ["2025-06-01", "2025-06-02"],
                "weather_code": [3, 95.0],
                "temperature_2m_max": [34.1, 33.0],
                "temperature_2m_min": [26.0, 25.5]
            }
        }"#;

        let parsed: DailyEnvelope = serde_json::from_str(body).unwrap();
        let series = DailySeries::from(parsed);

        assert_eq!(series.len(), 2);
        assert_eq!(series.weather_code, vec![Some(3), Some(95)]);
        assert_eq!(series.date[0], NaiveDate::from_ymd_opt(2025, 6, 1));
        assert!(series.precipitation_probability_pct.is_empty());
        assert_eq!(series.point(1).unwrap().precipitation_probability_pct, None);
    }

    #[test]
    fn null_arrays_decode_as_empty() {
        let current: CurrentEnvelope =
            serde_json::from_str(r#"{"current": {"main": {"temp": 30.0}, "weather": null}}"#)
                .unwrap();
        let current = CurrentConditions::from(current);
        assert_eq!(current.temperature_c, Some(30.0));
        assert_eq!(current.icon, None);

        let predict: PredictResponse =
            serde_json::from_str(r#"{"temp": [30.0], "humidity": null}"#).unwrap();
        let series = HourlySeries::from(predict);
        assert_eq!(series.len(), 1);
        assert!(series.humidity_pct.is_empty());
        assert_eq!(series.point(0).unwrap().humidity_pct, None);

        let daily: DailyEnvelope = serde_json::from_str(
            r#"{"daily": {"time": ["2025-06-01"], "precipitation_probability_max": null}}"#,
        )
        .unwrap();
        let series = DailySeries::from(daily);
        assert_eq!(series.len(), 1);
        assert!(series.precipitation_probability_pct.is_empty());
    }

    #[test]
    fn geocode_handles_empty_and_partial_hits() {
        assert_eq!(decode_geocode("").unwrap(), None);
        assert_eq!(decode_geocode("null").unwrap(), None);

        let hit = decode_geocode(r#"{"name": "Đà Lạt", "lat": 11.94, "lon": 108.45, "country": "VN"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(hit.name.as_deref(), Some("Đà Lạt"));
        assert_eq!(hit.latitude, Some(11.94));

        let partial = decode_geocode(r#"{"name": "Nowhere"}"#).unwrap().unwrap();
        assert_eq!(partial.latitude, None);
    }

    #[test]
    fn detail_is_extracted_from_error_bodies() {
        assert_eq!(
            extract_detail(r#"{"detail": "Không tìm thấy thành phố X ở Việt Nam."}"#).as_deref(),
            Some("Không tìm thấy thành phố X ở Việt Nam.")
        );
        assert_eq!(
            extract_detail(r#"{"detail": {"cod": 401}}"#).as_deref(),
            Some(r#"{"cod":401}"#)
        );
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(r#"{"message": "x"}"#), None);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "ư".repeat(250);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn not_found_status() {
        assert!(is_not_found(404));
        assert!(!is_not_found(500));
    }
}
