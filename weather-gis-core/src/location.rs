//! Place-name normalization and resolution.

use log::{debug, warn};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{
    error::{ApiError, ResolveError},
    model::{Coordinate, LocationRecord},
    provider::{Geocoder, backend::is_not_found},
};

pub mod presets;

/// Canonical lookup key for a place name: accents stripped, uppercased, only
/// `A-Z`, `0-9` and single spaces left. `Đ` has no decomposition and is mapped
/// to `D` explicitly.
pub fn normalize_place_name(input: &str) -> String {
    let stripped: String = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'Đ' | 'đ' => 'D',
            c => c,
        })
        .collect();

    stripped
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Look a query up in the built-in table only.
pub fn lookup_preset(query: &str) -> Option<LocationRecord> {
    let key = normalize_place_name(query);
    let preset = presets::lookup(&key)?;
    let coordinate = Coordinate::new(preset.latitude, preset.longitude).ok()?;
    Some(LocationRecord::new(preset.name, coordinate))
}

/// Resolves free text to a location: built-in table first, remote geocoding second.
#[derive(Debug)]
pub struct LocationResolver<'a, G: Geocoder + ?Sized> {
    geocoder: &'a G,
}

impl<'a, G: Geocoder + ?Sized> LocationResolver<'a, G> {
    pub fn new(geocoder: &'a G) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, query: &str) -> Result<LocationRecord, ResolveError> {
        if query.trim().is_empty() {
            return Err(ResolveError::NotFound(query.to_string()));
        }

        if let Some(record) = lookup_preset(query) {
            debug!("'{query}' matched built-in place {}", record.name);
            return Ok(record);
        }

        debug!("'{query}' not in built-in table, geocoding");
        let hit = self.geocoder.geocode(query).await.map_err(|err| lookup_error(query, err))?;

        let Some(hit) = hit else {
            return Err(ResolveError::NotFound(query.to_string()));
        };
        let (Some(latitude), Some(longitude)) = (hit.latitude, hit.longitude) else {
            return Err(ResolveError::NotFound(query.to_string()));
        };

        let coordinate = Coordinate::new(latitude, longitude).map_err(|err| {
            ResolveError::LookupFailed { query: query.to_string(), message: err.to_string() }
        })?;

        let name = hit
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| query.trim().to_string());

        debug!("Geocoded '{query}' to {name} ({coordinate})");
        Ok(LocationRecord::new(name, coordinate))
    }
}

fn lookup_error(query: &str, err: ApiError) -> ResolveError {
    if err.status().is_some_and(is_not_found) {
        return ResolveError::NotFound(query.to_string());
    }

    warn!("Geocoding '{query}' failed: {err}");
    ResolveError::LookupFailed { query: query.to_string(), message: err.user_message() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Endpoint, GeocodeHit};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug)]
    enum Reply {
        Hit(GeocodeHit),
        Nothing,
        Status(u16, Option<&'static str>),
    }

    #[derive(Debug)]
    struct FakeGeocoder {
        reply: Reply,
        queries: Mutex<Vec<String>>,
    }

    impl FakeGeocoder {
        fn new(reply: Reply) -> Self {
            Self { reply, queries: Mutex::new(Vec::new()) }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<Option<GeocodeHit>, ApiError> {
            self.queries.lock().unwrap().push(query.to_string());
            match &self.reply {
                Reply::Hit(hit) => Ok(Some(hit.clone())),
                Reply::Nothing => Ok(None),
                Reply::Status(status, detail) => Err(ApiError::Status {
                    endpoint: Endpoint::Geocode,
                    status: *status,
                    detail: detail.map(str::to_string),
                    body: String::new(),
                }),
            }
        }
    }

    #[test]
    fn normalizes_vietnamese_names() {
        assert_eq!(normalize_place_name("Hà Nội"), "HA NOI");
        assert_eq!(normalize_place_name("  Tp.HCM!!  "), "TPHCM");
        assert_eq!(normalize_place_name("Đà Nẵng"), "DA NANG");
        assert_eq!(normalize_place_name("Thừa Thiên - Huế"), "THUA THIEN HUE");
        assert_eq!(normalize_place_name("Quận\t1\n"), "QUAN 1");
        assert_eq!(normalize_place_name(""), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for s in ["Hà Nội", "  Tp.HCM!!  ", "Bà Rịa - Vũng Tàu", "ñandú straße", "日本 Tokyo 東京", "a\u{0301}\u{0301}"] {
            let once = normalize_place_name(s);
            assert_eq!(normalize_place_name(&once), once, "{s}");
        }
    }

    #[tokio::test]
    async fn preset_hit_skips_geocoding() {
        let geocoder = FakeGeocoder::new(Reply::Nothing);
        let record = LocationResolver::new(&geocoder).resolve("Ha Noi").await.unwrap();

        assert_eq!(record.name, "Hà Nội");
        assert_eq!(record.coordinate, Coordinate::new(21.0285, 105.8542).unwrap());
        assert!(geocoder.queries().is_empty());
    }

    #[tokio::test]
    async fn alias_hits_preset() {
        let geocoder = FakeGeocoder::new(Reply::Nothing);
        let record = LocationResolver::new(&geocoder).resolve("  Tp.HCM!!  ").await.unwrap();
        assert_eq!(record.name, "Hồ Chí Minh");
    }

    #[tokio::test]
    async fn table_miss_geocodes_with_original_text() {
        let geocoder = FakeGeocoder::new(Reply::Hit(GeocodeHit {
            name: Some("Đà Lạt".into()),
            latitude: Some(11.9404),
            longitude: Some(108.4583),
        }));

        let record = LocationResolver::new(&geocoder).resolve("Đà Lạt").await.unwrap();
        assert_eq!(record.name, "Đà Lạt");
        assert_eq!(geocoder.queries(), vec!["Đà Lạt".to_string()]);
    }

    #[tokio::test]
    async fn hit_without_name_uses_query() {
        let geocoder = FakeGeocoder::new(Reply::Hit(GeocodeHit {
            name: None,
            latitude: Some(12.0),
            longitude: Some(108.0),
        }));

        let record = LocationResolver::new(&geocoder).resolve(" Buon Don ").await.unwrap();
        assert_eq!(record.name, "Buon Don");
    }

    #[tokio::test]
    async fn empty_or_coordinate_less_reply_is_not_found() {
        let geocoder = FakeGeocoder::new(Reply::Nothing);
        let err = LocationResolver::new(&geocoder).resolve("Atlantis").await.unwrap_err();
        assert_eq!(err, ResolveError::NotFound("Atlantis".into()));

        let geocoder = FakeGeocoder::new(Reply::Hit(GeocodeHit {
            name: Some("Atlantis".into()),
            latitude: None,
            longitude: Some(1.0),
        }));
        let err = LocationResolver::new(&geocoder).resolve("Atlantis").await.unwrap_err();
        assert_eq!(err, ResolveError::NotFound("Atlantis".into()));
    }

    #[tokio::test]
    async fn not_found_status_is_not_found() {
        let geocoder = FakeGeocoder::new(Reply::Status(404, Some("Không tìm thấy thành phố")));
        let err = LocationResolver::new(&geocoder).resolve("Atlantis").await.unwrap_err();
        assert_eq!(err, ResolveError::NotFound("Atlantis".into()));
    }

    #[tokio::test]
    async fn server_failure_is_lookup_failed() {
        let geocoder = FakeGeocoder::new(Reply::Status(500, Some("Lỗi server nội bộ")));
        let err = LocationResolver::new(&geocoder).resolve("Atlantis").await.unwrap_err();
        assert_eq!(
            err,
            ResolveError::LookupFailed {
                query: "Atlantis".into(),
                message: "Lỗi server nội bộ".into()
            }
        );
    }

    #[tokio::test]
    async fn invalid_coordinate_is_lookup_failed() {
        let geocoder = FakeGeocoder::new(Reply::Hit(GeocodeHit {
            name: Some("Bad".into()),
            latitude: Some(200.0),
            longitude: Some(0.0),
        }));
        let err = LocationResolver::new(&geocoder).resolve("Bad").await.unwrap_err();
        assert!(matches!(err, ResolveError::LookupFailed { .. }));
    }

    #[tokio::test]
    async fn blank_query_never_reaches_network() {
        let geocoder = FakeGeocoder::new(Reply::Nothing);
        let err = LocationResolver::new(&geocoder).resolve("   ").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
        assert!(geocoder.queries().is_empty());
    }
}
