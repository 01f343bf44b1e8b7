use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::InvalidCoordinate;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if valid {
            Ok(Self { latitude, longitude })
        } else {
            Err(InvalidCoordinate { latitude, longitude })
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A resolved place: display name plus coordinate, always replaced together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    pub name: String,
    pub coordinate: Coordinate,
}

impl LocationRecord {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self { name: name.into(), coordinate }
    }
}

/// Current conditions. `None` marks a value the server did not provide.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub visibility_m: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    /// OpenWeather icon code as sent by the server, e.g. `"04n"`.
    pub icon: Option<String>,
    pub description: Option<String>,
}

/// Hourly prediction as parallel sequences sharing one index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlySeries {
    pub forecast_time: Vec<Option<NaiveDateTime>>,
    pub temperature_c: Vec<Option<f64>>,
    pub humidity_pct: Vec<Option<f64>>,
    pub precipitation_mm: Vec<Option<f64>>,
    pub wind_speed_mps: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HourlyPoint {
    pub time: Option<NaiveDateTime>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub wind_speed_mps: Option<f64>,
}

impl HourlySeries {
    /// Number of hours, driven by the temperature sequence.
    pub fn len(&self) -> usize {
        self.temperature_c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Co-indexed record at `index`; fields are `None` where a sequence is short.
    pub fn point(&self, index: usize) -> Option<HourlyPoint> {
        if index >= self.len() {
            return None;
        }

        Some(HourlyPoint {
            time: at(&self.forecast_time, index),
            temperature_c: at(&self.temperature_c, index),
            humidity_pct: at(&self.humidity_pct, index),
            precipitation_mm: at(&self.precipitation_mm, index),
            wind_speed_mps: at(&self.wind_speed_mps, index),
        })
    }

    pub fn points(&self) -> impl Iterator<Item = HourlyPoint> + '_ {
        (0..self.len()).filter_map(|i| self.point(i))
    }

    /// True when every non-empty sequence has the same length.
    pub fn is_aligned(&self) -> bool {
        aligned(&[
            self.forecast_time.len(),
            self.temperature_c.len(),
            self.humidity_pct.len(),
            self.precipitation_mm.len(),
            self.wind_speed_mps.len(),
        ])
    }
}

/// Daily forecast as parallel sequences sharing one index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySeries {
    pub date: Vec<Option<NaiveDate>>,
    pub temperature_min_c: Vec<Option<f64>>,
    pub temperature_max_c: Vec<Option<f64>>,
    pub weather_code: Vec<Option<i32>>,
    pub precipitation_probability_pct: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyPoint {
    pub date: Option<NaiveDate>,
    pub temperature_min_c: Option<f64>,
    pub temperature_max_c: Option<f64>,
    pub weather_code: Option<i32>,
    pub precipitation_probability_pct: Option<f64>,
}

impl DailySeries {
    /// Number of days, driven by the date sequence.
    pub fn len(&self) -> usize {
        self.date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn point(&self, index: usize) -> Option<DailyPoint> {
        if index >= self.len() {
            return None;
        }

        Some(DailyPoint {
            date: at(&self.date, index),
            temperature_min_c: at(&self.temperature_min_c, index),
            temperature_max_c: at(&self.temperature_max_c, index),
            weather_code: at(&self.weather_code, index),
            precipitation_probability_pct: at(&self.precipitation_probability_pct, index),
        })
    }

    pub fn points(&self) -> impl Iterator<Item = DailyPoint> + '_ {
        (0..self.len()).filter_map(|i| self.point(i))
    }

    pub fn is_aligned(&self) -> bool {
        aligned(&[
            self.date.len(),
            self.temperature_min_c.len(),
            self.temperature_max_c.len(),
            self.weather_code.len(),
            self.precipitation_probability_pct.len(),
        ])
    }
}

/// The three independent data groups, in the order they are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    Current,
    Predict,
    Daily,
}

impl Slice {
    pub const fn all() -> &'static [Slice] {
        &[Slice::Current, Slice::Predict, Slice::Daily]
    }
}

/// Snapshot of everything fetched for the current coordinate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    pub current: Option<CurrentConditions>,
    pub predict: Option<HourlySeries>,
    pub daily: Option<DailySeries>,
}

impl ViewModel {
    pub fn has(&self, slice: Slice) -> bool {
        match slice {
            Slice::Current => self.current.is_some(),
            Slice::Predict => self.predict.is_some(),
            Slice::Daily => self.daily.is_some(),
        }
    }

    pub fn populated(&self) -> usize {
        Slice::all().iter().filter(|s| self.has(**s)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated() == 0
    }
}

fn at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

fn aligned(lengths: &[usize]) -> bool {
    let mut present = lengths.iter().filter(|len| **len > 0);
    match present.next() {
        Some(first) => present.all(|len| len == first),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_rejects_out_of_range_and_non_finite() {
        assert!(Coordinate::new(10.76, 106.66).is_ok());
        assert!(Coordinate::new(90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, 181.0).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn short_sequences_yield_absent_fields() {
        let series = HourlySeries {
            temperature_c: vec![Some(28.0), Some(29.5)],
            humidity_pct: vec![Some(80.0)],
            ..Default::default()
        };

        assert_eq!(series.len(), 2);
        assert!(!series.is_aligned());

        let second = series.point(1).unwrap();
        assert_eq!(second.temperature_c, Some(29.5));
        assert_eq!(second.humidity_pct, None);
        assert_eq!(second.precipitation_mm, None);
        assert!(series.point(2).is_none());
    }

    #[test]
    fn empty_sequences_do_not_break_alignment() {
        let series = DailySeries {
            date: vec![NaiveDate::from_ymd_opt(2025, 6, 1), NaiveDate::from_ymd_opt(2025, 6, 2)],
            temperature_min_c: vec![Some(25.0), Some(26.0)],
            temperature_max_c: vec![Some(33.0), Some(34.0)],
            weather_code: vec![Some(3), Some(61)],
            precipitation_probability_pct: vec![],
        };

        assert!(series.is_aligned());
        assert_eq!(series.points().count(), 2);
        assert_eq!(series.point(0).unwrap().precipitation_probability_pct, None);
    }

    #[test]
    fn view_model_counts_populated_slices() {
        let view = ViewModel {
            current: Some(CurrentConditions::default()),
            predict: None,
            daily: Some(DailySeries::default()),
        };

        assert_eq!(view.populated(), 2);
        assert!(!view.has(Slice::Predict));
        assert!(ViewModel::default().is_empty());
    }
}
