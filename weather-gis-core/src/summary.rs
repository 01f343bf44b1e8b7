//! Derived values for the dashboard's small stat widgets.

use chrono::{DateTime, FixedOffset};

use crate::model::ViewModel;

/// Shown in place of any value the server did not provide.
pub const PLACEHOLDER: &str = "--";

/// Vietnam local time is UTC+7 all year.
pub const VIETNAM_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Epoch seconds as Vietnam local time.
pub fn vietnam_time(epoch_seconds: i64) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(VIETNAM_UTC_OFFSET_SECS)?;
    DateTime::from_timestamp(epoch_seconds, 0).map(|utc| utc.with_timezone(&offset))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub today_min_c: Option<f64>,
    pub today_max_c: Option<f64>,
    pub temperature_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub visibility_km: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
}

impl Summary {
    pub fn from_view(view: &ViewModel) -> Self {
        let today = view.daily.as_ref().and_then(|d| d.point(0)).unwrap_or_default();
        let current = view.current.clone().unwrap_or_default();

        Self {
            today_min_c: today.temperature_min_c,
            today_max_c: today.temperature_max_c,
            temperature_c: current.temperature_c,
            feels_like_c: current.feels_like_c,
            wind_speed_mps: current.wind_speed_mps,
            humidity_pct: current.humidity_pct,
            pressure_hpa: current.pressure_hpa,
            visibility_km: current.visibility_m.map(|m| m / 1000.0),
            cloud_cover_pct: current.cloud_cover_pct,
            sunrise: current.sunrise.and_then(vietnam_time),
            sunset: current.sunset.and_then(vietnam_time),
        }
    }

    /// `"26°C / 34°C"`, or `"-- / --"` unless both ends are known.
    pub fn temperature_range(&self) -> String {
        match (self.today_min_c, self.today_max_c) {
            (Some(min), Some(max)) => format!("{}°C / {}°C", min.round(), max.round()),
            _ => format!("{PLACEHOLDER} / {PLACEHOLDER}"),
        }
    }

    pub fn visibility(&self) -> String {
        self.visibility_km.map(|km| format!("{km:.1}")).unwrap_or_else(|| PLACEHOLDER.into())
    }

    pub fn sunrise(&self) -> String {
        clock(self.sunrise)
    }

    pub fn sunset(&self) -> String {
        clock(self.sunset)
    }
}

/// Rounded value, or the placeholder.
pub fn rounded(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| format!("{}", v.round()))
        .unwrap_or_else(|| PLACEHOLDER.into())
}

/// Value with `decimals` digits, or the placeholder.
pub fn fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_else(|| PLACEHOLDER.into())
}

fn clock(time: Option<DateTime<FixedOffset>>) -> String {
    time.map(|t| t.format("%H:%M").to_string()).unwrap_or_else(|| PLACEHOLDER.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, DailySeries};

    #[test]
    fn empty_view_renders_placeholders() {
        let summary = Summary::from_view(&ViewModel::default());
        assert_eq!(summary.temperature_range(), "-- / --");
        assert_eq!(summary.visibility(), "--");
        assert_eq!(summary.sunrise(), "--");
        assert_eq!(rounded(summary.wind_speed_mps), "--");
    }

    #[test]
    fn values_are_derived_from_slices() {
        let view = ViewModel {
            current: Some(CurrentConditions {
                visibility_m: Some(9500.0),
                wind_speed_mps: Some(3.6),
                // 2024-06-01 05:15 and 18:30 in UTC+7
                sunrise: Some(1717193700),
                sunset: Some(1717241400),
                ..Default::default()
            }),
            predict: None,
            daily: Some(DailySeries {
                temperature_min_c: vec![Some(25.6), Some(20.0)],
                temperature_max_c: vec![Some(33.4), Some(30.0)],
                date: vec![None, None],
                ..Default::default()
            }),
        };

        let summary = Summary::from_view(&view);
        assert_eq!(summary.temperature_range(), "26°C / 33°C");
        assert_eq!(summary.visibility(), "9.5");
        assert_eq!(summary.sunrise(), "05:15");
        assert_eq!(summary.sunset(), "18:30");
        assert_eq!(rounded(summary.wind_speed_mps), "4");
    }

    #[test]
    fn zero_is_a_real_value() {
        assert_eq!(rounded(Some(0.0)), "0");
        assert_eq!(fixed(Some(0.0), 2), "0.00");
        assert_eq!(fixed(None, 2), "--");
    }

    #[test]
    fn half_known_range_is_placeholder() {
        let summary = Summary { today_min_c: Some(25.0), ..Default::default() };
        assert_eq!(summary.temperature_range(), "-- / --");
    }
}
