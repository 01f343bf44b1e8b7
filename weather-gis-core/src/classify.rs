//! Weather condition classification for hourly and daily data.
//!
//! Hourly predictions carry no weather code, so the condition is inferred from
//! precipitation first and humidity second. Daily forecasts carry a WMO weather
//! code and are classified by code range.

/// Humidity assumed for an hour whose humidity value is missing.
pub const DEFAULT_HUMIDITY_PCT: f64 = 70.0;

/// Precipitation assumed for an hour whose precipitation value is missing.
pub const DEFAULT_PRECIPITATION_MM: f64 = 0.0;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCategory {
    Clear,
    ScatteredClouds,
    Overcast,
    Fog,
    Drizzle,
    LightRain,
    Showers,
    HeavyRain,
    Thunderstorm,
}

impl WeatherCategory {
    /// Numeric part of the OpenWeather icon code.
    pub fn icon_base(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "01",
            WeatherCategory::ScatteredClouds => "03",
            WeatherCategory::Overcast => "04",
            WeatherCategory::Fog => "50",
            WeatherCategory::Drizzle | WeatherCategory::Showers | WeatherCategory::HeavyRain => {
                "09"
            }
            WeatherCategory::LightRain => "10",
            WeatherCategory::Thunderstorm => "11",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "Clear sky",
            WeatherCategory::ScatteredClouds => "Scattered clouds",
            WeatherCategory::Overcast => "Overcast",
            WeatherCategory::Fog => "Fog / very humid",
            WeatherCategory::Drizzle => "Drizzle",
            WeatherCategory::LightRain => "Light rain",
            WeatherCategory::Showers => "Showers",
            WeatherCategory::HeavyRain => "Heavy rain / showers",
            WeatherCategory::Thunderstorm => "Thunderstorm",
        }
    }
}

/// A category plus day/night flag; the display code is only built on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeatherInfo {
    pub category: WeatherCategory,
    pub is_night: bool,
}

impl WeatherInfo {
    pub fn day(category: WeatherCategory) -> Self {
        Self { category, is_night: false }
    }

    /// OpenWeather-style icon code such as `"10d"` or `"01n"`.
    pub fn icon_code(&self) -> String {
        let variant = if self.is_night { 'n' } else { 'd' };
        format!("{}{}", self.category.icon_base(), variant)
    }

    /// Icon image URL; `scale` is the `@2x`/`@4x` suffix, `None` for the base size.
    pub fn icon_url(&self, scale: Option<u8>) -> String {
        icon_url(&self.icon_code(), scale)
    }

    pub fn description(&self) -> &'static str {
        self.category.description()
    }
}

pub fn icon_url(code: &str, scale: Option<u8>) -> String {
    match scale {
        Some(scale) => format!("{ICON_BASE_URL}/{code}@{scale}x.png"),
        None => format!("{ICON_BASE_URL}/{code}.png"),
    }
}

/// Hours before 6:00 and after 18:00 use the night icon.
pub fn is_night_hour(hour: u32) -> bool {
    !(6..=18).contains(&hour)
}

/// Classify one hour of predicted data. First matching rule wins; NaN inputs
/// fail every comparison and end up as clear sky.
pub fn classify_hourly(
    humidity_pct: f64,
    _temperature_c: f64,
    precipitation_mm: f64,
    hour: u32,
) -> WeatherInfo {
    let category = if precipitation_mm > 1.0 {
        WeatherCategory::HeavyRain
    } else if precipitation_mm > 0.05 {
        WeatherCategory::LightRain
    } else if humidity_pct > 85.0 {
        WeatherCategory::Fog
    } else if humidity_pct > 70.0 {
        WeatherCategory::Overcast
    } else if humidity_pct > 55.0 {
        WeatherCategory::ScatteredClouds
    } else {
        WeatherCategory::Clear
    };

    WeatherInfo { category, is_night: is_night_hour(hour) }
}

/// Classify a day by its WMO weather code. Daily icons always use the day variant.
pub fn classify_daily(code: i32) -> WeatherInfo {
    let category = match code {
        0 => WeatherCategory::Clear,
        c if c <= 3 => WeatherCategory::ScatteredClouds,
        45..=48 => WeatherCategory::Fog,
        51..=55 => WeatherCategory::Drizzle,
        61..=65 => WeatherCategory::LightRain,
        80..=82 => WeatherCategory::Showers,
        c if c >= 95 => WeatherCategory::Thunderstorm,
        _ => WeatherCategory::Clear,
    };

    WeatherInfo::day(category)
}
