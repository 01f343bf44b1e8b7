//! Terminal rendering of the dashboard and the hourly detail screen.

use std::io::{self, Write};

use anyhow::{Result, anyhow};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};
use weather_gis_core::{
    AppState, Screen, ViewModel,
    chart::{HOURLY_CHART_HOURS, HourlyChart, PRECIP_CHART_HOURS, PrecipChart, PrecipTier},
    classify::{
        DEFAULT_HUMIDITY_PCT, DEFAULT_PRECIPITATION_MM, WeatherCategory, WeatherInfo,
        classify_daily, classify_hourly,
    },
    gauge::{ColorTier, Gauge},
    map::{TileId, map_link},
    model::HourlyPoint,
    summary::{PLACEHOLDER, Summary, VIETNAM_UTC_OFFSET_SECS, fixed, rounded},
};

const HOURLY_CARD_HOURS: usize = 24;
const DAILY_CARD_DAYS: usize = 7;
const NO_DATA: &str = "No data available";

const GAUGE_WIDTH: usize = 20;
const LEVEL_WIDTH: usize = 20;
const HUMIDITY_WIDTH: usize = 10;

/// Inputs to rendering that do not live in the application state.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Wall clock in Vietnam local time.
    pub now: DateTime<FixedOffset>,
    pub map_zoom: u8,
}

impl Context {
    pub fn now(map_zoom: u8) -> Result<Self> {
        let offset = FixedOffset::east_opt(VIETNAM_UTC_OFFSET_SECS)
            .ok_or_else(|| anyhow!("Invalid UTC offset: {VIETNAM_UTC_OFFSET_SECS}"))?;
        Ok(Self { now: Utc::now().with_timezone(&offset), map_zoom })
    }
}

pub fn screen<W: Write>(state: &AppState, ctx: &Context, out: &mut W) -> io::Result<()> {
    match state.screen() {
        Screen::Dashboard => dashboard(state, ctx, out),
        Screen::HourlyDetail => hourly_detail(state, ctx, out),
    }
}

fn dashboard<W: Write>(state: &AppState, ctx: &Context, out: &mut W) -> io::Result<()> {
    let view = state.view();

    header(state, out)?;
    current_section(view, out)?;
    hourly_chart_section(view, out)?;
    precip_section(view, out)?;
    hourly_cards(view, ctx, out)?;
    daily_cards(view, ctx, out)?;

    let coordinate = state.location().coordinate;
    let tile = TileId::containing(coordinate, ctx.map_zoom);
    writeln!(out, "\nMap")?;
    writeln!(out, "  Tile {}", tile.tile_url())?;
    writeln!(out, "  {}", map_link(coordinate, ctx.map_zoom))
}

fn header<W: Write>(state: &AppState, out: &mut W) -> io::Result<()> {
    let location = state.location();
    writeln!(out, "{} ({})", location.name, location.coordinate)?;
    if let Some(error) = state.error() {
        writeln!(out, "! {error}")?;
    }
    Ok(())
}

fn current_section<W: Write>(view: &ViewModel, out: &mut W) -> io::Result<()> {
    let summary = Summary::from_view(view);

    writeln!(out, "\nCurrent conditions")?;
    match &view.current {
        Some(current) => {
            let fallback = WeatherInfo::day(WeatherCategory::Clear);
            let icon = current.icon.clone().unwrap_or_else(|| fallback.icon_code());
            let description = current.description.as_deref().unwrap_or(fallback.description());
            writeln!(out, "  {}°C  {description} [{icon}]", rounded(summary.temperature_c))?;
            writeln!(out, "  Feels like {}°C", rounded(summary.feels_like_c))?;
        }
        None => writeln!(out, "  {NO_DATA}")?,
    }

    writeln!(out, "  Today {}", summary.temperature_range())?;
    writeln!(
        out,
        "  Humidity {}%  Pressure {} hPa  Visibility {} km  Clouds {}%",
        rounded(summary.humidity_pct),
        rounded(summary.pressure_hpa),
        summary.visibility(),
        rounded(summary.cloud_cover_pct),
    )?;
    writeln!(out, "  Sunrise {}  Sunset {}", summary.sunrise(), summary.sunset())?;

    let gauge = Gauge::wind(summary.wind_speed_mps);
    writeln!(
        out,
        "  Wind {} m/s [{}] {}",
        fixed(summary.wind_speed_mps, 1),
        meter(gauge.fraction, GAUGE_WIDTH, '#'),
        tier_label(gauge.tier),
    )
}

fn hourly_chart_section<W: Write>(view: &ViewModel, out: &mut W) -> io::Result<()> {
    writeln!(out, "\nNext {HOURLY_CHART_HOURS} hours (temperature / humidity)")?;

    let Some(series) = &view.predict else {
        return writeln!(out, "  {NO_DATA}");
    };
    let Some(chart) = HourlyChart::build(series) else {
        return writeln!(out, "  {NO_DATA}");
    };

    let baseline = chart.canvas.baseline();
    let height = chart.canvas.draw_height();
    let level = |y: f64| (baseline - y) / height;

    for (index, point) in series.points().take(HOURLY_CHART_HOURS).enumerate() {
        let temperature = chart.points.iter().find(|p| p.index == index);
        let humidity = chart.bars.iter().find(|b| b.index == index);

        writeln!(
            out,
            "  {:>5}  {:>4}°C {}  {:>4}% {}",
            clock(point.time),
            rounded(temperature.map(|p| p.temperature_c)),
            meter(temperature.map_or(0.0, |p| level(p.y)), LEVEL_WIDTH, '*'),
            rounded(humidity.map(|b| b.humidity_pct)),
            meter(humidity.map_or(0.0, |b| level(b.y)), HUMIDITY_WIDTH, '|'),
        )?;
    }
    Ok(())
}

fn precip_section<W: Write>(view: &ViewModel, out: &mut W) -> io::Result<()> {
    writeln!(out, "\nPrecipitation, next {PRECIP_CHART_HOURS} hours (mm/h)")?;

    let Some(chart) = view.predict.as_ref().and_then(PrecipChart::build) else {
        return writeln!(out, "  {NO_DATA}");
    };

    for bar in &chart.bars {
        let hour = bar.hour.map(|h| format!("{h:02}h")).unwrap_or_else(|| PLACEHOLDER.into());
        let label = match bar.precipitation_mm {
            Some(p) if bar.show_label => format!(" {p:.1}"),
            _ => String::new(),
        };
        let fill = match bar.tier {
            PrecipTier::None => '.',
            PrecipTier::Light => '+',
            PrecipTier::Heavy => '#',
        };

        writeln!(out, "  {hour:>4}  {}{label}", meter(bar.height_pct / 100.0, LEVEL_WIDTH, fill))?;
    }
    Ok(())
}

fn hourly_cards<W: Write>(view: &ViewModel, ctx: &Context, out: &mut W) -> io::Result<()> {
    writeln!(out, "\nHourly forecast")?;

    let Some(series) = view.predict.as_ref().filter(|s| !s.is_empty()) else {
        return writeln!(out, "  {NO_DATA}");
    };

    for (index, point) in series.points().take(HOURLY_CARD_HOURS).enumerate() {
        let info = hourly_info(&point, ctx);
        let label = if index == 0 { "Now".to_string() } else { clock(point.time) };
        writeln!(
            out,
            "  {label:>5}  {}  {:<22} {:>3}°C  {:>3}%",
            info.icon_code(),
            info.description(),
            rounded(point.temperature_c),
            rounded(Some(point.humidity_pct.unwrap_or(DEFAULT_HUMIDITY_PCT))),
        )?;
    }
    Ok(())
}

fn daily_cards<W: Write>(view: &ViewModel, ctx: &Context, out: &mut W) -> io::Result<()> {
    writeln!(out, "\n{DAILY_CARD_DAYS}-day forecast")?;

    let Some(daily) = view.daily.as_ref().filter(|d| !d.is_empty()) else {
        return writeln!(out, "  {NO_DATA}");
    };

    let today = ctx.now.date_naive();
    for point in daily.points().take(DAILY_CARD_DAYS) {
        let info = point
            .weather_code
            .map(classify_daily)
            .unwrap_or_else(|| WeatherInfo::day(WeatherCategory::Clear));

        writeln!(
            out,
            "  {:<6}  {}  {:<22} {}°C / {}°C  rain {}%",
            day_label(point.date, today),
            info.icon_code(),
            info.description(),
            rounded(point.temperature_min_c),
            rounded(point.temperature_max_c),
            rounded(point.precipitation_probability_pct),
        )?;
    }
    Ok(())
}

fn hourly_detail<W: Write>(state: &AppState, ctx: &Context, out: &mut W) -> io::Result<()> {
    header(state, out)?;
    writeln!(out, "\n24-hour detail")?;

    let Some(series) = state.view().predict.as_ref().filter(|s| !s.is_empty()) else {
        return writeln!(out, "  {NO_DATA}");
    };

    writeln!(
        out,
        "  {:<5}  {:<4}  {:>7}  {:<22}  {:>8}  {:>10}  {:>9}",
        "Time", "Icon", "Temp", "Conditions", "Humidity", "Rain", "Wind"
    )?;

    for point in series.points().take(HOURLY_CARD_HOURS) {
        let info = hourly_info(&point, ctx);
        writeln!(
            out,
            "  {:<5}  {:<4}  {:>5}°C  {:<22}  {:>7}%  {:>5} mm/h  {:>4} km/h",
            clock(point.time),
            info.icon_code(),
            fixed(point.temperature_c, 1),
            info.description(),
            rounded(point.humidity_pct),
            fixed(point.precipitation_mm, 2),
            fixed(point.wind_speed_mps.map(|v| v * 3.6), 1),
        )?;
    }
    Ok(())
}

/// Hour cards fill a missing humidity or precipitation before classifying and
/// fall back to the wall clock when the timestamp is missing.
fn hourly_info(point: &HourlyPoint, ctx: &Context) -> WeatherInfo {
    let hour = point.time.map(|t| t.hour()).unwrap_or_else(|| ctx.now.hour());
    classify_hourly(
        point.humidity_pct.unwrap_or(DEFAULT_HUMIDITY_PCT),
        point.temperature_c.unwrap_or(f64::NAN),
        point.precipitation_mm.unwrap_or(DEFAULT_PRECIPITATION_MM),
        hour,
    )
}

fn tier_label(tier: ColorTier) -> &'static str {
    match tier {
        ColorTier::Normal => "light",
        ColorTier::Warning => "moderate",
        ColorTier::Danger => "strong",
    }
}

fn clock(time: Option<NaiveDateTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string()).unwrap_or_else(|| PLACEHOLDER.into())
}

fn day_label(date: Option<NaiveDate>, today: NaiveDate) -> String {
    match date {
        Some(date) if date == today => "Today".into(),
        Some(date) => date.format("%a %d").to_string(),
        None => PLACEHOLDER.into(),
    }
}

/// Fixed-width horizontal bar; `fraction` is clamped to `0..=1`.
fn meter(fraction: f64, width: usize, fill: char) -> String {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (fraction * width as f64).round() as usize;

    let mut bar = String::with_capacity(width);
    bar.extend(std::iter::repeat_n(fill, filled));
    bar.extend(std::iter::repeat_n(' ', width - filled));
    bar
}
