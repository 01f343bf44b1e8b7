//! Plot geometry for the hourly charts.
//!
//! Everything here produces plain coordinates; turning them into SVG or
//! terminal bars is left to the caller.

use chrono::Timelike;

use crate::model::HourlySeries;

/// Hours shown on the temperature/humidity chart.
pub const HOURLY_CHART_HOURS: usize = 12;

/// Hours shown on the precipitation chart.
pub const PRECIP_CHART_HOURS: usize = 8;

/// Top of the precipitation scale, in mm/h.
pub const PRECIP_SCALE_MAX_MM: f64 = 2.0;

/// Smallest visible precipitation bar, in percent of the chart height.
pub const PRECIP_MIN_BAR_PCT: f64 = 2.0;

const HUMIDITY_GRID_STEPS: [f64; 6] = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0];
const PRECIP_GRID_STEPS: [f64; 5] = [2.0, 1.5, 1.0, 0.5, 0.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Value range of one vertical scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
}

impl Axis {
    pub const TEMPERATURE: Axis = Axis { min: 20.0, max: 40.0 };
    pub const PERCENT: Axis = Axis { min: 0.0, max: 100.0 };

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Fixed-size drawing surface with padding on all four sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Canvas {
    /// The 630x150 surface of the 12-hour chart.
    pub const HOURLY: Canvas = Canvas {
        width: 630.0,
        height: 150.0,
        padding: Padding { top: 20.0, right: 30.0, bottom: 30.0, left: 50.0 },
    };

    pub fn draw_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn draw_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    /// Pixel y of the bottom edge of the drawable band.
    pub fn baseline(&self) -> f64 {
        self.height - self.padding.bottom
    }

    /// Horizontal position of item `index` out of `len`. A single item sits on
    /// the left edge.
    pub fn scale_x(&self, index: usize, len: usize) -> f64 {
        let denominator = len.saturating_sub(1).max(1) as f64;
        self.padding.left + (index as f64 / denominator) * self.draw_width()
    }

    /// Inverted linear vertical position, clamped to the drawable band.
    /// Non-finite values and an empty axis land on the baseline.
    pub fn scale_y(&self, value: f64, axis: Axis) -> f64 {
        let span = axis.span();
        if !value.is_finite() || !span.is_finite() || span <= 0.0 {
            return self.baseline();
        }

        let t = ((axis.max - value) / span).clamp(0.0, 1.0);
        self.padding.top + t * self.draw_height()
    }

    /// Width of one column when `len` items share the drawable width.
    pub fn column_width(&self, len: usize) -> f64 {
        self.draw_width() / len.saturating_sub(1).max(1) as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperaturePoint {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumidityBar {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub humidity_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourLabel {
    pub x: f64,
    pub hour: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub y: f64,
    pub value: f64,
}

/// Temperature line over humidity bars for the next hours.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyChart {
    pub canvas: Canvas,
    pub temperature_axis: Axis,
    pub humidity_axis: Axis,
    pub points: Vec<TemperaturePoint>,
    pub bars: Vec<HumidityBar>,
    pub hours: Vec<HourLabel>,
    pub grid: Vec<GridLine>,
}

impl HourlyChart {
    /// Lay out the first [`HOURLY_CHART_HOURS`] hours. `None` means there is
    /// nothing to plot.
    pub fn build(series: &HourlySeries) -> Option<Self> {
        let canvas = Canvas::HOURLY;
        let temperature_axis = Axis::TEMPERATURE;
        let humidity_axis = Axis::PERCENT;

        let len = series.len().min(HOURLY_CHART_HOURS);
        if len == 0 {
            return None;
        }

        let bar_width = canvas.column_width(len) * 0.5;
        let mut points = Vec::with_capacity(len);
        let mut bars = Vec::with_capacity(len);
        let mut hours = Vec::with_capacity(len);

        for (index, point) in series.points().take(len).enumerate() {
            let x = canvas.scale_x(index, len);

            if let Some(temperature_c) = point.temperature_c {
                points.push(TemperaturePoint {
                    index,
                    x,
                    y: canvas.scale_y(temperature_c, temperature_axis),
                    temperature_c,
                });
            }

            if let Some(humidity_pct) = point.humidity_pct {
                let y = canvas.scale_y(humidity_pct, humidity_axis);
                bars.push(HumidityBar {
                    index,
                    x: x - bar_width / 2.0,
                    y,
                    width: bar_width,
                    height: canvas.baseline() - y,
                    humidity_pct,
                });
            }

            if let Some(time) = point.time {
                hours.push(HourLabel { x, hour: time.hour() });
            }
        }

        let grid = HUMIDITY_GRID_STEPS
            .iter()
            .map(|value| GridLine { y: canvas.scale_y(*value, humidity_axis), value: *value })
            .collect();

        Some(Self { canvas, temperature_axis, humidity_axis, points, bars, hours, grid })
    }

    /// Points in SVG `polyline` attribute form: `"x1,y1 x2,y2 ..."`.
    pub fn polyline(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecipTier {
    None,
    Light,
    Heavy,
}

impl PrecipTier {
    pub fn of(precipitation_mm: f64) -> Self {
        if precipitation_mm > 0.5 {
            PrecipTier::Heavy
        } else if precipitation_mm > 0.01 {
            PrecipTier::Light
        } else {
            PrecipTier::None
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PrecipTier::None => "transparent",
            PrecipTier::Light => "#4A90E2",
            PrecipTier::Heavy => "#1F75FE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipBar {
    pub hour: Option<u32>,
    pub precipitation_mm: Option<f64>,
    /// Bar height in percent of the chart height.
    pub height_pct: f64,
    pub tier: PrecipTier,
    pub show_label: bool,
}

/// Precipitation bars for the next hours, on a fixed 0..2 mm/h scale.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipChart {
    pub bars: Vec<PrecipBar>,
    /// Grid values with their height in percent of the chart.
    pub grid: Vec<(f64, f64)>,
}

impl PrecipChart {
    pub fn build(series: &HourlySeries) -> Option<Self> {
        let len = series.precipitation_mm.len().min(PRECIP_CHART_HOURS);
        if len == 0 {
            return None;
        }

        let bars = (0..len)
            .map(|i| {
                let precipitation_mm = series.precipitation_mm[i].filter(|p| p.is_finite());
                let hour = series.forecast_time.get(i).copied().flatten().map(|t| t.hour());
                match precipitation_mm {
                    Some(p) => PrecipBar {
                        hour,
                        precipitation_mm: Some(p),
                        height_pct: (p / PRECIP_SCALE_MAX_MM * 100.0)
                            .clamp(PRECIP_MIN_BAR_PCT, 100.0),
                        tier: PrecipTier::of(p),
                        show_label: p > 0.05,
                    },
                    None => PrecipBar {
                        hour,
                        precipitation_mm: None,
                        height_pct: PRECIP_MIN_BAR_PCT,
                        tier: PrecipTier::None,
                        show_label: false,
                    },
                }
            })
            .collect();

        let grid = PRECIP_GRID_STEPS
            .iter()
            .map(|value| (*value, value / PRECIP_SCALE_MAX_MM * 100.0))
            .collect();

        Some(Self { bars, grid })
    }
}
