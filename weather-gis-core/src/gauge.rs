/// Top of the wind gauge scale, in m/s.
pub const WIND_GAUGE_MAX_MPS: f64 = 15.0;

/// Stroke circumference of the gauge arc (r = 45 in a 100x100 box).
pub const GAUGE_CIRCUMFERENCE: f64 = 283.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTier {
    Normal,
    Warning,
    Danger,
}

impl ColorTier {
    pub fn of(value: f64) -> Self {
        if value > 10.0 {
            ColorTier::Danger
        } else if value > 5.0 {
            ColorTier::Warning
        } else {
            ColorTier::Normal
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ColorTier::Normal => "#10B981",
            ColorTier::Warning => "#ffc400",
            ColorTier::Danger => "#FF4D4D",
        }
    }
}

/// A circular gauge reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gauge {
    /// The displayed value; 0 when the input was missing.
    pub value: f64,
    /// Filled part of the circle, in `0.0..=1.0`.
    pub fraction: f64,
    pub tier: ColorTier,
}

impl Gauge {
    pub fn new(value: Option<f64>, max_value: f64) -> Self {
        let value = value.filter(|v| v.is_finite()).unwrap_or(0.0);
        let fraction = if max_value > 0.0 && max_value.is_finite() {
            (value / max_value).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self { value, fraction, tier: ColorTier::of(value) }
    }

    pub fn wind(speed_mps: Option<f64>) -> Self {
        Self::new(speed_mps, WIND_GAUGE_MAX_MPS)
    }

    /// `stroke-dashoffset` for an arc of [`GAUGE_CIRCUMFERENCE`].
    pub fn dash_offset(&self) -> f64 {
        GAUGE_CIRCUMFERENCE * (1.0 - self.fraction)
    }
}
