use crate::foundation::core::Canvas;

const BASE_WIDTH_MIN_PX: f64 = 6.0;
const BASE_WIDTH_MAX_PX: f64 = 22.0;
const BASE_WIDTH_CANVAS_FRACTION: f64 = 0.04;
const PRESSURE_FLOOR: f64 = 0.6;
const SPEED_DAMPING: f64 = 0.02;
/// Speed is measured in em units travelled per this many milliseconds.
const SPEED_WINDOW_MS: f64 = 100.0;

/// Base stroke width for a canvas: 4% of the shorter side, clamped to `[6, 22]` px.
pub fn base_width_px(canvas: Canvas) -> f64 {
    (canvas.min_side() * BASE_WIDTH_CANVAS_FRACTION).clamp(BASE_WIDTH_MIN_PX, BASE_WIDTH_MAX_PX)
}

/// Local drawing speed over a segment that advanced `ds` em units in `dt` ms.
pub fn speed_term(ds: f64, dt: f64) -> f64 {
    (ds.max(0.0) / dt.max(1.0)) * SPEED_WINDOW_MS
}

/// Pressure- and speed-responsive stroke width.
///
/// `width = base * (0.6 + gain * pressure) / max(1, speed * 0.02)`: heavier pressure widens,
/// faster motion thins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WidthModel {
    base_px: f64,
    gain01: f64,
}

impl WidthModel {
    /// Model for `canvas` with a width gain given in percent.
    pub fn new(canvas: Canvas, width_gain: f64) -> Self {
        Self {
            base_px: base_width_px(canvas),
            gain01: width_gain / 100.0,
        }
    }

    /// Base width in pixels.
    pub fn base_px(&self) -> f64 {
        self.base_px
    }

    /// Width of a segment whose trailing point has `pressure`, covering `ds` em in `dt` ms.
    pub fn width(&self, pressure: f64, ds: f64, dt: f64) -> f64 {
        let numer = PRESSURE_FLOOR + self.gain01 * pressure;
        let denom = (speed_term(ds, dt) * SPEED_DAMPING).max(1.0);
        (self.base_px * numer / denom).max(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/width.rs"]
mod tests;
