/// Easing curves for the glyph alpha ramp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Constant rate.
    Linear,
    /// Quadratic ease-out.
    OutQuad,
    /// Cubic ease-out.
    #[default]
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Hermite smoothstep.
    Smoothstep,
}

impl Ease {
    /// Map progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }

    /// Parse a curve name as used on the command line.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "out_quad" | "outquad" => Some(Self::OutQuad),
            "out_cubic" | "outcubic" => Some(Self::OutCubic),
            "in_out_cubic" | "inoutcubic" => Some(Self::InOutCubic),
            "smoothstep" => Some(Self::Smoothstep),
            _ => None,
        }
    }
}

/// Short opacity ramp of the glyph once its reveal has begun ("ink lag").
///
/// Only opacity is affected; mask geometry and timing are independent of it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlphaRamp {
    /// Ramp length in animation milliseconds; `0` disables the ramp.
    pub duration_ms: f64,
    /// Curve applied to ramp progress.
    pub curve: Ease,
}

impl Default for AlphaRamp {
    fn default() -> Self {
        Self {
            duration_ms: 90.0,
            curve: Ease::OutCubic,
        }
    }
}

impl AlphaRamp {
    /// Glyph opacity `since_ms` after the first segment started revealing.
    ///
    /// Negative `since_ms` means the reveal has not begun.
    pub fn alpha_at(&self, since_ms: f64) -> f64 {
        if since_ms < 0.0 {
            return 0.0;
        }
        if !(self.duration_ms > 0.0) {
            return 1.0;
        }
        self.curve.apply(since_ms / self.duration_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
