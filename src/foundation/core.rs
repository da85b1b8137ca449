use crate::foundation::error::{InkError, InkResult};

pub use kurbo::{BezPath, Point, Rect, Vec2};

/// Size of a capture or playback surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas, rejecting zero-sized or oversized surfaces.
    ///
    /// The upper bound matches what the CPU mask rasterizer can address (`u16`).
    pub fn new(width: u32, height: u32) -> InkResult<Self> {
        if width == 0 || height == 0 {
            return Err(InkError::validation("canvas width/height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(InkError::validation(format!(
                "canvas {width}x{height} exceeds {} pixels per side",
                u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    /// Length of the shorter side, in pixels.
    pub fn min_side(self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Rectangle on a canvas that the em square `[0, em] x [0, em]` maps onto.
///
/// Only constructible with a finite, strictly positive extent, so every map through it is
/// well defined.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "GlyphBoxDef", into = "GlyphBoxDef")]
pub struct GlyphBox {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
struct GlyphBoxDef {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl GlyphBox {
    /// Create a validated glyph box.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> InkResult<Self> {
        let extent_ok = w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0;
        if !extent_ok {
            return Err(InkError::InvalidGlyphBox { w, h });
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(InkError::validation("glyph box origin must be finite"));
        }
        Ok(Self { x, y, w, h })
    }

    /// Left edge on the canvas.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Top edge on the canvas.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Width on the canvas (> 0).
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Height on the canvas (> 0).
    pub fn h(&self) -> f64 {
        self.h
    }

    /// The box as a kurbo rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    /// Map a canvas-pixel position into em units.
    pub fn to_em(&self, p: Point, em_size: f64) -> Point {
        Point::new(
            (p.x - self.x) / self.w * em_size,
            (p.y - self.y) / self.h * em_size,
        )
    }

    /// Map an em-space position back onto the canvas.
    pub fn from_em(&self, p: Point, em_size: f64) -> Point {
        Point::new(
            self.x + p.x / em_size * self.w,
            self.y + p.y / em_size * self.h,
        )
    }
}

impl TryFrom<GlyphBoxDef> for GlyphBox {
    type Error = InkError;

    fn try_from(d: GlyphBoxDef) -> Result<Self, Self::Error> {
        Self::new(d.x, d.y, d.w, d.h)
    }
}

impl From<GlyphBox> for GlyphBoxDef {
    fn from(b: GlyphBox) -> Self {
        Self {
            x: b.x,
            y: b.y,
            w: b.w,
            h: b.h,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
