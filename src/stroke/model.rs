use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::foundation::core::Point;

/// Default pressure for devices that report none.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// One sampled pointer position.
///
/// `t` is milliseconds since capture start; `p` is pressure in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawPoint {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Timestamp in milliseconds.
    pub t: f64,
    /// Pressure in `[0, 1]`.
    pub p: f64,
}

impl RawPoint {
    /// Create a point.
    pub fn new(x: f64, y: f64, t: f64, p: f64) -> Self {
        Self { x, y, t, p }
    }

    /// Position as a kurbo point.
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Euclidean distance to `other`, ignoring time and pressure.
    pub fn distance(&self, other: &RawPoint) -> f64 {
        self.pos().distance(other.pos())
    }
}

/// A point of a constant-spacing stroke in em-space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResampledPoint {
    /// Horizontal position in em units.
    pub x: f64,
    /// Vertical position in em units.
    pub y: f64,
    /// Milliseconds since the previous point of the same stroke (0 for the first).
    pub dt: f64,
    /// Pressure in `[0, 1]`.
    pub p: f64,
    /// Cumulative arc length from stroke start, in em units.
    pub s: f64,
}

impl ResampledPoint {
    /// Position as a kurbo point.
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A processed stroke: em-space points plus their arc-length parameterization.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stroke {
    /// Resampled points mapped to em-space, absolute timestamps kept.
    pub points: Vec<RawPoint>,
    /// Arc-length parameterized points; never empty for a built variant.
    pub resampled: Vec<ResampledPoint>,
}

impl Stroke {
    /// Arc length of the stroke in em units.
    pub fn arc_len(&self) -> f64 {
        self.resampled.last().map_or(0.0, |p| p.s)
    }

    /// Timestamp of the first em-space point, if any.
    pub fn start_t(&self) -> Option<f64> {
        self.points.first().map(|p| p.t)
    }

    /// Timestamp of the last em-space point, if any.
    pub fn end_t(&self) -> Option<f64> {
        self.points.last().map(|p| p.t)
    }
}

/// Summary statistics of a variant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantStats {
    /// Last raw timestamp minus first raw timestamp, across all strokes.
    pub duration_ms: f64,
    /// Sum of per-stroke arc lengths, in em units.
    pub arc_len: f64,
}

/// Opaque, unique variant identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub String);

impl VariantId {
    /// Produce a process-unique identifier: wall-clock millis plus a monotonic counter.
    pub fn fresh() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        Self(format!("v{millis:x}-{n:04x}"))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recorded take of tracing a character.
///
/// Immutable once built; a redo produces a new variant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Variant {
    /// Unique identifier.
    pub id: VariantId,
    /// Whether the user marked this take as preferred.
    pub starred: bool,
    /// Selection weight when sampling among variants.
    pub weight: f64,
    /// Strokes in drawing order.
    pub strokes: Vec<Stroke>,
    /// Summary statistics.
    pub stats: VariantStats,
}

impl Variant {
    /// Total number of resampled points across strokes.
    pub fn resampled_len(&self) -> usize {
        self.strokes.iter().map(|s| s.resampled.len()).sum()
    }

    /// Number of drawable segments (consecutive resampled pairs within a stroke).
    pub fn segment_count(&self) -> usize {
        self.strokes
            .iter()
            .map(|s| s.resampled.len().saturating_sub(1))
            .sum()
    }

    /// A copy with a different `starred` flag and the same identity.
    pub fn with_starred(&self, starred: bool) -> Self {
        Self {
            starred,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/model.rs"]
mod tests;
