use crate::animation::ease::AlphaRamp;
use crate::foundation::core::{Canvas, GlyphBox, Point};
use crate::foundation::error::{InkError, InkResult};
use crate::foundation::math::{Fnv1a64, lerp};
use crate::playback::width::WidthModel;
use crate::stroke::model::Variant;

/// How pauses between strokes are treated on the playback clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenLiftGaps {
    /// Strokes follow each other without pause.
    #[default]
    Compress,
    /// The recorded pause before each later stroke is replayed.
    Preserve,
}

/// Caller-facing playback parameters. Changing them restarts playback.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlaybackParams {
    /// Multiplier from wall-clock to animation time (> 0).
    pub speed: f64,
    /// Pressure contribution to stroke width, in percent.
    pub width_gain: f64,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            speed: 1.0,
            width_gain: 50.0,
        }
    }
}

impl PlaybackParams {
    /// Reject a non-positive speed or a non-finite gain.
    pub fn validate(&self) -> InkResult<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(InkError::playback(format!(
                "speed multiplier must be finite and > 0 (got {})",
                self.speed
            )));
        }
        if !self.width_gain.is_finite() {
            return Err(InkError::playback("width gain must be finite"));
        }
        Ok(())
    }
}

/// Engine-level playback settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlaybackOpts {
    /// Animation time past the last arrival before playback completes.
    pub settle_ms: f64,
    /// Glyph opacity ramp once revealing starts.
    pub alpha: AlphaRamp,
    /// Treatment of pen-lift pauses.
    pub pen_lift: PenLiftGaps,
}

impl Default for PlaybackOpts {
    fn default() -> Self {
        Self {
            settle_ms: 16.0,
            alpha: AlphaRamp::default(),
            pen_lift: PenLiftGaps::Compress,
        }
    }
}

/// Where a variant is revealed: the output canvas and the glyph's box on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealLayout {
    /// Output surface size.
    pub canvas: Canvas,
    /// Box of the em square on the canvas.
    pub glyph_box: GlyphBox,
    /// Em size the variant was normalized with.
    pub em_size: f64,
}

impl RevealLayout {
    fn to_canvas(&self, x: f64, y: f64) -> Point {
        self.glyph_box.from_em(Point::new(x, y), self.em_size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TimedSegment {
    a: Point,
    b: Point,
    start_ms: f64,
    dt: f64,
    arrival_ms: f64,
    width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TimedDot {
    at: Point,
    at_ms: f64,
    width: f64,
}

/// A (sub)segment to stroke in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawnSegment {
    /// Start point.
    pub from: Point,
    /// End point (interpolated for a partial segment).
    pub to: Point,
    /// Stroke width in pixels.
    pub width: f64,
}

/// A single-point stroke, drawn as a disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawnDot {
    /// Centre in canvas pixels.
    pub at: Point,
    /// Diameter in pixels.
    pub width: f64,
}

/// Everything visible at one instant of animation time.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealFrame {
    /// Animation time this frame was computed for.
    pub elapsed_ms: f64,
    /// Revealed segments in drawing order; the last may be partial.
    pub segments: Vec<DrawnSegment>,
    /// Revealed single-point strokes.
    pub dots: Vec<DrawnDot>,
    /// Glyph opacity in `[0, 1]`, applied on top of the mask.
    pub glyph_alpha: f64,
    /// Number of fully revealed segments.
    pub full_segments: usize,
    /// Fraction of the in-progress segment, when one is partially revealed.
    pub partial: Option<f64>,
    /// Number of segments in the variant.
    pub total_segments: usize,
}

impl RevealFrame {
    /// Revealed share of the segments, in `[0, 1]`. Variants without segments count as done
    /// once anything is shown.
    pub fn progress(&self) -> f64 {
        if self.total_segments == 0 {
            return if self.dots.is_empty() { 0.0 } else { 1.0 };
        }
        let done = self.full_segments as f64 + self.partial.unwrap_or(0.0);
        (done / self.total_segments as f64).clamp(0.0, 1.0)
    }

    /// `true` when every segment is fully revealed.
    pub fn is_complete(&self) -> bool {
        self.full_segments == self.total_segments && self.partial.is_none()
    }

    /// Stable hash of the drawn geometry, widths and glyph alpha.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u64(self.segments.len() as u64);
        for s in &self.segments {
            for v in [s.from.x, s.from.y, s.to.x, s.to.y, s.width] {
                h.write_f64(v);
            }
        }
        h.write_u64(self.dots.len() as u64);
        for d in &self.dots {
            for v in [d.at.x, d.at.y, d.width] {
                h.write_f64(v);
            }
        }
        h.write_f64(self.glyph_alpha);
        h.finish()
    }
}

/// Precomputed playback schedule of one variant.
///
/// All strokes are concatenated on one clock in drawing order. Each segment starts when the
/// previous one arrives and takes its trailing point's `dt`.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealTimeline {
    segments: Vec<TimedSegment>,
    dots: Vec<TimedDot>,
    total_ms: f64,
    first_start_ms: Option<f64>,
    alpha: AlphaRamp,
}

impl RevealTimeline {
    /// Schedule `variant` for `layout` with the given parameters.
    pub fn new(
        variant: &Variant,
        layout: &RevealLayout,
        params: &PlaybackParams,
        opts: &PlaybackOpts,
    ) -> InkResult<Self> {
        params.validate()?;
        if !(layout.em_size.is_finite() && layout.em_size > 0.0) {
            return Err(InkError::playback("layout em_size must be finite and > 0"));
        }
        let widths = WidthModel::new(layout.canvas, params.width_gain);

        let mut segments = Vec::with_capacity(variant.segment_count());
        let mut dots = Vec::new();
        let mut clock = 0.0;
        let mut prev_end_t: Option<f64> = None;

        for stroke in &variant.strokes {
            if opts.pen_lift == PenLiftGaps::Preserve {
                if let (Some(prev), Some(start)) = (prev_end_t, stroke.start_t()) {
                    clock += (start - prev).max(0.0);
                }
            }
            prev_end_t = stroke.end_t().or(prev_end_t);

            if let [only] = stroke.resampled.as_slice() {
                dots.push(TimedDot {
                    at: layout.to_canvas(only.x, only.y),
                    at_ms: clock,
                    width: widths.width(only.p, 0.0, 0.0),
                });
                continue;
            }

            for w in stroke.resampled.windows(2) {
                let (a, b) = (&w[0], &w[1]);
                let dt = b.dt.max(0.0);
                let start_ms = clock;
                clock += dt;
                segments.push(TimedSegment {
                    a: layout.to_canvas(a.x, a.y),
                    b: layout.to_canvas(b.x, b.y),
                    start_ms,
                    dt,
                    arrival_ms: clock,
                    width: widths.width(b.p, b.s - a.s, b.dt),
                });
            }
        }

        let first_start_ms = match (segments.first(), dots.first()) {
            (Some(s), Some(d)) => Some(s.start_ms.min(d.at_ms)),
            (Some(s), None) => Some(s.start_ms),
            (None, Some(d)) => Some(d.at_ms),
            (None, None) => None,
        };

        let last_arrival = segments.last().map_or(0.0, |s| s.arrival_ms);
        let last_dot = dots.iter().map(|d| d.at_ms).fold(0.0, f64::max);

        Ok(Self {
            total_ms: last_arrival.max(last_dot),
            segments,
            dots,
            first_start_ms,
            alpha: opts.alpha,
        })
    }

    /// Time at which the last segment arrives or the last dot is placed.
    pub fn total_ms(&self) -> f64 {
        self.total_ms
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of single-point strokes.
    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }

    /// Compute what is visible at animation time `elapsed_ms`.
    ///
    /// Pure: identical inputs give bit-identical frames. Nothing is revealed at or before 0.
    pub fn reveal_at(&self, elapsed_ms: f64) -> RevealFrame {
        let mut frame = RevealFrame {
            elapsed_ms,
            segments: Vec::new(),
            dots: Vec::new(),
            glyph_alpha: 0.0,
            full_segments: 0,
            partial: None,
            total_segments: self.segments.len(),
        };
        if !(elapsed_ms > 0.0) {
            return frame;
        }

        for seg in &self.segments {
            if elapsed_ms >= seg.arrival_ms {
                frame.segments.push(DrawnSegment {
                    from: seg.a,
                    to: seg.b,
                    width: seg.width,
                });
                frame.full_segments += 1;
                continue;
            }
            let ratio = ((elapsed_ms - seg.start_ms) / seg.dt.max(1.0)).clamp(0.0, 1.0);
            if ratio > 0.0 {
                frame.segments.push(DrawnSegment {
                    from: seg.a,
                    to: Point::new(lerp(seg.a.x, seg.b.x, ratio), lerp(seg.a.y, seg.b.y, ratio)),
                    width: seg.width,
                });
                frame.partial = Some(ratio);
            }
            break;
        }

        frame.dots = self
            .dots
            .iter()
            .filter(|d| elapsed_ms > d.at_ms)
            .map(|d| DrawnDot {
                at: d.at,
                width: d.width,
            })
            .collect();

        let anything = !frame.segments.is_empty() || !frame.dots.is_empty();
        if let (true, Some(first)) = (anything, self.first_start_ms) {
            frame.glyph_alpha = self.alpha.alpha_at(elapsed_ms - first);
        }
        frame
    }

    /// Everything revealed at full glyph opacity, stamped with `elapsed_ms`.
    pub fn full_reveal(&self, elapsed_ms: f64) -> RevealFrame {
        let mut frame = self.reveal_at(f64::INFINITY);
        frame.elapsed_ms = elapsed_ms;
        frame
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/timeline.rs"]
mod tests;
