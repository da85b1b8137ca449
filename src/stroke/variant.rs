use crate::foundation::core::GlyphBox;
use crate::foundation::error::{InkError, InkResult};
use crate::stroke::model::{RawPoint, ResampledPoint, Stroke, Variant, VariantId, VariantStats};
use crate::stroke::normalize::to_em_space;
use crate::stroke::resample::resample;

/// Geometry settings shared by capture and playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOpts {
    /// Resample spacing in canvas pixels.
    pub resample_step_px: f64,
    /// Em square size in font design units.
    pub em_size: f64,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            resample_step_px: 2.0,
            em_size: 1000.0,
        }
    }
}

impl PipelineOpts {
    /// Defaults overridden by `INKREVEAL_RESAMPLE_STEP_PX` and `INKREVEAL_EM_SIZE`.
    ///
    /// Unparseable or non-positive values are ignored.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(v) = env_positive_f64("INKREVEAL_RESAMPLE_STEP_PX") {
            opts.resample_step_px = v;
        }
        if let Some(v) = env_positive_f64("INKREVEAL_EM_SIZE") {
            opts.em_size = v;
        }
        opts
    }

    /// Reject non-finite or non-positive settings.
    pub fn validate(&self) -> InkResult<()> {
        if !(self.resample_step_px.is_finite() && self.resample_step_px > 0.0) {
            return Err(InkError::validation("resample_step_px must be finite and > 0"));
        }
        if !(self.em_size.is_finite() && self.em_size > 0.0) {
            return Err(InkError::validation("em_size must be finite and > 0"));
        }
        Ok(())
    }
}

fn env_positive_f64(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Options for [`build_variant`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOpts {
    /// Resample step and em size.
    pub pipeline: PipelineOpts,
    /// Initial `starred` flag of the built variant.
    pub starred: bool,
    /// Initial selection weight.
    pub weight: f64,
}

impl Default for BuildOpts {
    fn default() -> Self {
        Self {
            pipeline: PipelineOpts::default(),
            starred: false,
            weight: 1.0,
        }
    }
}

/// Turn raw canvas-pixel strokes into an immutable [`Variant`].
///
/// Each stroke is resampled in pixel space, mapped into em-space and parameterized by arc
/// length. Empty strokes are skipped; if nothing remains the capture is rejected with
/// [`InkError::EmptyCapture`].
#[tracing::instrument(skip(raw_strokes), fields(strokes = raw_strokes.len()))]
pub fn build_variant(
    raw_strokes: &[Vec<RawPoint>],
    glyph_box: &GlyphBox,
    opts: &BuildOpts,
) -> InkResult<Variant> {
    opts.pipeline.validate()?;
    if !opts.weight.is_finite() {
        return Err(InkError::validation("variant weight must be finite"));
    }

    let non_empty: Vec<&[RawPoint]> = raw_strokes
        .iter()
        .filter(|s| !s.is_empty())
        .map(Vec::as_slice)
        .collect();
    if non_empty.is_empty() {
        return Err(InkError::EmptyCapture);
    }

    let strokes: Vec<Stroke> = non_empty
        .iter()
        .map(|raw| process_stroke(raw, glyph_box, &opts.pipeline))
        .collect();

    let stats = VariantStats {
        duration_ms: raw_duration_ms(&non_empty),
        arc_len: strokes.iter().map(Stroke::arc_len).sum(),
    };

    let variant = Variant {
        id: VariantId::fresh(),
        starred: opts.starred,
        weight: opts.weight,
        strokes,
        stats,
    };
    tracing::debug!(
        id = %variant.id,
        resampled = variant.resampled_len(),
        duration_ms = variant.stats.duration_ms,
        arc_len = variant.stats.arc_len,
        "built variant"
    );
    Ok(variant)
}

/// Resample, normalize and arc-length parameterize one non-empty raw stroke.
pub fn process_stroke(raw: &[RawPoint], glyph_box: &GlyphBox, opts: &PipelineOpts) -> Stroke {
    let resampled_px = resample(raw, opts.resample_step_px);
    let points = to_em_space(&resampled_px, glyph_box, opts.em_size);
    let resampled = parameterize(&points);
    Stroke { points, resampled }
}

/// Compute per-point `dt`, `p` and cumulative arc length `s` for em-space points.
///
/// A single point yields one entry with `dt = 0, s = 0`; an empty slice yields nothing.
pub fn parameterize(points: &[RawPoint]) -> Vec<ResampledPoint> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(points.len());
    out.push(ResampledPoint {
        x: first.x,
        y: first.y,
        dt: 0.0,
        p: first.p,
        s: 0.0,
    });

    let mut s = 0.0;
    for w in points.windows(2) {
        let (a, b) = (&w[0], &w[1]);
        s += a.distance(b);
        out.push(ResampledPoint {
            x: b.x,
            y: b.y,
            dt: (b.t - a.t).max(0.0),
            p: b.p,
            s,
        });
    }
    out
}

fn raw_duration_ms(strokes: &[&[RawPoint]]) -> f64 {
    let mut min_t = f64::INFINITY;
    let mut max_t = f64::NEG_INFINITY;
    for p in strokes.iter().flat_map(|s| s.iter()) {
        min_t = min_t.min(p.t);
        max_t = max_t.max(p.t);
    }
    if min_t.is_finite() && max_t.is_finite() {
        (max_t - min_t).max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/variant.rs"]
mod tests;
