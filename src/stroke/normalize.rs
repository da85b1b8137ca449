use crate::foundation::core::GlyphBox;
use crate::stroke::model::RawPoint;

/// Map canvas-pixel points into the font's em square.
///
/// `x' = (x - box.x) / box.w * em_size`, and likewise for `y` with `box.h`. Time and pressure
/// pass through. [`GlyphBox`] guarantees a positive extent, so no point is ever mapped to a
/// non-finite coordinate by this function.
pub fn to_em_space(points: &[RawPoint], glyph_box: &GlyphBox, em_size: f64) -> Vec<RawPoint> {
    points
        .iter()
        .map(|p| {
            let em = glyph_box.to_em(p.pos(), em_size);
            RawPoint {
                x: em.x,
                y: em.y,
                t: p.t,
                p: p.p,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/normalize.rs"]
mod tests;
