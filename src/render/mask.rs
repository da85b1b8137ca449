use kurbo::{Cap, Circle, Join, Line, Shape, StrokeOpts};

use crate::foundation::core::{BezPath, Canvas};
use crate::foundation::error::{InkError, InkResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8};
use crate::playback::timeline::RevealFrame;
use crate::render::backend::{FrameRGBA, GlyphImage};

const PATH_TOLERANCE: f64 = 0.1;
const DEGENERATE_LEN: f64 = 1e-6;

/// CPU rasterizer for reveal masks.
///
/// Each revealed (sub)segment becomes a round-capped, round-joined stroke outline filled into a
/// `vello_cpu` pixmap. The mask's alpha then restricts a pre-rendered [`GlyphImage`].
pub struct MaskRenderer {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    mask: vello_cpu::Pixmap,
}

impl std::fmt::Debug for MaskRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskRenderer")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl MaskRenderer {
    /// Renderer for surfaces of size `canvas`.
    pub fn new(canvas: Canvas) -> InkResult<Self> {
        let (w, h) = canvas_u16(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            mask: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Rasterize the revealed geometry of `frame`; returns premultiplied RGBA8 mask bytes.
    pub fn rasterize_mask(&mut self, frame: &RevealFrame) -> InkResult<&[u8]> {
        self.ctx.reset();
        self.mask.data_as_u8_slice_mut().fill(0);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));

        for seg in &frame.segments {
            let outline = segment_outline(seg.from, seg.to, seg.width);
            self.ctx.fill_path(&bezpath_to_cpu(&outline));
        }
        for dot in &frame.dots {
            let disc = Circle::new(dot.at, dot.width * 0.5).to_path(PATH_TOLERANCE);
            self.ctx.fill_path(&bezpath_to_cpu(&disc));
        }

        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.mask);
        Ok(self.mask.data_as_u8_slice())
    }

    /// Render `frame` over `glyph`: glyph pixels scaled by mask coverage and glyph alpha.
    pub fn render(&mut self, frame: &RevealFrame, glyph: &GlyphImage) -> InkResult<FrameRGBA> {
        if !glyph.fits(self.canvas) {
            return Err(InkError::playback(format!(
                "glyph image {}x{} does not match canvas {}x{}",
                glyph.width(),
                glyph.height(),
                self.canvas.width,
                self.canvas.height
            )));
        }
        let alpha = unit_to_u8(frame.glyph_alpha);
        let mut data = vec![0u8; self.canvas.rgba_len()];
        let mask = self.rasterize_mask(frame)?;
        apply_reveal_mask(glyph.data(), mask, alpha, &mut data);
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }
}

/// `dst = src * mask.alpha * alpha`, all premultiplied RGBA8.
pub(crate) fn apply_reveal_mask(src: &[u8], mask: &[u8], alpha: u8, dst: &mut [u8]) {
    debug_assert_eq!(src.len(), mask.len());
    debug_assert_eq!(src.len(), dst.len());

    let a16 = u16::from(alpha);
    for ((s, m), d) in src
        .chunks_exact(4)
        .zip(mask.chunks_exact(4))
        .zip(dst.chunks_exact_mut(4))
    {
        let w16 = u16::from(mul_div255_u8(u16::from(m[3]), a16));
        d[0] = mul_div255_u8(u16::from(s[0]), w16);
        d[1] = mul_div255_u8(u16::from(s[1]), w16);
        d[2] = mul_div255_u8(u16::from(s[2]), w16);
        d[3] = mul_div255_u8(u16::from(s[3]), w16);
    }
}

fn segment_outline(from: kurbo::Point, to: kurbo::Point, width: f64) -> BezPath {
    if from.distance(to) < DEGENERATE_LEN {
        return Circle::new(from, width * 0.5).to_path(PATH_TOLERANCE);
    }
    let style = kurbo::Stroke::new(width)
        .with_caps(Cap::Round)
        .with_join(Join::Round);
    kurbo::stroke(
        Line::new(from, to).path_elements(PATH_TOLERANCE),
        &style,
        &StrokeOpts::default(),
        PATH_TOLERANCE,
    )
}

fn canvas_u16(canvas: Canvas) -> InkResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| InkError::playback("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| InkError::playback("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
