use crate::capture::buffer::CaptureBuffer;
use crate::dataset::model::{Dataset, GlyphMetrics};
use crate::foundation::core::{Canvas, GlyphBox, Point};
use crate::foundation::error::{InkError, InkResult};
use crate::stroke::model::Variant;
use crate::stroke::variant::{BuildOpts, PipelineOpts, build_variant};

/// Supplies the on-canvas box of a character's em square (font layout lives elsewhere).
pub trait GlyphBoxSource {
    /// Box for `ch` on a canvas of the given size.
    fn glyph_box(&self, ch: char, canvas: Canvas) -> InkResult<GlyphBox>;
}

impl GlyphBoxSource for GlyphBox {
    fn glyph_box(&self, _ch: char, _canvas: Canvas) -> InkResult<GlyphBox> {
        Ok(*self)
    }
}

impl<F> GlyphBoxSource for F
where
    F: Fn(char, Canvas) -> InkResult<GlyphBox>,
{
    fn glyph_box(&self, ch: char, canvas: Canvas) -> InkResult<GlyphBox> {
        self(ch, canvas)
    }
}

/// Supplies per-character font metrics, persisted next to captured variants.
pub trait GlyphMetricsSource {
    /// Metrics for `ch`, when the font has the glyph.
    fn metrics(&self, ch: char) -> Option<GlyphMetrics>;
}

impl GlyphMetricsSource for GlyphMetrics {
    fn metrics(&self, _ch: char) -> Option<GlyphMetrics> {
        Some(*self)
    }
}

/// Session-level settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOpts {
    /// Geometry settings for built variants.
    pub pipeline: PipelineOpts,
    /// `starred` flag given to variants approved through the session.
    pub star_on_approve: bool,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            pipeline: PipelineOpts::default(),
            star_on_approve: true,
        }
    }
}

/// Capture context for one character on one canvas.
///
/// Holds the in-progress strokes and at most one candidate variant waiting to be accepted or
/// redone.
#[derive(Debug)]
pub struct CaptureSession {
    character: char,
    canvas: Canvas,
    glyph_box: GlyphBox,
    opts: SessionOpts,
    buffer: CaptureBuffer,
    candidate: Option<Variant>,
}

impl CaptureSession {
    /// Open a session for `character`, resolving its glyph box for `canvas`.
    pub fn new(
        character: char,
        canvas: Canvas,
        origin: Point,
        boxes: &dyn GlyphBoxSource,
        opts: SessionOpts,
    ) -> InkResult<Self> {
        opts.pipeline.validate()?;
        let glyph_box = boxes.glyph_box(character, canvas)?;
        Ok(Self {
            character,
            canvas,
            glyph_box,
            opts,
            buffer: CaptureBuffer::new(origin),
            candidate: None,
        })
    }

    /// Character being captured.
    pub fn character(&self) -> char {
        self.character
    }

    /// Canvas the capture is drawn on.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Glyph box strokes are normalized against.
    pub fn glyph_box(&self) -> &GlyphBox {
        &self.glyph_box
    }

    /// Session settings.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// Input side of the session.
    pub fn capture(&mut self) -> &mut CaptureBuffer {
        &mut self.buffer
    }

    /// Read-only view of the capture.
    pub fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }

    /// Whether approval is currently possible.
    pub fn can_approve(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Build a candidate variant from the current capture, replacing any previous candidate.
    pub fn approve(&mut self) -> InkResult<&Variant> {
        let build = BuildOpts {
            pipeline: self.opts.pipeline,
            starred: self.opts.star_on_approve,
            weight: 1.0,
        };
        let variant = build_variant(&self.buffer.snapshot(), &self.glyph_box, &build)?;
        Ok(self.candidate.insert(variant))
    }

    /// Candidate awaiting accept or redo.
    pub fn candidate(&self) -> Option<&Variant> {
        self.candidate.as_ref()
    }

    /// Discard the candidate and the capture so the character can be drawn again.
    pub fn redo(&mut self) {
        self.candidate = None;
        self.buffer.clear();
    }

    /// Move the candidate into `dataset` and start a fresh capture.
    ///
    /// Metrics are filled from `metrics` only when the entry has none yet.
    pub fn accept(
        &mut self,
        dataset: &mut Dataset,
        metrics: Option<&dyn GlyphMetricsSource>,
    ) -> InkResult<Variant> {
        let variant = self
            .candidate
            .clone()
            .ok_or_else(|| InkError::validation("no candidate variant to accept"))?;
        dataset.insert_variant(self.character, variant.clone())?;

        let entry = dataset.entry_mut(self.character);
        if entry.metrics == GlyphMetrics::default() {
            if let Some(m) = metrics.and_then(|src| src.metrics(self.character)) {
                entry.metrics = m;
            }
        }
        self.candidate = None;
        self.buffer.clear();
        tracing::debug!(ch = %self.character, id = %variant.id, "accepted variant");
        Ok(variant)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
