use std::io::Write;

use crate::foundation::error::{InkError, InkResult};
use crate::playback::timeline::RevealFrame;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`RevealSink`] when a playback starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Animation time of the last segment arrival.
    pub total_ms: f64,
}

/// Consumer of rendered reveal frames.
///
/// Ordering contract: within one `begin`/`end` pair, `push_frame` is called with strictly
/// increasing indices. A playback that is cancelled still gets its `end`.
pub trait RevealSink {
    /// Called once when a playback starts.
    fn begin(&mut self, cfg: SinkConfig) -> InkResult<()>;
    /// Push one frame; `reveal` is the geometry the pixels were rendered from.
    fn push_frame(&mut self, idx: u64, reveal: &RevealFrame, frame: &FrameRGBA) -> InkResult<()>;
    /// Called once when the playback completes or is cancelled.
    fn end(&mut self) -> InkResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Frames in push order.
    pub(crate) frames: Vec<(u64, FrameRGBA)>,
    /// Reveal fingerprints, parallel to `frames`.
    pub(crate) fingerprints: Vec<u64>,
    sessions_ended: usize,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    /// Fingerprints of the reveal geometry of each captured frame.
    pub fn fingerprints(&self) -> &[u64] {
        &self.fingerprints
    }

    /// How many playbacks have ended on this sink.
    pub fn sessions_ended(&self) -> usize {
        self.sessions_ended
    }
}

impl RevealSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> InkResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.fingerprints.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, reveal: &RevealFrame, frame: &FrameRGBA) -> InkResult<()> {
        self.frames.push((idx, frame.clone()));
        self.fingerprints.push(reveal.fingerprint());
        Ok(())
    }

    fn end(&mut self) -> InkResult<()> {
        self.sessions_ended += 1;
        Ok(())
    }
}

/// Writes one progress line per frame; pixels are ignored.
#[derive(Debug)]
pub struct ProgressLog<W: Write> {
    out: W,
    frames: u64,
}

impl<W: Write> ProgressLog<W> {
    /// Log to `out`.
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    /// Frames logged since the last `begin`.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) -> InkResult<()> {
        writeln!(self.out, "{args}").map_err(|e| InkError::io(format!("progress log: {e}")))
    }
}

impl<W: Write> RevealSink for ProgressLog<W> {
    fn begin(&mut self, cfg: SinkConfig) -> InkResult<()> {
        self.frames = 0;
        self.line(format_args!(
            "begin {}x{} total={:.1}ms",
            cfg.width, cfg.height, cfg.total_ms
        ))
    }

    fn push_frame(&mut self, idx: u64, reveal: &RevealFrame, _frame: &FrameRGBA) -> InkResult<()> {
        self.frames += 1;
        self.line(format_args!(
            "frame {idx:>4} t={:>8.1}ms progress={:.3} segments={}/{} alpha={:.3} fp={:016x}",
            reveal.elapsed_ms,
            reveal.progress(),
            reveal.full_segments,
            reveal.total_segments,
            reveal.glyph_alpha,
            reveal.fingerprint()
        ))
    }

    fn end(&mut self) -> InkResult<()> {
        let n = self.frames;
        self.line(format_args!("end frames={n}"))?;
        self.out
            .flush()
            .map_err(|e| InkError::io(format!("progress log: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
