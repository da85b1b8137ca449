use crate::foundation::error::{InkError, InkResult};
use crate::playback::player::{PlaybackState, RevealPlayer, Tick};
use crate::playback::scheduler::{FrameScheduler, TaskId};
use crate::playback::timeline::{PlaybackOpts, PlaybackParams, RevealLayout};
use crate::render::backend::GlyphImage;
use crate::render::mask::MaskRenderer;
use crate::render::sink::{RevealSink, SinkConfig};
use crate::stroke::model::Variant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StepTask;

/// One output surface: a player, its renderer and the frame queue that drives it.
///
/// The host calls [`RevealView::on_display_frame`] once per display refresh. While playing,
/// exactly one step task is pending. Starting or stopping removes it before anything else
/// happens, so two playbacks never draw to the same sink.
#[derive(Debug)]
pub struct RevealView<S: RevealSink> {
    player: RevealPlayer,
    renderer: MaskRenderer,
    glyph: GlyphImage,
    scheduler: FrameScheduler<StepTask>,
    pending: Option<TaskId>,
    frame_idx: u64,
    sink_open: bool,
    sink: S,
}

impl<S: RevealSink> RevealView<S> {
    /// View revealing `glyph` on `layout.canvas`, pushing frames into `sink`.
    pub fn new(
        layout: RevealLayout,
        opts: PlaybackOpts,
        glyph: GlyphImage,
        sink: S,
    ) -> InkResult<Self> {
        if !glyph.fits(layout.canvas) {
            return Err(InkError::playback(format!(
                "glyph image {}x{} does not match canvas {}x{}",
                glyph.width(),
                glyph.height(),
                layout.canvas.width,
                layout.canvas.height
            )));
        }
        Ok(Self {
            renderer: MaskRenderer::new(layout.canvas)?,
            player: RevealPlayer::new(layout, opts),
            glyph,
            scheduler: FrameScheduler::new(),
            pending: None,
            frame_idx: 0,
            sink_open: false,
            sink,
        })
    }

    /// Playback state.
    pub fn state(&self) -> PlaybackState {
        self.player.state()
    }

    /// Underlying player.
    pub fn player(&self) -> &RevealPlayer {
        &self.player
    }

    /// Whether a step is queued for the next display frame.
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some_and(|id| self.scheduler.is_pending(id))
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the view, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Start revealing `variant`, cancelling whatever was playing.
    #[tracing::instrument(skip(self, variant), fields(variant = %variant.id))]
    pub fn start(&mut self, variant: &Variant, params: PlaybackParams, now_ms: f64) -> InkResult<()> {
        self.cancel_pending()?;
        self.player.play(variant, params, now_ms)?;
        self.open_session()
    }

    /// Restart the current variant with new parameters.
    pub fn set_params(&mut self, params: PlaybackParams, now_ms: f64) -> InkResult<()> {
        self.cancel_pending()?;
        self.player.set_params(params, now_ms)?;
        self.open_session()
    }

    /// Restart the current variant from the beginning.
    pub fn replay(&mut self, now_ms: f64) -> InkResult<()> {
        self.cancel_pending()?;
        self.player.replay(now_ms)?;
        self.open_session()
    }

    /// Cancel playback. The pending step is removed, so no further frame is drawn.
    pub fn stop(&mut self) -> InkResult<()> {
        self.cancel_pending()
    }

    /// Run the steps due on this display frame.
    pub fn on_display_frame(&mut self, now_ms: f64) -> InkResult<PlaybackState> {
        for (_id, StepTask) in self.scheduler.take_due() {
            self.pending = None;
            self.step(now_ms)?;
        }
        Ok(self.player.state())
    }

    fn step(&mut self, now_ms: f64) -> InkResult<()> {
        let tick = self.player.tick(now_ms);
        if let Some(reveal) = tick.frame() {
            let pixels = self.renderer.render(reveal, &self.glyph)?;
            self.sink.push_frame(self.frame_idx, reveal, &pixels)?;
            self.frame_idx += 1;
        }
        match tick {
            Tick::Frame(_) => self.schedule_step(),
            Tick::Completed(_) | Tick::Inactive => self.close_session()?,
        }
        Ok(())
    }

    fn open_session(&mut self) -> InkResult<()> {
        let canvas = self.player.layout().canvas;
        let total_ms = self.player.timeline().map_or(0.0, |t| t.total_ms());
        self.frame_idx = 0;
        self.sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            total_ms,
        })?;
        self.sink_open = true;
        self.schedule_step();
        Ok(())
    }

    fn schedule_step(&mut self) {
        self.pending = Some(self.scheduler.schedule(StepTask));
    }

    fn cancel_pending(&mut self) -> InkResult<()> {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
            tracing::debug!("pending frame cancelled");
        }
        self.player.stop();
        self.close_session()
    }

    fn close_session(&mut self) -> InkResult<()> {
        if self.sink_open {
            self.sink_open = false;
            self.sink.end()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/view.rs"]
mod tests;
