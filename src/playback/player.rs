use crate::foundation::error::{InkError, InkResult};
use crate::playback::timeline::{
    PlaybackOpts, PlaybackParams, RevealFrame, RevealLayout, RevealTimeline,
};
use crate::stroke::model::Variant;

/// Lifecycle of a [`RevealPlayer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing has been played yet.
    Idle,
    /// A reveal is in progress.
    Playing,
    /// The last reveal ran to the end.
    Completed,
    /// The last reveal was cancelled or superseded.
    Stopped,
}

/// Result of advancing the player to a wall-clock instant.
#[derive(Clone, Debug, PartialEq)]
pub enum Tick {
    /// Not playing; nothing to draw and nothing to schedule.
    Inactive,
    /// Still playing; draw this frame and schedule another tick.
    Frame(RevealFrame),
    /// Finished with this (full) frame; do not schedule again.
    Completed(RevealFrame),
}

impl Tick {
    /// Frame to draw, if any.
    pub fn frame(&self) -> Option<&RevealFrame> {
        match self {
            Self::Inactive => None,
            Self::Frame(f) | Self::Completed(f) => Some(f),
        }
    }

    /// Whether the host should schedule another tick.
    pub fn wants_next(&self) -> bool {
        matches!(self, Self::Frame(_))
    }
}

#[derive(Clone, Debug)]
struct Active {
    variant: Variant,
    params: PlaybackParams,
    timeline: RevealTimeline,
    start_ms: f64,
}

/// Reveal state machine: `Idle -> Playing -> (Completed | Stopped)`.
///
/// Wall-clock time is passed in by the caller, so the player itself never reads a clock. A
/// new `play` always supersedes the previous one; there is no pause/resume, only restart.
#[derive(Clone, Debug)]
pub struct RevealPlayer {
    layout: RevealLayout,
    opts: PlaybackOpts,
    state: PlaybackState,
    active: Option<Active>,
}

impl RevealPlayer {
    /// Player for one output surface.
    pub fn new(layout: RevealLayout, opts: PlaybackOpts) -> Self {
        Self {
            layout,
            opts,
            state: PlaybackState::Idle,
            active: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Output layout.
    pub fn layout(&self) -> &RevealLayout {
        &self.layout
    }

    /// Engine settings.
    pub fn opts(&self) -> &PlaybackOpts {
        &self.opts
    }

    /// Parameters of the current (or last) playback.
    pub fn params(&self) -> Option<PlaybackParams> {
        self.active.as_ref().map(|a| a.params)
    }

    /// Timeline of the current (or last) playback.
    pub fn timeline(&self) -> Option<&RevealTimeline> {
        self.active.as_ref().map(|a| &a.timeline)
    }

    /// Start revealing `variant` at wall-clock `now_ms`, superseding any running playback.
    #[tracing::instrument(skip(self, variant), fields(variant = %variant.id))]
    pub fn play(&mut self, variant: &Variant, params: PlaybackParams, now_ms: f64) -> InkResult<()> {
        let timeline = RevealTimeline::new(variant, &self.layout, &params, &self.opts)?;
        if self.state == PlaybackState::Playing {
            tracing::debug!("superseding running playback");
        }
        tracing::debug!(
            total_ms = timeline.total_ms(),
            segments = timeline.segment_count(),
            "playback started"
        );
        self.active = Some(Active {
            variant: variant.clone(),
            params,
            timeline,
            start_ms: now_ms,
        });
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Restart the last variant from elapsed time 0.
    pub fn replay(&mut self, now_ms: f64) -> InkResult<()> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| InkError::playback("nothing to replay"))?;
        active.start_ms = now_ms;
        self.state = PlaybackState::Playing;
        tracing::debug!("playback restarted");
        Ok(())
    }

    /// Swap parameters and restart from elapsed time 0.
    pub fn set_params(&mut self, params: PlaybackParams, now_ms: f64) -> InkResult<()> {
        let variant = self
            .active
            .as_ref()
            .map(|a| a.variant.clone())
            .ok_or_else(|| InkError::playback("no variant loaded"))?;
        self.play(&variant, params, now_ms)
    }

    /// Cancel a running playback. Progress is discarded.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Stopped;
            tracing::debug!("playback stopped");
        }
    }

    /// Animation time at `now_ms`, while playing.
    pub fn elapsed_at(&self, now_ms: f64) -> Option<f64> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        self.active
            .as_ref()
            .map(|a| ((now_ms - a.start_ms) * a.params.speed).max(0.0))
    }

    /// Advance to wall-clock `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> Tick {
        let (Some(elapsed), Some(active)) = (self.elapsed_at(now_ms), self.active.as_ref()) else {
            return Tick::Inactive;
        };
        let tl = &active.timeline;
        // Dot-only variants have nothing to settle.
        let settle = if tl.segment_count() == 0 {
            0.0
        } else {
            self.opts.settle_ms
        };
        let done = elapsed >= tl.total_ms() + settle;
        if done {
            let frame = tl.full_reveal(elapsed);
            self.state = PlaybackState::Completed;
            tracing::debug!(elapsed_ms = elapsed, "playback completed");
            return Tick::Completed(frame);
        }
        let frame = tl.reveal_at(elapsed);
        tracing::trace!(
            elapsed_ms = elapsed,
            revealed = frame.full_segments,
            "tick"
        );
        Tick::Frame(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
