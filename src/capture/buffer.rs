use crate::foundation::core::Point;
use crate::stroke::model::{DEFAULT_PRESSURE, RawPoint};

/// A pointer sample as an input device reports it, in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerEvent {
    /// Horizontal client position in pixels.
    pub client_x: f64,
    /// Vertical client position in pixels.
    pub client_y: f64,
    /// Reported pressure, if the device has any.
    #[serde(default)]
    pub pressure: Option<f64>,
    /// Event timestamp in milliseconds (any monotonic epoch).
    pub timestamp_ms: f64,
}

impl PointerEvent {
    /// Build an event.
    pub fn new(client_x: f64, client_y: f64, pressure: Option<f64>, timestamp_ms: f64) -> Self {
        Self {
            client_x,
            client_y,
            pressure,
            timestamp_ms,
        }
    }
}

/// Accumulates the strokes of one in-progress capture.
///
/// Events must arrive in order. A stroke opens on pointer-down and is committed only when its
/// pointer-up is observed.
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    origin: Point,
    capture_start_ms: Option<f64>,
    active: Option<Vec<RawPoint>>,
    strokes: Vec<Vec<RawPoint>>,
}

impl CaptureBuffer {
    /// Create an empty buffer for a capture surface whose top-left is at `origin` in client
    /// coordinates.
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            capture_start_ms: None,
            active: None,
            strokes: Vec::new(),
        }
    }

    /// Move the capture surface; already recorded points are untouched.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Start a new stroke. An unfinished stroke is committed first.
    pub fn pointer_down(&mut self, ev: PointerEvent) {
        if let Some(open) = self.active.take() {
            tracing::debug!(points = open.len(), "pointer-down while a stroke is open, committing");
            self.strokes.push(open);
        }
        let p = self.map(ev);
        self.active = Some(vec![p]);
    }

    /// Extend the open stroke. Ignored when no stroke is open.
    pub fn pointer_move(&mut self, ev: PointerEvent) {
        if self.active.is_none() {
            return;
        }
        let p = self.map(ev);
        if let Some(open) = self.active.as_mut() {
            open.push(p);
        }
    }

    /// Close and commit the open stroke. Ignored when no stroke is open.
    pub fn pointer_up(&mut self, ev: PointerEvent) {
        if self.active.is_none() {
            return;
        }
        let p = self.map(ev);
        if let Some(mut open) = self.active.take() {
            if open.last() != Some(&p) {
                open.push(p);
            }
            self.strokes.push(open);
        }
    }

    /// Drop the open stroke without committing it.
    pub fn pointer_cancel(&mut self) {
        self.active = None;
        self.reset_clock_if_empty();
    }

    /// Remove the open stroke if there is one, otherwise the last committed stroke.
    ///
    /// Returns `false` when there was nothing to remove.
    pub fn undo(&mut self) -> bool {
        let removed = self.active.take().is_some() || self.strokes.pop().is_some();
        self.reset_clock_if_empty();
        removed
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.active = None;
        self.strokes.clear();
        self.capture_start_ms = None;
    }

    /// Committed strokes in drawing order.
    pub fn strokes(&self) -> &[Vec<RawPoint>] {
        &self.strokes
    }

    /// Whether a stroke is currently open.
    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// Number of committed points.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Vec::len).sum()
    }

    /// `true` when no committed stroke holds a point.
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Copy of the committed strokes, handed to the variant pipeline.
    pub fn snapshot(&self) -> Vec<Vec<RawPoint>> {
        self.strokes.clone()
    }

    fn map(&mut self, ev: PointerEvent) -> RawPoint {
        let start = *self.capture_start_ms.get_or_insert(ev.timestamp_ms);
        let floor = self.last_t().unwrap_or(0.0);
        let t = (ev.timestamp_ms - start).max(floor).max(0.0);
        let p = ev
            .pressure
            .filter(|p| p.is_finite())
            .map_or(DEFAULT_PRESSURE, |p| p.clamp(0.0, 1.0));
        RawPoint {
            x: ev.client_x - self.origin.x,
            y: ev.client_y - self.origin.y,
            t,
            p,
        }
    }

    fn last_t(&self) -> Option<f64> {
        self.active
            .as_ref()
            .and_then(|s| s.last())
            .or_else(|| self.strokes.last().and_then(|s| s.last()))
            .map(|p| p.t)
    }

    fn reset_clock_if_empty(&mut self) {
        if self.active.is_none() && self.strokes.is_empty() {
            self.capture_start_ms = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/buffer.rs"]
mod tests;
