use super::*;
use crate::foundation::core::{Canvas, GlyphBox};
use crate::render::sink::InMemorySink;
use crate::stroke::model::{RawPoint, ResampledPoint, Stroke, VariantId, VariantStats};

fn canvas() -> Canvas {
    Canvas::new(20, 20).unwrap()
}

fn layout() -> RevealLayout {
    RevealLayout {
        canvas: canvas(),
        glyph_box: GlyphBox::new(0.0, 0.0, 20.0, 20.0).unwrap(),
        em_size: 100.0,
    }
}

/// Horizontal line across the middle: three segments of 20 ms.
fn line() -> Variant {
    let resampled: Vec<ResampledPoint> = [10.0, 35.0, 60.0, 85.0]
        .iter()
        .enumerate()
        .map(|(i, &x)| ResampledPoint {
            x,
            y: 50.0,
            dt: if i == 0 { 0.0 } else { 20.0 },
            p: 0.5,
            s: x - 10.0,
        })
        .collect();
    let points = resampled
        .iter()
        .map(|r| RawPoint::new(r.x, r.y, 0.0, r.p))
        .collect();
    Variant {
        id: VariantId("view".into()),
        starred: false,
        weight: 1.0,
        strokes: vec![Stroke { points, resampled }],
        stats: VariantStats {
            duration_ms: 60.0,
            arc_len: 75.0,
        },
    }
}

fn view() -> RevealView<InMemorySink> {
    RevealView::new(
        layout(),
        PlaybackOpts::default(),
        GlyphImage::solid(canvas(), [0, 0, 0, 255]),
        InMemorySink::new(),
    )
    .unwrap()
}

#[test]
fn drives_playback_to_completion_one_step_per_frame() {
    let mut v = view();
    v.start(&line(), PlaybackParams::default(), 0.0).unwrap();
    assert!(v.is_scheduled());

    let mut now = 0.0;
    while v.on_display_frame(now).unwrap() == PlaybackState::Playing {
        assert!(v.is_scheduled());
        now += 16.0;
    }
    assert_eq!(v.state(), PlaybackState::Completed);
    assert!(!v.is_scheduled());

    let sink = v.sink();
    assert_eq!(sink.sessions_ended(), 1);
    // Ticks at 0, 16, ..., 80; completion at 80.
    assert_eq!(sink.frames().len(), 6);
    let indices: Vec<u64> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(sink.frames()[0].1.covered_pixels(), 0);
    let last = &sink.frames()[5].1;
    assert!(last.covered_pixels() > sink.frames()[2].1.covered_pixels());
    assert_eq!(sink.config().map(|c| c.total_ms), Some(60.0));
}

#[test]
fn restarting_cancels_the_pending_step() {
    let mut v = view();
    v.start(&line(), PlaybackParams::default(), 0.0).unwrap();
    v.on_display_frame(0.0).unwrap();
    v.on_display_frame(16.0).unwrap();

    v.start(&line(), PlaybackParams::default(), 100.0).unwrap();
    assert_eq!(v.scheduler.pending_len(), 1);
    assert_eq!(v.sink().sessions_ended(), 1);
    assert!(v.sink().frames().is_empty());

    v.on_display_frame(100.0).unwrap();
    assert_eq!(v.sink().frames().len(), 1);
    assert_eq!(v.sink().frames()[0].0, 0);
}

#[test]
fn stop_removes_the_pending_step() {
    let mut v = view();
    v.start(&line(), PlaybackParams::default(), 0.0).unwrap();
    v.on_display_frame(0.0).unwrap();
    v.stop().unwrap();
    assert_eq!(v.state(), PlaybackState::Stopped);
    assert!(!v.is_scheduled());
    assert_eq!(v.scheduler.pending_len(), 0);

    v.on_display_frame(16.0).unwrap();
    assert_eq!(v.sink().frames().len(), 1);
    assert_eq!(v.sink().sessions_ended(), 1);
}

#[test]
fn parameter_change_restarts_at_zero() {
    let mut v = view();
    v.start(&line(), PlaybackParams::default(), 0.0).unwrap();
    v.on_display_frame(0.0).unwrap();
    v.on_display_frame(48.0).unwrap();

    let params = PlaybackParams {
        speed: 4.0,
        width_gain: 10.0,
    };
    v.set_params(params, 200.0).unwrap();
    assert_eq!(v.player().params(), Some(params));
    v.on_display_frame(200.0).unwrap();
    assert_eq!(v.sink().frames()[0].1.covered_pixels(), 0);
    // 16 ms at 4x is past the 60 ms of segments but inside the settle margin.
    assert_eq!(v.on_display_frame(216.0).unwrap(), PlaybackState::Playing);
    assert_eq!(v.on_display_frame(232.0).unwrap(), PlaybackState::Completed);
}

#[test]
fn glyph_must_match_canvas() {
    let err = RevealView::new(
        layout(),
        PlaybackOpts::default(),
        GlyphImage::solid(Canvas::new(8, 8).unwrap(), [0, 0, 0, 255]),
        InMemorySink::new(),
    );
    assert!(matches!(err, Err(InkError::Playback(_))));
}
