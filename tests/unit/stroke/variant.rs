use super::*;

fn pt(x: f64, y: f64, t: f64, p: f64) -> RawPoint {
    RawPoint { x, y, t, p }
}

fn unit_box() -> GlyphBox {
    GlyphBox::new(0.0, 0.0, 100.0, 100.0).unwrap()
}

fn opts(step: f64) -> BuildOpts {
    BuildOpts {
        pipeline: PipelineOpts {
            resample_step_px: step,
            em_size: 1000.0,
        },
        ..BuildOpts::default()
    }
}

#[test]
fn empty_capture_is_rejected() {
    let b = unit_box();
    assert!(matches!(
        build_variant(&[], &b, &BuildOpts::default()),
        Err(InkError::EmptyCapture)
    ));
    assert!(matches!(
        build_variant(&[vec![], vec![]], &b, &BuildOpts::default()),
        Err(InkError::EmptyCapture)
    ));
}

#[test]
fn single_point_stroke_yields_one_resampled_point() {
    let v = build_variant(&[vec![pt(50.0, 25.0, 10.0, 0.9)]], &unit_box(), &opts(2.0)).unwrap();
    assert_eq!(v.strokes.len(), 1);
    let r = &v.strokes[0].resampled;
    assert_eq!(r.len(), 1);
    assert_eq!(r[0].dt, 0.0);
    assert_eq!(r[0].s, 0.0);
    assert_eq!(r[0].p, 0.9);
    assert_eq!(r[0].x, 500.0);
    assert_eq!(r[0].y, 250.0);
    assert_eq!(v.stats.duration_ms, 0.0);
    assert_eq!(v.stats.arc_len, 0.0);
}

#[test]
fn line_stroke_is_resampled_then_normalized() {
    let raw = vec![
        pt(0.0, 0.0, 0.0, 0.5),
        pt(10.0, 0.0, 100.0, 0.8),
        pt(20.0, 0.0, 200.0, 0.3),
    ];
    let v = build_variant(&[raw], &unit_box(), &opts(5.0)).unwrap();
    let s = &v.strokes[0];
    assert_eq!(s.points.len(), 5);
    assert_eq!(s.resampled.len(), 5);

    let xs: Vec<f64> = s.resampled.iter().map(|p| p.x).collect();
    for (x, want) in xs.iter().zip([0.0, 50.0, 100.0, 150.0, 200.0]) {
        assert!((x - want).abs() < 1e-6);
    }
    assert_eq!(s.resampled[0].dt, 0.0);
    for p in &s.resampled[1..] {
        assert!((p.dt - 50.0).abs() < 1e-6);
    }
    assert!((s.resampled[4].s - 200.0).abs() < 1e-6);
    assert!((v.stats.arc_len - 200.0).abs() < 1e-6);
    assert_eq!(v.stats.duration_ms, 200.0);
}

#[test]
fn arc_length_is_non_decreasing_and_empties_are_skipped() {
    let strokes = vec![
        vec![
            pt(10.0, 10.0, 0.0, 0.5),
            pt(40.0, 12.0, 50.0, 0.6),
            pt(42.0, 60.0, 120.0, 0.4),
        ],
        vec![],
        vec![pt(70.0, 70.0, 300.0, 0.5), pt(71.0, 90.0, 360.0, 0.5)],
    ];
    let v = build_variant(&strokes, &unit_box(), &opts(3.0)).unwrap();
    assert_eq!(v.strokes.len(), 2);
    for s in &v.strokes {
        assert!(!s.resampled.is_empty());
        assert!(s.resampled.windows(2).all(|w| w[0].s <= w[1].s));
    }
    assert_eq!(v.stats.duration_ms, 360.0);
    let sum: f64 = v.strokes.iter().map(|s| s.arc_len()).sum();
    assert_eq!(v.stats.arc_len, sum);
}

#[test]
fn defaults_mark_variant_unstarred_with_unit_weight() {
    let v = build_variant(
        &[vec![pt(0.0, 0.0, 0.0, 0.5)]],
        &unit_box(),
        &BuildOpts::default(),
    )
    .unwrap();
    assert!(!v.starred);
    assert_eq!(v.weight, 1.0);

    let starred = BuildOpts {
        starred: true,
        ..BuildOpts::default()
    };
    let w = build_variant(&[vec![pt(0.0, 0.0, 0.0, 0.5)]], &unit_box(), &starred).unwrap();
    assert!(w.starred);
    assert_ne!(v.id, w.id);
}

#[test]
fn invalid_pipeline_opts_are_rejected() {
    let bad = opts(0.0);
    assert!(matches!(
        build_variant(&[vec![pt(0.0, 0.0, 0.0, 0.5)]], &unit_box(), &bad),
        Err(InkError::Validation(_))
    ));
}

#[test]
fn parameterize_clamps_negative_dt() {
    let pts = [pt(0.0, 0.0, 10.0, 0.5), pt(3.0, 4.0, 5.0, 0.5)];
    let r = parameterize(&pts);
    assert_eq!(r[1].dt, 0.0);
    assert_eq!(r[1].s, 5.0);
    assert!(parameterize(&[]).is_empty());
}
