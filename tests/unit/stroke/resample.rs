use super::*;

fn pt(x: f64, y: f64, t: f64, p: f64) -> RawPoint {
    RawPoint { x, y, t, p }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn three_point_line_resamples_at_step() {
    let input = [
        pt(0.0, 0.0, 0.0, 0.5),
        pt(10.0, 0.0, 100.0, 0.8),
        pt(20.0, 0.0, 200.0, 0.3),
    ];
    let out = resample(&input, 5.0);
    let xs: Vec<f64> = out.iter().map(|p| p.x).collect();
    assert_eq!(out.len(), 5);
    for (x, want) in xs.iter().zip([0.0, 5.0, 10.0, 15.0, 20.0]) {
        assert!(close(*x, want), "x={x} want={want}");
    }
    assert!(out.iter().all(|p| p.y == 0.0));

    assert!(close(out[1].p, 0.65));
    assert!(close(out[1].t, 50.0));
    assert!(close(out[3].p, 0.55));
    assert!(close(out[3].t, 150.0));
    assert_eq!(out[4], input[2]);
}

#[test]
fn short_strokes_are_returned_unchanged() {
    let single = [pt(3.0, 4.0, 7.0, 0.2)];
    assert_eq!(resample(&single, 2.0), single.to_vec());
    assert!(resample(&[], 2.0).is_empty());
}

#[test]
fn non_positive_step_is_identity() {
    let input = [pt(0.0, 0.0, 0.0, 0.5), pt(9.0, 0.0, 10.0, 0.5)];
    assert_eq!(resample(&input, 0.0), input.to_vec());
    assert_eq!(resample(&input, -1.0), input.to_vec());
    assert_eq!(resample(&input, f64::NAN), input.to_vec());
}

#[test]
fn spacing_is_step_accurate_except_last_segment() {
    let input = [
        pt(0.0, 0.0, 0.0, 0.5),
        pt(7.3, 2.1, 16.0, 0.6),
        pt(7.9, 11.4, 33.0, 0.7),
        pt(-3.2, 19.0, 49.0, 0.4),
        pt(-3.0, 19.5, 51.0, 0.4),
        pt(12.0, 30.0, 90.0, 0.9),
    ];
    let step = 3.0;
    let out = resample(&input, step);
    let n = out.len();
    assert!(n > 3);

    // Interior points sit on the polyline, so chord length is at most `step`; on straight runs
    // it equals `step`. Corners shorten chords, never lengthen them.
    for w in out[..n - 1].windows(2) {
        let d = w[0].distance(&w[1]);
        assert!(d <= step + 1e-9, "segment {d} exceeds step");
    }
    let last = out[n - 2].distance(&out[n - 1]);
    assert!(last <= step + 1e-9);
    assert_eq!(out[n - 1], input[input.len() - 1]);
    assert_eq!(out[0], input[0]);
}

#[test]
fn straight_line_spacing_is_exact() {
    let input = [pt(0.0, 0.0, 0.0, 0.5), pt(0.0, 23.0, 230.0, 0.5)];
    let out = resample(&input, 4.0);
    let n = out.len();
    assert_eq!(n, 7); // 0,4,...,20 and the trailing 23
    for w in out[..n - 1].windows(2) {
        assert!(close(w[0].distance(&w[1]), 4.0));
    }
    assert!(close(out[n - 2].distance(&out[n - 1]), 3.0));
}

#[test]
fn timestamps_stay_monotonic() {
    let input = [
        pt(0.0, 0.0, 0.0, 0.5),
        pt(5.0, 5.0, 10.0, 0.5),
        pt(5.0, 5.0, 12.0, 0.5),
        pt(20.0, -4.0, 40.0, 0.5),
    ];
    let out = resample(&input, 1.5);
    assert!(out.windows(2).all(|w| w[0].t <= w[1].t));
}

#[test]
fn resampling_twice_does_not_drift() {
    let input = [
        pt(0.0, 0.0, 0.0, 0.5),
        pt(30.0, 0.0, 100.0, 0.5),
        pt(30.0, 40.0, 200.0, 0.5),
    ];
    let once = resample(&input, 5.0);
    let twice = resample(&once, 5.0);
    assert_eq!(once.len(), twice.len());
    for (a, b) in once.iter().zip(&twice) {
        assert!(a.distance(b) < 1e-6, "{a:?} vs {b:?}");
    }
}

#[test]
fn duplicate_points_are_tolerated() {
    let input = [
        pt(1.0, 1.0, 0.0, 0.5),
        pt(1.0, 1.0, 5.0, 0.5),
        pt(1.0, 1.0, 9.0, 0.5),
    ];
    let out = resample(&input, 2.0);
    assert_eq!(out.len(), 2);
    assert_eq!(out[1], input[2]);
}

#[test]
fn path_length_sums_segments() {
    let input = [
        pt(0.0, 0.0, 0.0, 0.5),
        pt(3.0, 4.0, 1.0, 0.5),
        pt(3.0, 10.0, 2.0, 0.5),
    ];
    assert!(close(path_length(&input), 11.0));
}
