use super::*;

fn rp(x: f64, y: f64, dt: f64, s: f64) -> ResampledPoint {
    ResampledPoint {
        x,
        y,
        dt,
        p: 0.5,
        s,
    }
}

#[test]
fn fresh_ids_are_distinct() {
    let a = VariantId::fresh();
    let b = VariantId::fresh();
    assert_ne!(a, b);
    assert!(a.as_str().starts_with('v'));
}

#[test]
fn segment_count_ignores_singletons() {
    let v = Variant {
        id: VariantId("x".to_string()),
        starred: false,
        weight: 1.0,
        strokes: vec![
            Stroke {
                points: vec![],
                resampled: vec![rp(0.0, 0.0, 0.0, 0.0)],
            },
            Stroke {
                points: vec![],
                resampled: vec![
                    rp(0.0, 0.0, 0.0, 0.0),
                    rp(1.0, 0.0, 5.0, 1.0),
                    rp(2.0, 0.0, 5.0, 2.0),
                ],
            },
        ],
        stats: VariantStats {
            duration_ms: 10.0,
            arc_len: 2.0,
        },
    };
    assert_eq!(v.segment_count(), 2);
    assert_eq!(v.resampled_len(), 4);
    assert_eq!(v.strokes[1].arc_len(), 2.0);
    assert!(v.with_starred(true).starred);
}

#[test]
fn stats_use_camel_case_on_the_wire() {
    let s = VariantStats {
        duration_ms: 12.5,
        arc_len: 3.0,
    };
    let json = serde_json::to_string(&s).unwrap();
    assert_eq!(json, r#"{"durationMs":12.5,"arcLen":3.0}"#);
}
