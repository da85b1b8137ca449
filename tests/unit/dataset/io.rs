use super::*;
use crate::dataset::model::{CharacterEntry, GlyphMetrics};
use crate::stroke::model::{RawPoint, ResampledPoint, Stroke, VariantId, VariantStats};

fn sample_variant() -> Variant {
    Variant {
        id: VariantId("v-1".to_string()),
        starred: true,
        weight: 0.75,
        strokes: vec![Stroke {
            points: vec![
                RawPoint::new(0.1, 0.2, 0.0, 0.5),
                RawPoint::new(20.3, 0.2, 33.3, 0.61),
            ],
            resampled: vec![
                ResampledPoint {
                    x: 0.1,
                    y: 0.2,
                    dt: 0.0,
                    p: 0.5,
                    s: 0.0,
                },
                ResampledPoint {
                    x: 20.3,
                    y: 0.2,
                    dt: 33.3,
                    p: 0.61,
                    s: 20.2,
                },
            ],
        }],
        stats: VariantStats {
            duration_ms: 33.3,
            arc_len: 20.2,
        },
    }
}

#[test]
fn variant_json_uses_the_persisted_field_names() {
    let json = variant_to_json(&sample_variant()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["id"], "v-1");
    assert_eq!(v["starred"], true);
    assert_eq!(v["weight"], 0.75);
    assert_eq!(v["stats"]["durationMs"], 33.3);
    assert_eq!(v["stats"]["arcLen"], 20.2);
    let p = &v["strokes"][0]["points"][1];
    for k in ["x", "y", "t", "p"] {
        assert!(p.get(k).is_some(), "missing point field {k}");
    }
    let r = &v["strokes"][0]["resampled"][1];
    for k in ["x", "y", "dt", "p", "s"] {
        assert!(r.get(k).is_some(), "missing resampled field {k}");
    }
}

#[test]
fn variant_json_round_trips_exactly() {
    let v = sample_variant();
    let back = variant_from_json(&variant_to_json(&v).unwrap()).unwrap();
    assert_eq!(back, v);
}

#[test]
fn dataset_round_trips_through_a_file() {
    let mut ds = Dataset::new();
    ds.entry_mut('A').metrics = GlyphMetrics {
        advance: 600.0,
        bounds: [12.0, -5.0, 590.0, 710.0],
        baseline: 0.0,
    };
    ds.insert_variant('A', sample_variant()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("dataset.json");
    ds.write_to_path(&path).unwrap();
    let back = Dataset::from_path(&path).unwrap();
    assert_eq!(back, ds);
}

#[test]
fn failed_write_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    // A non-empty directory cannot be replaced by the finished file.
    let path = dir.path().join("dataset.json");
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), b"x").unwrap();

    assert!(matches!(
        Dataset::new().write_to_path(&path),
        Err(InkError::Io(_))
    ));
    assert!(!dir.path().join("dataset.json.tmp").exists());
    assert!(path.join("keep").exists());
}

#[test]
fn persisted_entry_shape_is_metrics_plus_variants() {
    let mut ds = Dataset::new();
    ds.insert_variant('g', sample_variant()).unwrap();
    let json = ds.to_json_string().unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["version"], 1);
    let entry = &v["characters"]["g"];
    assert!(entry["metrics"]["bounds"].is_array());
    assert_eq!(entry["variants"].as_array().unwrap().len(), 1);
}

#[test]
fn import_rejects_unknown_versions_and_garbage() {
    assert!(matches!(
        Dataset::from_json_str(r#"{"version": 7, "characters": {}}"#),
        Err(crate::InkError::Validation(_))
    ));
    assert!(matches!(
        Dataset::from_json_str("{not json"),
        Err(crate::InkError::Serde(_))
    ));
    let entry: CharacterEntry = serde_json::from_str("{}").unwrap();
    assert!(entry.variants.is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dataset::from_path(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, crate::InkError::Io(_)));
}
