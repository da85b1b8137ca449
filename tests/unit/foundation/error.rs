use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        InkError::validation("x")
            .to_string()
            .starts_with("validation error:")
    );
    assert!(
        InkError::playback("x")
            .to_string()
            .starts_with("playback error:")
    );
    assert!(
        InkError::serde("x")
            .to_string()
            .starts_with("serialization error:")
    );
    assert!(InkError::io("x").to_string().starts_with("io error:"));
    assert!(InkError::EmptyCapture.to_string().starts_with("empty capture:"));
}

#[test]
fn invalid_glyph_box_reports_extent() {
    let msg = InkError::InvalidGlyphBox { w: 0.0, h: -3.0 }.to_string();
    assert!(msg.contains("width 0"));
    assert!(msg.contains("height -3"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = InkError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
