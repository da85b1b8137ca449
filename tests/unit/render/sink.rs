use super::*;

fn reveal(elapsed_ms: f64, full: usize, total: usize) -> RevealFrame {
    RevealFrame {
        elapsed_ms,
        segments: Vec::new(),
        dots: Vec::new(),
        glyph_alpha: 1.0,
        full_segments: full,
        partial: None,
        total_segments: total,
    }
}

fn pixels() -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![0; 4],
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 1,
        height: 1,
        total_ms: 40.0,
    }
}

#[test]
fn in_memory_sink_resets_on_begin() {
    let mut s = InMemorySink::new();
    s.begin(cfg()).unwrap();
    s.push_frame(0, &reveal(0.0, 0, 2), &pixels()).unwrap();
    s.push_frame(1, &reveal(20.0, 1, 2), &pixels()).unwrap();
    s.end().unwrap();
    assert_eq!(s.frames().len(), 2);
    assert_eq!(s.fingerprints().len(), 2);
    assert_eq!(s.config(), Some(cfg()));
    assert_eq!(s.sessions_ended(), 1);

    s.begin(cfg()).unwrap();
    assert!(s.frames().is_empty());
}

#[test]
fn progress_log_writes_one_line_per_frame() {
    let mut log = ProgressLog::new(Vec::new());
    log.begin(cfg()).unwrap();
    log.push_frame(0, &reveal(0.0, 0, 4), &pixels()).unwrap();
    log.push_frame(1, &reveal(16.0, 2, 4), &pixels()).unwrap();
    log.end().unwrap();
    assert_eq!(log.frames(), 2);

    let text = String::from_utf8(log.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "begin 1x1 total=40.0ms");
    assert!(lines[2].contains("progress=0.500"));
    assert!(lines[2].contains("segments=2/4"));
    assert_eq!(lines[3], "end frames=2");
}
