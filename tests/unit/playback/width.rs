use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn base_width_is_clamped() {
    assert_eq!(base_width_px(canvas(100, 100)), 6.0);
    assert_eq!(base_width_px(canvas(400, 300)), 12.0);
    assert_eq!(base_width_px(canvas(2000, 1000)), 22.0);
}

#[test]
fn slow_strokes_use_the_pressure_term_only() {
    let m = WidthModel::new(canvas(400, 400), 50.0);
    assert_eq!(m.base_px(), 16.0);
    // 1 em in 10 ms -> speed term 10 -> damping 0.2 -> clamped to 1.
    let w = m.width(0.8, 1.0, 10.0);
    assert!((w - 16.0 * (0.6 + 0.5 * 0.8)).abs() < 1e-12);
}

#[test]
fn faster_motion_thins_the_line() {
    let m = WidthModel::new(canvas(400, 400), 50.0);
    let slow = m.width(0.5, 2.0, 10.0);
    let fast = m.width(0.5, 20.0, 10.0);
    assert!(fast < slow);
    // 20 em / 10 ms * 100 = 200 -> damping 4.
    assert!((fast - slow / 4.0).abs() < 1e-12);
}

#[test]
fn more_pressure_widens_the_line() {
    let m = WidthModel::new(canvas(400, 400), 80.0);
    assert!(m.width(0.9, 1.0, 16.0) > m.width(0.1, 1.0, 16.0));
}

#[test]
fn zero_dt_is_treated_as_one_millisecond() {
    assert_eq!(speed_term(3.0, 0.0), speed_term(3.0, 1.0));
    assert_eq!(speed_term(-3.0, 5.0), 0.0);
}
