use crate::foundation::math::lerp;
use crate::stroke::model::RawPoint;

/// Distance below which the trailing input point is treated as already emitted.
const COINCIDENT_EPS: f64 = 1e-9;

/// Resample a stroke so consecutive output points are `step` apart along the input path.
///
/// Inserted points interpolate position, time and pressure linearly along the segment they
/// fall on. The first and last input points are always kept, so only the final output segment
/// may be shorter than `step`. Strokes with fewer than two points, and non-positive or
/// non-finite steps, are returned unchanged.
pub fn resample(points: &[RawPoint], step: f64) -> Vec<RawPoint> {
    if points.len() < 2 || !step.is_finite() || step <= 0.0 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(estimate_len(points, step));
    out.push(points[0]);

    let mut acc = 0.0;
    let mut prev = points[0];
    let mut i = 1;
    while i < points.len() {
        let cur = points[i];
        let d = prev.distance(&cur);
        if d > 0.0 && acc + d >= step {
            let f = ((step - acc) / d).clamp(0.0, 1.0);
            let q = RawPoint {
                x: lerp(prev.x, cur.x, f),
                y: lerp(prev.y, cur.y, f),
                t: lerp(prev.t, cur.t, f),
                p: lerp(prev.p, cur.p, f),
            };
            out.push(q);
            acc = 0.0;
            // `q` splits the segment; keep scanning from it toward the same `cur`.
            prev = q;
        } else {
            acc += d;
            prev = cur;
            i += 1;
        }
    }

    let last = points[points.len() - 1];
    let n_out = out.len();
    match out.last_mut() {
        Some(tail) if n_out > 1 && tail.distance(&last) <= COINCIDENT_EPS * step.max(1.0) => {
            *tail = last;
        }
        _ => out.push(last),
    }
    out
}

/// Euclidean length of the polyline through `points`.
pub fn path_length(points: &[RawPoint]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

fn estimate_len(points: &[RawPoint], step: f64) -> usize {
    let n = (path_length(points) / step).ceil();
    if n.is_finite() {
        (n as usize).saturating_add(2)
    } else {
        points.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/resample.rs"]
mod tests;
