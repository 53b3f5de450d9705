//! Anti-aliased convex polygon fill.
//!
//! The chess scene draws each projected quad as a filled convex polygon with
//! sub-pixel precision. Coverage is estimated per pixel by intersecting the
//! polygon with four horizontal sub-scanlines per pixel row; a convex polygon
//! meets each scanline in a single span, so the per-pixel overlap of those
//! spans gives the blend weight. Visually equivalent to a fixed-point
//! `shift = 2` polygon fill.

use crate::frame::Frame;

const SUB_SAMPLES: u32 = 4;

/// Fill a convex polygon, anti-aliasing its edges into `frame`.
/// Vertices are floating-point pixel coordinates; polygons partially or
/// fully outside the frame are clipped.
pub fn fill_convex_poly(frame: &mut Frame, points: &[[f64; 2]], color: [u8; 3]) {
    if points.len() < 3 || frame.is_empty() {
        return;
    }

    let width = frame.width();
    let height = frame.height();

    let min_y = points.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
    if !min_y.is_finite() || !max_y.is_finite() {
        return;
    }

    let y0 = min_y.floor().max(0.0) as u32;
    let y1 = (max_y.ceil() as i64).clamp(0, i64::from(height)) as u32;

    let mut coverage = vec![0.0f64; width as usize];
    for y in y0..y1 {
        coverage.iter_mut().for_each(|c| *c = 0.0);
        let mut touched = false;

        for sub in 0..SUB_SAMPLES {
            let ys = f64::from(y) + (f64::from(sub) + 0.5) / f64::from(SUB_SAMPLES);
            let Some((start, end)) = scanline_span(points, ys) else {
                continue;
            };
            let start = start.max(0.0);
            let end = end.min(f64::from(width));
            if start >= end {
                continue;
            }
            touched = true;

            let first = start.floor() as u32;
            let last = (end.ceil() as i64).clamp(0, i64::from(width)) as u32;
            for x in first..last {
                let lo = f64::from(x).max(start);
                let hi = f64::from(x + 1).min(end);
                if hi > lo {
                    coverage[x as usize] += (hi - lo) / f64::from(SUB_SAMPLES);
                }
            }
        }

        if !touched {
            continue;
        }
        for (x, &cov) in coverage.iter().enumerate() {
            if cov > 0.0 {
                frame.blend_pixel(x as u32, y, color, cov);
            }
        }
    }
}

/// Intersection of a convex polygon with the horizontal line `y = ys`,
/// as an x-span, or `None` if the line misses the polygon.
fn scanline_span(points: &[[f64; 2]], ys: f64) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let (ay, by) = (a[1], b[1]);
        if (ay <= ys && ys < by) || (by <= ys && ys < ay) {
            let x = a[0] + (ys - ay) * (b[0] - a[0]) / (by - ay);
            lo = lo.min(x);
            hi = hi.max(x);
        }
    }
    (lo <= hi).then_some((lo, hi))
}
