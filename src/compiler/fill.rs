//! Diagonal hatching of filled areas
//!
//! Darker fills get denser hatching: a black area is hatched with lines one
//! laser diameter apart, a white area is not hatched at all.

use crate::bounds::Bounds;
use crate::types::Point2;

/// Number of hatch lines for a square of side `length`, linear in the grey value
pub fn hatch_density(length: f64, grey: u8, laser_diameter: f64) -> usize {
    let maximum_density = length / laser_diameter;
    let density = maximum_density * (1.0 - grey as f64 / 255.0);
    if density.is_finite() && density > 0.0 {
        density.floor() as usize
    } else {
        0
    }
}

/// Crossings of the diagonal `x + y = c` with the ring edges, as `u = x - y`
fn crossings(rings: &[Vec<Point2>], c: f64) -> Vec<f64> {
    let mut result = Vec::new();
    for ring in rings {
        if ring.len() < 2 {
            continue;
        }
        let closing = (ring[ring.len() - 1], ring[0]);
        let edges = ring.windows(2).map(|w| (w[0], w[1])).chain(std::iter::once(closing));
        for (p, q) in edges {
            let sp = p.x + p.y;
            let sq = q.x + q.y;
            // Half-open test so shared vertices are counted once
            if (sp < c) != (sq < c) {
                let t = (c - sp) / (sq - sp);
                let hit = p.lerp(&q, t);
                result.push(hit.x - hit.y);
            }
        }
    }
    result
}

/// Hatch lines covering the inside of `rings` (even-odd rule).
///
/// Lines run along `x + y = const`, ordered from the lower-left corner of
/// the bounding square outwards; each line goes from its lower-right end to
/// its upper-left end.
pub fn hatch_lines(rings: &[Vec<Point2>], grey: u8, laser_diameter: f64) -> Vec<(Point2, Point2)> {
    let all: Vec<Point2> = rings.iter().flatten().copied().collect();
    let Some(bounds) = Bounds::from_points(&all) else {
        return Vec::new();
    };

    let length = bounds.width().max(bounds.height());
    let density = hatch_density(length, grey, laser_diameter);
    if density == 0 {
        return Vec::new();
    }

    let step = length / density as f64;
    let base = bounds.min_x + bounds.min_y;
    let mut lines = Vec::new();

    for k in 1..(2 * density) {
        let c = base + k as f64 * step;
        let mut us = crossings(rings, c);
        us.sort_by(|a, b| b.total_cmp(a));
        for pair in us.chunks_exact(2) {
            let from = Point2::new((c + pair[0]) / 2.0, (c - pair[0]) / 2.0);
            let to = Point2::new((c + pair[1]) / 2.0, (c - pair[1]) / 2.0);
            if from.distance(&to) > 1e-9 {
                lines.push((from, to));
            }
        }
    }

    lines
}
