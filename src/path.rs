use crate::bounds::{bezier_point, quad_point};
use crate::types::{Curve, Point2, Segment};

/// Subdivision stops at this depth even if the tolerance is not reached
const MAX_DEPTH: u32 = 16;

/// Ordered polyline approximating a curve
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineChain {
    pub points: Vec<Point2>,
}

impl LineChain {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn start(&self) -> Option<Point2> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point2> {
        self.points.last().copied()
    }

    /// Number of line segments in the chain
    pub fn chain_size(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.chain_size() == 0
    }

    /// Line segments as (start, end) pairs
    pub fn lines(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Distance from `p` to the infinite line through `a` and `b`
fn distance_to_line(p: Point2, a: Point2, b: Point2) -> f64 {
    let len = a.distance(&b);
    if len < 1e-12 {
        return p.distance(&a);
    }
    ((b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y)).abs() / len
}

fn flatten_cubic(
    p0: Point2,
    c0: Point2,
    c1: Point2,
    p1: Point2,
    tolerance: f64,
    depth: u32,
    out: &mut Vec<Point2>,
) {
    let flat = distance_to_line(c0, p0, p1).max(distance_to_line(c1, p0, p1));
    if flat <= tolerance || depth >= MAX_DEPTH {
        out.push(p1);
        return;
    }

    // de Casteljau split at t = 0.5
    let p01 = p0.lerp(&c0, 0.5);
    let p12 = c0.lerp(&c1, 0.5);
    let p23 = c1.lerp(&p1, 0.5);
    let p012 = p01.lerp(&p12, 0.5);
    let p123 = p12.lerp(&p23, 0.5);
    let mid = p012.lerp(&p123, 0.5);

    flatten_cubic(p0, p01, p012, mid, tolerance, depth + 1, out);
    flatten_cubic(mid, p123, p23, p1, tolerance, depth + 1, out);
}

fn flatten_quad(p0: Point2, c: Point2, p1: Point2, tolerance: f64, depth: u32, out: &mut Vec<Point2>) {
    if distance_to_line(c, p0, p1) <= tolerance || depth >= MAX_DEPTH {
        out.push(p1);
        return;
    }

    let p01 = p0.lerp(&c, 0.5);
    let p12 = c.lerp(&p1, 0.5);
    let mid = p01.lerp(&p12, 0.5);

    flatten_quad(p0, p01, mid, tolerance, depth + 1, out);
    flatten_quad(mid, p12, p1, tolerance, depth + 1, out);
}

/// Append the points approximating `segment` to `out`, excluding its start point
pub fn flatten_segment(segment: &Segment, tolerance: f64, out: &mut Vec<Point2>) {
    match *segment {
        Segment::Line { end, .. } => out.push(end),
        Segment::Quadratic { start, ctrl, end } => {
            flatten_quad(start, ctrl, end, tolerance, 0, out)
        }
        Segment::Cubic {
            start,
            ctrl1,
            ctrl2,
            end,
        } => flatten_cubic(start, ctrl1, ctrl2, end, tolerance, 0, out),
    }
}

/// Approximate a curve with line segments deviating at most `tolerance` from it
pub fn line_segment_approximation(curve: &Curve, tolerance: f64) -> LineChain {
    let Some(start) = curve.start() else {
        return LineChain::default();
    };

    let mut points = vec![start];
    for seg in &curve.segments {
        flatten_segment(seg, tolerance, &mut points);
    }
    LineChain::new(points)
}

impl Segment {
    /// Point at parameter `t` in [0, 1]
    pub fn point_at(&self, t: f64) -> Point2 {
        match *self {
            Segment::Line { start, end } => start.lerp(&end, t),
            Segment::Quadratic { start, ctrl, end } => quad_point(t, start, ctrl, end),
            Segment::Cubic {
                start,
                ctrl1,
                ctrl2,
                end,
            } => bezier_point(t, start, ctrl1, ctrl2, end),
        }
    }

    /// Points approximating the segment, including both endpoints
    pub fn flatten(&self, tolerance: f64) -> Vec<Point2> {
        let mut points = vec![self.start()];
        flatten_segment(self, tolerance, &mut points);
        points
    }
}

impl Curve {
    pub fn flatten(&self, tolerance: f64) -> LineChain {
        line_segment_approximation(self, tolerance)
    }
}
