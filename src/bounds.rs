use crate::types::{Curve, Point2, Segment};

/// Bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every point, `None` for an empty slice
    pub fn from_points(points: &[Point2]) -> Option<Bounds> {
        let first = points.first()?;
        let mut bounds = Bounds::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            bounds.include(*p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: Point2) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn expand(&mut self, other: &Bounds) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Calculate Bezier curve extrema (t values where derivative is zero)
fn bezier_extrema(p0: Point2, c0: Point2, c1: Point2, p1: Point2) -> Vec<f64> {
    fn get_extrema(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
        let mut res = Vec::new();
        let aa = -a + 3.0 * b - 3.0 * c + d;
        let bb = 2.0 * (a - 2.0 * b + c);
        let cc = b - a;

        if aa.abs() < 1e-8 {
            if bb.abs() > 1e-8 {
                let t = -cc / bb;
                if t > 0.0 && t < 1.0 {
                    res.push(t);
                }
            }
        } else {
            let disc = bb * bb - 4.0 * aa * cc;
            if disc >= 0.0 {
                let sqrt_d = disc.sqrt();
                let t1 = (-bb + sqrt_d) / (2.0 * aa);
                let t2 = (-bb - sqrt_d) / (2.0 * aa);
                if t1 > 0.0 && t1 < 1.0 {
                    res.push(t1);
                }
                if t2 > 0.0 && t2 < 1.0 {
                    res.push(t2);
                }
            }
        }
        res
    }

    let mut result = get_extrema(p0.x, c0.x, c1.x, p1.x);
    result.extend(get_extrema(p0.y, c0.y, c1.y, p1.y));
    result
}

/// Evaluate a cubic Bezier curve at parameter t
pub fn bezier_point(t: f64, p0: Point2, c0: Point2, c1: Point2, p1: Point2) -> Point2 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;
    let t2 = t * t;
    let t3 = t2 * t;

    Point2::new(
        mt3 * p0.x + 3.0 * mt2 * t * c0.x + 3.0 * mt * t2 * c1.x + t3 * p1.x,
        mt3 * p0.y + 3.0 * mt2 * t * c0.y + 3.0 * mt * t2 * c1.y + t3 * p1.y,
    )
}

/// Evaluate a quadratic Bezier curve at parameter t
pub fn quad_point(t: f64, p0: Point2, c: Point2, p1: Point2) -> Point2 {
    let mt = 1.0 - t;
    Point2::new(
        mt * mt * p0.x + 2.0 * mt * t * c.x + t * t * p1.x,
        mt * mt * p0.y + 2.0 * mt * t * c.y + t * t * p1.y,
    )
}

/// Tight bounds of a single segment
pub fn segment_bounds(segment: &Segment) -> Bounds {
    match *segment {
        Segment::Line { start, end } => {
            let mut b = Bounds::new(start.x, start.y, start.x, start.y);
            b.include(end);
            b
        }
        Segment::Quadratic { start, ctrl, end } => {
            // Degree elevation keeps the same curve
            let c0 = start.lerp(&ctrl, 2.0 / 3.0);
            let c1 = end.lerp(&ctrl, 2.0 / 3.0);
            segment_bounds(&Segment::Cubic {
                start,
                ctrl1: c0,
                ctrl2: c1,
                end,
            })
        }
        Segment::Cubic {
            start,
            ctrl1,
            ctrl2,
            end,
        } => {
            let mut b = Bounds::new(start.x, start.y, start.x, start.y);
            b.include(end);
            for t in bezier_extrema(start, ctrl1, ctrl2, end) {
                b.include(bezier_point(t, start, ctrl1, ctrl2, end));
            }
            b
        }
    }
}

/// Combined bounds of a set of curves, `None` when there is no geometry
pub fn curves_bounds<'a, I>(curves: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a Curve>,
{
    let mut result: Option<Bounds> = None;
    for seg in curves.into_iter().flat_map(|c| c.segments.iter()) {
        let b = segment_bounds(seg);
        match result.as_mut() {
            Some(r) => r.expand(&b),
            None => result = Some(b),
        }
    }
    result
}
