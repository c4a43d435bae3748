use std::ops::{Add, Sub};

/// 2D point in drawing space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Linear interpolation towards `other`
    pub fn lerp(&self, other: &Point2, t: f64) -> Point2 {
        Point2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl Add for Point2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// 2D affine transformation matrix [a, b, c, d, e, f]
/// Represents: | a  c  e |
///             | b  d  f |
///             | 0  0  1 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XForm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for XForm {
    fn default() -> Self {
        Self::identity()
    }
}

impl XForm {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Mirror the Y axis inside a canvas of the given height
    pub fn flip_y(canvas_height: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: -1.0,
            e: 0.0,
            f: canvas_height,
        }
    }

    /// Compose two transforms: self * other
    pub fn compose(&self, other: &XForm) -> XForm {
        XForm {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn transform_point(&self, p: Point2) -> Point2 {
        Point2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

impl From<usvg::Transform> for XForm {
    fn from(ts: usvg::Transform) -> Self {
        Self {
            a: ts.sx as f64,
            b: ts.ky as f64,
            c: ts.kx as f64,
            d: ts.sy as f64,
            e: ts.tx as f64,
            f: ts.ty as f64,
        }
    }
}

/// One drawing primitive of a subpath, starting where the previous one ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        start: Point2,
        end: Point2,
    },
    Quadratic {
        start: Point2,
        ctrl: Point2,
        end: Point2,
    },
    Cubic {
        start: Point2,
        ctrl1: Point2,
        ctrl2: Point2,
        end: Point2,
    },
}

impl Segment {
    pub fn start(&self) -> Point2 {
        match self {
            Segment::Line { start, .. }
            | Segment::Quadratic { start, .. }
            | Segment::Cubic { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Point2 {
        match self {
            Segment::Line { end, .. }
            | Segment::Quadratic { end, .. }
            | Segment::Cubic { end, .. } => *end,
        }
    }
}

/// A continuous subpath with its laser classification
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub segments: Vec<Segment>,
    /// Red paths are cut through, everything else is engraved
    pub cut: bool,
}

impl Curve {
    pub fn new(segments: Vec<Segment>, cut: bool) -> Self {
        Self { segments, cut }
    }

    pub fn start(&self) -> Option<Point2> {
        self.segments.first().map(|s| s.start())
    }

    pub fn end(&self) -> Option<Point2> {
        self.segments.last().map(|s| s.end())
    }

    pub fn is_closed(&self) -> bool {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => start.distance(&end) < 1e-9,
            _ => false,
        }
    }
}

/// Closed, filled outline that can be hatched
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub curves: Vec<Curve>,
    /// Fill color as `#rrggbb`
    pub color: String,
}

/// Everything extracted from one SVG document
#[derive(Debug, Clone, Default)]
pub struct Drawing {
    pub width: f64,
    pub height: f64,
    pub curves: Vec<Curve>,
    pub areas: Vec<Area>,
}

impl Drawing {
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty() && self.areas.is_empty()
    }

    pub fn cut_count(&self) -> usize {
        self.curves.iter().filter(|c| c.cut).count()
    }
}
