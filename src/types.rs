//! 2D points, line segments, and the pure geometry helpers everything else
//! is built from. No state lives here.

/// A point (or vector - the two are interchangeable here).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

/// A segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

impl Line {
    pub fn new(a: Point, b: Point) -> Self {
        Line { a, b }
    }
}

/// Axis-aligned bounds of a centered box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub l: f64,
    pub r: f64,
    pub t: f64,
    pub b: f64,
}

pub fn translate(p: Point, v: Point) -> Point {
    Point::new(p.x + v.x, p.y + v.y)
}

pub fn vector_to(p1: Point, p2: Point) -> Point {
    Point::new(p2.x - p1.x, p2.y - p1.y)
}

/// Rotates `p` about `pivot` by `angle` radians. Screen space is y-down, so
/// positive angles read as clockwise on screen.
pub fn rotate(p: Point, pivot: Point, angle: f64) -> Point {
    Point::new(
        (p.x - pivot.x) * angle.cos() - (p.y - pivot.y) * angle.sin() + pivot.x,
        (p.x - pivot.x) * angle.sin() + (p.y - pivot.y) * angle.cos() + pivot.y,
    )
}

pub fn line_length(v: Point) -> f64 {
    (v.x * v.x + v.y * v.y).sqrt()
}

/// Determinant-based segment intersection, inclusive of endpoints.
///
/// Parallel segments (zero determinant) are reported as non-intersecting,
/// which also covers collinear overlap and degenerate zero-length segments.
/// Known limitation carried over from the original game.
pub fn lines_intersecting(a: Line, b: Line) -> bool {
    let d = (b.b.y - b.a.y) * (a.b.x - a.a.x) - (b.b.x - b.a.x) * (a.b.y - a.a.y);
    if d == 0.0 {
        return false;
    }
    let n1 = (b.b.x - b.a.x) * (a.a.y - b.a.y) - (b.b.y - b.a.y) * (a.a.x - b.a.x);
    let n2 = (a.b.x - a.a.x) * (a.a.y - b.a.y) - (a.b.y - a.a.y) * (a.a.x - b.a.x);
    let t = n1 / d;
    let u = n2 / d;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Bounds of a box of the given size centered on `center`. Only used for the
/// world's wrap boundary.
pub fn rect(center: Point, size: Point) -> Rect {
    Rect {
        l: center.x - size.x / 2.0,
        r: center.x + size.x / 2.0,
        t: center.y - size.y / 2.0,
        b: center.y + size.y / 2.0,
    }
}
