//! Polygon builders for the game's bodies, plus the point-list to segment-list
//! conversion shared by rendering and collision.

use crate::constants::*;
use crate::types::{Line, Point, rotate};
use rand::Rng;

/// Converts an ordered point list into segments.
///
/// `connected == true` chains consecutive points and closes the loop back to
/// the first point. `connected == false` pairs points off as disjoint strokes
/// (p0,p1), (p2,p3), ... - a trailing unpaired point is silently dropped.
/// The ship glyph relies on this exact pairing, so don't "fix" it.
pub fn points_to_lines(points: &[Point], connected: bool) -> Vec<Line> {
    let mut lines = Vec::new();
    if points.is_empty() {
        return lines;
    }

    let mut previous = points[0];
    let mut i = 1;
    while i < points.len() {
        lines.push(Line::new(previous, points[i]));
        if !connected {
            i += 1;
        }
        if i < points.len() {
            previous = points[i];
        }
        i += 1;
    }

    if connected && !lines.is_empty() {
        lines.push(Line::new(previous, lines[0].a)); // close last to first
    }

    lines
}

/// Irregular closed asteroid outline: `point_count` evenly spaced angles, each
/// with its radius jittered into [0.2r, 1.2r). Rolled once at construction;
/// the shape only ever translates afterwards.
pub fn asteroid_points(center: Point, radius: f64, point_count: usize, rng: &mut impl Rng) -> Vec<Point> {
    let step = 2.0 * std::f64::consts::PI / point_count as f64;
    (0..point_count)
        .map(|k| {
            let jitter = 0.2 + rng.gen_range(0.0..1.0);
            let p = Point::new(center.x + radius * jitter, center.y - radius * jitter);
            rotate(p, center, k as f64 * step)
        })
        .collect()
}

/// The ship glyph: dimensions derived from the blob layout, and the stroke
/// width the glyph is drawn with.
pub struct ShipGlyph {
    pub points: Vec<Point>,
    pub width: f64,
    pub height: f64,
    pub line_width: f64,
}

/// Builds the "W T W" letter-blob ship glyph around `center`.
///
/// Nine vertical strokes, each contributed as a top/bottom point pair, so the
/// result is drawn non-connected. Collision still closes the point ring like
/// every other body.
pub fn ship_points(center: Point, base_width: f64) -> ShipGlyph {
    let gap = SHIP_BLOB_GAP;
    let w = (base_width / 8.0).floor(); // letter segment width

    // Resize the ship based on the letter + gap width
    let width = (9.0 * (w + gap) - gap).floor();
    let height = w * 3.0;
    let blob_h = height / 2.0;

    let origin_x = center.x - width / 2.0 + w / 2.0;
    let origin_y = center.y - height / 2.0;

    let mut points = Vec::with_capacity(18);
    let mut blob = |i: f64, offset_y: f64, h: f64| {
        let x = origin_x + (w + gap) * i;
        let y = origin_y + offset_y;
        points.push(Point::new(x, y));
        points.push(Point::new(x, y + h));
    };

    // W
    blob(0.0, 0.0, height);
    blob(1.0, height - blob_h, blob_h);
    blob(2.0, 0.0, height);
    // T
    blob(3.0, 0.0, blob_h);
    blob(4.0, 0.0, height);
    blob(5.0, 0.0, blob_h);
    // W
    blob(6.0, 0.0, height);
    blob(7.0, height - blob_h, blob_h);
    blob(8.0, 0.0, height);

    ShipGlyph { points, width, height, line_width: w }
}
