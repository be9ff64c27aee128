//! Cubic Bezier fitting with corner detection.
//!
//! Converts a simplified point run into one cubic segment per
//! consecutive point pair. Endpoints are classified as corners (sharp
//! turns keep their angle: short chord-aligned handles) or smooth
//! joints (Catmull-Rom style tangents through the joint's neighbors).
//! Handle lengths are hard-clamped relative to the segment length so no
//! local geometry can produce self-intersecting or overshooting
//! handles.

use crate::types::{CubicBezier, Point};

/// Points closer than this are merged before fitting.
const DUPLICATE_MERGE_DISTANCE: f64 = 1.0;
/// Pairs closer than this produce no segment (degenerate curve guard).
const MIN_SEGMENT_LENGTH: f64 = 0.1;
/// Edge-direction dot product below which a joint is a corner
/// (the turn exceeds roughly 78 degrees).
const CORNER_DOT_THRESHOLD: f64 = 0.2;
/// Handle length as a fraction of segment length at a corner.
const CORNER_HANDLE_FACTOR: f64 = 0.1;
/// Handle length as a fraction of segment length at a smooth joint.
const SMOOTH_HANDLE_FACTOR: f64 = 0.33;
/// Hard ceiling on handle length as a fraction of segment length.
const MAX_HANDLE_FRACTION: f64 = 0.4;

/// Fit cubic Bezier segments to a simplified point run.
///
/// A run whose first and last coordinates coincide is treated as closed:
/// joints at the seam see their wrap-around neighbors, and the
/// duplicate-filtered run is re-closed exactly. Returns an empty list
/// when fewer than 2 de-duplicated points remain.
#[must_use = "returns the fitted curves"]
pub fn fit_curves(points: &[Point]) -> Vec<CubicBezier> {
    let closed = points.len() > 1 && points.first() == points.last();
    let run = merge_duplicates(points, closed);
    if run.len() < 2 {
        return Vec::new();
    }

    let mut curves = Vec::with_capacity(run.len() - 1);
    for i in 0..run.len() - 1 {
        let p0 = run[i];
        let p3 = run[i + 1];
        let segment_length = p0.distance(p3);
        if segment_length < MIN_SEGMENT_LENGTH {
            continue;
        }

        let before = neighbor_before(&run, i, closed);
        let after = neighbor_after(&run, i + 1, closed);

        // Start endpoint: tangent points forward into the segment.
        let start_corner = is_corner(before, p0, p3);
        let start_tangent = if start_corner {
            normalize(direction(p0, p3))
        } else {
            // `before` is present here: a missing neighbor forces a corner.
            normalize(direction(before.unwrap_or(p0), p3))
        };
        let start_handle = handle_length(segment_length, start_corner);

        // End endpoint: tangent points backward into the segment.
        let end_corner = is_corner(after, p3, p0);
        let end_tangent = if end_corner {
            normalize(direction(p3, p0))
        } else {
            normalize(direction(after.unwrap_or(p3), p0))
        };
        let end_handle = handle_length(segment_length, end_corner);

        curves.push(CubicBezier {
            p0,
            p1: offset(p0, start_tangent, start_handle),
            p2: offset(p3, end_tangent, end_handle),
            p3,
        });
    }

    curves
}

/// Merge consecutive points closer than the duplicate threshold. For a
/// closed run, trailing points that crowd the seam are dropped and the
/// run is re-closed by repeating its first point exactly.
fn merge_duplicates(points: &[Point], closed: bool) -> Vec<Point> {
    let mut run: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        let keep = run
            .last()
            .is_none_or(|&last| p.distance(last) >= DUPLICATE_MERGE_DISTANCE);
        if keep {
            run.push(p);
        }
    }

    if closed && run.len() > 1 {
        while run.len() > 1 && run[run.len() - 1].distance(run[0]) < DUPLICATE_MERGE_DISTANCE {
            run.pop();
        }
        if run.len() > 1 {
            run.push(run[0]);
        }
    }

    run
}

/// Point before `run[index]`, wrapping across the seam when closed.
/// The seam point is stored twice, so the wrap lands on `run[len - 2]`.
fn neighbor_before(run: &[Point], index: usize, closed: bool) -> Option<Point> {
    if index > 0 {
        Some(run[index - 1])
    } else if closed && run.len() > 2 {
        Some(run[run.len() - 2])
    } else {
        None
    }
}

/// Point after `run[index]`, wrapping across the seam when closed.
fn neighbor_after(run: &[Point], index: usize, closed: bool) -> Option<Point> {
    if index + 1 < run.len() {
        Some(run[index + 1])
    } else if closed && run.len() > 2 {
        Some(run[1])
    } else {
        None
    }
}

/// Classify the joint at `at` (with adjacent points `outside` beyond it
/// and `inside` across the current segment) as a corner.
///
/// A joint is a corner when the neighbor is absent (open-path endpoint),
/// when either adjacent edge is degenerately short, or when the turn
/// between incoming and outgoing edges exceeds the dot threshold.
fn is_corner(outside: Option<Point>, at: Point, inside: Point) -> bool {
    let Some(outside) = outside else {
        return true;
    };

    let incoming = direction(outside, at);
    let outgoing = direction(at, inside);
    if length(incoming) < MIN_SEGMENT_LENGTH || length(outgoing) < MIN_SEGMENT_LENGTH {
        return true;
    }

    let a = normalize(incoming);
    let b = normalize(outgoing);
    a.0.mul_add(b.0, a.1 * b.1) < CORNER_DOT_THRESHOLD
}

/// Handle length: `min(factor · length, ceiling · length)`.
fn handle_length(segment_length: f64, corner: bool) -> f64 {
    let factor = if corner {
        CORNER_HANDLE_FACTOR
    } else {
        SMOOTH_HANDLE_FACTOR
    };
    (factor * segment_length).min(MAX_HANDLE_FRACTION * segment_length)
}

const fn direction(from: Point, to: Point) -> (f64, f64) {
    (to.x - from.x, to.y - from.y)
}

fn length(v: (f64, f64)) -> f64 {
    v.0.hypot(v.1)
}

/// Unit vector, with an explicit zero-vector fallback for near-zero
/// inputs so degenerate geometry never produces NaN.
fn normalize(v: (f64, f64)) -> (f64, f64) {
    let len = length(v);
    if len < 1e-12 {
        (0.0, 0.0)
    } else {
        (v.0 / len, v.1 / len)
    }
}

fn offset(p: Point, tangent: (f64, f64), distance: f64) -> Point {
    Point::new(
        tangent.0.mul_add(distance, p.x),
        tangent.1.mul_add(distance, p.y),
    )
}
