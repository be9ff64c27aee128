//! Point reduction using the Ramer-Douglas-Peucker algorithm.
//!
//! Removes points that lie within a tolerance of the chord between
//! their run's endpoints, keeping the outliers that define the shape.
//! The classic formulation is recursive; contours can be arbitrarily
//! large, so the split work is driven by an explicit stack instead.

use crate::types::Point;

/// Simplify a point sequence with the given pixel tolerance.
///
/// The original first and last point are always retained. Sequences
/// under 3 points are returned unchanged. The operation is idempotent:
/// simplifying an already simplified sequence with the same tolerance
/// changes nothing.
#[must_use = "returns the simplified points"]
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut kept = vec![false; points.len()];
    kept[0] = true;
    kept[points.len() - 1] = true;

    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let mut max_dist = 0.0;
        let mut max_idx = start;
        for i in (start + 1)..end {
            let d = perpendicular_distance(points[i], points[start], points[end]);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }

        if max_dist > tolerance {
            kept[max_idx] = true;
            stack.push((start, max_idx));
            stack.push((max_idx, end));
        }
    }

    points
        .iter()
        .zip(&kept)
        .filter(|&(_, k)| *k)
        .map(|(&p, _)| p)
        .collect()
}

/// Perpendicular distance from point `p` to the line through `a` and `b`.
///
/// Uses `|cross(b-a, p-a)| / |b-a|`. Coincident endpoints define a
/// zero-length chord; every interior point is then at distance 0 and
/// the run collapses immediately to its endpoints.
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);

    if length_sq == 0.0 {
        return 0.0;
    }

    let cross = dx.mul_add(a.y - p.y, -(dy * (a.x - p.x)));
    cross.abs() / length_sq.sqrt()
}
