//! Boundary smoothing: a local weighted average over a closed loop.
//!
//! Contours come out of the tracer on the integer pixel grid, so every
//! edge is a stair step. Each smoothing iteration replaces every point
//! with `(prev + 2·current + next) / 4`, treating the sequence as a
//! closed loop (wrap-around neighbors). Iterations compound the
//! low-pass effect.

use crate::types::Point;

/// Apply `iterations` rounds of the smoothing kernel to a closed point
/// loop. The output has the same length as the input. Sequences shorter
/// than 3 points pass through unchanged.
#[must_use = "returns the smoothed points"]
pub fn smooth_closed(points: &[Point], iterations: usize) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut current = points.to_vec();
    for _ in 0..iterations {
        let n = current.len();
        let mut next = Vec::with_capacity(n);
        for i in 0..n {
            let prev = current[(i + n - 1) % n];
            let here = current[i];
            let after = current[(i + 1) % n];
            next.push(Point::new(
                2.0f64.mul_add(here.x, prev.x + after.x) / 4.0,
                2.0f64.mul_add(here.y, prev.y + after.y) / 4.0,
            ));
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_iterations_is_identity() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
        ];
        assert_eq!(smooth_closed(&points, 0), points);
    }

    #[test]
    fn short_sequences_pass_through() {
        let two = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        assert_eq!(smooth_closed(&two, 5), two);
        assert!(smooth_closed(&[], 5).is_empty());
    }

    #[test]
    fn length_is_preserved() {
        let points: Vec<Point> = (0..10).map(|i| Point::new(f64::from(i), 0.0)).collect();
        assert_eq!(smooth_closed(&points, 3).len(), 10);
    }

    #[test]
    fn kernel_pulls_corner_inward() {
        // Square corners: each point's neighbors pull it toward the
        // centroid by (prev + 2*cur + next)/4.
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        let smoothed = smooth_closed(&square, 1);
        // First corner: prev=(0,4), next=(4,0) -> ((0+0+4)/4, (4+0+0)/4).
        assert_eq!(smoothed[0], Point::new(1.0, 1.0));
        assert_eq!(smoothed[1], Point::new(3.0, 1.0));
        assert_eq!(smoothed[2], Point::new(3.0, 3.0));
        assert_eq!(smoothed[3], Point::new(1.0, 3.0));
    }

    #[test]
    fn wraparound_uses_loop_neighbors() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 6.0),
        ];
        let smoothed = smooth_closed(&points, 1);
        // Last point's "next" is the first point.
        assert_eq!(smoothed[3], Point::new(2.0, 3.0));
    }

    #[test]
    fn iterations_compound() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        let once = smooth_closed(&square, 1);
        let twice = smooth_closed(&square, 2);
        // The centroid is (2,2); more iterations move points closer.
        let centroid = Point::new(2.0, 2.0);
        assert!(twice[0].distance(centroid) < once[0].distance(centroid));
    }

    #[test]
    fn collinear_points_are_fixed_points() {
        let line = vec![
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
        ];
        let smoothed = smooth_closed(&line, 1);
        for p in &smoothed {
            assert!((p.y - 1.0).abs() < f64::EPSILON);
        }
    }
}
