//! Contour extraction: Moore-neighbor boundary walks over a binary mask.
//!
//! The outer scan moves row-major across the mask. Each time it meets
//! an unvisited foreground pixel it traces that region's boundary, then
//! flood-fills the whole connected component into the visited grid.
//! The fill is deliberately independent of the walk: thin or
//! self-touching shapes have interior pixels the boundary never
//! touches, and without the fill the scan would re-trace them as fresh
//! regions.

use std::collections::VecDeque;

use crate::mask::BitMask;
use crate::types::{Contour, Point};

/// The 8 compass neighbors in clockwise order, starting at West.
/// `(dx, dy)` with y growing downward.
const DIRECTIONS: [(i64, i64); 8] = [
    (-1, 0),  // W
    (-1, -1), // NW
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
];

/// Index of West in [`DIRECTIONS`]: the walker's initial backtrack
/// direction (it starts having conceptually arrived from the West).
const WEST: usize = 0;

/// Trace the boundary of every 8-connected foreground component.
///
/// One contour per component. A contour whose walk returned to its
/// start pixel repeats that point at the end; walks cut short by the
/// iteration cap or an isolated pixel are left open. `is_hole` is
/// always `false`: nesting polarity is not computed.
#[must_use]
pub fn trace_contours(mask: &BitMask) -> Vec<Contour> {
    let mut visited = BitMask::new(mask.width(), mask.height());
    let mut contours = Vec::new();

    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if mask.get(x, y) && !visited.get(x, y) {
                contours.push(trace_boundary(mask, x, y));
                mark_component_visited(mask, &mut visited, x, y);
            }
        }
    }

    contours
}

/// Walk one region's boundary starting at `(start_x, start_y)`.
///
/// State: current pixel + backtrack direction. Each step scans the 8
/// neighbors clockwise beginning at the backtrack direction; the first
/// foreground neighbor becomes current, and the new backtrack is the
/// direction immediately counter-clockwise of the one that succeeded,
/// which keeps the walk hugging the boundary instead of cutting across
/// the region.
///
/// Terminates on: return to the exact start pixel (closed), no
/// foreground neighbor (isolated pixel), or the step cap (pathological
/// self-intersecting region — the contour is truncated, never an
/// infinite loop).
#[allow(clippy::cast_precision_loss)]
fn trace_boundary(mask: &BitMask, start_x: u32, start_y: u32) -> Contour {
    let cap = step_cap(mask);
    let (start_x, start_y) = (i64::from(start_x), i64::from(start_y));

    let mut points = vec![Point::new(start_x as f64, start_y as f64)];
    let (mut x, mut y) = (start_x, start_y);
    let mut backtrack = WEST;

    for _ in 0..cap {
        let mut advanced = false;
        for offset in 0..DIRECTIONS.len() {
            let dir = (backtrack + offset) % DIRECTIONS.len();
            let (dx, dy) = DIRECTIONS[dir];
            if mask.probe(x + dx, y + dy) {
                x += dx;
                y += dy;
                backtrack = (dir + DIRECTIONS.len() - 1) % DIRECTIONS.len();
                advanced = true;
                break;
            }
        }

        if !advanced {
            // Isolated pixel: degenerate termination.
            break;
        }

        points.push(Point::new(x as f64, y as f64));
        if x == start_x && y == start_y {
            // Closed: the start point recurs as the final entry.
            break;
        }
    }

    Contour {
        points,
        is_hole: false,
    }
}

/// Hard bound on boundary walk length. A well-formed walk visits each
/// boundary pixel a small constant number of times; the cap exists so
/// pathological regions truncate instead of hanging.
fn step_cap(mask: &BitMask) -> usize {
    ((mask.width() as usize) * (mask.height() as usize))
        .saturating_mul(4)
        .max(1024)
}

/// Breadth-first flood fill marking the whole 8-connected component as
/// visited. Uses an explicit worklist — component sizes are unbounded
/// and must not consume call stack.
fn mark_component_visited(mask: &BitMask, visited: &mut BitMask, seed_x: u32, seed_y: u32) {
    let mut queue = VecDeque::new();
    visited.set(seed_x, seed_y);
    queue.push_back((i64::from(seed_x), i64::from(seed_y)));

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in DIRECTIONS {
            let (nx, ny) = (x + dx, y + dy);
            if mask.probe(nx, ny) && !visited.probe(nx, ny) {
                #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
                visited.set(nx as u32, ny as u32);
                queue.push_back((nx, ny));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::layer_mask;
    use crate::types::Dimensions;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    fn block(x0: u32, y0: u32, w: u32, h: u32) -> Vec<(u32, u32)> {
        (y0..y0 + h)
            .flat_map(|y| (x0..x0 + w).map(move |x| (x, y)))
            .collect()
    }

    #[test]
    fn empty_mask_produces_no_contours() {
        let mask = BitMask::new(10, 10);
        assert!(trace_contours(&mask).is_empty());
    }

    #[test]
    fn isolated_pixel_terminates_with_short_contour() {
        let mask = layer_mask(&[(5, 5)], dims(10, 10));
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert!(!contours[0].points.is_empty());
        assert_eq!(contours[0].points[0], Point::new(5.0, 5.0));
        assert!(!contours[0].is_hole);
    }

    #[test]
    fn solid_3x3_block_yields_one_closed_contour() {
        let mask = layer_mask(&block(1, 1, 3, 3), dims(6, 6));
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 1);

        let contour = &contours[0];
        assert!(contour.is_closed(), "walk must return to its start pixel");

        // The boundary walk runs through pixel centers, so a 3x3 block
        // traces a 2x2 square ring: shoelace area 4.
        assert!(
            (contour.signed_area().abs() - 4.0).abs() < 1e-9,
            "got area {}",
            contour.signed_area(),
        );
    }

    #[test]
    fn thin_line_closes_by_retracing() {
        // A 1px horizontal line: the walk goes out along the top and
        // back along the same pixels, ending on its start.
        let mask = layer_mask(&[(1, 2), (2, 2), (3, 2)], dims(6, 5));
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 1);
        let contour = &contours[0];
        assert!(contour.is_closed());
        assert_eq!(contour.points.len(), 5);
    }

    #[test]
    fn separate_components_produce_separate_contours() {
        let mut pixels = block(0, 0, 2, 2);
        pixels.extend(block(5, 5, 3, 2));
        let mask = layer_mask(&pixels, dims(10, 10));
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn diagonal_touch_is_one_component() {
        // 8-connectivity: two pixels touching corner-to-corner form a
        // single region, traced once.
        let mask = layer_mask(&[(2, 2), (3, 3)], dims(6, 6));
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 1);
    }

    #[test]
    fn interior_pixels_are_not_retraced() {
        // A 5x5 solid block: the walk only touches the perimeter, but
        // the flood fill must stop the outer scan from starting new
        // walks at interior pixels.
        let mask = layer_mask(&block(1, 1, 5, 5), dims(8, 8));
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 1);
    }

    #[test]
    fn ring_region_traces_outer_boundary_only() {
        // A ring (donut). Hole polarity is not computed: the enclosed
        // background is simply never traced, and the single contour is
        // flagged as a non-hole.
        let mut pixels = block(1, 1, 5, 5);
        pixels.retain(|&(x, y)| !(x == 3 && y == 3));
        let mask = layer_mask(&pixels, dims(8, 8));
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert!(!contours[0].is_hole);
    }

    #[test]
    fn full_mask_contour_stays_in_bounds() {
        let mask = layer_mask(&block(0, 0, 4, 4), dims(4, 4));
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 1);
        for p in &contours[0].points {
            assert!((0.0..4.0).contains(&p.x));
            assert!((0.0..4.0).contains(&p.y));
        }
    }
}
