//! Color quantization: k-means clustering of visible pixels.
//!
//! Separates the image into at most K representative colors. Only
//! pixels whose alpha exceeds the visibility threshold participate, so
//! transparent background never seeds or attracts a cluster. The
//! iteration count is fixed and small — palette extraction does not
//! need convergence-grade precision, and a bounded count keeps the
//! stage's cost predictable.

use image::RgbaImage;

use crate::mask::ALPHA_VISIBLE_THRESHOLD;
use crate::rng::Pcg32;
use crate::types::Color;

/// Fixed number of assignment/update iterations.
pub const KMEANS_ITERATIONS: usize = 3;

/// Bounded attempts at sampling a distinct seed color per center.
const MAX_SEED_ATTEMPTS: usize = 64;

/// One quantized color layer: a representative color plus every pixel
/// assigned to it. Layers are produced once and never merged; a visible
/// pixel belongs to exactly one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Representative color (rounded cluster mean).
    pub color: Color,
    /// Coordinates of the pixels assigned to this cluster.
    pub pixels: Vec<(u32, u32)>,
}

/// A visible pixel lifted into clustering space.
struct Sample {
    x: u32,
    y: u32,
    rgb: [f64; 3],
}

/// Cluster the image's visible pixels into at most `color_count` layers.
///
/// Returns an empty list when the image has no visible pixels or
/// `color_count` is zero — callers must treat that as "nothing to
/// draw", not an error. Clusters that end up with zero assigned pixels
/// are dropped, so the output length may be below `color_count`.
#[must_use]
pub fn quantize(image: &RgbaImage, color_count: usize, rng: &mut Pcg32) -> Vec<Layer> {
    let samples = collect_visible(image);
    if samples.is_empty() || color_count == 0 {
        return Vec::new();
    }

    let mut centers = seed_centers(&samples, color_count, rng);
    let mut assignments = vec![0usize; samples.len()];

    for _ in 0..KMEANS_ITERATIONS {
        // Assignment: nearest center by squared RGB distance.
        for (sample, slot) in samples.iter().zip(assignments.iter_mut()) {
            *slot = nearest_center(sample.rgb, &centers);
        }

        // Update: move each center to the mean of its members. Centers
        // with no members keep their position (they are pruned at the
        // end if still empty).
        let mut sums = vec![[0.0f64; 3]; centers.len()];
        let mut counts = vec![0usize; centers.len()];
        for (sample, &cluster) in samples.iter().zip(&assignments) {
            for channel in 0..3 {
                sums[cluster][channel] += sample.rgb[channel];
            }
            counts[cluster] += 1;
        }
        for (center, (sum, count)) in centers.iter_mut().zip(sums.iter().zip(&counts)) {
            if *count > 0 {
                #[allow(clippy::cast_precision_loss)]
                let n = *count as f64;
                *center = [sum[0] / n, sum[1] / n, sum[2] / n];
            }
        }
    }

    build_layers(&samples, &assignments, &centers)
}

/// Gather every pixel with alpha above the visibility threshold.
fn collect_visible(image: &RgbaImage) -> Vec<Sample> {
    image
        .enumerate_pixels()
        .filter(|(_, _, pixel)| pixel.0[3] > ALPHA_VISIBLE_THRESHOLD)
        .map(|(x, y, pixel)| Sample {
            x,
            y,
            rgb: [
                f64::from(pixel.0[0]),
                f64::from(pixel.0[1]),
                f64::from(pixel.0[2]),
            ],
        })
        .collect()
}

/// Sample initial centers from visible pixels, rejecting exact-duplicate
/// seed colors for a bounded number of attempts per center. When the
/// image has fewer distinct colors than requested centers, the
/// remainder are repeats — they attract no unique pixels and get pruned
/// after the final iteration.
fn seed_centers(samples: &[Sample], color_count: usize, rng: &mut Pcg32) -> Vec<[f64; 3]> {
    let mut centers: Vec<[f64; 3]> = Vec::with_capacity(color_count);
    for _ in 0..color_count {
        let mut chosen = samples[rng.next_index(samples.len())].rgb;
        for _ in 0..MAX_SEED_ATTEMPTS {
            if !centers.iter().any(|c| *c == chosen) {
                break;
            }
            chosen = samples[rng.next_index(samples.len())].rgb;
        }
        centers.push(chosen);
    }
    centers
}

/// Index of the center nearest to `rgb` (squared Euclidean distance,
/// ties to the lowest index).
fn nearest_center(rgb: [f64; 3], centers: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, center) in centers.iter().enumerate() {
        let d = distance_squared(rgb, *center);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn distance_squared(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr.mul_add(dr, dg.mul_add(dg, db * db))
}

/// Materialize non-empty clusters as layers.
fn build_layers(samples: &[Sample], assignments: &[usize], centers: &[[f64; 3]]) -> Vec<Layer> {
    let mut buckets: Vec<Vec<(u32, u32)>> = vec![Vec::new(); centers.len()];
    for (sample, &cluster) in samples.iter().zip(assignments) {
        buckets[cluster].push((sample.x, sample.y));
    }

    buckets
        .into_iter()
        .zip(centers)
        .filter(|(pixels, _)| !pixels.is_empty())
        .map(|(pixels, center)| Layer {
            color: round_color(*center),
            pixels,
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_color(center: [f64; 3]) -> Color {
    Color::new(
        center[0].round().clamp(0.0, 255.0) as u8,
        center[1].round().clamp(0.0, 255.0) as u8,
        center[2].round().clamp(0.0, 255.0) as u8,
    )
}
