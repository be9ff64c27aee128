//! irodori-pipeline: Pure raster-to-vector tracing pipeline (sans-IO).
//!
//! Converts raster images into filled vector shapes through:
//! quantization -> layer masks -> dilation -> contour tracing ->
//! smoothing -> simplification -> curve fitting -> ordering.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. File handling lives in the
//! `irodori` binary; SVG serialization in `irodori-export`.

pub mod contour;
pub mod diagnostics;
pub mod dilate;
pub mod fit;
pub mod mask;
pub mod quantize;
pub mod raster;
pub mod rng;
pub mod simplify;
pub mod smooth;
pub mod types;

use std::time::Instant;

use diagnostics::{PipelineDiagnostics, PipelineSummary, StageDiagnostics, StageMetrics};
pub use types::{
    Color, Contour, CubicBezier, Dimensions, PipelineConfig, PipelineError, Point, ProcessResult,
    Shape,
};

/// Run the full tracing pipeline.
///
/// Takes raw image bytes (PNG, JPEG, BMP, WebP) and a configuration,
/// then produces a [`ProcessResult`] containing filled vector shapes in
/// back-to-front paint order plus the working image dimensions. The
/// dimensions are needed by export serializers to set coordinate spaces
/// (e.g., SVG `viewBox`).
///
/// # Pipeline steps
///
/// 1. Decode image and upscale to the working resolution
/// 2. Coverage mask + color quantization into layers
/// 3. Per layer: binary mask, hybrid dilation, contour tracing
/// 4. Per contour: area filter, smoothing, simplification, curve fitting
/// 5. Sort shapes by descending area so larger shapes paint first
///
/// A fully transparent image is not an error: it produces an empty
/// shape list.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty,
/// [`PipelineError::ImageDecode`] if the image format is unrecognized,
/// and [`PipelineError::InvalidConfig`] if `color_count` is zero or the
/// upscaled dimensions would overflow `u32`.
pub fn process(
    image_bytes: &[u8],
    config: &PipelineConfig,
) -> Result<ProcessResult, PipelineError> {
    if config.color_count == 0 {
        return Err(PipelineError::InvalidConfig(
            "color_count must be >= 1".to_string(),
        ));
    }

    let run_start = Instant::now();

    // 1. Decode and upscale to the working resolution.
    let stage_start = Instant::now();
    let image = raster::decode_rgba(image_bytes, config.upscale)?;
    let dimensions = Dimensions {
        width: image.width(),
        height: image.height(),
    };
    let pixel_count = u64::from(dimensions.width) * u64::from(dimensions.height);
    let decode = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Decode {
            input_bytes: image_bytes.len(),
            upscale: config.upscale,
            width: dimensions.width,
            height: dimensions.height,
            pixel_count,
        },
    };

    // 2. Coverage mask + color quantization.
    let stage_start = Instant::now();
    let coverage = mask::coverage_mask(&image);
    let mut rng = rng::Pcg32::new(config.seed);
    let layers = quantize::quantize(&image, config.color_count, &mut rng);
    let mut layer_pixel_counts: Vec<usize> = layers.iter().map(|l| l.pixels.len()).collect();
    layer_pixel_counts.sort_unstable_by(|a, b| b.cmp(a));
    let quantize_diag = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Quantize {
            requested_colors: config.color_count,
            layer_count: layers.len(),
            visible_pixel_count: coverage.count() as u64,
            total_pixel_count: pixel_count,
            layer_pixel_counts,
        },
    };

    // 3. Per layer: binary mask, hybrid dilation, contour tracing.
    let stage_start = Instant::now();
    let mut contours: Vec<Contour> = Vec::new();
    let mut fills: Vec<Color> = Vec::new();
    for layer in &layers {
        let layer_mask = mask::layer_mask(&layer.pixels, dimensions);
        let grown = dilate::dilate_hybrid(
            &layer_mask,
            &coverage,
            config.unconditional_dilation_passes,
            config.bounded_dilation_passes,
        );
        let traced = contour::trace_contours(&grown);
        fills.extend(std::iter::repeat_n(layer.color, traced.len()));
        contours.extend(traced);
    }
    let stats = diagnostics::contour_stats(&contours);
    let trace_diag = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Trace {
            unconditional_dilation_passes: config.unconditional_dilation_passes,
            bounded_dilation_passes: config.bounded_dilation_passes,
            contour_count: contours.len(),
            total_point_count: stats.total,
            min_contour_points: stats.min,
            max_contour_points: stats.max,
            mean_contour_points: stats.mean,
        },
    };

    // 4. Per contour: area filter, smoothing, simplification, fitting.
    let stage_start = Instant::now();
    let mut shapes: Vec<Shape> = Vec::new();
    let mut points_before = 0usize;
    let mut points_after = 0usize;
    for (contour, fill) in contours.iter().zip(fills) {
        let area = contour.signed_area();
        if area.abs() < config.min_shape_area {
            continue;
        }

        // Smoothing treats the sequence as a loop; the tracer's repeated
        // closing point would otherwise be averaged twice at the seam.
        let closed = contour.is_closed();
        let mut points = contour.points.clone();
        if closed {
            points.pop();
        }

        points_before += points.len();
        let smoothed = smooth::smooth_closed(&points, config.smooth_iterations);
        let mut simplified = simplify::simplify(&smoothed, config.simplify_tolerance);
        points_after += simplified.len();

        // Re-close on the exact start coordinates so the fitter treats
        // the run as a loop.
        if closed && simplified.len() > 1 {
            simplified.push(simplified[0]);
        }

        shapes.push(Shape {
            curves: fit::fit_curves(&simplified),
            fill,
            area,
        });
    }
    let reduction_ratio = if points_before > 0 {
        #[allow(clippy::cast_precision_loss)]
        let ratio = 1.0 - points_after as f64 / points_before as f64;
        ratio
    } else {
        0.0
    };
    let curve_count: usize = shapes.iter().map(|s| s.curves.len()).sum();
    let geometry_diag = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Geometry {
            smooth_iterations: config.smooth_iterations,
            tolerance: config.simplify_tolerance,
            points_before,
            points_after,
            reduction_ratio,
            curve_count,
        },
    };

    // 5. Back-to-front paint order: larger shapes first, ties stable.
    let stage_start = Instant::now();
    order_back_to_front(&mut shapes);
    let assemble_diag = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Assemble {
            min_shape_area: config.min_shape_area,
            contours_before_filter: contours.len(),
            shapes_after_filter: shapes.len(),
        },
    };

    let diagnostics = PipelineDiagnostics {
        decode,
        quantize: quantize_diag,
        trace: trace_diag,
        geometry: geometry_diag,
        assemble: assemble_diag,
        total_duration: run_start.elapsed(),
        summary: PipelineSummary {
            image_width: dimensions.width,
            image_height: dimensions.height,
            pixel_count,
            layer_count: layers.len(),
            shape_count: shapes.len(),
            curve_count,
        },
    };

    Ok(ProcessResult {
        shapes,
        dimensions,
        diagnostics,
    })
}

/// Sort shapes by descending area magnitude. The sort is stable, so
/// equal-area shapes keep their per-layer emission order.
fn order_back_to_front(shapes: &mut [Shape]) {
    shapes.sort_by(|a, b| b.area.abs().total_cmp(&a.area.abs()));
}
