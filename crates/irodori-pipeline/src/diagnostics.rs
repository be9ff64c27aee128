//! Pipeline diagnostics: timing, counts, and other metrics per stage.
//!
//! These diagnostics are permanent instrumentation intended for
//! algorithm tuning and parameter experimentation. Every call to
//! [`process`](crate::process) collects diagnostics alongside the
//! pipeline results.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single pipeline run.
///
/// Each field captures metrics for one logical stage of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 0: image decoding and optional upscaling.
    pub decode: StageDiagnostics,
    /// Stage 1: color quantization into layers.
    pub quantize: StageDiagnostics,
    /// Stage 2: per-layer mask building, dilation, and contour tracing.
    pub trace: StageDiagnostics,
    /// Stage 3: smoothing, simplification, and curve fitting.
    pub geometry: StageDiagnostics,
    /// Stage 4: area filtering and back-to-front ordering.
    pub assemble: StageDiagnostics,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics (counts, sizes, etc.).
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Image decoding metrics.
    Decode {
        /// Size of the input image bytes.
        input_bytes: usize,
        /// Upscale factor applied after decoding.
        upscale: u32,
        /// Working image width in pixels (after upscale).
        width: u32,
        /// Working image height in pixels (after upscale).
        height: u32,
        /// Total pixel count (`width * height`).
        pixel_count: u64,
    },
    /// Color quantization metrics.
    Quantize {
        /// Requested color count K.
        requested_colors: usize,
        /// Layers actually produced (empty clusters are pruned).
        layer_count: usize,
        /// Pixels that passed the alpha visibility threshold.
        visible_pixel_count: u64,
        /// Total pixel count, for computing coverage density.
        total_pixel_count: u64,
        /// Pixel count per layer, largest first.
        layer_pixel_counts: Vec<usize>,
    },
    /// Mask building, dilation, and contour tracing metrics.
    Trace {
        /// Dilation passes that ignore the coverage mask.
        unconditional_dilation_passes: usize,
        /// Dilation passes bounded by the coverage mask.
        bounded_dilation_passes: usize,
        /// Number of contours found across all layers.
        contour_count: usize,
        /// Total number of points across all contours.
        total_point_count: usize,
        /// Minimum points in any single contour.
        min_contour_points: usize,
        /// Maximum points in any single contour.
        max_contour_points: usize,
        /// Mean points per contour.
        mean_contour_points: f64,
    },
    /// Smoothing, simplification, and curve fitting metrics.
    Geometry {
        /// Smoothing iterations applied per contour.
        smooth_iterations: usize,
        /// Simplification tolerance in pixels.
        tolerance: f64,
        /// Total points before simplification.
        points_before: usize,
        /// Total points after simplification.
        points_after: usize,
        /// Reduction ratio: `1.0 - (after / before)`.
        reduction_ratio: f64,
        /// Total cubic segments fitted.
        curve_count: usize,
    },
    /// Shape assembly metrics.
    Assemble {
        /// Minimum shape area threshold in px².
        min_shape_area: f64,
        /// Contours considered before the area filter.
        contours_before_filter: usize,
        /// Shapes that survived the area filter.
        shapes_after_filter: usize,
    },
}

/// High-level summary counts for the entire pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Working image width in pixels.
    pub image_width: u32,
    /// Working image height in pixels.
    pub image_height: u32,
    /// Total pixel count.
    pub pixel_count: u64,
    /// Number of quantized layers.
    pub layer_count: usize,
    /// Number of shapes in the final output.
    pub shape_count: usize,
    /// Total cubic segments across all shapes.
    pub curve_count: usize,
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels)",
            self.summary.image_width, self.summary.image_height, self.summary.pixel_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        // Per-stage breakdown.
        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages: [(&str, &StageDiagnostics); 5] = [
            ("Decode", &self.decode),
            ("Quantize", &self.quantize),
            ("Trace", &self.trace),
            ("Geometry", &self.geometry),
            ("Assemble", &self.assemble),
        ];

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Layers: {}  |  Shapes: {}  |  Curves: {}",
            self.summary.layer_count, self.summary.shape_count, self.summary.curve_count,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Decode {
            input_bytes,
            upscale,
            width,
            height,
            ..
        } => {
            format!("{input_bytes} bytes -> {width}x{height} (x{upscale})")
        }
        StageMetrics::Quantize {
            requested_colors,
            layer_count,
            visible_pixel_count,
            total_pixel_count,
            ..
        } => {
            #[allow(clippy::cast_precision_loss)]
            let coverage = if *total_pixel_count > 0 {
                *visible_pixel_count as f64 / *total_pixel_count as f64 * 100.0
            } else {
                0.0
            };
            format!(
                "k={requested_colors} -> {layer_count} layers, {visible_pixel_count} visible px ({coverage:.1}%)",
            )
        }
        StageMetrics::Trace {
            unconditional_dilation_passes,
            bounded_dilation_passes,
            contour_count,
            total_point_count,
            min_contour_points,
            max_contour_points,
            mean_contour_points,
        } => {
            format!(
                "dilate={unconditional_dilation_passes}+{bounded_dilation_passes} {contour_count} contours, {total_point_count} pts (min={min_contour_points} max={max_contour_points} mean={mean_contour_points:.1})",
            )
        }
        StageMetrics::Geometry {
            smooth_iterations,
            tolerance,
            points_before,
            points_after,
            reduction_ratio,
            curve_count,
        } => {
            format!(
                "smooth={smooth_iterations} tol={tolerance:.2} {points_before}->{points_after} pts ({:.1}% reduction), {curve_count} curves",
                reduction_ratio * 100.0,
            )
        }
        StageMetrics::Assemble {
            min_shape_area,
            contours_before_filter,
            shapes_after_filter,
        } => {
            format!(
                "min_area={min_shape_area:.1} {contours_before_filter}->{shapes_after_filter} shapes",
            )
        }
    }
}

/// Statistics for a set of contours.
pub(crate) struct ContourStats {
    /// Total number of points across all contours.
    pub total: usize,
    /// Minimum number of points in any single contour.
    pub min: usize,
    /// Maximum number of points in any single contour.
    pub max: usize,
    /// Mean number of points per contour.
    pub mean: f64,
}

/// Compute contour statistics from a set of contours.
pub(crate) fn contour_stats(contours: &[crate::types::Contour]) -> ContourStats {
    let total: usize = contours.iter().map(|c| c.points.len()).sum();
    let min = contours.iter().map(|c| c.points.len()).min().unwrap_or(0);
    let max = contours.iter().map(|c| c.points.len()).max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let mean = if contours.is_empty() {
        0.0
    } else {
        total as f64 / contours.len() as f64
    };
    ContourStats {
        total,
        min,
        max,
        mean,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Contour, Point};

    fn stage(ms: u64, metrics: StageMetrics) -> StageDiagnostics {
        StageDiagnostics {
            duration: Duration::from_millis(ms),
            metrics,
        }
    }

    fn sample_diagnostics() -> PipelineDiagnostics {
        PipelineDiagnostics {
            decode: stage(
                10,
                StageMetrics::Decode {
                    input_bytes: 1000,
                    upscale: 2,
                    width: 100,
                    height: 100,
                    pixel_count: 10000,
                },
            ),
            quantize: stage(
                30,
                StageMetrics::Quantize {
                    requested_colors: 8,
                    layer_count: 5,
                    visible_pixel_count: 9000,
                    total_pixel_count: 10000,
                    layer_pixel_counts: vec![4000, 2500, 1500, 800, 200],
                },
            ),
            trace: stage(
                20,
                StageMetrics::Trace {
                    unconditional_dilation_passes: 1,
                    bounded_dilation_passes: 2,
                    contour_count: 12,
                    total_point_count: 600,
                    min_contour_points: 8,
                    max_contour_points: 120,
                    mean_contour_points: 50.0,
                },
            ),
            geometry: stage(
                5,
                StageMetrics::Geometry {
                    smooth_iterations: 2,
                    tolerance: 1.0,
                    points_before: 600,
                    points_after: 150,
                    reduction_ratio: 0.75,
                    curve_count: 140,
                },
            ),
            assemble: stage(
                1,
                StageMetrics::Assemble {
                    min_shape_area: 10.0,
                    contours_before_filter: 12,
                    shapes_after_filter: 9,
                },
            ),
            total_duration: Duration::from_millis(66),
            summary: PipelineSummary {
                image_width: 100,
                image_height: 100,
                pixel_count: 10000,
                layer_count: 5,
                shape_count: 9,
                curve_count: 140,
            },
        }
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let d = Duration::from_millis(1234);
        assert!((duration_ms(d) - 1234.0).abs() < 0.01);
    }

    #[test]
    fn contour_stats_empty() {
        let stats = contour_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.min, 0);
        assert_eq!(stats.max, 0);
        assert!(stats.mean.abs() < f64::EPSILON);
    }

    #[test]
    fn contour_stats_computes() {
        let contours = vec![
            Contour {
                points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
                is_hole: false,
            },
            Contour {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(1.0, 0.0),
                    Point::new(2.0, 0.0),
                    Point::new(3.0, 0.0),
                ],
                is_hole: false,
            },
        ];
        let stats = contour_stats(&contours);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 4);
        assert!((stats.mean - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn report_produces_nonempty_string() {
        let report = sample_diagnostics().report();
        assert!(!report.is_empty());
        assert!(report.contains("Pipeline Diagnostics Report"));
        assert!(report.contains("Quantize"));
        assert!(report.contains("Assemble"));
    }

    #[test]
    fn diagnostics_serde_round_trip() {
        let diag = sample_diagnostics();
        let json = serde_json::to_string(&diag).unwrap();
        let parsed: PipelineDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.summary.shape_count, 9);
        assert_eq!(parsed.total_duration, diag.total_duration);
    }

    #[test]
    fn duration_serializes_as_fractional_seconds() {
        let diag = sample_diagnostics();
        let json = serde_json::to_value(&diag).unwrap();
        let secs = json["total_duration"].as_f64().unwrap();
        assert!((secs - 0.066).abs() < 1e-9);
    }
}
