//! Shared types for the irodori tracing pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference the decoded
/// source image without depending on `image` directly.
pub use image::RgbaImage;

/// A 2D point in image coordinates.
///
/// Coordinates start as pixel-grid positions and become non-integer
/// after smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// An opaque RGB fill color.
///
/// Alpha never reaches the vector output: fully transparent pixels are
/// excluded by the coverage mask and partially transparent ones
/// contribute their RGB values only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// An ordered boundary walk around one connected region.
///
/// The first and last point coincide when the walk closed on its start
/// pixel; otherwise the contour is truncated (isolated or pathological
/// region) and left open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    /// Boundary points in walk order.
    pub points: Vec<Point>,
    /// Hole polarity flag. Currently always `false`: the tracer does not
    /// compute nesting, so inner cutouts are emitted as ordinary regions.
    pub is_hole: bool,
}

impl Contour {
    /// Whether the boundary walk returned to its start pixel.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// Signed polygon area via the shoelace formula.
    ///
    /// The sign reflects walk orientation; callers that only care about
    /// size should take the magnitude. A repeated closing point
    /// contributes a zero term, so closed and open representations of
    /// the same loop agree.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let pts = &self.points;
        if pts.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..pts.len() {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            sum += a.x.mul_add(b.y, -(b.x * a.y));
        }
        sum / 2.0
    }
}

/// A cubic Bezier segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    /// Start point.
    pub p0: Point,
    /// First control handle (attached to `p0`).
    pub p1: Point,
    /// Second control handle (attached to `p3`).
    pub p2: Point,
    /// End point.
    pub p3: Point,
}

/// One filled vector shape: the fitted outline of a single traced region.
///
/// `area` is the signed shoelace area of the source contour. It exists
/// only to order shapes back-to-front; renderers must not interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Fitted outline, one segment per simplified point pair. May be
    /// empty when the source contour had fewer than 2 usable points;
    /// such shapes contribute nothing visually.
    pub curves: Vec<CubicBezier>,
    /// Fill color, taken verbatim from the shape's quantized layer.
    pub fill: Color,
    /// Signed polygon area of the traced contour.
    pub area: f64,
}

/// Configuration for the tracing pipeline.
///
/// One explicit value threaded through [`process`](crate::process) and
/// passed by reference into each stage. There is no ambient state.
/// Beyond rejecting a zero `color_count`, the pipeline assumes sane
/// parameter values and is only required not to crash on misuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Integer upscale factor applied after decoding. Values above 1 use
    /// smooth (Catmull-Rom) interpolation; 1 preserves raw pixels.
    pub upscale: u32,

    /// Target color count K for quantization. The output never has more
    /// layers than this, and may have fewer if clusters collapse.
    pub color_count: usize,

    /// Minimum polygon area (in px², magnitude) a traced region must
    /// reach to become a shape.
    pub min_shape_area: f64,

    /// Number of boundary smoothing iterations.
    pub smooth_iterations: usize,

    /// Douglas-Peucker simplification tolerance in pixels. Higher values
    /// remove more points, producing simpler outlines.
    pub simplify_tolerance: f64,

    /// Dilation passes that ignore the coverage mask. These solidify
    /// internal micro-gaps even at the image's true edge.
    pub unconditional_dilation_passes: usize,

    /// Dilation passes bounded by the coverage mask. These close seams
    /// between adjacent color regions without bleeding into transparent
    /// background.
    pub bounded_dilation_passes: usize,

    /// Seed for the quantizer's cluster initialization. Identical seeds
    /// and inputs produce identical output.
    pub seed: u64,
}

impl PipelineConfig {
    /// Default upscale factor.
    pub const DEFAULT_UPSCALE: u32 = 2;
    /// Default target color count.
    pub const DEFAULT_COLOR_COUNT: usize = 8;
    /// Default minimum shape area in px².
    pub const DEFAULT_MIN_SHAPE_AREA: f64 = 10.0;
    /// Default smoothing iteration count.
    pub const DEFAULT_SMOOTH_ITERATIONS: usize = 2;
    /// Default simplification tolerance in pixels.
    pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 1.0;
    /// Default unconditional dilation pass count.
    pub const DEFAULT_UNCONDITIONAL_DILATION_PASSES: usize = 1;
    /// Default coverage-bounded dilation pass count.
    pub const DEFAULT_BOUNDED_DILATION_PASSES: usize = 2;
    /// Default quantizer seed.
    pub const DEFAULT_SEED: u64 = 0;
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            upscale: Self::DEFAULT_UPSCALE,
            color_count: Self::DEFAULT_COLOR_COUNT,
            min_shape_area: Self::DEFAULT_MIN_SHAPE_AREA,
            smooth_iterations: Self::DEFAULT_SMOOTH_ITERATIONS,
            simplify_tolerance: Self::DEFAULT_SIMPLIFY_TOLERANCE,
            unconditional_dilation_passes: Self::DEFAULT_UNCONDITIONAL_DILATION_PASSES,
            bounded_dilation_passes: Self::DEFAULT_BOUNDED_DILATION_PASSES,
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// Result of running the full tracing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResult {
    /// All shapes from all layers, ordered by descending area magnitude
    /// so larger (background) shapes are drawn first.
    pub shapes: Vec<Shape>,
    /// Dimensions of the working image (after upscale). Export
    /// serializers use this to set coordinate spaces (e.g. SVG
    /// `viewBox`).
    pub dimensions: Dimensions,
    /// Per-stage timings and counts collected during the run.
    pub diagnostics: crate::diagnostics::PipelineDiagnostics,
}

/// Errors that can occur during pipeline processing.
///
/// An empty *visible area* is not an error — the pipeline returns an
/// empty shape list for fully transparent input. Only genuinely invalid
/// input (empty bytes, undecodable data) fails.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Point tests ---

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_distance_to_self_is_zero() {
        let p = Point::new(7.0, 11.0);
        assert!(p.distance(p).abs() < f64::EPSILON);
    }

    // --- Contour tests ---

    #[test]
    fn contour_closed_detection() {
        let closed = Contour {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 0.0),
            ],
            is_hole: false,
        };
        assert!(closed.is_closed());

        let open = Contour {
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            is_hole: false,
        };
        assert!(!open.is_closed());
    }

    #[test]
    fn shoelace_area_of_unit_square() {
        // Counter-clockwise in y-down image coordinates.
        let contour = Contour {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(1.0, 1.0),
                Point::new(1.0, 0.0),
            ],
            is_hole: false,
        };
        assert!((contour.signed_area().abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn shoelace_area_sign_flips_with_orientation() {
        let ccw = Contour {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(2.0, 2.0),
                Point::new(0.0, 2.0),
            ],
            is_hole: false,
        };
        let cw = Contour {
            points: ccw.points.iter().rev().copied().collect(),
            is_hole: false,
        };
        assert!((ccw.signed_area() + cw.signed_area()).abs() < 1e-12);
        assert!((ccw.signed_area().abs() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn shoelace_area_ignores_repeated_closing_point() {
        let open = Contour {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(3.0, 0.0),
                Point::new(3.0, 3.0),
                Point::new(0.0, 3.0),
            ],
            is_hole: false,
        };
        let mut closed = open.clone();
        closed.points.push(Point::new(0.0, 0.0));
        assert!((open.signed_area() - closed.signed_area()).abs() < 1e-12);
    }

    #[test]
    fn degenerate_contour_has_zero_area() {
        let contour = Contour {
            points: vec![Point::new(5.0, 5.0), Point::new(6.0, 5.0)],
            is_hole: false,
        };
        assert!(contour.signed_area().abs() < f64::EPSILON);
    }

    // --- PipelineConfig tests ---

    #[test]
    fn pipeline_config_defaults_match_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.upscale, PipelineConfig::DEFAULT_UPSCALE);
        assert_eq!(config.color_count, PipelineConfig::DEFAULT_COLOR_COUNT);
        assert!((config.min_shape_area - PipelineConfig::DEFAULT_MIN_SHAPE_AREA).abs() < f64::EPSILON);
        assert_eq!(
            config.smooth_iterations,
            PipelineConfig::DEFAULT_SMOOTH_ITERATIONS
        );
        assert!(
            (config.simplify_tolerance - PipelineConfig::DEFAULT_SIMPLIFY_TOLERANCE).abs()
                < f64::EPSILON
        );
        assert_eq!(
            config.unconditional_dilation_passes,
            PipelineConfig::DEFAULT_UNCONDITIONAL_DILATION_PASSES
        );
        assert_eq!(
            config.bounded_dilation_passes,
            PipelineConfig::DEFAULT_BOUNDED_DILATION_PASSES
        );
        assert_eq!(config.seed, PipelineConfig::DEFAULT_SEED);
    }

    // --- Serde round-trips ---

    #[test]
    fn pipeline_config_serde_round_trip() {
        let config = PipelineConfig {
            upscale: 3,
            color_count: 12,
            min_shape_area: 4.5,
            smooth_iterations: 1,
            simplify_tolerance: 0.75,
            unconditional_dilation_passes: 0,
            bounded_dilation_passes: 3,
            seed: 42,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn shape_serde_round_trip() {
        let shape = Shape {
            curves: vec![CubicBezier {
                p0: Point::new(0.0, 0.0),
                p1: Point::new(1.0, 0.0),
                p2: Point::new(2.0, 1.0),
                p3: Point::new(3.0, 1.0),
            }],
            fill: Color::new(200, 100, 50),
            area: 12.5,
        };
        let json = serde_json::to_string(&shape).unwrap();
        let deserialized: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(shape, deserialized);
    }

    // --- PipelineError tests ---

    #[test]
    fn error_empty_input_display() {
        let err = PipelineError::EmptyInput;
        assert_eq!(err.to_string(), "input image data is empty");
    }

    #[test]
    fn error_invalid_config_display() {
        let err = PipelineError::InvalidConfig("color_count must be >= 1".to_string());
        assert_eq!(
            err.to_string(),
            "invalid pipeline configuration: color_count must be >= 1",
        );
    }
}
