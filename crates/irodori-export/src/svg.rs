//! SVG export serializer.
//!
//! Converts shapes into an SVG string with filled `<path>` elements
//! using the [`svg`] crate for document construction, XML escaping, and
//! path data formatting.
//!
//! Each shape becomes a separate `<path>` element: one `M` (move to)
//! followed by a `C` (cubic curve to) per fitted segment and a closing
//! `z`. Shapes arrive from the pipeline in back-to-front paint order
//! and are emitted in that order, so later paths occlude earlier ones.
//!
//! Optional [`SvgMetadata`] embeds `<title>` and `<desc>` elements for
//! accessibility and to help file managers identify exported files.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Element, Path, Title};
use svg::node::{Node, Text, Value};

use irodori_pipeline::{Color, Dimensions, Shape};

/// Metadata to embed in the SVG document.
///
/// All fields are optional.  When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.  These
/// are standard SVG accessibility elements and are surfaced by some file
/// managers and screen readers.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title — emitted as `<title>`.
    ///
    /// Typically the source image filename (without extension).
    pub title: Option<&'a str>,

    /// Document description — emitted as `<desc>`.
    ///
    /// Typically contains pipeline parameters so exported files are
    /// distinguishable.
    pub description: Option<&'a str>,

    /// Structured pipeline configuration JSON — emitted inside a
    /// `<metadata>` element wrapped in a namespaced `<irodori:pipeline>`
    /// element.
    ///
    /// When present, the full serialized `PipelineConfig` is embedded so
    /// exported files carry machine-parseable settings for
    /// reproducibility.  The human-readable `description` is retained
    /// separately.
    pub config_json: Option<&'a str>,
}

/// Round a coordinate to 2 decimal places (0.01 px precision).
///
/// Keeps path data compact; sub-centipixel precision is far below
/// anything visible at raster scale.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a fill color as a lowercase `#rrggbb` hex string.
fn fill_hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Build an SVG path `d` attribute string from a shape's curve list.
///
/// Uses `M` for the first curve's start point, one `C` per cubic
/// segment, and a final `z`. Returns an empty string for shapes with no
/// curves.
///
/// # Examples
///
/// ```
/// use irodori_pipeline::{Color, CubicBezier, Point, Shape};
/// use irodori_export::svg::build_shape_data;
///
/// let shape = Shape {
///     curves: vec![CubicBezier {
///         p0: Point::new(0.0, 0.0),
///         p1: Point::new(1.0, 0.0),
///         p2: Point::new(3.0, 4.0),
///         p3: Point::new(4.0, 4.0),
///     }],
///     fill: Color::new(0, 0, 0),
///     area: 1.0,
/// };
/// let d = build_shape_data(&shape);
/// assert!(d.starts_with('M'));
/// assert!(d.contains('C'));
/// assert!(d.ends_with('z'));
/// ```
#[must_use]
pub fn build_shape_data(shape: &Shape) -> String {
    let Some(first) = shape.curves.first() else {
        return String::new();
    };

    let mut data = Data::new().move_to((round2(first.p0.x), round2(first.p0.y)));
    for curve in &shape.curves {
        data = data.cubic_curve_to((
            round2(curve.p1.x),
            round2(curve.p1.y),
            round2(curve.p2.x),
            round2(curve.p2.y),
            round2(curve.p3.x),
            round2(curve.p3.y),
        ));
    }
    String::from(Value::from(data.close()))
}

/// Serialize shapes into an SVG document string.
///
/// Each [`Shape`] with at least one curve becomes a filled `<path>`
/// element; shapes with empty curve lists are skipped (they have no
/// visible geometry). Paths carry only a `fill` attribute — region
/// boundaries meet exactly, so strokes would double-draw edges.
///
/// The `viewBox` is set from [`Dimensions`] so the SVG coordinate space
/// matches the pipeline's working pixel grid.
///
/// If [`SvgMetadata::title`] or [`SvgMetadata::description`] is
/// provided, the corresponding `<title>` / `<desc>` element is emitted
/// after the opening `<svg>` tag.  If [`SvgMetadata::config_json`] is
/// provided, a `<metadata>` element is emitted containing the JSON
/// wrapped in a namespaced `<irodori:pipeline>` element.
///
/// # Examples
///
/// ```
/// use irodori_pipeline::{Color, CubicBezier, Dimensions, Point, Shape};
/// use irodori_export::{SvgMetadata, to_svg};
///
/// let shapes = vec![Shape {
///     curves: vec![CubicBezier {
///         p0: Point::new(0.0, 0.0),
///         p1: Point::new(5.0, 0.0),
///         p2: Point::new(5.0, 10.0),
///         p3: Point::new(0.0, 10.0),
///     }],
///     fill: Color::new(255, 0, 0),
///     area: 50.0,
/// }];
/// let dims = Dimensions { width: 100, height: 100 };
/// let metadata = SvgMetadata {
///     title: Some("poppy"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&shapes, dims, &metadata);
/// assert!(svg.contains("<title>poppy</title>"));
/// assert!(svg.contains(r##"fill="#ff0000""##));
/// ```
#[must_use]
pub fn to_svg(shapes: &[Shape], dimensions: Dimensions, metadata: &SvgMetadata<'_>) -> String {
    let mut doc = Document::new()
        .set("width", dimensions.width)
        .set("height", dimensions.height)
        .set("viewBox", (0, 0, dimensions.width, dimensions.height));

    // Optional <title> element
    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    // Optional <desc> element
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    // Optional <metadata> element with structured pipeline config
    if let Some(config_json) = metadata.config_json {
        let mut pipeline_el = Element::new("irodori:pipeline");
        pipeline_el.assign("xmlns:irodori", "https://irodori.app/ns/1");
        pipeline_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(pipeline_el);
        doc = doc.add(metadata_el);
    }

    // One filled <path> per shape, in paint order.
    for shape in shapes {
        let d = build_shape_data(shape);
        if d.is_empty() {
            continue;
        }

        let path = Path::new().set("d", d).set("fill", fill_hex(shape.fill));
        doc = doc.add(path);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
