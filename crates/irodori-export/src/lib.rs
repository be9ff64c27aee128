//! irodori-export: Pure format serializers (sans-IO)
//!
//! Converts filled vector shapes into output formats. Currently
//! supports SVG.

pub mod svg;

pub use svg::{SvgMetadata, to_svg};
