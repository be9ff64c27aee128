//! Binary pixel masks.
//!
//! Masks are owned, explicitly sized 2D grids stored as a flat
//! row-major byte buffer (one byte per pixel, values 0 or 1). A flat
//! buffer plus stride beats nested vectors for cache locality, and a
//! signed-coordinate probe lets neighborhood scans treat out-of-bounds
//! as background without branching at every call site.

use image::RgbaImage;

use crate::types::Dimensions;

/// Alpha threshold above which a pixel counts as visible (out of 255).
pub const ALPHA_VISIBLE_THRESHOLD: u8 = 20;

/// A height×width binary grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BitMask {
    /// Create an all-background mask of the given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Mask width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    const fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Whether the pixel at `(x, y)` is foreground. `(x, y)` must be in
    /// bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[self.index(x, y)] != 0
    }

    /// Mark the pixel at `(x, y)` as foreground. `(x, y)` must be in
    /// bounds.
    pub fn set(&mut self, x: u32, y: u32) {
        let idx = self.index(x, y);
        self.data[idx] = 1;
    }

    /// Whether the pixel at signed `(x, y)` is foreground, treating
    /// out-of-bounds coordinates as background.
    #[must_use]
    pub fn probe(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let (x, y) = (x as u32, y as u32);
        self.get(x, y)
    }

    /// Number of foreground pixels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// Build the coverage mask: 1 where the source alpha exceeds the
/// visibility threshold. Computed once per run and shared read-only by
/// every layer.
#[must_use]
pub fn coverage_mask(image: &RgbaImage) -> BitMask {
    let mut mask = BitMask::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] > ALPHA_VISIBLE_THRESHOLD {
            mask.set(x, y);
        }
    }
    mask
}

/// Build a layer mask: 1 at each of the layer's pixel coordinates, 0
/// elsewhere. Pure conversion with no failure modes.
#[must_use]
pub fn layer_mask(pixels: &[(u32, u32)], dimensions: Dimensions) -> BitMask {
    let mut mask = BitMask::new(dimensions.width, dimensions.height);
    for &(x, y) in pixels {
        mask.set(x, y);
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mask_is_all_background() {
        let mask = BitMask::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                assert!(!mask.get(x, y));
            }
        }
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut mask = BitMask::new(5, 5);
        mask.set(2, 3);
        assert!(mask.get(2, 3));
        assert!(!mask.get(3, 2));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn probe_out_of_bounds_is_background() {
        let mut mask = BitMask::new(2, 2);
        mask.set(0, 0);
        assert!(mask.probe(0, 0));
        assert!(!mask.probe(-1, 0));
        assert!(!mask.probe(0, -1));
        assert!(!mask.probe(2, 0));
        assert!(!mask.probe(0, 2));
    }

    #[test]
    fn coverage_mask_applies_alpha_threshold() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 0])); // fully transparent
        image.put_pixel(1, 0, image::Rgba([0, 255, 0, ALPHA_VISIBLE_THRESHOLD])); // at threshold
        image.put_pixel(2, 0, image::Rgba([0, 0, 255, 255])); // opaque

        let coverage = coverage_mask(&image);
        assert!(!coverage.get(0, 0));
        assert!(!coverage.get(1, 0), "threshold is exclusive");
        assert!(coverage.get(2, 0));
    }

    #[test]
    fn layer_mask_marks_listed_coordinates_only() {
        let dims = Dimensions {
            width: 4,
            height: 4,
        };
        let mask = layer_mask(&[(0, 0), (3, 3), (1, 2)], dims);
        assert!(mask.get(0, 0));
        assert!(mask.get(3, 3));
        assert!(mask.get(1, 2));
        assert_eq!(mask.count(), 3);
    }
}
