//! Image decoding and working-resolution setup.
//!
//! The pipeline operates on RGBA throughout: alpha drives the coverage
//! mask and RGB feeds the quantizer. Upscaling happens here, before any
//! analysis, so every later stage sees the working resolution.

use image::RgbaImage;
use image::imageops::FilterType;

use crate::types::PipelineError;

/// Decode raw image bytes (PNG, JPEG, BMP, WebP) into RGBA and apply
/// the integer upscale factor.
///
/// Upscaling uses Catmull-Rom interpolation: the smooth gradients it
/// introduces at color boundaries give the quantizer sub-pixel detail
/// to work with, and the tracer finer curves. An `upscale` of 0 or 1
/// preserves the raw pixels.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty,
/// [`PipelineError::ImageDecode`] if the bytes are not a decodable image,
/// and [`PipelineError::InvalidConfig`] if the upscaled dimensions would
/// overflow `u32`.
pub fn decode_rgba(image_bytes: &[u8], upscale: u32) -> Result<RgbaImage, PipelineError> {
    if image_bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let decoded = image::load_from_memory(image_bytes)?.to_rgba8();
    if upscale > 1 {
        let (width, height) = decoded
            .width()
            .checked_mul(upscale)
            .zip(decoded.height().checked_mul(upscale))
            .ok_or_else(|| {
                PipelineError::InvalidConfig(format!(
                    "upscale {upscale} overflows the image dimensions"
                ))
            })?;
        Ok(image::imageops::resize(
            &decoded,
            width,
            height,
            FilterType::CatmullRom,
        ))
    } else {
        Ok(decoded)
    }
}
