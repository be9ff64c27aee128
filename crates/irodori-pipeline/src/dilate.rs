//! Hybrid morphological dilation.
//!
//! Quantization leaves 1px seams between adjacent color regions, and
//! noise can punch sub-pixel holes inside otherwise solid areas. Both
//! are repaired by growing each layer mask, in two phases:
//!
//! 1. *Unconditional* passes ignore the coverage mask. They solidify
//!    internal micro-gaps even at the image's true edge.
//! 2. *Coverage-bounded* passes only write pixels where the source
//!    alpha was visible. They close gaps between neighboring color
//!    regions without bleeding into transparent background.
//!
//! Each pass reads the previous pass's output into a fresh buffer, so
//! input and output never alias.

use crate::mask::BitMask;

/// Grow `mask` by `unconditional` free passes followed by `bounded`
/// coverage-limited passes. The input is not mutated; the result is
/// always a superset of the input.
#[must_use = "returns the dilated mask"]
pub fn dilate_hybrid(
    mask: &BitMask,
    coverage: &BitMask,
    unconditional: usize,
    bounded: usize,
) -> BitMask {
    let mut current = mask.clone();
    for _ in 0..unconditional {
        current = dilate_pass(&current, None);
    }
    for _ in 0..bounded {
        current = dilate_pass(&current, Some(coverage));
    }
    current
}

/// One 8-connected dilation pass. Every neighbor (including self) of a
/// foreground pixel becomes foreground, limited to `coverage` when
/// given. Double-buffered: the output starts as a copy of the input,
/// which also guarantees monotonic growth.
fn dilate_pass(mask: &BitMask, coverage: Option<&BitMask>) -> BitMask {
    let mut out = mask.clone();
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if !mask.get(x, y) {
                continue;
            }
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let nx = i64::from(x) + dx;
                    let ny = i64::from(y) + dy;
                    if nx < 0
                        || ny < 0
                        || nx >= i64::from(mask.width())
                        || ny >= i64::from(mask.height())
                    {
                        continue;
                    }
                    if coverage.is_some_and(|c| !c.probe(nx, ny)) {
                        continue;
                    }
                    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
                    out.set(nx as u32, ny as u32);
                }
            }
        }
    }
    out
}
