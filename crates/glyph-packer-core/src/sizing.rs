use crate::config::BORDER;
use crate::error::{GlyphPackerError, Result};
use crate::model::Glyph;
use tracing::debug;

/// Largest power of two representable as `u32`.
const MAX_POW2: u32 = 1 << 31;

/// Smallest power of two `>= v`. Zero and one both map to 1.
pub fn next_pow2(mut v: u32) -> u32 {
    if v <= 1 {
        return 1;
    }
    v -= 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}

/// Smallest `s` with `s * s >= area`.
fn ceil_sqrt(area: u64) -> u64 {
    let mut s = (area as f64).sqrt().ceil() as u64;
    while s * s < area {
        s += 1;
    }
    while s > 0 && (s - 1) * (s - 1) >= area {
        s -= 1;
    }
    s
}

/// Estimates a power-of-two `(width, height)` for `glyphs`.
///
/// Each glyph is budgeted `(w + 1) * (h + 1)` to account for its border; the
/// square root of the total gives a near-square side, and the height is raised
/// to at least the tallest glyph. This is an estimate: the shelf packer may
/// still overflow it.
pub fn estimate_atlas_size(glyphs: &[Glyph]) -> Result<(u32, u32)> {
    if glyphs.is_empty() {
        return Err(GlyphPackerError::Empty);
    }
    let total_area: u64 = glyphs
        .iter()
        .map(|g| (g.width() + BORDER) as u64 * (g.height() + BORDER) as u64)
        .sum();
    let max_height = glyphs.iter().map(Glyph::height).max().unwrap_or(0);
    let side = ceil_sqrt(total_area);
    let tall = side.max(max_height as u64);
    if tall > MAX_POW2 as u64 {
        return Err(GlyphPackerError::AtlasTooLarge {
            width: u32::try_from(side).unwrap_or(u32::MAX),
            height: u32::try_from(tall).unwrap_or(u32::MAX),
            max: MAX_POW2,
        });
    }
    let width = next_pow2(side as u32);
    let height = next_pow2(tall as u32);
    debug!(total_area, side, max_height, width, height, "estimated atlas size");
    Ok((width, height))
}
