//! Indexed (palette) PNG output.
//!
//! Glyph atlases usually carry only a handful of colors, so they are written as
//! palette images at the smallest bit depth that holds every color.

use crate::config::KeyColor;
use crate::error::{GlyphPackerError, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::str::FromStr;
use tracing::debug;

/// Bits per pixel for indexed output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexedDepth {
    /// Smallest depth that fits the palette.
    Auto,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "8")]
    Eight,
}

impl FromStr for IndexedDepth {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            "4" => Ok(Self::Four),
            "8" => Ok(Self::Eight),
            _ => Err(()),
        }
    }
}

impl IndexedDepth {
    fn bits(self) -> Option<u8> {
        match self {
            IndexedDepth::Auto => None,
            IndexedDepth::One => Some(1),
            IndexedDepth::Two => Some(2),
            IndexedDepth::Four => Some(4),
            IndexedDepth::Eight => Some(8),
        }
    }
}

/// Number of distinct RGBA values in `image`.
pub fn distinct_colors(image: &RgbaImage) -> usize {
    image.pixels().map(|p| p.0).collect::<HashSet<_>>().len()
}

/// Up to 256 colors in first-seen row-major order, key color first.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
    lookup: HashMap<[u8; 4], u8>,
}

impl Palette {
    pub fn from_image(image: &RgbaImage, key: KeyColor) -> Result<Self> {
        let mut colors = vec![key.0];
        let mut lookup = HashMap::from([(key.0, 0u8)]);
        for px in image.pixels() {
            if lookup.contains_key(&px.0) {
                continue;
            }
            if colors.len() == 256 {
                return Err(GlyphPackerError::PaletteOverflow {
                    colors: distinct_colors(image).max(257),
                    capacity: 256,
                });
            }
            lookup.insert(px.0, colors.len() as u8);
            colors.push(px.0);
        }
        Ok(Self { colors, lookup })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    pub fn index_of(&self, rgba: [u8; 4]) -> Option<u8> {
        self.lookup.get(&rgba).copied()
    }

    /// Smallest PNG palette depth (1, 2, 4 or 8) that holds every entry.
    pub fn min_bits(&self) -> u8 {
        match self.colors.len() {
            0..=2 => 1,
            3..=4 => 2,
            5..=16 => 4,
            _ => 8,
        }
    }
}

/// Writes `image` as an indexed PNG.
///
/// A tRNS chunk is added when any palette entry is not fully opaque. Fails with
/// `PaletteOverflow` if `depth` cannot address every distinct color.
pub fn encode_indexed_png<W: Write>(
    image: &RgbaImage,
    key: KeyColor,
    depth: IndexedDepth,
    writer: W,
) -> Result<()> {
    let palette = Palette::from_image(image, key)?;
    let bits = depth.bits().unwrap_or_else(|| palette.min_bits());
    let capacity = 1usize << bits;
    if palette.len() > capacity {
        return Err(GlyphPackerError::PaletteOverflow {
            colors: palette.len(),
            capacity,
        });
    }
    debug!(colors = palette.len(), bits, "encoding indexed png");

    let (w, h) = image.dimensions();
    let mut encoder = png::Encoder::new(writer, w, h);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(match bits {
        1 => png::BitDepth::One,
        2 => png::BitDepth::Two,
        4 => png::BitDepth::Four,
        _ => png::BitDepth::Eight,
    });
    let rgb: Vec<u8> = palette.colors().iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    encoder.set_palette(rgb);
    if palette.colors().iter().any(|c| c[3] != 255) {
        let alpha: Vec<u8> = palette.colors().iter().map(|c| c[3]).collect();
        encoder.set_trns(alpha);
    }

    let data = pack_indices(image, &palette, bits);
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&data)?;
    png_writer.finish()?;
    Ok(())
}

/// Bit-packs palette indices row by row, most significant bits first.
fn pack_indices(image: &RgbaImage, palette: &Palette, bits: u8) -> Vec<u8> {
    let (w, h) = image.dimensions();
    let bits = bits as usize;
    let stride = (w as usize * bits).div_ceil(8);
    let mut data = vec![0u8; stride * h as usize];
    for (x, y, px) in image.enumerate_pixels() {
        // every color was registered by Palette::from_image
        let idx = palette.index_of(px.0).unwrap_or(0);
        let bit = x as usize * bits;
        let shift = 8 - bits - bit % 8;
        data[y as usize * stride + bit / 8] |= idx << shift;
    }
    data
}
