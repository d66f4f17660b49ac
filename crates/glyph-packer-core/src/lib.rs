//! Core library for turning key-color sprite sheets into glyph atlases.
//!
//! - Extraction: 4-connected flood fill splits the sheet into glyphs wherever the key color separates them
//! - Sizing: a power-of-two estimate from the bordered glyph area
//! - Packing: next-fit shelves, tallest first, with a one-pixel key-color border around every glyph
//! - Output: RGBA atlas in memory, plus an indexed PNG encoder in [`palette`]
//!
//! Quick example:
//! ```ignore
//! use glyph_packer_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let sheet = image::open("font.png")?.to_rgba8();
//! let cfg = PackerConfig::builder().overflow_policy(OverflowPolicy::Grow).build();
//! let out = pack_sprite_sheet(&sheet, &cfg)?;
//! println!("{}", out.stats.summary());
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod packer;
pub mod palette;
pub mod pipeline;
pub mod sizing;

pub use config::*;
pub use error::*;
pub use extract::*;
pub use model::*;
pub use packer::*;
pub use palette::*;
pub use pipeline::*;
pub use sizing::*;

/// Convenience prelude for common types and functions.
/// Importing `glyph_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        BORDER, EmptyPolicy, KeyColor, OverflowPolicy, PackerConfig, PackerConfigBuilder,
        SortOrder,
    };
    pub use crate::error::{GlyphPackerError, Result};
    pub use crate::extract::extract_glyphs;
    pub use crate::model::{AtlasLayout, Glyph, OverflowAxis, PackStats, Placement, Rect};
    pub use crate::packer::{Packer, shelf::ShelfPacker};
    pub use crate::palette::{IndexedDepth, Palette, distinct_colors, encode_indexed_png};
    pub use crate::pipeline::{
        PackOutput, layout_glyphs, pack_glyphs, pack_glyphs_into, pack_sprite_sheet,
    };
    pub use crate::sizing::{estimate_atlas_size, next_pow2};
}
