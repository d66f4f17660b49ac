use crate::compositing::blit_with_border;
use crate::config::{EmptyPolicy, KeyColor, OverflowPolicy, PackerConfig, SortOrder};
use crate::error::{GlyphPackerError, Result};
use crate::extract::extract_glyphs;
use crate::model::{AtlasLayout, Glyph, OverflowAxis, PackStats, Rect};
use crate::packer::{Packer, shelf::ShelfPacker};
use crate::sizing::estimate_atlas_size;
use image::RgbaImage;
use tracing::{debug, instrument, warn};

/// Packed atlas pixels plus the geometry and statistics that produced them.
#[derive(Debug, Clone)]
pub struct PackOutput {
    pub atlas: RgbaImage,
    pub layout: AtlasLayout,
    pub stats: PackStats,
}

#[instrument(skip_all)]
/// Extracts the glyphs of `sheet` and packs them into a power-of-two atlas.
///
/// Notes:
/// - Glyphs are separated by `cfg.key_color` using 4-connectivity.
/// - The atlas size comes from [`estimate_atlas_size`]; when the shelf layout
///   overflows it, `cfg.overflow_policy` decides between failing and doubling
///   the overflowing side.
/// - A sheet without glyphs is handled by `cfg.empty_policy`.
pub fn pack_sprite_sheet(sheet: &RgbaImage, cfg: &PackerConfig) -> Result<PackOutput> {
    cfg.validate()?;
    let glyphs = extract_glyphs(sheet, cfg.key_color);
    pack_glyphs(&glyphs, cfg)
}

#[instrument(skip_all, fields(glyphs = glyphs.len()))]
/// Packs already extracted glyphs, sizing the atlas automatically.
pub fn pack_glyphs(glyphs: &[Glyph], cfg: &PackerConfig) -> Result<PackOutput> {
    cfg.validate()?;

    if glyphs.is_empty() {
        return match cfg.empty_policy {
            EmptyPolicy::Fail => Err(GlyphPackerError::Empty),
            EmptyPolicy::Blank => {
                debug!("no glyphs; emitting blank atlas");
                Ok(composite(glyphs, empty_layout(1, 1), cfg.key_color, 0))
            }
        };
    }

    let (mut width, mut height) = estimate_atlas_size(glyphs)?;
    check_limit(width, height, cfg.max_dimension)?;

    let mut grow_steps = 0u32;
    loop {
        match layout_glyphs(glyphs, width, height, cfg.sort_order) {
            Ok(layout) => return Ok(composite(glyphs, layout, cfg.key_color, grow_steps)),
            Err(GlyphPackerError::PackingOverflow {
                placed,
                total,
                axis,
                ..
            }) if cfg.overflow_policy == OverflowPolicy::Grow => {
                let (next_w, next_h) = match axis {
                    OverflowAxis::Width => (width.checked_mul(2), Some(height)),
                    OverflowAxis::Height => (Some(width), height.checked_mul(2)),
                };
                let grown = next_w
                    .zip(next_h)
                    .filter(|&(w, h)| w <= cfg.max_dimension && h <= cfg.max_dimension);
                let Some((next_w, next_h)) = grown else {
                    return Err(GlyphPackerError::PackingOverflow {
                        placed,
                        total,
                        width,
                        height,
                        axis,
                    });
                };
                warn!(
                    placed,
                    total,
                    %axis,
                    from = %format!("{width}x{height}"),
                    to = %format!("{next_w}x{next_h}"),
                    "atlas overflowed; growing"
                );
                width = next_w;
                height = next_h;
                grow_steps += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Packs glyphs into an atlas of exactly `width` x `height`, without sizing or growth.
///
/// Zero dimensions fail with `InvalidDimensions` before any pixel is written.
/// An empty glyph slice yields a canvas filled with the key color.
pub fn pack_glyphs_into(
    glyphs: &[Glyph],
    width: u32,
    height: u32,
    cfg: &PackerConfig,
) -> Result<PackOutput> {
    if width == 0 || height == 0 {
        return Err(GlyphPackerError::InvalidDimensions { width, height });
    }
    let layout = if glyphs.is_empty() {
        empty_layout(width, height)
    } else {
        layout_glyphs(glyphs, width, height, cfg.sort_order)?
    };
    Ok(composite(glyphs, layout, cfg.key_color, 0))
}

/// Computes shelf placements for `glyphs` in a `width` x `height` atlas without touching pixels.
pub fn layout_glyphs(
    glyphs: &[Glyph],
    width: u32,
    height: u32,
    order: SortOrder,
) -> Result<AtlasLayout> {
    let mut packer = ShelfPacker::new(width, height)?;
    let sorted = sort_indices(glyphs, order);
    let mut placements = Vec::with_capacity(glyphs.len());

    for idx in sorted {
        let g = &glyphs[idx];
        let rect = Rect::new(0, 0, g.width(), g.height());
        match packer.pack(idx, &rect) {
            Some(p) => placements.push(p),
            None => {
                let axis = packer.check(&rect).err().unwrap_or(OverflowAxis::Height);
                return Err(GlyphPackerError::PackingOverflow {
                    placed: placements.len(),
                    total: glyphs.len(),
                    width,
                    height,
                    axis,
                });
            }
        }
    }

    debug!(
        width,
        height,
        shelves = packer.shelves(),
        placed = placements.len(),
        "layout complete"
    );
    Ok(AtlasLayout {
        width,
        height,
        shelves: packer.shelves(),
        placements,
    })
}

/// Extraction indices in packing order. `sort_by` is stable, so ties keep extraction order.
fn sort_indices(glyphs: &[Glyph], order: SortOrder) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..glyphs.len()).collect();
    match order {
        SortOrder::None => {}
        SortOrder::HeightDesc => {
            idx.sort_by(|&a, &b| glyphs[b].height().cmp(&glyphs[a].height()));
        }
        SortOrder::AreaDesc => {
            idx.sort_by(|&a, &b| glyphs[b].bounds().area().cmp(&glyphs[a].bounds().area()));
        }
        SortOrder::MaxSideDesc => {
            idx.sort_by(|&a, &b| {
                let side = |g: &Glyph| g.width().max(g.height());
                side(&glyphs[b]).cmp(&side(&glyphs[a]))
            });
        }
    }
    idx
}

fn check_limit(width: u32, height: u32, max: u32) -> Result<()> {
    if width > max || height > max {
        return Err(GlyphPackerError::AtlasTooLarge { width, height, max });
    }
    Ok(())
}

fn empty_layout(width: u32, height: u32) -> AtlasLayout {
    AtlasLayout {
        width,
        height,
        shelves: 0,
        placements: Vec::new(),
    }
}

fn composite(glyphs: &[Glyph], layout: AtlasLayout, key: KeyColor, grow_steps: u32) -> PackOutput {
    let mut atlas = RgbaImage::from_pixel(layout.width, layout.height, key.rgba());
    for p in &layout.placements {
        blit_with_border(
            glyphs[p.glyph].pixels(),
            &mut atlas,
            p.frame.x,
            p.frame.y,
            key.rgba(),
        );
    }
    let stats = layout.stats(grow_steps);
    PackOutput {
        atlas,
        layout,
        stats,
    }
}
