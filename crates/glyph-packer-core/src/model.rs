use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if the two rectangles share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.x + r.w || r.x >= self.x + self.w || self.y >= r.y + r.h || r.y >= self.y + self.h)
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
}

/// One connected shape cut out of a sprite sheet.
///
/// `bounds` is the tight bounding box in source coordinates and `pixels` is the
/// rectangular crop of the source under it. Pixels inside the box that were not
/// reached by the flood fill (holes, concave notches) keep their source color,
/// which is the key color.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    bounds: Rect,
    pixels: RgbaImage,
}

impl Glyph {
    /// Builds a glyph whose crop starts at `origin` in the source image.
    pub fn new(origin: (u32, u32), pixels: RgbaImage) -> Self {
        let (w, h) = pixels.dimensions();
        Self {
            bounds: Rect::new(origin.0, origin.1, w, h),
            pixels,
        }
    }
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
    pub fn width(&self) -> u32 {
        self.bounds.w
    }
    pub fn height(&self) -> u32 {
        self.bounds.h
    }
}

/// Axis along which a layout ran out of room.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverflowAxis {
    Width,
    Height,
}

impl fmt::Display for OverflowAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowAxis::Width => f.write_str("width"),
            OverflowAxis::Height => f.write_str("height"),
        }
    }
}

/// A glyph placed in the atlas. `glyph` is the extraction index, `frame` the
/// interior rectangle (border excluded).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub glyph: usize,
    pub frame: Rect,
}

/// Geometry of a packed atlas, in placement order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasLayout {
    pub width: u32,
    pub height: u32,
    pub shelves: u32,
    pub placements: Vec<Placement>,
}

impl AtlasLayout {
    /// Computes packing statistics for this layout.
    pub fn stats(&self, grow_steps: u32) -> PackStats {
        let atlas_area = self.width as u64 * self.height as u64;
        let used_area: u64 = self.placements.iter().map(|p| p.frame.area()).sum();
        let occupancy = if atlas_area > 0 {
            used_area as f64 / atlas_area as f64
        } else {
            0.0
        };
        PackStats {
            glyphs: self.placements.len(),
            shelves: self.shelves,
            atlas_width: self.width,
            atlas_height: self.height,
            atlas_area,
            used_area,
            occupancy,
            grow_steps,
        }
    }
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PackStats {
    /// Number of glyphs placed.
    pub glyphs: usize,
    /// Number of shelves (rows) opened by the packer.
    pub shelves: u32,
    pub atlas_width: u32,
    pub atlas_height: u32,
    /// `atlas_width * atlas_height`.
    pub atlas_area: u64,
    /// Sum of glyph interior areas, borders excluded.
    pub used_area: u64,
    /// used_area / atlas_area (0.0 to 1.0).
    pub occupancy: f64,
    /// How many times the atlas was doubled after an overflow.
    pub grow_steps: u32,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Atlas: {}x{}, Glyphs: {}, Shelves: {}, Occupancy: {:.2}%, Used Area: {} px², Grow steps: {}",
            self.atlas_width,
            self.atlas_height,
            self.glyphs,
            self.shelves,
            self.occupancy * 100.0,
            self.used_area,
            self.grow_steps,
        )
    }

    /// Returns wasted space in pixels (borders count as waste).
    pub fn wasted_area(&self) -> u64 {
        self.atlas_area.saturating_sub(self.used_area)
    }
}
