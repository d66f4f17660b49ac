use super::Packer;
use crate::config::BORDER;
use crate::error::{GlyphPackerError, Result};
use crate::model::{OverflowAxis, Placement, Rect};
use tracing::trace;

/// Next-fit shelf packer.
///
/// Glyphs go left to right starting at `(BORDER, BORDER)`, each followed by a
/// one-pixel gap. When a glyph plus its right border would cross the atlas
/// width, a new shelf opens below the tallest glyph of the current one. The
/// interior must fit inside the atlas; a border pixel that would fall past the
/// bottom edge is left to the edge itself.
pub struct ShelfPacker {
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    row_height: u32,
    shelves: u32,
}

impl ShelfPacker {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GlyphPackerError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            x: BORDER,
            y: BORDER,
            row_height: 0,
            shelves: 0,
        })
    }

    /// Number of shelves opened so far.
    pub fn shelves(&self) -> u32 {
        self.shelves
    }

    /// Where `rect` would land, and whether it starts a new shelf.
    fn slot(&self, rect: &Rect) -> std::result::Result<(u32, u32, bool), OverflowAxis> {
        let (mut x, mut y, mut wrapped) = (self.x, self.y, false);
        if x + rect.w + BORDER > self.width && x > BORDER {
            x = BORDER;
            y = self.y + self.row_height + BORDER;
            wrapped = true;
        }
        if x + rect.w + BORDER > self.width {
            return Err(OverflowAxis::Width);
        }
        if y + rect.h > self.height {
            return Err(OverflowAxis::Height);
        }
        Ok((x, y, wrapped))
    }

    /// Returns the axis that stops `rect` from being placed next, if any.
    pub fn check(&self, rect: &Rect) -> std::result::Result<(), OverflowAxis> {
        self.slot(rect).map(|_| ())
    }
}

impl Packer for ShelfPacker {
    fn can_pack(&self, rect: &Rect) -> bool {
        self.slot(rect).is_ok()
    }

    fn pack(&mut self, glyph: usize, rect: &Rect) -> Option<Placement> {
        let (x, y, wrapped) = self.slot(rect).ok()?;
        if wrapped {
            trace!(y, previous_row_height = self.row_height, "new shelf");
            self.row_height = 0;
        }
        if wrapped || self.shelves == 0 {
            self.shelves += 1;
        }
        self.y = y;
        self.x = x + rect.w + BORDER;
        self.row_height = self.row_height.max(rect.h);
        Some(Placement {
            glyph,
            frame: Rect::new(x, y, rect.w, rect.h),
        })
    }
}
