use crate::model::{Placement, Rect};

pub mod shelf;

/// A packer places glyph rectangles into a fixed-size atlas.
///
/// Implementations must ensure no overlaps and leave room for the key-color border.
/// `pack` returns `None` if the rectangle cannot be placed.
pub trait Packer {
    fn can_pack(&self, rect: &Rect) -> bool;
    fn pack(&mut self, glyph: usize, rect: &Rect) -> Option<Placement>;
}
