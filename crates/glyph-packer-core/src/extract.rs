use crate::config::KeyColor;
use crate::model::{Glyph, Rect};
use image::{GenericImageView, RgbaImage};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Visited flags for one extraction pass, indexed by `y * width + x`.
struct VisitedGrid {
    width: u32,
    cells: Vec<bool>,
}

impl VisitedGrid {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            cells: vec![false; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    fn is_set(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)]
    }

    /// Marks the cell and returns true if it was not marked before.
    #[inline]
    fn mark(&mut self, x: u32, y: u32) -> bool {
        let i = self.index(x, y);
        !std::mem::replace(&mut self.cells[i], true)
    }
}

/// Splits a sprite sheet into its 4-connected non-key regions.
///
/// Glyphs come out in the row-major order of their first pixel. Diagonal
/// neighbours are separate glyphs. Returns an empty vector when every pixel is
/// the key color.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn extract_glyphs(image: &RgbaImage, key: KeyColor) -> Vec<Glyph> {
    let (w, h) = image.dimensions();
    let mut visited = VisitedGrid::new(w, h);
    let mut queue: VecDeque<(u32, u32)> = VecDeque::new();
    let mut glyphs = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if visited.is_set(x, y) || key.matches(image.get_pixel(x, y)) {
                continue;
            }
            let bounds = flood_fill(image, key, &mut visited, &mut queue, x, y);
            glyphs.push(crop(image, bounds));
        }
    }
    debug!(glyphs = glyphs.len(), "extracted glyphs");
    glyphs
}

/// Breadth-first fill from `(sx, sy)`; returns the tight bounds of the region.
fn flood_fill(
    image: &RgbaImage,
    key: KeyColor,
    visited: &mut VisitedGrid,
    queue: &mut VecDeque<(u32, u32)>,
    sx: u32,
    sy: u32,
) -> Rect {
    let (w, h) = image.dimensions();
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (sx, sx, sy, sy);
    visited.mark(sx, sy);
    queue.push_back((sx, sy));

    while let Some((x, y)) = queue.pop_front() {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);

        let neighbours = [
            x.checked_sub(1).map(|nx| (nx, y)),
            (x + 1 < w).then_some((x + 1, y)),
            y.checked_sub(1).map(|ny| (x, ny)),
            (y + 1 < h).then_some((x, y + 1)),
        ];
        for (nx, ny) in neighbours.into_iter().flatten() {
            if !visited.is_set(nx, ny) && !key.matches(image.get_pixel(nx, ny)) {
                visited.mark(nx, ny);
                queue.push_back((nx, ny));
            }
        }
    }

    Rect::new(x_min, y_min, x_max - x_min + 1, y_max - y_min + 1)
}

fn crop(image: &RgbaImage, bounds: Rect) -> Glyph {
    let pixels = image
        .view(bounds.x, bounds.y, bounds.w, bounds.h)
        .to_image();
    Glyph::new((bounds.x, bounds.y), pixels)
}
