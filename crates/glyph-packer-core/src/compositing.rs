use crate::config::BORDER;
use image::{Rgba, RgbaImage};

/// Blit `src` into `canvas` with its top-left at `(dx, dy)` and paint the
/// surrounding ring (corners included) with `key`.
///
/// Ring pixels that fall outside the canvas are skipped; the canvas edge
/// separates the glyph there.
pub fn blit_with_border(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, key: Rgba<u8>) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    let b = BORDER as i64;

    for yy in -b..sh as i64 + b {
        let cy = dy as i64 + yy;
        if cy < 0 || cy >= ch as i64 {
            continue;
        }
        for xx in -b..sw as i64 + b {
            let cx = dx as i64 + xx;
            if cx < 0 || cx >= cw as i64 {
                continue;
            }
            let inside = (0..sw as i64).contains(&xx) && (0..sh as i64).contains(&yy);
            let px = if inside {
                *src.get_pixel(xx as u32, yy as u32)
            } else {
                key
            };
            canvas.put_pixel(cx as u32, cy as u32, px);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: Rgba<u8> = Rgba([255, 0, 255, 255]);
    const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn ring_overwrites_neighbouring_pixels() {
        let mut canvas = RgbaImage::from_pixel(5, 5, Rgba([1, 2, 3, 255]));
        let src = RgbaImage::from_pixel(2, 2, INK);
        blit_with_border(&src, &mut canvas, 1, 1, KEY);
        for y in 0..4 {
            for x in 0..4 {
                let expect = if (1..3).contains(&x) && (1..3).contains(&y) {
                    INK
                } else {
                    KEY
                };
                assert_eq!(*canvas.get_pixel(x, y), expect, "pixel ({x},{y})");
            }
        }
        assert_eq!(*canvas.get_pixel(4, 4), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn ring_is_clipped_at_canvas_edge() {
        let mut canvas = RgbaImage::from_pixel(3, 3, KEY);
        let src = RgbaImage::from_pixel(2, 2, INK);
        blit_with_border(&src, &mut canvas, 1, 1, KEY);
        assert_eq!(*canvas.get_pixel(2, 2), INK);
        assert_eq!(*canvas.get_pixel(0, 2), KEY);
    }
}
