use glyph_packer_core::prelude::*;
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};

const KEY: Rgba<u8> = Rgba([255, 0, 255, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn fill(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, px: Rgba<u8>) {
    for yy in y..y + h {
        for xx in x..x + w {
            img.put_pixel(xx, yy, px);
        }
    }
}

fn two_squares() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(10, 10, KEY);
    fill(&mut img, 1, 1, 3, 3, INK);
    fill(&mut img, 6, 5, 3, 3, PAPER);
    img
}

#[test]
fn two_squares_land_on_two_shelves() {
    let cfg = PackerConfig::builder()
        .overflow_policy(OverflowPolicy::Fail)
        .build();
    let out = pack_sprite_sheet(&two_squares(), &cfg).expect("pack");
    assert_eq!(out.atlas.dimensions(), (8, 8));
    assert_eq!(
        out.layout.placements,
        vec![
            Placement {
                glyph: 0,
                frame: Rect::new(1, 1, 3, 3)
            },
            Placement {
                glyph: 1,
                frame: Rect::new(1, 5, 3, 3)
            },
        ]
    );
    assert_eq!(out.layout.shelves, 2);

    for y in 0..8 {
        for x in 0..8 {
            let expect = if (1..4).contains(&x) && (1..4).contains(&y) {
                INK
            } else if (1..4).contains(&x) && (5..8).contains(&y) {
                PAPER
            } else {
                KEY
            };
            assert_eq!(*out.atlas.get_pixel(x, y), expect, "pixel ({x},{y})");
        }
    }
}

#[test]
fn tallest_glyph_goes_first_and_ties_keep_order() {
    let mut img = RgbaImage::from_pixel(20, 8, KEY);
    fill(&mut img, 0, 0, 2, 2, INK); // glyph 0, h=2
    fill(&mut img, 4, 0, 2, 5, INK); // glyph 1, h=5
    fill(&mut img, 8, 0, 3, 2, INK); // glyph 2, h=2
    let out = pack_sprite_sheet(&img, &PackerConfig::default()).expect("pack");
    let order: Vec<usize> = out.layout.placements.iter().map(|p| p.glyph).collect();
    assert_eq!(order, vec![1, 0, 2]);
}

#[test]
fn sort_none_keeps_extraction_order() {
    let mut img = RgbaImage::from_pixel(20, 8, KEY);
    fill(&mut img, 0, 0, 2, 2, INK);
    fill(&mut img, 4, 0, 2, 5, INK);
    let cfg = PackerConfig::builder().sort_order(SortOrder::None).build();
    let out = pack_sprite_sheet(&img, &cfg).expect("pack");
    let order: Vec<usize> = out.layout.placements.iter().map(|p| p.glyph).collect();
    assert_eq!(order, vec![0, 1]);
}

/// Solid rectangles in 16x16 cells with up to three ink colors.
fn random_rect_sheet(seed: u64) -> (RgbaImage, Vec<(u32, u32)>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let inks = [INK, PAPER, Rgba([128, 128, 128, 255])];
    let mut img = RgbaImage::from_pixel(256, 256, KEY);
    let mut sizes = Vec::new();
    for cy in 0..16u32 {
        for cx in 0..16u32 {
            if rng.gen_bool(0.4) {
                continue;
            }
            let w = rng.gen_range(1..=14u32);
            let h = rng.gen_range(1..=14u32);
            let x = rng.gen_range(0..=15 - w - 1);
            let y = rng.gen_range(0..=15 - h - 1);
            let ink = inks[rng.gen_range(0..inks.len())];
            fill(&mut img, cx * 16 + x, cy * 16 + y, w, h, ink);
            sizes.push((w, h));
        }
    }
    (img, sizes)
}

fn sorted(mut v: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    v.sort();
    v
}

#[test]
fn random_sheets_keep_atlas_invariants() {
    for seed in [3u64, 2024, 77] {
        let (img, sizes) = random_rect_sheet(seed);
        let glyphs = extract_glyphs(&img, KeyColor::MAGENTA);
        let out = pack_glyphs(&glyphs, &PackerConfig::default()).expect("pack");
        let (aw, ah) = out.atlas.dimensions();
        assert!(aw.is_power_of_two() && ah.is_power_of_two());
        assert_eq!(out.layout.placements.len(), glyphs.len());

        // interiors disjoint and in bounds
        let frames: Vec<Rect> = out.layout.placements.iter().map(|p| p.frame).collect();
        for i in 0..frames.len() {
            assert!(Rect::new(0, 0, aw, ah).contains(&frames[i]));
            for j in (i + 1)..frames.len() {
                assert!(
                    !frames[i].intersects(&frames[j]),
                    "frames overlap: {:?} vs {:?}",
                    frames[i],
                    frames[j]
                );
            }
        }

        // each pixel is key or the owning glyph's pixel
        let mut owner: Vec<Option<usize>> = vec![None; (aw * ah) as usize];
        for (pi, p) in out.layout.placements.iter().enumerate() {
            let g = &glyphs[p.glyph];
            for (x, y, px) in g.pixels().enumerate_pixels() {
                let (ax, ay) = (p.frame.x + x, p.frame.y + y);
                assert_eq!(out.atlas.get_pixel(ax, ay), px);
                owner[(ay * aw + ax) as usize] = Some(pi);
            }
        }
        for (x, y, px) in out.atlas.enumerate_pixels() {
            if owner[(y * aw + x) as usize].is_none() {
                assert_eq!(*px, KEY, "stray color at ({x},{y})");
            }
        }

        // key-color ring on every side that lies inside the atlas
        for f in &frames {
            for x in f.x..f.x + f.w {
                assert_eq!(*out.atlas.get_pixel(x, f.y - 1), KEY);
                if f.y + f.h < ah {
                    assert_eq!(*out.atlas.get_pixel(x, f.y + f.h), KEY);
                }
            }
            for y in f.y..f.y + f.h {
                assert_eq!(*out.atlas.get_pixel(f.x - 1, y), KEY);
                assert_eq!(*out.atlas.get_pixel(f.x + f.w, y), KEY);
            }
        }

        // re-extracting the atlas recovers the same glyph sizes
        let again = extract_glyphs(&out.atlas, KeyColor::MAGENTA);
        let got: Vec<(u32, u32)> = again.iter().map(|g| (g.width(), g.height())).collect();
        assert_eq!(sorted(got), sorted(sizes));
    }
}

#[test]
fn layout_only_matches_composited_geometry() {
    let (img, _) = random_rect_sheet(11);
    let glyphs = extract_glyphs(&img, KeyColor::MAGENTA);
    let out = pack_glyphs(&glyphs, &PackerConfig::default()).expect("pack");
    let layout = layout_glyphs(
        &glyphs,
        out.layout.width,
        out.layout.height,
        SortOrder::HeightDesc,
    )
    .expect("layout");
    assert_eq!(layout, out.layout);
}

#[test]
fn packing_is_deterministic() {
    let (img, _) = random_rect_sheet(5);
    let a = pack_sprite_sheet(&img, &PackerConfig::default()).expect("a");
    let b = pack_sprite_sheet(&img, &PackerConfig::default()).expect("b");
    assert_eq!(a.layout, b.layout);
    assert_eq!(a.atlas, b.atlas);
}
