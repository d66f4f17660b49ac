use glyph_packer_core::prelude::*;
use image::{Rgba, RgbaImage};

fn glyph(w: u32, h: u32) -> Glyph {
    Glyph::new((0, 0), RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255])))
}

#[test]
fn test_pack_stats_basic() {
    let glyphs = vec![glyph(3, 3), glyph(3, 3)];
    let out = pack_glyphs(&glyphs, &PackerConfig::default()).expect("packing should succeed");
    let stats = out.stats;

    assert_eq!(stats.glyphs, 2);
    assert_eq!(stats.shelves, 2);
    assert_eq!((stats.atlas_width, stats.atlas_height), (8, 8));
    assert_eq!(stats.atlas_area, 64);
    assert_eq!(stats.used_area, 18);
    assert!((stats.occupancy - 18.0 / 64.0).abs() < 1e-9);
    assert_eq!(stats.wasted_area(), 46);
    assert_eq!(stats.grow_steps, 0);
}

#[test]
fn test_pack_stats_single_shelf() {
    // four 1x1 glyphs with their gaps: 1 + 4 * (1 + 1) = 9
    let glyphs: Vec<Glyph> = (0..4).map(|_| glyph(1, 1)).collect();
    let out = pack_glyphs_into(&glyphs, 9, 3, &PackerConfig::default()).expect("pack");
    assert_eq!(out.stats.shelves, 1);
    let xs: Vec<u32> = out.layout.placements.iter().map(|p| p.frame.x).collect();
    assert_eq!(xs, vec![1, 3, 5, 7]);
}

#[test]
fn test_pack_stats_summary() {
    let out = pack_glyphs(&[glyph(3, 3)], &PackerConfig::default()).expect("pack");
    let summary = out.stats.summary();
    assert!(summary.contains("Glyphs: 1"));
    assert!(summary.contains("Occupancy:"));
}

#[test]
fn test_pack_stats_serialize() {
    let out = pack_glyphs(&[glyph(2, 5)], &PackerConfig::default()).expect("pack");
    let json = serde_json::to_value(out.stats).expect("json");
    assert_eq!(json["glyphs"], 1);
    assert_eq!(json["used_area"], 10);
}
