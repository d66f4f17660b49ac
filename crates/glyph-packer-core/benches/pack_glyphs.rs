use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use glyph_packer_core::prelude::*;
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};

/// A sheet of `cells` x `cells` random rectangles on a 16px grid.
fn generate_sheet(cells: u32) -> RgbaImage {
    let mut rng = rand::rngs::StdRng::seed_from_u64(cells as u64);
    let mut img = RgbaImage::from_pixel(cells * 16, cells * 16, KeyColor::MAGENTA.rgba());
    for cy in 0..cells {
        for cx in 0..cells {
            let w = rng.gen_range(1..=14u32);
            let h = rng.gen_range(1..=14u32);
            for y in 0..h {
                for x in 0..w {
                    img.put_pixel(cx * 16 + x, cy * 16 + y, Rgba([0, 0, 0, 255]));
                }
            }
        }
    }
    img
}

fn bench_pipeline_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_stages");
    let cfg = PackerConfig::default();

    for cells in [8u32, 16, 32] {
        let sheet = generate_sheet(cells);
        let glyphs = extract_glyphs(&sheet, cfg.key_color);
        group.throughput(Throughput::Elements((cells * cells) as u64));

        group.bench_with_input(BenchmarkId::new("extract", cells), &sheet, |b, sheet| {
            b.iter(|| black_box(extract_glyphs(sheet, cfg.key_color)));
        });

        group.bench_with_input(BenchmarkId::new("pack", cells), &glyphs, |b, glyphs| {
            b.iter(|| black_box(pack_glyphs(glyphs, &cfg)));
        });

        group.bench_with_input(BenchmarkId::new("sheet", cells), &sheet, |b, sheet| {
            b.iter(|| black_box(pack_sprite_sheet(sheet, &cfg)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline_stages);
criterion_main!(benches);
