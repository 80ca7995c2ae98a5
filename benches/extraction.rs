//! Benchmarks for image extraction and color quantization.
//!
//! Run with: `cargo bench --bench extraction`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use particula::prelude::*;
use particula::quantize::quantize_colors;

/// A gradient with a transparent border, roughly what a logo looks like.
fn synthetic_image(size: u32) -> ImageBuffer {
    let border = size / 8;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let inside = x >= border && y >= border && x < size - border && y < size - border;
            let alpha = if inside { 255 } else { 0 };
            pixels.extend_from_slice(&[(x * 255 / size) as u8, (y * 255 / size) as u8, 128, alpha]);
        }
    }
    ImageBuffer::from_rgba(size, size, pixels).expect("valid dimensions")
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for size in [128u32, 512] {
        let image = synthetic_image(size);
        let config = ParticleConfig::default();
        group.bench_with_input(BenchmarkId::new("original_colors", size), &image, |b, image| {
            b.iter(|| black_box(Scene::extract(&ExtractionInput::new(image, &config))))
        });

        let mut clustered = ParticleConfig::default();
        clustered.sampling.color_clustering = true;
        clustered.sampling.cluster_count = 8;
        group.bench_with_input(BenchmarkId::new("clustered", size), &image, |b, image| {
            b.iter(|| black_box(Scene::extract(&ExtractionInput::new(image, &clustered))))
        });
    }

    let image = synthetic_image(256);
    let config = ParticleConfig::default();
    let mut edits = EditList::new();
    for i in 0..32 {
        edits.delete(Vec2::new(i as f32 * 8.0, 128.0), 6.0);
    }
    group.bench_function("with_delete_edits", |b| {
        b.iter(|| black_box(Scene::extract(&ExtractionInput::new(&image, &config).with_edits(&edits))))
    });

    group.finish();
}

fn bench_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize_colors");
    let image = synthetic_image(256);

    for k in [4usize, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| black_box(quantize_colors(&image, k)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract, bench_quantize);
criterion_main!(benches);
