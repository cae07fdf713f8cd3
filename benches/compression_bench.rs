use asset_squeeze::derivative::encode_webp;
use asset_squeeze::processing::{encode_compressed, encode_jpeg, flatten_onto_white, OptimizeOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::PathBuf;
use tempfile::TempDir;

fn photo(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    }))
}

fn translucent(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 90, ((x + y) % 256) as u8])
    }))
}

fn write_fixture(img: &DynamicImage, name: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    img.save(&path).unwrap();
    (path, temp_dir)
}

fn bench_jpeg_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("jpeg_encoding");

    for size in [Small, Medium, Large].iter() {
        let (width, height) = match size {
            Small => (800, 600),
            Medium => (1920, 1080),
            Large => (3840, 2160),
        };
        let img = photo(width, height);

        group.bench_with_input(
            BenchmarkId::new("quality_80", format!("{}x{}", width, height)),
            &img,
            |b, img| b.iter(|| encode_jpeg(black_box(img), black_box(80))),
        );
    }

    group.finish();
}

fn bench_flatten(c: &mut Criterion) {
    let img = translucent(1920, 1080);
    c.bench_function("flatten_onto_white", |b| {
        b.iter(|| flatten_onto_white(black_box(&img)))
    });
}

fn bench_png_optimization(c: &mut Criterion) {
    let (path, _temp_dir) = write_fixture(&translucent(800, 600), "fixture.png");
    let options = OptimizeOptions::default();

    c.bench_function("png_optimization", |b| {
        b.iter(|| encode_compressed(black_box(&path), black_box(&options)))
    });
}

fn bench_webp_derivative(c: &mut Criterion) {
    let mut group = c.benchmark_group("webp_derivative");
    let opaque = photo(1280, 720);
    let alpha = translucent(1280, 720);

    group.bench_function("opaque", |b| b.iter(|| encode_webp(black_box(&opaque), 80)));
    group.bench_function("alpha", |b| b.iter(|| encode_webp(black_box(&alpha), 80)));
    group.finish();
}

enum ImageSize {
    Small,
    Medium,
    Large,
}

use ImageSize::*;

criterion_group!(
    benches,
    bench_jpeg_encoding,
    bench_flatten,
    bench_png_optimization,
    bench_webp_derivative
);
criterion_main!(benches);
