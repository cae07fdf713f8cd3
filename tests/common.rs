#![allow(dead_code)]

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Creates `<root>/assets/img` and returns it.
pub fn create_image_directory(root: &Path) -> PathBuf {
    let dir = root.join("assets").join("img");
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Noisy opaque photo-like JPEG so re-encoding has something to work with.
pub fn write_opaque_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let n = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)) % 64;
        Rgb([(x % 256) as u8, (y % 256) as u8, (n * 4) as u8])
    });
    img.save(path).unwrap();
}

/// PNG whose left half is fully transparent.
pub fn write_transparent_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        if x < width / 2 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        }
    });
    img.save(path).unwrap();
}

pub fn write_corrupt_file(path: &Path) {
    fs::write(path, b"this is not an image at all").unwrap();
}

/// The single per-run directory under `backup_root`.
pub fn only_backup_run(backup_root: &Path) -> PathBuf {
    let runs: Vec<_> = fs::read_dir(backup_root)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(runs.len(), 1, "expected one backup run, found {:?}", runs);
    runs.into_iter().next().unwrap()
}
