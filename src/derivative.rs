//! WebP siblings for compressed originals.
//!
//! The derivative is best-effort: callers record a failure here but never roll
//! back the original because of it.

use crate::constants::{DERIVATIVE_EXTENSION, WEBP_METHOD};
use crate::error::{OptimizeError, Result};
use crate::formats::ColorMode;
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};
use webp::{Encoder, WebPConfig};

/// `hero.png` -> `hero.webp`, in the same directory.
pub fn derivative_path(asset: &Path) -> PathBuf {
    asset.with_extension(DERIVATIVE_EXTENSION)
}

/// Writes a lossy WebP next to `asset` and returns its path and size.
///
/// An existing derivative from an earlier run is overwritten.
pub fn create_webp_derivative(asset: &Path, quality: u8) -> Result<(PathBuf, u64)> {
    let fail = |reason: String| OptimizeError::DerivativeFailure {
        path: asset.to_path_buf(),
        reason,
    };

    let img = image::open(asset).map_err(|e| fail(e.to_string()))?;
    let bytes = encode_webp(&img, quality).map_err(|e| fail(e.to_string()))?;

    let output = derivative_path(asset);
    fs::write(&output, &bytes).map_err(|e| fail(e.to_string()))?;
    Ok((output, bytes.len() as u64))
}

/// Encodes `img` as lossy WebP, keeping the alpha channel when it has one.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = (img.width(), img.height());
    match ColorMode::of(img) {
        ColorMode::Alpha => {
            let rgba = img.to_rgba8();
            encode_with(&Encoder::from_rgba(rgba.as_raw(), width, height), quality)
        }
        ColorMode::Opaque => {
            let rgb = img.to_rgb8();
            encode_with(&Encoder::from_rgb(rgb.as_raw(), width, height), quality)
        }
    }
}

fn encode_with(encoder: &Encoder<'_>, quality: u8) -> Result<Vec<u8>> {
    let mut config = WebPConfig::new().map_err(|_| {
        OptimizeError::MissingDependency("libwebp rejected its default configuration".to_string())
    })?;
    config.lossless = 0;
    config.quality = quality as f32;
    config.method = WEBP_METHOD;

    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| OptimizeError::UnsupportedFormat(format!("WebP encoder error: {:?}", e)))?;
    Ok(memory.to_vec())
}
