/// Format and color-mode classification for managed assets
///
/// The pipeline only ever rewrites JPEG and PNG in place; everything else it
/// learns about an asset (alpha or not) comes from the decoded pixels.
use crate::error::{OptimizeError, Result};
use image::{ColorType, DynamicImage, ImageFormat};
use std::fmt;
use std::path::Path;

/// Formats the optimize pipeline compresses in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    /// Lossy, re-encoded at the configured JPEG quality
    Jpeg,
    /// Lossless, optimized with oxipng
    Png,
}

impl AssetFormat {
    /// Infers the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(AssetFormat::Jpeg),
            "png" => Some(AssetFormat::Png),
            _ => None,
        }
    }

    /// Convert to the image crate's ImageFormat
    pub fn to_image_format(self) -> ImageFormat {
        match self {
            AssetFormat::Jpeg => ImageFormat::Jpeg,
            AssetFormat::Png => ImageFormat::Png,
        }
    }
}

impl fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetFormat::Jpeg => "JPEG",
            AssetFormat::Png => "PNG",
        };
        write!(f, "{}", name)
    }
}

/// Whether decoded pixels carry transparency.
///
/// Palette images are expanded by the decoder, so a palette PNG with a tRNS
/// chunk shows up here as `Alpha`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Opaque,
    Alpha,
}

impl ColorMode {
    pub fn of(img: &DynamicImage) -> Self {
        Self::from_color_type(img.color())
    }

    pub fn from_color_type(color: ColorType) -> Self {
        if color.has_alpha() {
            ColorMode::Alpha
        } else {
            ColorMode::Opaque
        }
    }

    pub fn has_alpha(self) -> bool {
        self == ColorMode::Alpha
    }
}

/// Checks that every codec the pipeline needs was compiled into `image`.
///
/// Runs before any file is touched so a stripped-down build halts cleanly
/// instead of failing (and restoring) every asset one by one.
pub fn ensure_codecs_available() -> Result<()> {
    for format in [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP] {
        if !format.reading_enabled() {
            return Err(OptimizeError::MissingDependency(format!(
                "{:?} decoding is not enabled in the image crate",
                format
            )));
        }
    }
    for format in [ImageFormat::Jpeg, ImageFormat::Png] {
        if !format.writing_enabled() {
            return Err(OptimizeError::MissingDependency(format!(
                "{:?} encoding is not enabled in the image crate",
                format
            )));
        }
    }
    Ok(())
}
