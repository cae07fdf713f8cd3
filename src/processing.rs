use crate::backup::RestoreGuard;
use crate::constants::{
    DEFAULT_BACKUP_DIR, DEFAULT_IMAGE_DIR, DEFAULT_JPEG_QUALITY, DEFAULT_WEBP_QUALITY,
    LIBDEFLATER_LEVEL, MAX_QUALITY, MIN_QUALITY, OXIPNG_PRESET,
};
use crate::error::{OptimizeError, Result};
use crate::formats::{AssetFormat, ColorMode};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use oxipng::{Deflaters, Options};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one optimize run.
///
/// The qualities are embedded configuration: `Default` carries the values the
/// site is tuned for and the CLI only overrides the directories.
#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    pub image_dir: PathBuf,
    pub backup_root: PathBuf,
    pub jpeg_quality: u8,
    pub webp_quality: u8,
}

impl OptimizeOptions {
    pub fn new(
        image_dir: PathBuf,
        backup_root: PathBuf,
        jpeg_quality: Option<u8>,
        webp_quality: Option<u8>,
    ) -> Result<Self> {
        let jpeg_quality = validate_quality(jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY))?;
        let webp_quality = validate_quality(webp_quality.unwrap_or(DEFAULT_WEBP_QUALITY))?;

        Ok(Self {
            image_dir,
            backup_root,
            jpeg_quality,
            webp_quality,
        })
    }
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            backup_root: PathBuf::from(DEFAULT_BACKUP_DIR),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            webp_quality: DEFAULT_WEBP_QUALITY,
        }
    }
}

fn validate_quality(quality: u8) -> Result<u8> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err(OptimizeError::InvalidQuality(quality));
    }
    Ok(quality)
}

/// Rewrites `asset` in place in its own format and returns the new size.
///
/// # Arguments
/// * `asset` - JPEG or PNG file to rewrite
/// * `backup` - Byte-identical copy of `asset` taken beforehand
/// * `options` - Supplies the JPEG quality
///
/// # Returns
/// * `Ok(new_size)` - The file now holds the re-encoded image
/// * `Err(OptimizeError::CompressionFailure)` - The file has been restored from `backup`
/// * `Err(OptimizeError::RestoreFailure)` - Compression failed and so did the restore;
///   the original only survives in `backup`
///
/// The new bytes are encoded and decoded once in memory before anything is
/// written, so a codec failure never reaches the disk. A failed write is
/// undone by the restore guard.
pub fn compress_in_place(asset: &Path, backup: &Path, options: &OptimizeOptions) -> Result<u64> {
    let guard = RestoreGuard::new(asset, backup);

    match rewrite(asset, options) {
        Ok(new_size) => {
            guard.commit();
            Ok(new_size)
        }
        Err(cause) => {
            guard.restore()?;
            Err(failure(asset, cause))
        }
    }
}

fn rewrite(asset: &Path, options: &OptimizeOptions) -> Result<u64> {
    let compressed = encode_compressed(asset, options)?;
    fs::write(asset, &compressed)?;
    Ok(fs::metadata(asset)?.len())
}

fn failure(asset: &Path, cause: OptimizeError) -> OptimizeError {
    OptimizeError::CompressionFailure {
        path: asset.to_path_buf(),
        reason: cause.to_string(),
    }
}

/// Produces the compressed bytes for `asset` without touching the file.
pub fn encode_compressed(asset: &Path, options: &OptimizeOptions) -> Result<Vec<u8>> {
    let format = AssetFormat::from_path(asset).ok_or_else(|| {
        OptimizeError::UnsupportedFormat(format!("{}", asset.display()))
    })?;
    let original = fs::read(asset)?;

    let compressed = match format {
        AssetFormat::Jpeg => {
            let img = image::load_from_memory(&original)?;
            encode_jpeg(&img, options.jpeg_quality)?
        }
        AssetFormat::Png => {
            // Decode first so a corrupt PNG is reported by the same decoder
            // family the site's readers use.
            image::load_from_memory_with_format(&original, image::ImageFormat::Png)?;
            optimize_png(&original)?
        }
    };

    image::load_from_memory_with_format(&compressed, format.to_image_format())?;
    Ok(compressed)
}

/// Encodes `img` as JPEG at `quality`, flattening transparency onto white.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = flatten_onto_white(img);
    let mut buf = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
        encoder.encode_image(&rgb)?;
    }
    Ok(buf)
}

/// Composites `img` over an opaque white background.
///
/// Opaque images are only converted to 8-bit RGB.
pub fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !ColorMode::of(img).has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}

/// Losslessly recompresses PNG bytes with oxipng.
pub fn optimize_png(data: &[u8]) -> Result<Vec<u8>> {
    let mut opts = Options::from_preset(OXIPNG_PRESET);
    opts.deflate = Deflaters::Libdeflater {
        compression: LIBDEFLATER_LEVEL,
    };
    oxipng::optimize_from_memory(data, &opts)
        .map_err(|e| OptimizeError::PngOptimization(e.to_string()))
}
