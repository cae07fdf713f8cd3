pub const DEFAULT_JPEG_QUALITY: u8 = 80;
pub const DEFAULT_WEBP_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// libwebp effort, 0 (fast) to 6 (smallest output).
pub const WEBP_METHOD: i32 = 6;

pub const OXIPNG_PRESET: u8 = 4;
pub const LIBDEFLATER_LEVEL: u8 = 12;

pub const DEFAULT_IMAGE_DIR: &str = "assets/img";
pub const DEFAULT_BACKUP_DIR: &str = "backup/original_images";
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Extensions rewritten in place by the optimize pipeline.
pub const COMPRESSIBLE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
/// Extensions listed by the size report (read-only).
pub const REPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "mp4", "gif"];

pub const DERIVATIVE_EXTENSION: &str = "webp";

pub const DEFAULT_SIZE_REPORT_LIMIT: usize = 10;

pub const DEFAULT_WIDGET_AGENT_ID: &str = "agent_1901kc2bjk4yeeks4pywb879fdne";

pub const PROGRESS_BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
pub const RULE_WIDTH: usize = 70;

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
pub const SKIP_PREFIX: &str = "⏭️";
pub const BACKUP_PREFIX: &str = "💾";
pub const WEBP_PREFIX: &str = "🖼️";
