/// Utility functions for common operations
///
/// Size formatting and progress display shared by the optimize, sizes and
/// html commands.
use crate::constants::PROGRESS_BAR_TEMPLATE;
use crate::logger::is_quiet;
use indicatif::{ProgressBar, ProgressStyle};

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Formats a signed byte delta; growth is shown with a leading minus.
pub fn format_size_delta(delta: i64) -> String {
    if delta < 0 {
        format!("-{}", format_file_size(delta.unsigned_abs()))
    } else {
        format_file_size(delta as u64)
    }
}

/// Bytes saved going from `original_size` to `new_size`; negative on growth.
pub fn saved_bytes(original_size: u64, new_size: u64) -> i64 {
    original_size as i64 - new_size as i64
}

/// Calculate compression ratio as a percentage
///
/// # Arguments
/// * `original_size` - Original file size in bytes
/// * `compressed_size` - Compressed file size in bytes
///
/// # Returns
/// * Percentage saved (positive means reduction, negative means increase, 0 for empty originals)
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

/// Creates a progress bar over `len` items, hidden in quiet mode.
pub fn create_progress_bar(len: u64) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(PROGRESS_BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
