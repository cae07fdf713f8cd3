//! Largest-asset report for the site's media directory. Read-only.

use crate::constants::REPORTED_EXTENSIONS;
use crate::discovery::collect_image_files;
use crate::error::Result;
use crate::info;
use crate::report::display_name;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSize {
    pub name: String,
    pub size: u64,
}

impl AssetSize {
    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }

    pub fn size_mb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}

/// Media files directly in `dir`, biggest first (ties by name).
pub fn largest_assets(dir: &Path) -> Result<Vec<AssetSize>> {
    let mut assets = collect_image_files(dir, REPORTED_EXTENSIONS)?
        .into_iter()
        .map(|path| {
            let size = fs::metadata(&path)?.len();
            Ok(AssetSize {
                name: display_name(&path),
                size,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    assets.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
    Ok(assets)
}

/// Renders the top `limit` rows of the report.
pub fn format_size_table(assets: &[AssetSize], limit: usize) -> String {
    let mut out = format!(
        "Top {} Largest Image Files:\n\n{:<4} {:<50} {:<15} {:<15}\n{}\n",
        limit,
        "#",
        "Filename",
        "Size (KB)",
        "Size (MB)",
        "-".repeat(85)
    );

    for (i, asset) in assets.iter().take(limit).enumerate() {
        out.push_str(&format!(
            "{:<4} {:<50} {:>12.2} KB  {:>12.2} MB\n",
            i + 1,
            asset.name,
            asset.size_kb(),
            asset.size_mb()
        ));
    }

    if assets.len() > limit {
        out.push_str(&format!("\n... and {} more files\n", assets.len() - limit));
    }
    out
}

pub fn print_size_report(dir: &Path, limit: usize) -> Result<()> {
    let assets = largest_assets(dir)?;
    info!("{}", format_size_table(&assets, limit));
    Ok(())
}
