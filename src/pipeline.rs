use crate::backup::BackupDir;
use crate::constants::COMPRESSIBLE_EXTENSIONS;
use crate::derivative::create_webp_derivative;
use crate::discovery::collect_image_files;
use crate::error::{OptimizeError, Result};
use crate::formats::ensure_codecs_available;
use crate::logger::rule;
use crate::processing::{compress_in_place, OptimizeOptions};
use crate::report::{display_name, AssetOutcome, AssetReport, RunSummary};
use crate::utils::{create_progress_bar, format_file_size};
use crate::{error, info, success, verbose, warn};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a finished optimize run produced.
#[derive(Debug, Clone, Default)]
pub struct OptimizeRun {
    pub summary: RunSummary,
    pub reports: Vec<AssetReport>,
    /// `None` when there was nothing to process and no backup was made.
    pub backup_dir: Option<PathBuf>,
}

/// Backs up, compresses and converts every PNG/JPEG in `options.image_dir`.
///
/// # Returns
/// * `Ok(run)` - Per-asset failures are inside `run`, never an `Err`
/// * `Err(OptimizeError::MissingDependency)` - A required codec is not compiled in
/// * `Err(OptimizeError::MissingInputDirectory)` - Nothing was created or touched
/// * `Err(OptimizeError::BackupDirectoryCreationFailed)` - No asset was touched
///
/// Assets are handled one at a time in file-name order; an asset is fully
/// finished (including any restore) before the next one starts.
pub fn optimize_directory(options: &OptimizeOptions) -> Result<OptimizeRun> {
    ensure_codecs_available()?;

    let image_files = collect_image_files(&options.image_dir, COMPRESSIBLE_EXTENSIONS)?;
    if image_files.is_empty() {
        warn!("No image files found in {:?}", options.image_dir);
        return Ok(OptimizeRun::default());
    }

    info!("Creating backup folder...");
    let backup = BackupDir::create(&options.backup_root, Local::now())?;
    success!("Backup location: {}", backup.path().display());
    info!("");
    info!("Found {} image file(s) to optimize:", image_files.len());
    rule('-');

    let progress = create_progress_bar(image_files.len() as u64);
    let mut run = OptimizeRun {
        backup_dir: Some(backup.path().to_path_buf()),
        ..OptimizeRun::default()
    };

    for asset in &image_files {
        progress.set_message(display_name(asset));
        let report = optimize_asset(asset, &backup, options);
        progress.suspend(|| {
            info!(
                "Processing: {} ({}) ... {}",
                report.file_name(),
                format_file_size(report.original_size),
                report.summary_line()
            );
        });
        run.summary.record(&report);
        run.reports.push(report);
        progress.inc(1);
    }
    progress.finish_and_clear();

    run.summary.print(backup.path());
    Ok(run)
}

/// Runs one asset through backup → compression → WebP derivative.
///
/// Never fails: every error becomes an [`AssetOutcome`].
pub fn optimize_asset(asset: &Path, backup: &BackupDir, options: &OptimizeOptions) -> AssetReport {
    let mut report = AssetReport {
        path: asset.to_path_buf(),
        original_size: 0,
        compressed_size: None,
        derivative_size: None,
        outcome: AssetOutcome::DerivativeCreated,
    };

    report.original_size = match fs::metadata(asset) {
        Ok(meta) => meta.len(),
        Err(e) => {
            report.outcome = AssetOutcome::BackupFailed(e.to_string());
            return report;
        }
    };

    let backup_copy = match backup.back_up(asset) {
        Ok(path) => path,
        Err(e) => {
            verbose!("{}", e);
            report.outcome = AssetOutcome::BackupFailed(e.to_string());
            return report;
        }
    };
    verbose!("Backed up {:?} to {:?}", asset, backup_copy);

    match compress_in_place(asset, &backup_copy, options) {
        Ok(size) => report.compressed_size = Some(size),
        Err(e @ OptimizeError::RestoreFailure { .. }) => {
            error!("{}", e);
            report.outcome = AssetOutcome::RestoreFailed(e.to_string());
            return report;
        }
        Err(e) => {
            verbose!("{}", e);
            report.outcome = AssetOutcome::RestoredFromBackup(e.to_string());
            return report;
        }
    }

    match create_webp_derivative(asset, options.webp_quality) {
        Ok((path, size)) => {
            verbose!("Wrote {:?}", path);
            report.derivative_size = Some(size);
        }
        Err(e) => {
            verbose!("{}", e);
            report.outcome = AssetOutcome::DerivativeFailed(e.to_string());
        }
    }

    report
}
