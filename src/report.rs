use crate::constants::{BACKUP_PREFIX, ERROR_PREFIX, SUCCESS_PREFIX, WEBP_PREFIX};
use crate::logger::rule;
use crate::utils::{calculate_compression_ratio, format_file_size, format_size_delta, saved_bytes};
use crate::{info, warn};
use std::path::{Path, PathBuf};

/// Where an asset ended up after the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// Compressed, WebP sibling written.
    DerivativeCreated,
    /// Compressed, WebP sibling failed (original still counts as success).
    DerivativeFailed(String),
    /// Compression failed and the original was copied back from backup.
    RestoredFromBackup(String),
    /// Compression failed and copying the original back failed too; the
    /// original only survives in the backup directory.
    RestoreFailed(String),
    /// The backup could not be written, so the asset was left untouched.
    BackupFailed(String),
}

impl AssetOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            AssetOutcome::DerivativeCreated | AssetOutcome::DerivativeFailed(_)
        )
    }
}

/// Sizes observed for one asset.
#[derive(Debug, Clone)]
pub struct AssetReport {
    pub path: PathBuf,
    pub original_size: u64,
    pub compressed_size: Option<u64>,
    pub derivative_size: Option<u64>,
    pub outcome: AssetOutcome,
}

impl AssetReport {
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    /// Size on disk after the run; failed assets keep their original size.
    pub fn final_size(&self) -> u64 {
        self.compressed_size.unwrap_or(self.original_size)
    }

    /// One line describing this asset, e.g.
    /// `✅ 1.2 MB → 800.0 KB (saved 400.0 KB, 33.3%) | WebP: 500.0 KB (saved 700.0 KB, 58.3%)`.
    pub fn summary_line(&self) -> String {
        match &self.outcome {
            AssetOutcome::RestoredFromBackup(reason) => {
                format!("{} Compression failed - restored from backup ({})", ERROR_PREFIX, reason)
            }
            AssetOutcome::RestoreFailed(reason) => {
                format!(
                    "{} Compression failed - restore from backup also failed, original kept in backup ({})",
                    ERROR_PREFIX, reason
                )
            }
            AssetOutcome::BackupFailed(reason) => {
                format!("{} Backup failed - file left untouched ({})", ERROR_PREFIX, reason)
            }
            AssetOutcome::DerivativeCreated | AssetOutcome::DerivativeFailed(_) => {
                let new_size = self.final_size();
                let mut line = format!(
                    "{} {} → {} (saved {}, {:.1}%)",
                    SUCCESS_PREFIX,
                    format_file_size(self.original_size),
                    format_file_size(new_size),
                    format_size_delta(saved_bytes(self.original_size, new_size)),
                    calculate_compression_ratio(self.original_size, new_size),
                );
                match (&self.outcome, self.derivative_size) {
                    (AssetOutcome::DerivativeCreated, Some(webp_size)) => {
                        line.push_str(&format!(
                            " | WebP: {} (saved {}, {:.1}%)",
                            format_file_size(webp_size),
                            format_size_delta(saved_bytes(self.original_size, webp_size)),
                            calculate_compression_ratio(self.original_size, webp_size),
                        ));
                    }
                    _ => line.push_str(" | WebP conversion failed"),
                }
                line
            }
        }
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Aggregate counters for a run, folded in one asset at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub derivatives: usize,
    pub total_original_size: u64,
    pub total_compressed_size: u64,
    pub total_derivative_size: u64,
}

impl RunSummary {
    pub fn record(&mut self, report: &AssetReport) {
        self.processed += 1;
        self.total_original_size += report.original_size;
        self.total_compressed_size += report.final_size();

        if report.outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }

        if let (AssetOutcome::DerivativeCreated, Some(size)) =
            (&report.outcome, report.derivative_size)
        {
            self.derivatives += 1;
            self.total_derivative_size += size;
        }
    }

    /// Bytes saved by in-place compression; negative if the run grew files.
    pub fn total_saved(&self) -> i64 {
        saved_bytes(self.total_original_size, self.total_compressed_size)
    }

    pub fn saved_percent(&self) -> f64 {
        calculate_compression_ratio(self.total_original_size, self.total_compressed_size)
    }

    pub fn print(&self, backup_dir: &Path) {
        info!("");
        rule('=');
        info!("OPTIMIZATION SUMMARY");
        rule('=');
        info!("Total files processed: {}", self.processed);
        info!("  {} Successful: {}", SUCCESS_PREFIX, self.succeeded);
        info!("  {} Failed: {}", ERROR_PREFIX, self.failed);
        info!("  {}  WebP files created: {}", WEBP_PREFIX, self.derivatives);
        info!("");
        info!("Total original size:  {}", format_file_size(self.total_original_size));
        info!("Total optimized size: {}", format_file_size(self.total_compressed_size));
        if self.derivatives > 0 {
            info!("Total WebP size:      {}", format_file_size(self.total_derivative_size));
        }
        info!(
            "Total space saved:    {} ({:.1}%)",
            format_size_delta(self.total_saved()),
            self.saved_percent()
        );
        info!("");
        info!("{} Original files backed up to: {}", BACKUP_PREFIX, backup_dir.display());
        rule('=');

        if self.failed > 0 {
            warn!("Some files failed to optimize. Their originals have been kept or restored.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(original: u64, compressed: Option<u64>, webp: Option<u64>, outcome: AssetOutcome) -> AssetReport {
        AssetReport {
            path: PathBuf::from("img/a.png"),
            original_size: original,
            compressed_size: compressed,
            derivative_size: webp,
            outcome,
        }
    }

    #[test]
    fn test_record_counts_and_totals() {
        let mut summary = RunSummary::default();
        summary.record(&report(1000, Some(800), Some(300), AssetOutcome::DerivativeCreated));
        summary.record(&report(500, Some(450), None, AssetOutcome::DerivativeFailed("x".into())));
        summary.record(&report(200, None, None, AssetOutcome::RestoredFromBackup("bad".into())));
        summary.record(&report(100, None, None, AssetOutcome::BackupFailed("perm".into())));
        summary.record(&report(50, None, None, AssetOutcome::RestoreFailed("perm".into())));

        assert_eq!(summary.processed, 5);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.derivatives, 1);
        assert_eq!(summary.total_original_size, 1850);
        assert_eq!(summary.total_compressed_size, 800 + 450 + 200 + 100 + 50);
        assert_eq!(summary.total_derivative_size, 300);
        assert_eq!(summary.total_saved(), 250);
    }

    #[test]
    fn test_empty_summary_percent() {
        let summary = RunSummary::default();
        assert_eq!(summary.saved_percent(), 0.0);
        assert_eq!(summary.total_saved(), 0);
    }

    #[test]
    fn test_summary_line_success() {
        let line = report(2048, Some(1024), Some(512), AssetOutcome::DerivativeCreated).summary_line();
        assert!(line.starts_with(SUCCESS_PREFIX));
        assert!(line.contains("2.0 KB → 1.0 KB"));
        assert!(line.contains("50.0%"));
        assert!(line.contains("WebP: 512 B"));
        assert!(line.contains("75.0%"));
    }

    #[test]
    fn test_summary_line_failures() {
        let line = report(10, None, None, AssetOutcome::RestoredFromBackup("bad".into())).summary_line();
        assert!(line.contains("restored from backup"));

        let line = report(10, None, None, AssetOutcome::RestoreFailed("perm".into())).summary_line();
        assert!(line.contains("restore from backup also failed"));
        assert!(!line.contains("restored from backup"));

        let line =
            report(10, Some(9), None, AssetOutcome::DerivativeFailed("enc".into())).summary_line();
        assert!(line.ends_with("WebP conversion failed"));
    }

    #[test]
    fn test_final_size_falls_back_to_original() {
        let r = report(300, None, None, AssetOutcome::RestoredFromBackup("x".into()));
        assert_eq!(r.final_size(), 300);
        assert_eq!(r.file_name(), "a.png");
    }
}
