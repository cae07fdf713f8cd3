use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Image directory not found: {0}")]
    MissingInputDirectory(PathBuf),

    #[error("Failed to create backup directory: {0}")]
    BackupDirectoryCreationFailed(PathBuf),

    #[error("Backup of {path} failed: {source}")]
    BackupWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Restoring {path} from backup failed: {source}")]
    RestoreFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compression of {path} failed: {reason}")]
    CompressionFailure { path: PathBuf, reason: String },

    #[error("WebP conversion of {path} failed: {reason}")]
    DerivativeFailure { path: PathBuf, reason: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
