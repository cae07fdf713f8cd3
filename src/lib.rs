pub mod backup;
pub mod cli;
pub mod constants;
pub mod derivative;
pub mod discovery;
pub mod error;
pub mod formats;
pub mod html;
pub mod logger;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod sizes;
pub mod utils;

pub use backup::{BackupDir, RestoreGuard};
pub use derivative::{create_webp_derivative, derivative_path, encode_webp};
pub use discovery::{collect_image_files, has_extension};
pub use error::{OptimizeError, Result};
pub use formats::{ensure_codecs_available, AssetFormat, ColorMode};
pub use html::{rewrite_html, rewrite_html_directory, rewrite_html_file, HtmlRewriteOptions};
pub use pipeline::{optimize_asset, optimize_directory, OptimizeRun};
pub use processing::{compress_in_place, encode_compressed, OptimizeOptions};
pub use report::{AssetOutcome, AssetReport, RunSummary};
pub use sizes::{largest_assets, print_size_report, AssetSize};
