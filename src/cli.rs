use crate::constants::{
    DEFAULT_BACKUP_DIR, DEFAULT_IMAGE_DIR, DEFAULT_SIZE_REPORT_LIMIT, DEFAULT_WIDGET_AGENT_ID,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "asset-squeeze",
    about = "Maintenance tool for a static website's images and pages",
    long_about = "asset-squeeze compresses a site's PNG and JPEG images in place (keeping timestamped \
                  backups), writes WebP versions next to them, reports the largest media files and \
                  applies performance rewrites to HTML pages.",
    version,
    after_help = "EXAMPLES:\n  \
    asset-squeeze optimize\n  \
    asset-squeeze optimize ./public/img --backup-dir ./backup/original_images\n  \
    asset-squeeze sizes assets/img -n 20\n  \
    asset-squeeze html ."
)]
pub struct Args {
    #[arg(short, long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short, long, global = true, help = "Print per-step details")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress images in place and create WebP versions",
        long_about = "Back up every PNG/JPEG in the image directory, re-encode it in place \
                      (JPEG at quality 80, PNG losslessly) and write a WebP sibling. \
                      A file whose compression fails is restored from its backup."
    )]
    Optimize {
        #[arg(default_value = DEFAULT_IMAGE_DIR, help = "Image directory")]
        image_dir: PathBuf,

        #[arg(
            short = 'b',
            long,
            default_value = DEFAULT_BACKUP_DIR,
            help = "Backup root; each run gets a YYYYMMDD_HHMMSS subdirectory"
        )]
        backup_dir: PathBuf,
    },

    #[command(about = "List the largest media files in a directory")]
    Sizes {
        #[arg(default_value = DEFAULT_IMAGE_DIR, help = "Directory to scan")]
        dir: PathBuf,

        #[arg(short = 'n', long, default_value_t = DEFAULT_SIZE_REPORT_LIMIT, help = "Number of files to show")]
        limit: usize,
    },

    #[command(
        about = "Apply performance rewrites to HTML pages",
        long_about = "Inline critical CSS, add preconnect hints and defer the chat widget \
                      in every *.html file of the directory. Unchanged files are left alone."
    )]
    Html {
        #[arg(default_value = ".", help = "Directory containing the pages")]
        dir: PathBuf,

        #[arg(long, default_value = DEFAULT_WIDGET_AGENT_ID, help = "Chat widget agent id")]
        agent_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_optimize_defaults() {
        let args = Args::parse_from(["asset-squeeze", "optimize"]);
        match args.command {
            Commands::Optimize {
                image_dir,
                backup_dir,
            } => {
                assert_eq!(image_dir, PathBuf::from("assets/img"));
                assert_eq!(backup_dir, PathBuf::from("backup/original_images"));
            }
            _ => panic!("expected optimize"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["asset-squeeze", "sizes", "media", "-q", "-n", "3"]);
        assert!(args.quiet);
        match args.command {
            Commands::Sizes { dir, limit } => {
                assert_eq!(dir, PathBuf::from("media"));
                assert_eq!(limit, 3);
            }
            _ => panic!("expected sizes"),
        }
    }
}
