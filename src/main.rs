use anyhow::{Context, Result};
use asset_squeeze::cli::{Args, Commands};
use asset_squeeze::html::{rewrite_html_directory, HtmlRewriteOptions};
use asset_squeeze::logger::{self, rule};
use asset_squeeze::pipeline::optimize_directory;
use asset_squeeze::processing::OptimizeOptions;
use asset_squeeze::sizes::print_size_report;
use asset_squeeze::{error, info, success};
use clap::Parser;
use std::path::PathBuf;

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    match args.command {
        Commands::Optimize {
            image_dir,
            backup_dir,
        } => run_optimize(image_dir, backup_dir),
        Commands::Sizes { dir, limit } => print_size_report(&dir, limit)
            .with_context(|| format!("Failed to build size report for {:?}", dir)),
        Commands::Html { dir, agent_id } => {
            let options = HtmlRewriteOptions {
                widget_agent_id: agent_id,
            };
            rewrite_html_directory(&dir, &options)
                .with_context(|| format!("Failed to rewrite HTML files in {:?}", dir))?;
            Ok(())
        }
    }
}

/// Halting errors (missing codec, missing directory) are printed, not
/// returned: the optimize command never signals failure through its exit code.
fn run_optimize(image_dir: PathBuf, backup_dir: PathBuf) -> Result<()> {
    rule('=');
    info!("Image Optimization");
    rule('=');
    info!("");

    let options = OptimizeOptions::new(image_dir, backup_dir, None, None)?;

    match optimize_directory(&options) {
        Ok(run) if run.summary.processed > 0 => {
            info!("");
            success!("Optimization complete!");
        }
        Ok(_) => {}
        Err(e) => error!("{}", e),
    }

    Ok(())
}
