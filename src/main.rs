use clap::Parser;
use env_logger::Env;
use log::info;
use std::path::Path;

use bigearthnet_prep::cli::{Args, Command};
use bigearthnet_prep::error::{PrepError, Result};
use bigearthnet_prep::pipeline::RunSummary;
use bigearthnet_prep::{archive, pipeline, stats};

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("=== BigEarthNet Preparation Tool ===");

    match args.command {
        Command::Images {
            root,
            start,
            end,
            zip,
        } => {
            let summary = pipeline::convert_images(&root, start, end)?;
            finish_run("image", summary, zip.as_deref())
        }
        Command::Masks {
            root,
            start,
            end,
            depth,
            zip,
        } => {
            let summary = pipeline::convert_masks(&root, start, end, depth.into())?;
            finish_run("mask", summary, zip.as_deref())
        }
        Command::Remap {
            source,
            target,
            level,
            zip,
        } => {
            let summary = pipeline::remap_masks(&source, &target, level.into())?;
            finish_run("remapped mask", summary, zip.as_deref())
        }
        Command::Stats {
            root,
            start,
            end,
            output,
        } => {
            let run = stats::collect_statistics(&root, start, end)?;
            stats::save_statistics(&run.counts, &output)?;
            info!("Statistics written to {}", output.display());
            info!("=== Done! ===");
            if run.failed.is_empty() {
                Ok(())
            } else {
                Err(PrepError::RunFailed(run.failed.len()))
            }
        }
    }
}

fn finish_run(kind: &str, summary: RunSummary, zip: Option<&Path>) -> Result<()> {
    if let Some(zip_path) = zip {
        let entries = archive::zip_files(&summary.outputs, zip_path)?;
        info!("Bundled {} files into {}", entries, zip_path.display());
    }

    info!(
        "{} PNGs: {} created, {} already existed, {} failed",
        kind,
        summary.created,
        summary.skipped,
        summary.failed.len()
    );
    info!("=== Done! ===");

    if summary.failed.is_empty() {
        Ok(())
    } else {
        Err(PrepError::RunFailed(summary.failed.len()))
    }
}
