use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use photokit_core::config::ProjectConfig;
use photokit_core::pipeline::{run_reduction_reported, PipelineStage, ProgressReporter};

use crate::summary::{print_config_summary, print_run_summary};

use super::load_project_config;

#[derive(Args)]
pub struct RunArgs {
    /// Project config file (TOML); defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the raw science directory
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,

    /// Override the calibration directory
    #[arg(long)]
    pub calibration_dir: Option<PathBuf>,

    /// Do not write reduced frames
    #[arg(long)]
    pub no_save_reduced: bool,
}

/// Drives an indicatif bar from pipeline stage events.
struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:24} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.reset();
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_message(stage.to_string());
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.bar.length() {
            self.bar.set_position(len);
        }
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = match args.config {
        Some(ref path) => load_project_config(path)?,
        None => ProjectConfig::default(),
    };
    if let Some(ref dir) = args.raw_dir {
        config.paths.raw_dir = dir.clone();
    }
    if let Some(ref dir) = args.calibration_dir {
        config.paths.calibration_dir = dir.clone();
    }
    if args.no_save_reduced {
        config.output.save_reduced_frames = false;
    }

    let threads = config.advanced.worker_threads();
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to start worker threads")?;

    print_config_summary(&config, threads);

    let reporter = BarReporter::new()?;
    let summary = run_reduction_reported(&config, &reporter)?;
    reporter.bar.finish_with_message("Done");

    print_run_summary(&summary);
    Ok(())
}
