use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use photokit_core::reduce::batch_reduce_with_progress;

use super::{file_progress, load_master, resolve_inputs};

#[derive(Args)]
pub struct ReduceArgs {
    /// Science frames, or directories to search
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// File pattern used inside directories
    #[arg(long, default_value = "*.fits")]
    pub pattern: String,

    /// Master bias
    #[arg(long)]
    pub bias: Option<PathBuf>,

    /// Master flat
    #[arg(long)]
    pub flat: Option<PathBuf>,

    /// Directory for reduced_<name> output files
    #[arg(short, long, default_value = "reduced")]
    pub output_dir: PathBuf,
}

pub fn run(args: &ReduceArgs) -> Result<()> {
    let files = resolve_inputs(&args.inputs, &args.pattern)?;
    let bias = load_master(args.bias.as_deref())?;
    let flat = load_master(args.flat.as_deref())?;
    if bias.is_none() && flat.is_none() {
        tracing::warn!("No master bias or flat given; frames are copied unchanged");
    }

    let pb = file_progress(files.len(), "Reducing frames")?;
    let written = batch_reduce_with_progress(
        &files,
        bias.as_ref().map(|f| &f.data),
        flat.as_ref().map(|f| &f.data),
        Some(args.output_dir.as_path()),
        |done| pb.set_position(done as u64),
    )?;
    pb.finish_with_message("Reduced");

    println!(
        "\n{} frames written to {}",
        written.len(),
        args.output_dir.display()
    );
    Ok(())
}
