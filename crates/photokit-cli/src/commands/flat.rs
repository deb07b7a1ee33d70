use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use photokit_core::calibration::create_master_flat;
use photokit_core::render::{save_preview, Colormap};

use super::{load_master, resolve_inputs};

#[derive(Args)]
pub struct FlatArgs {
    /// Flat frames, or directories to search
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// File pattern used inside directories
    #[arg(long, default_value = "flat*.fits")]
    pub pattern: String,

    /// Master bias to subtract from each flat
    #[arg(long)]
    pub bias: Option<PathBuf>,

    /// Output master flat
    #[arg(short, long, default_value = "master_flat.fits")]
    pub output: PathBuf,

    /// Also save a PNG preview next to the output
    #[arg(long)]
    pub preview: bool,
}

pub fn run(args: &FlatArgs) -> Result<()> {
    let files = resolve_inputs(&args.inputs, &args.pattern)?;
    let bias = load_master(args.bias.as_deref())?;
    println!(
        "Combining {} flat frames ({})",
        files.len(),
        if bias.is_some() { "bias subtracted" } else { "no bias" }
    );

    let master = create_master_flat(
        &files,
        bias.as_ref().map(|b| &b.data),
        Some(args.output.as_path()),
    )?;
    if args.preview {
        save_preview(&args.output.with_extension("png"), &master.data, None, Colormap::Gray)?;
    }

    println!("Master flat saved to {}", args.output.display());
    Ok(())
}
