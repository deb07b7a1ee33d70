use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use photokit_core::calibration::create_master_bias;
use photokit_core::render::{save_preview, Colormap};

use super::resolve_inputs;

#[derive(Args)]
pub struct BiasArgs {
    /// Bias frames, or directories to search
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// File pattern used inside directories
    #[arg(long, default_value = "bias*.fits")]
    pub pattern: String,

    /// Output master bias
    #[arg(short, long, default_value = "master_bias.fits")]
    pub output: PathBuf,

    /// Also save a PNG preview next to the output
    #[arg(long)]
    pub preview: bool,
}

pub fn run(args: &BiasArgs) -> Result<()> {
    let files = resolve_inputs(&args.inputs, &args.pattern)?;
    println!("Combining {} bias frames", files.len());

    let master = create_master_bias(&files, Some(args.output.as_path()))?;
    if args.preview {
        save_preview(&args.output.with_extension("png"), &master.data, None, Colormap::Gray)?;
    }

    println!(
        "Master bias {}x{} saved to {}",
        master.width(),
        master.height(),
        args.output.display()
    );
    Ok(())
}
