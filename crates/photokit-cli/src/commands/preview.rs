use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use photokit_core::io::load_fits;
use photokit_core::render::{save_preview, Colormap, DisplayRange};

#[derive(Clone, Copy, ValueEnum)]
pub enum ColormapArg {
    Gray,
    Viridis,
}

impl From<ColormapArg> for Colormap {
    fn from(arg: ColormapArg) -> Self {
        match arg {
            ColormapArg::Gray => Colormap::Gray,
            ColormapArg::Viridis => Colormap::Viridis,
        }
    }
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Input FITS file
    pub file: PathBuf,

    /// Output PNG (defaults to the input name with .png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "gray")]
    pub colormap: ColormapArg,

    /// Lower display limit (default: median - 2 sigma)
    #[arg(long)]
    pub min: Option<f64>,

    /// Upper display limit (default: median + 5 sigma)
    #[arg(long)]
    pub max: Option<f64>,
}

pub fn run(args: &PreviewArgs) -> Result<()> {
    let frame = load_fits(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let auto = DisplayRange::auto(&frame.data);
    let range = DisplayRange::new(args.min.unwrap_or(auto.min), args.max.unwrap_or(auto.max));
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.file.with_extension("png"));

    save_preview(&output, &frame.data, Some(range), args.colormap.into())?;
    println!(
        "Preview ({:.1} .. {:.1}) saved to {}",
        range.min,
        range.max,
        output.display()
    );
    Ok(())
}
