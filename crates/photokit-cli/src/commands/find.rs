use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use photokit_core::consts::{DEFAULT_DETECTION_THRESHOLD, DEFAULT_FWHM};
use photokit_core::detection::{find_sources, write_sources_csv};
use photokit_core::io::load_fits;

#[derive(Args)]
pub struct FindArgs {
    /// Input FITS file
    pub file: PathBuf,

    /// Expected stellar FWHM in pixels
    #[arg(long, default_value_t = DEFAULT_FWHM)]
    pub fwhm: f64,

    /// Detection threshold in background sigmas
    #[arg(long, default_value_t = DEFAULT_DETECTION_THRESHOLD)]
    pub threshold: f64,

    /// Show the N brightest sources
    #[arg(long, default_value = "20")]
    pub top: usize,

    /// Write the full source table as CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &FindArgs) -> Result<()> {
    let frame = load_fits(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let sources = find_sources(&frame.data, args.fwhm, args.threshold)?;

    println!("{} sources found in {}", sources.len(), args.file.display());
    if sources.is_empty() {
        return Ok(());
    }

    let mut by_flux: Vec<_> = sources.iter().collect();
    by_flux.sort_by(|a, b| b.flux.total_cmp(&a.flux));

    println!();
    println!(
        "{:>5}  {:>9}  {:>9}  {:>7}  {:>7}  {:>10}  {:>8}",
        "id", "x", "y", "sharp", "round", "flux", "mag"
    );
    for s in by_flux.iter().take(args.top) {
        println!(
            "{:>5}  {:>9.2}  {:>9.2}  {:>7.3}  {:>7.3}  {:>10.1}  {:>8.3}",
            s.id, s.xcentroid, s.ycentroid, s.sharpness, s.roundness1, s.flux, s.mag
        );
    }

    if let Some(ref path) = args.output {
        write_sources_csv(path, &sources)?;
        println!("\nSource table saved to {}", path.display());
    }
    Ok(())
}
