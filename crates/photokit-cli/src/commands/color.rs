use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use photokit_core::frame::Position;
use photokit_core::io::load_fits;
use photokit_core::photometry::{color_index_series, measure_aperture_photometry};

use super::{parse_position, RadiiArgs};

#[derive(Args)]
pub struct ColorArgs {
    /// Image in the first filter (e.g. B)
    pub first: PathBuf,

    /// Image in the second filter (e.g. V)
    pub second: PathBuf,

    /// Star position as x,y (repeatable)
    #[arg(short, long = "position", value_parser = parse_position, required = true)]
    pub positions: Vec<Position>,

    /// Zero point of the first filter
    #[arg(long, default_value = "0.0")]
    pub zp1: f64,

    /// Zero point of the second filter
    #[arg(long, default_value = "0.0")]
    pub zp2: f64,

    #[command(flatten)]
    pub radii: RadiiArgs,
}

pub fn run(args: &ColorArgs) -> Result<()> {
    let radii = args.radii.radii()?;
    let first = load_fits(&args.first)
        .with_context(|| format!("Failed to load {}", args.first.display()))?;
    let second = load_fits(&args.second)
        .with_context(|| format!("Failed to load {}", args.second.display()))?;
    if first.shape() != second.shape() {
        bail!(
            "Images differ in size: {:?} vs {:?}",
            first.shape(),
            second.shape()
        );
    }

    let flux = |data| -> Vec<f64> {
        measure_aperture_photometry(data, &args.positions, &radii)
            .iter()
            .map(|m| m.flux)
            .collect()
    };
    let flux1 = flux(&first.data);
    let flux2 = flux(&second.data);
    let colors = color_index_series(&flux1, &flux2, args.zp1, args.zp2);

    println!(
        "{:>9}  {:>9}  {:>12}  {:>12}  {:>8}",
        "x", "y", "flux1", "flux2", "color"
    );
    for (i, pos) in args.positions.iter().enumerate() {
        println!(
            "{:>9.2}  {:>9.2}  {:>12.1}  {:>12.1}  {:>8.3}",
            pos.x, pos.y, flux1[i], flux2[i], colors[i]
        );
    }
    Ok(())
}
