use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use photokit_core::consts::{DEFAULT_DETECTION_THRESHOLD, DEFAULT_FWHM};
use photokit_core::detection::find_sources;
use photokit_core::frame::Position;
use photokit_core::io::load_fits;
use photokit_core::photometry::{measure_aperture_photometry, write_measurements_csv};

use super::{parse_position, RadiiArgs};

#[derive(Args)]
pub struct PhotArgs {
    /// Input FITS file
    pub file: PathBuf,

    /// Star position as x,y (repeatable)
    #[arg(short, long = "position", value_parser = parse_position)]
    pub positions: Vec<Position>,

    /// Measure every detected source instead of fixed positions
    #[arg(long)]
    pub detect: bool,

    /// FWHM used with --detect
    #[arg(long, default_value_t = DEFAULT_FWHM)]
    pub fwhm: f64,

    #[command(flatten)]
    pub radii: RadiiArgs,

    /// Write measurements as CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &PhotArgs) -> Result<()> {
    let radii = args.radii.radii()?;
    let frame = load_fits(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    let positions: Vec<Position> = if args.detect {
        find_sources(&frame.data, args.fwhm, DEFAULT_DETECTION_THRESHOLD)?
            .iter()
            .map(|s| Position::new(s.xcentroid, s.ycentroid))
            .collect()
    } else {
        args.positions.clone()
    };
    if positions.is_empty() {
        bail!("No positions to measure; pass --position x,y or --detect");
    }

    let results = measure_aperture_photometry(&frame.data, &positions, &radii);

    println!(
        "{:>9}  {:>9}  {:>12}  {:>9}  {:>12}  {:>8}",
        "x", "y", "aperture", "sky/pix", "flux", "mag"
    );
    for m in &results {
        println!(
            "{:>9.2}  {:>9.2}  {:>12.1}  {:>9.2}  {:>12.1}  {:>8.3}",
            m.x, m.y, m.aperture_sum, m.background_mean, m.flux, m.mag
        );
    }
    let invalid = results.iter().filter(|m| !m.is_valid()).count();
    if invalid > 0 {
        println!("\n{invalid} position(s) with non-positive flux");
    }

    if let Some(ref path) = args.output {
        write_measurements_csv(path, &results)?;
        println!("\nPhotometry saved to {}", path.display());
    }
    Ok(())
}
