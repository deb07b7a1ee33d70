use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use photokit_core::io::load_fits;
use photokit_core::photometry::{compute_zero_point, write_zero_points_csv, ZeroPoint};

use super::load_project_config;

#[derive(Args)]
pub struct ZeropointArgs {
    /// Reduced frames, one per filter (FILTER keyword required)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Project config holding the standard-star table and radii
    #[arg(short, long)]
    pub config: PathBuf,

    /// Output CSV (defaults to the config's calibration file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ZeropointArgs) -> Result<()> {
    let config = load_project_config(&args.config)?;
    config.validate()?;
    if config.standard_stars.is_empty() {
        bail!("No standard_stars in {}", args.config.display());
    }
    let radii = config.photometry.radii();

    let mut zero_points: Vec<ZeroPoint> = Vec::new();
    for file in &args.files {
        let frame =
            load_fits(file).with_context(|| format!("Failed to load {}", file.display()))?;
        let Some(filter) = frame.header.get_str("FILTER") else {
            tracing::warn!(path = %file.display(), "No FILTER keyword; skipped");
            continue;
        };
        if zero_points.iter().any(|z| z.filter == filter) {
            tracing::warn!(path = %file.display(), filter, "Filter already calibrated; skipped");
            continue;
        }
        zero_points.push(compute_zero_point(
            &frame.data,
            filter,
            &config.standard_stars,
            &radii,
        ));
    }

    println!("{:<8}  {:>10}  {:>6}", "filter", "zero point", "stars");
    for zp in &zero_points {
        println!("{:<8}  {:>10.3}  {:>6}", zp.filter, zp.zero_point, zp.n_stars);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.output.calibration_file.clone());
    write_zero_points_csv(&output, &zero_points)?;
    println!("\nZero points saved to {}", output.display());
    Ok(())
}
