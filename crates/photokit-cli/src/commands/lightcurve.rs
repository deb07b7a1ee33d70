use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use photokit_core::frame::Position;
use photokit_core::lightcurve::{extract_light_curve_with, TimeUnit};

use super::{file_progress, parse_position, resolve_inputs, RadiiArgs};

#[derive(Clone, Copy, ValueEnum)]
pub enum TimeUnitArg {
    Jd,
    Mjd,
}

impl From<TimeUnitArg> for TimeUnit {
    fn from(arg: TimeUnitArg) -> Self {
        match arg {
            TimeUnitArg::Jd => TimeUnit::Jd,
            TimeUnitArg::Mjd => TimeUnit::Mjd,
        }
    }
}

#[derive(Args)]
pub struct LightcurveArgs {
    /// Reduced science frames, or directories to search
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// File pattern used inside directories
    #[arg(long, default_value = "*.fits")]
    pub pattern: String,

    /// Target position as x,y
    #[arg(short, long, value_parser = parse_position)]
    pub target: Position,

    /// Comparison star position as x,y (repeatable)
    #[arg(short, long = "comparison", value_parser = parse_position)]
    pub comparisons: Vec<Position>,

    #[command(flatten)]
    pub radii: RadiiArgs,

    /// Time scale of the output
    #[arg(long, value_enum, default_value = "jd")]
    pub time_unit: TimeUnitArg,

    /// Keep raw target/comparison ratios instead of dividing by the median
    #[arg(long)]
    pub no_normalize: bool,

    /// Output CSV
    #[arg(short, long, default_value = "lightcurve.csv")]
    pub output: PathBuf,
}

pub fn run(args: &LightcurveArgs) -> Result<()> {
    let radii = args.radii.radii()?;
    let files = resolve_inputs(&args.inputs, &args.pattern)?;

    let pb = file_progress(files.len(), "Measuring frames")?;
    let curve = extract_light_curve_with(
        &files,
        args.target,
        &args.comparisons,
        &radii,
        !args.no_normalize,
        |done| pb.set_position(done as u64),
    )?
    .to_time_unit(args.time_unit.into());
    pb.finish_with_message("Measured");

    curve
        .write_csv(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let fluxes = curve.relative_fluxes();
    let finite: Vec<f64> = fluxes.iter().copied().filter(|f| f.is_finite()).collect();
    println!("\n{} points written to {}", curve.len(), args.output.display());
    if let (Some(min), Some(max)) = (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) {
        println!("Relative flux range: {min:.4} .. {max:.4}");
    }
    if finite.len() < fluxes.len() {
        println!("{} point(s) with undefined relative flux", fluxes.len() - finite.len());
    }
    Ok(())
}
