use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use photokit_core::obslog::{create_observation_log, LogValue};

use super::resolve_inputs;

#[derive(Args)]
pub struct LogArgs {
    /// FITS files, or directories to search
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// File pattern used inside directories
    #[arg(long, default_value = "*.fits")]
    pub pattern: String,

    /// Save the log as CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &LogArgs) -> Result<()> {
    let files = resolve_inputs(&args.inputs, &args.pattern)?;
    let records = create_observation_log(&files, args.output.as_deref())?;

    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    let number = |v: &Option<LogValue>| v.as_ref().map_or_else(|| "-".into(), |x| x.to_string());

    println!(
        "{:<28}  {:<12}  {:<6}  {:>8}  {:>7}  {:<23}",
        "filename", "OBJECT", "FILTER", "EXPTIME", "AIRMASS", "DATE-OBS"
    );
    for r in &records {
        println!(
            "{:<28}  {:<12}  {:<6}  {:>8}  {:>7}  {:<23}",
            r.filename,
            text(&r.object),
            text(&r.filter),
            number(&r.exptime),
            number(&r.airmass),
            text(&r.date_obs),
        );
    }

    if let Some(ref path) = args.output {
        println!("\nObservation log saved to {}", path.display());
    }
    Ok(())
}
