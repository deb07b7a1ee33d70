use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use photokit_core::consts::DEFAULT_CLIP_SIGMA;
use photokit_core::io::FitsReader;
use photokit_core::stats::{estimate_background_level, sigma_clipped_stats, BackgroundMethod};

#[derive(Args)]
pub struct InfoArgs {
    /// Input FITS file
    pub file: PathBuf,

    /// Print every header card
    #[arg(long)]
    pub header: bool,

    /// Compute sigma-clipped pixel statistics
    #[arg(long)]
    pub stats: bool,

    /// Estimate the sky level: median, mean or sigma_clipped
    #[arg(long)]
    pub background: Option<String>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let mut reader = FitsReader::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let layout = &reader.layout;
    let header = &reader.header;

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", layout.width, layout.height);
    println!("BITPIX:      {}", layout.bitpix);
    if layout.planes > 1 {
        println!("Planes:      {} (first plane used)", layout.planes);
    }
    for key in ["OBJECT", "FILTER", "EXPTIME", "AIRMASS", "DATE-OBS", "JD", "MJD"] {
        if let Some(value) = header.get(key) {
            println!("{:<13}{}", format!("{key}:"), value);
        }
    }

    if args.header {
        println!();
        for card in header.cards() {
            match (&card.value, &card.comment) {
                (Some(v), Some(c)) => println!("{:<8}= {} / {}", card.keyword, v, c),
                (Some(v), None) => println!("{:<8}= {}", card.keyword, v),
                (None, Some(c)) => println!("{:<8}{}", card.keyword, c),
                (None, None) => println!("{}", card.keyword),
            }
        }
    }

    if args.stats {
        let data = reader.read_data()?;
        let stats = sigma_clipped_stats(&data, DEFAULT_CLIP_SIGMA);
        println!();
        println!("Mean:        {:.3}", stats.mean);
        println!("Median:      {:.3}", stats.median);
        println!("Std dev:     {:.3}", stats.std);
    }

    if let Some(name) = &args.background {
        let method: BackgroundMethod = name.parse()?;
        let data = reader.read_data()?;
        let level = estimate_background_level(&data, method);
        println!("Background ({method}): {level:.3}");
    }

    Ok(())
}
