mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "photokit", about = "CCD reduction and aperture photometry tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show FITS header and image statistics
    Info(commands::info::InfoArgs),
    /// Build a master bias from bias frames
    Bias(commands::bias::BiasArgs),
    /// Build a normalized master flat from flat frames
    Flat(commands::flat::FlatArgs),
    /// Bias-subtract and flat-field science frames
    Reduce(commands::reduce::ReduceArgs),
    /// Detect point sources in an image
    Find(commands::find::FindArgs),
    /// Aperture photometry at given positions
    Phot(commands::phot::PhotArgs),
    /// Extract a differential light curve
    Lightcurve(commands::lightcurve::LightcurveArgs),
    /// Color index of stars measured in two filters
    Color(commands::color::ColorArgs),
    /// Write an observation log from FITS headers
    Log(commands::log::LogArgs),
    /// Render an image to PNG
    Preview(commands::preview::PreviewArgs),
    /// Photometric zero points from standard stars
    Zeropoint(commands::zeropoint::ZeropointArgs),
    /// Run calibration, reduction and light-curve extraction from a config
    Run(commands::run::RunArgs),
    /// Print or save a default project config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Bias(args) => commands::bias::run(args),
        Commands::Flat(args) => commands::flat::run(args),
        Commands::Reduce(args) => commands::reduce::run(args),
        Commands::Find(args) => commands::find::run(args),
        Commands::Phot(args) => commands::phot::run(args),
        Commands::Lightcurve(args) => commands::lightcurve::run(args),
        Commands::Color(args) => commands::color::run(args),
        Commands::Log(args) => commands::log::run(args),
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Zeropoint(args) => commands::zeropoint::run(args),
        Commands::Run(args) => commands::run::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
