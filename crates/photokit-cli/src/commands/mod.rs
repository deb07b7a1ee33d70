pub mod bias;
pub mod color;
pub mod config;
pub mod find;
pub mod flat;
pub mod info;
pub mod lightcurve;
pub mod log;
pub mod phot;
pub mod preview;
pub mod reduce;
pub mod run;
pub mod zeropoint;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use photokit_core::config::ProjectConfig;
use photokit_core::consts::{DEFAULT_ANNULUS_INNER, DEFAULT_ANNULUS_OUTER, DEFAULT_APERTURE_RADIUS};
use photokit_core::frame::{Frame, Position};
use photokit_core::io::{list_fits_files, load_fits};
use photokit_core::photometry::ApertureRadii;

/// Aperture radii shared by the photometry commands.
#[derive(Args)]
pub struct RadiiArgs {
    /// Aperture radius in pixels
    #[arg(long, default_value_t = DEFAULT_APERTURE_RADIUS)]
    pub aperture: f64,

    /// Inner radius of the sky annulus
    #[arg(long, default_value_t = DEFAULT_ANNULUS_INNER)]
    pub annulus_inner: f64,

    /// Outer radius of the sky annulus
    #[arg(long, default_value_t = DEFAULT_ANNULUS_OUTER)]
    pub annulus_outer: f64,
}

impl RadiiArgs {
    pub fn radii(&self) -> Result<ApertureRadii> {
        let radii = ApertureRadii::new(self.aperture, self.annulus_inner, self.annulus_outer);
        radii.validate()?;
        Ok(radii)
    }
}

/// Parse `x,y` into a pixel position.
pub fn parse_position(s: &str) -> std::result::Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("bad x in '{s}'"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("bad y in '{s}'"))?;
    Ok(Position::new(x, y))
}

/// Expand the inputs into a file list: directories are searched with
/// `pattern`, files are taken as given. Fails when nothing matches.
pub fn resolve_inputs(inputs: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(list_fits_files(input, pattern)?);
        } else {
            files.push(input.clone());
        }
    }
    if files.is_empty() {
        bail!("No input files matching {pattern}");
    }
    Ok(files)
}

/// Load a master frame when a path is given.
pub fn load_master(path: Option<&Path>) -> Result<Option<Frame>> {
    path.map(|p| load_fits(p).with_context(|| format!("Failed to load {}", p.display())))
        .transpose()
}

pub fn load_project_config(path: &Path) -> Result<ProjectConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ProjectConfig = toml::from_str(&contents).context("Invalid project config")?;
    Ok(config)
}

pub fn file_progress(len: usize, message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message(message);
    Ok(pb)
}
