use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ANNULUS_INNER, DEFAULT_ANNULUS_OUTER, DEFAULT_APERTURE_RADIUS,
    DEFAULT_DETECTION_THRESHOLD, DEFAULT_FWHM,
};
use crate::detection::FinderConfig;
use crate::error::Result;
use crate::frame::Position;
use crate::lightcurve::TimeUnit;
use crate::photometry::{ApertureRadii, StandardStar};
use crate::render::Colormap;

/// Settings for a full reduction and light-curve run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default)]
    pub photometry: PhotometryConfig,
    #[serde(default)]
    pub observation: ObservationConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub advanced: AdvancedConfig,
    #[serde(default)]
    pub standard_stars: Vec<StandardStar>,
}

impl ProjectConfig {
    /// Check the user-supplied numeric parameters.
    pub fn validate(&self) -> Result<()> {
        self.photometry.radii().validate()?;
        self.photometry.finder().validate()?;
        Ok(())
    }

    /// Example configuration with the classroom HAT-P-7 setup and two
    /// Landolt standards.
    pub fn example() -> Self {
        let star = |name: &str, ra: f64, dec: f64, v: f64, b: f64, r: f64, x: f64, y: f64| {
            StandardStar {
                name: name.to_string(),
                ra,
                dec,
                position: Position::new(x, y),
                magnitudes: [("V", v), ("B", b), ("R", r)]
                    .into_iter()
                    .map(|(f, m)| (f.to_string(), m))
                    .collect(),
            }
        };
        Self {
            standard_stars: vec![
                star("SA98-193", 21.0, 0.0, 13.150, 13.850, 12.700, 512.5, 512.5),
                star("SA98-194", 21.1, 0.1, 13.560, 14.320, 13.050, 612.3, 612.7),
            ],
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Science frames.
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,
    /// Bias and flat frames; master frames are written here too.
    #[serde(default = "default_calibration_dir")]
    pub calibration_dir: PathBuf,
    #[serde(default = "default_reduced_dir")]
    pub reduced_dir: PathBuf,
}

fn default_raw_dir() -> PathBuf {
    PathBuf::from("data/raw")
}
fn default_calibration_dir() -> PathBuf {
    PathBuf::from("data/calibration")
}
fn default_reduced_dir() -> PathBuf {
    PathBuf::from("data/reduced")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            calibration_dir: default_calibration_dir(),
            reduced_dir: default_reduced_dir(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternsConfig {
    #[serde(default = "default_bias_pattern")]
    pub bias: String,
    #[serde(default = "default_flat_pattern")]
    pub flat: String,
    #[serde(default = "default_science_pattern")]
    pub science: String,
}

fn default_bias_pattern() -> String {
    "bias*.fits".into()
}
fn default_flat_pattern() -> String {
    "flat*.fits".into()
}
fn default_science_pattern() -> String {
    "*.fits".into()
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            bias: default_bias_pattern(),
            flat: default_flat_pattern(),
            science: default_science_pattern(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhotometryConfig {
    #[serde(default = "default_aperture_radius")]
    pub aperture_radius: f64,
    #[serde(default = "default_annulus_inner")]
    pub annulus_inner: f64,
    #[serde(default = "default_annulus_outer")]
    pub annulus_outer: f64,
    #[serde(default = "default_fwhm")]
    pub fwhm: f64,
    /// Detection threshold in units of the background sigma.
    #[serde(default = "default_detection_threshold")]
    pub detection_threshold: f64,
}

fn default_aperture_radius() -> f64 {
    DEFAULT_APERTURE_RADIUS
}
fn default_annulus_inner() -> f64 {
    DEFAULT_ANNULUS_INNER
}
fn default_annulus_outer() -> f64 {
    DEFAULT_ANNULUS_OUTER
}
fn default_fwhm() -> f64 {
    DEFAULT_FWHM
}
fn default_detection_threshold() -> f64 {
    DEFAULT_DETECTION_THRESHOLD
}

impl Default for PhotometryConfig {
    fn default() -> Self {
        Self {
            aperture_radius: DEFAULT_APERTURE_RADIUS,
            annulus_inner: DEFAULT_ANNULUS_INNER,
            annulus_outer: DEFAULT_ANNULUS_OUTER,
            fwhm: DEFAULT_FWHM,
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
        }
    }
}

impl PhotometryConfig {
    pub fn radii(&self) -> ApertureRadii {
        ApertureRadii::new(self.aperture_radius, self.annulus_inner, self.annulus_outer)
    }

    pub fn finder(&self) -> FinderConfig {
        FinderConfig::new(self.fwhm, self.detection_threshold)
    }
}

/// Target, comparison stars and filters of the observing run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationConfig {
    #[serde(default = "default_target_name")]
    pub target_name: String,
    #[serde(default = "default_target_position")]
    pub target_position: Position,
    #[serde(default = "default_filters")]
    pub filters: Vec<String>,
    #[serde(default = "default_comparison_positions")]
    pub comparison_positions: Vec<Position>,
}

fn default_target_name() -> String {
    "HAT-P-7".into()
}
fn default_target_position() -> Position {
    Position::new(512.0, 512.0)
}
fn default_comparison_positions() -> Vec<Position> {
    vec![
        Position::new(600.0, 500.0),
        Position::new(450.0, 600.0),
        Position::new(700.0, 400.0),
    ]
}
fn default_filters() -> Vec<String> {
    vec!["B".into(), "V".into(), "R".into()]
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            target_name: default_target_name(),
            target_position: default_target_position(),
            filters: default_filters(),
            comparison_positions: default_comparison_positions(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default)]
    pub colormap: Colormap,
    /// Save PNG previews of the master frames next to them.
    #[serde(default = "default_true")]
    pub save_previews: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            colormap: Colormap::default(),
            save_previews: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub save_reduced_frames: bool,
    #[serde(default = "default_true")]
    pub save_light_curve: bool,
    #[serde(default = "default_light_curve_file")]
    pub light_curve_file: PathBuf,
    #[serde(default = "default_calibration_file")]
    pub calibration_file: PathBuf,
}

fn default_light_curve_file() -> PathBuf {
    PathBuf::from("data/lightcurve.csv")
}
fn default_calibration_file() -> PathBuf {
    PathBuf::from("data/photometric_calibration.csv")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_reduced_frames: true,
            save_light_curve: true,
            light_curve_file: default_light_curve_file(),
            calibration_file: default_calibration_file(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub time_unit: TimeUnit,
    #[serde(default = "default_true")]
    pub normalize_light_curve: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            time_unit: TimeUnit::Jd,
            normalize_light_curve: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvancedConfig {
    #[serde(default)]
    pub use_parallel_processing: bool,
    /// Worker threads when parallel processing is enabled.
    #[serde(default = "default_num_processes")]
    pub num_processes: usize,
}

fn default_num_processes() -> usize {
    4
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            use_parallel_processing: false,
            num_processes: default_num_processes(),
        }
    }
}

impl AdvancedConfig {
    /// Thread count for the data-parallel stages.
    pub fn worker_threads(&self) -> usize {
        if self.use_parallel_processing {
            self.num_processes.max(1)
        } else {
            1
        }
    }
}
