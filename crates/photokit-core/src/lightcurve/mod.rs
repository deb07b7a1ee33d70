pub mod time;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::frame::{Frame, Position};
use crate::io::fits::load_fits;
use crate::photometry::aperture::{measure_aperture_photometry, measure_position, ApertureRadii};
use crate::stats::median;

pub use time::{convert_time, date_obs_to_jd, observation_time, TimeSource, TimeUnit};

/// One frame's entry in a differential light curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightCurvePoint {
    pub time: f64,
    pub target_flux: f64,
    pub comparison_flux: f64,
    pub relative_flux: f64,
    /// Keyword the time came from; unknown for curves read back from CSV.
    #[serde(skip)]
    pub time_source: Option<TimeSource>,
}

/// Differential light curve, one point per input frame in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightCurve {
    pub points: Vec<LightCurvePoint>,
}

impl LightCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    pub fn relative_fluxes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.relative_flux).collect()
    }

    /// Copy with times expressed in `unit`; see [`convert_time`].
    pub fn to_time_unit(&self, unit: TimeUnit) -> LightCurve {
        let points = self
            .points
            .iter()
            .map(|p| LightCurvePoint {
                time: convert_time(p.time, p.time_source, unit),
                ..p.clone()
            })
            .collect();
        LightCurve { points }
    }

    /// Write `time,target_flux,comparison_flux,relative_flux` CSV.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        for point in &self.points {
            writer.serialize(point)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_csv(path: &Path) -> Result<LightCurve> {
        let mut reader = csv::Reader::from_path(path)?;
        let points = reader
            .deserialize()
            .collect::<std::result::Result<Vec<LightCurvePoint>, _>>()?;
        Ok(LightCurve { points })
    }
}

/// Extract a median-normalized differential light curve.
///
/// For each file: the observation time (see [`observation_time`]), the
/// background-subtracted flux of `target`, and the summed flux of the
/// `comparisons` (1.0 when there are none). Positions are fixed across all
/// frames. An empty file list yields an empty curve.
pub fn extract_light_curve(
    files: &[PathBuf],
    target: Position,
    comparisons: &[Position],
    radii: &ApertureRadii,
) -> Result<LightCurve> {
    extract_light_curve_with(files, target, comparisons, radii, true, |_| {})
}

/// [`extract_light_curve`] with optional normalization and a per-file
/// progress callback receiving the number of files done.
pub fn extract_light_curve_with(
    files: &[PathBuf],
    target: Position,
    comparisons: &[Position],
    radii: &ApertureRadii,
    normalize: bool,
    mut on_file: impl FnMut(usize),
) -> Result<LightCurve> {
    let mut builder = LightCurveBuilder::new(target, comparisons, radii);
    for (i, path) in files.iter().enumerate() {
        let frame = load_fits(path)?;
        builder.add_frame(path, &frame)?;
        on_file(i + 1);
    }
    Ok(builder.finish(normalize))
}

/// Accumulates light-curve measurements frame by frame, for callers that
/// already hold the frames in memory.
pub struct LightCurveBuilder<'a> {
    target: Position,
    comparisons: &'a [Position],
    radii: &'a ApertureRadii,
    rows: Vec<(f64, TimeSource, f64, f64)>,
}

impl<'a> LightCurveBuilder<'a> {
    pub fn new(target: Position, comparisons: &'a [Position], radii: &'a ApertureRadii) -> Self {
        Self {
            target,
            comparisons,
            radii,
            rows: Vec::new(),
        }
    }

    /// Measure one frame. `path` is used for logging only.
    pub fn add_frame(&mut self, path: &Path, frame: &Frame) -> Result<()> {
        let (time, source) = observation_time(&frame.header)?;
        if source == TimeSource::Missing {
            warn!(path = %path.display(), "No JD, MJD or DATE-OBS keyword; using time 0.0");
        }

        let target_flux = measure_position(&frame.data, self.target, self.radii).flux;
        let comparison_flux = if self.comparisons.is_empty() {
            1.0
        } else {
            measure_aperture_photometry(&frame.data, self.comparisons, self.radii)
                .iter()
                .map(|m| m.flux)
                .sum()
        };

        debug!(
            path = %path.display(),
            time,
            target_flux,
            comparison_flux,
            "Light curve point"
        );
        self.rows.push((time, source, target_flux, comparison_flux));
        Ok(())
    }

    /// Compute relative fluxes, dividing by their median when `normalize`.
    pub fn finish(self, normalize: bool) -> LightCurve {
        let ratios: Vec<f64> = self.rows.iter().map(|&(_, _, t, c)| t / c).collect();
        let scale = if normalize && !ratios.is_empty() {
            median(ratios.iter().copied())
        } else {
            1.0
        };

        let points: Vec<LightCurvePoint> = self
            .rows
            .into_iter()
            .zip(ratios)
            .map(|((time, source, target, comparison), ratio)| LightCurvePoint {
                time,
                target_flux: target,
                comparison_flux: comparison,
                relative_flux: ratio / scale,
                time_source: Some(source),
            })
            .collect();

        info!(
            points = points.len(),
            comparisons = self.comparisons.len(),
            "Light curve extracted"
        );
        LightCurve { points }
    }
}
