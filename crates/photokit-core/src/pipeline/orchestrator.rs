use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::calibration::{create_master_bias, create_master_flat};
use crate::config::ProjectConfig;
use crate::error::{PhotoError, Result};
use crate::io::files::{list_fits_files, reduced_output_path};
use crate::lightcurve::LightCurveBuilder;
use crate::photometry::{compute_zero_point, write_zero_points_csv};
use crate::reduce::reduce_science_frame;
use crate::render::save_preview;

use super::types::{NoOpReporter, PipelineStage, ProgressReporter, ReductionSummary};

const MASTER_BIAS_NAME: &str = "master_bias.fits";
const MASTER_FLAT_NAME: &str = "master_flat.fits";

/// Run calibration, reduction and light-curve extraction from one config.
///
/// Missing bias or flat frames are skipped with a warning; missing science
/// frames are an error. Science frames are reduced one at a time and
/// measured in memory, so nothing but the requested outputs is written.
pub fn run_reduction_reported(
    config: &ProjectConfig,
    reporter: &dyn ProgressReporter,
) -> Result<ReductionSummary> {
    config.validate()?;
    let paths = &config.paths;

    reporter.begin_stage(PipelineStage::Discovering, None);
    let bias_files = list_fits_files(&paths.calibration_dir, &config.patterns.bias)?;
    let flat_files = list_fits_files(&paths.calibration_dir, &config.patterns.flat)?;
    let science_files: Vec<PathBuf> = list_fits_files(&paths.raw_dir, &config.patterns.science)?
        .into_iter()
        .filter(|f| !bias_files.contains(f) && !flat_files.contains(f))
        .filter(|f| !is_master_frame(f))
        .collect();
    reporter.finish_stage();

    info!(
        bias = bias_files.len(),
        flats = flat_files.len(),
        science = science_files.len(),
        "Input files found"
    );
    if science_files.is_empty() {
        return Err(PhotoError::EmptyInput(format!(
            "No science files matching {} in {}",
            config.patterns.science,
            paths.raw_dir.display()
        )));
    }

    let mut summary = ReductionSummary {
        bias_frames: bias_files.len(),
        flat_frames: flat_files.len(),
        science_frames: science_files.len(),
        ..Default::default()
    };

    std::fs::create_dir_all(&paths.calibration_dir)?;

    reporter.begin_stage(PipelineStage::MasterBias, Some(bias_files.len()));
    let master_bias = if bias_files.is_empty() {
        warn!("No bias frames found; skipping bias subtraction");
        None
    } else {
        let out = paths.calibration_dir.join(MASTER_BIAS_NAME);
        let master = create_master_bias(&bias_files, Some(&out))?;
        if config.plot.save_previews {
            save_preview(&out.with_extension("png"), &master.data, None, config.plot.colormap)?;
        }
        summary.master_bias = Some(out);
        Some(master.data)
    };
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::MasterFlat, Some(flat_files.len()));
    let master_flat = if flat_files.is_empty() {
        warn!("No flat frames found; skipping flat fielding");
        None
    } else {
        let out = paths.calibration_dir.join(MASTER_FLAT_NAME);
        let master = create_master_flat(&flat_files, master_bias.as_ref(), Some(&out))?;
        if config.plot.save_previews {
            save_preview(&out.with_extension("png"), &master.data, None, config.plot.colormap)?;
        }
        summary.master_flat = Some(out);
        Some(master.data)
    };
    reporter.finish_stage();

    let output_dir = config
        .output
        .save_reduced_frames
        .then_some(paths.reduced_dir.as_path());
    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let observation = &config.observation;
    let radii = config.photometry.radii();
    let mut curve = LightCurveBuilder::new(
        observation.target_position,
        &observation.comparison_positions,
        &radii,
    );

    reporter.begin_stage(PipelineStage::Reducing, Some(science_files.len()));
    for (i, file) in science_files.iter().enumerate() {
        let output = output_dir.map(|dir| reduced_output_path(dir, file));
        let frame = reduce_science_frame(
            file,
            master_bias.as_ref(),
            master_flat.as_ref(),
            output.as_deref(),
        )?;
        curve.add_frame(file, &frame)?;

        // First frame per configured filter calibrates that filter.
        if !config.standard_stars.is_empty() {
            if let Some(filter) = frame.header.get_str("FILTER") {
                let wanted = observation.filters.iter().any(|f| f == filter);
                let done = summary.zero_points.iter().any(|z| z.filter == filter);
                if wanted && !done {
                    summary.zero_points.push(compute_zero_point(
                        &frame.data,
                        filter,
                        &config.standard_stars,
                        &radii,
                    ));
                }
            }
        }

        if let Some(path) = output {
            summary.reduced_files.push(path);
        }
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    summary.light_curve = curve
        .finish(config.analysis.normalize_light_curve)
        .to_time_unit(config.analysis.time_unit);

    if !summary.zero_points.is_empty() {
        let path = &config.output.calibration_file;
        write_zero_points_csv(path, &summary.zero_points)?;
        info!(path = %path.display(), filters = summary.zero_points.len(), "Zero points saved");
        summary.calibration_file = Some(path.clone());
    }

    if config.output.save_light_curve {
        reporter.begin_stage(PipelineStage::Writing, None);
        let path = &config.output.light_curve_file;
        summary.light_curve.write_csv(path)?;
        info!(path = %path.display(), "Light curve saved");
        summary.light_curve_file = Some(path.clone());
        reporter.finish_stage();
    }

    Ok(summary)
}

/// Run the pipeline without progress reporting.
pub fn run_reduction(config: &ProjectConfig) -> Result<ReductionSummary> {
    run_reduction_reported(config, &NoOpReporter)
}

fn is_master_frame(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n == MASTER_BIAS_NAME || n == MASTER_FLAT_NAME || n.starts_with("reduced_"))
}
