use std::path::{Path, PathBuf};

use ndarray::Array2;
use tracing::{info, warn};

use crate::error::{PhotoError, Result};
use crate::frame::Frame;
use crate::io::fits::load_fits;
use crate::io::fits_writer::write_fits;
use crate::stats::median;

use super::{ensure_shape, median_combine};

/// Build a normalized master flat.
///
/// Each flat is bias-corrected (when a master bias is given) and divided by
/// its own median before the per-pixel median combine; the combined result
/// is divided by its median so the master has a median of exactly 1.
pub fn create_master_flat(
    files: &[PathBuf],
    master_bias: Option<&Array2<f64>>,
    output: Option<&Path>,
) -> Result<Frame> {
    if files.is_empty() {
        return Err(PhotoError::EmptyInput("No flat files provided".into()));
    }

    let mut normalized: Vec<Array2<f64>> = Vec::with_capacity(files.len());
    for path in files {
        let mut data = load_fits(path)?.data;
        if let Some(bias) = master_bias {
            ensure_shape(path, bias.dim(), data.dim())?;
            data -= bias;
        } else if let Some(first) = normalized.first() {
            ensure_shape(path, first.dim(), data.dim())?;
        }

        let level = median(data.iter().copied());
        if level == 0.0 || !level.is_finite() {
            warn!(path = %path.display(), level, "Flat frame has a degenerate median");
        }
        data /= level;
        normalized.push(data);
    }

    let mut combined = median_combine(&normalized)?;
    let level = median(combined.iter().copied());
    combined /= level;

    let mut master = Frame::new(combined);
    master
        .header
        .add_history(&format!("Master flat from {} frames", files.len()));
    info!(frames = files.len(), "Master flat created");

    if let Some(path) = output {
        write_fits(path, &master)?;
        info!(path = %path.display(), "Master flat saved");
    }

    Ok(master)
}
