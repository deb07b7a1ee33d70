use std::path::{Path, PathBuf};

use ndarray::Array2;
use tracing::{debug, info};

use crate::calibration::ensure_shape;
use crate::error::Result;
use crate::frame::Frame;
use crate::io::files::reduced_output_path;
use crate::io::fits::load_fits;
use crate::io::fits_writer::write_fits;

/// Calibrate one science frame: subtract the bias, then divide by the flat.
///
/// Each applied step appends a `HISTORY` card to the frame's own header.
/// Pixels where the flat is zero become non-finite.
pub fn reduce_science_frame(
    file: &Path,
    master_bias: Option<&Array2<f64>>,
    master_flat: Option<&Array2<f64>>,
    output: Option<&Path>,
) -> Result<Frame> {
    let mut frame = load_fits(file)?;

    if let Some(bias) = master_bias {
        ensure_shape(file, bias.dim(), frame.shape())?;
        frame.data -= bias;
        frame.header.add_history("Bias subtracted");
    }

    if let Some(flat) = master_flat {
        ensure_shape(file, flat.dim(), frame.shape())?;
        frame.data /= flat;
        frame.header.add_history("Flat fielded");
    }

    if let Some(path) = output {
        write_fits(path, &frame)?;
        debug!(input = %file.display(), output = %path.display(), "Reduced frame saved");
    }

    Ok(frame)
}

/// Reduce every file in order with the same calibration frames.
///
/// With an output directory each result is written as
/// `reduced_<original name>` and the written paths are returned; without
/// one the frames are reduced and discarded. The first failure aborts the
/// batch.
pub fn batch_reduce(
    files: &[PathBuf],
    master_bias: Option<&Array2<f64>>,
    master_flat: Option<&Array2<f64>>,
    output_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    batch_reduce_with_progress(files, master_bias, master_flat, output_dir, |_| {})
}

/// Same as [`batch_reduce`], calling `on_file` with the number of files done.
pub fn batch_reduce_with_progress(
    files: &[PathBuf],
    master_bias: Option<&Array2<f64>>,
    master_flat: Option<&Array2<f64>>,
    output_dir: Option<&Path>,
    mut on_file: impl FnMut(usize),
) -> Result<Vec<PathBuf>> {
    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut written = Vec::new();
    for (i, file) in files.iter().enumerate() {
        let output = output_dir.map(|dir| reduced_output_path(dir, file));
        reduce_science_frame(file, master_bias, master_flat, output.as_deref())?;
        if let Some(path) = output {
            written.push(path);
        }
        on_file(i + 1);
    }

    info!(
        frames = files.len(),
        written = written.len(),
        "Batch reduction complete"
    );
    Ok(written)
}
