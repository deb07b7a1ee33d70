use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PhotoError, Result};
use crate::frame::Frame;
use crate::io::fits_writer::write_fits;

use super::{load_stack, median_combine};

/// Median-combine bias frames into a master bias.
///
/// The returned frame carries a fresh header with a single `HISTORY` card.
/// When `output` is given the master is also written there, replacing any
/// existing file.
pub fn create_master_bias(files: &[PathBuf], output: Option<&Path>) -> Result<Frame> {
    if files.is_empty() {
        return Err(PhotoError::EmptyInput("No bias files provided".into()));
    }

    let images = load_stack(files)?;
    let mut master = Frame::new(median_combine(&images)?);
    master
        .header
        .add_history(&format!("Master bias from {} frames", files.len()));
    info!(frames = files.len(), "Master bias created");

    if let Some(path) = output {
        write_fits(path, &master)?;
        info!(path = %path.display(), "Master bias saved");
    }

    Ok(master)
}
