pub mod bias;
pub mod combine;
pub mod flat;

use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::error::{PhotoError, Result};
use crate::io::fits::load_fits;

pub use bias::create_master_bias;
pub use combine::median_combine;
pub use flat::create_master_flat;

/// Load every file's pixel data, requiring a single common shape.
pub(crate) fn load_stack(files: &[PathBuf]) -> Result<Vec<Array2<f64>>> {
    let mut images: Vec<Array2<f64>> = Vec::with_capacity(files.len());
    for path in files {
        let data = load_fits(path)?.data;
        if let Some(first) = images.first() {
            ensure_shape(path, first.dim(), data.dim())?;
        }
        images.push(data);
    }
    Ok(images)
}

pub(crate) fn ensure_shape(
    path: &Path,
    expected: (usize, usize),
    actual: (usize, usize),
) -> Result<()> {
    if expected != actual {
        return Err(PhotoError::ShapeMismatch {
            file: path.display().to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
