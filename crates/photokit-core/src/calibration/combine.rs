use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{PhotoError, Result};
use crate::stats::median_in_place;

/// Combine equally-shaped images by taking the median at each pixel.
///
/// Parallelizes at the row level for images >= 256x256; the result does not
/// depend on which path is taken.
pub fn median_combine(images: &[Array2<f64>]) -> Result<Array2<f64>> {
    if images.is_empty() {
        return Err(PhotoError::EmptyInput("No images to combine".into()));
    }

    let (h, w) = images[0].dim();
    for (i, img) in images.iter().enumerate() {
        if img.dim() != (h, w) {
            return Err(PhotoError::ShapeMismatch {
                file: format!("image #{i}"),
                expected: (h, w),
                actual: img.dim(),
            });
        }
    }
    let n = images.len();

    if h * w >= PARALLEL_PIXEL_THRESHOLD && n > 1 {
        let rows: Vec<Vec<f64>> = (0..h)
            .into_par_iter()
            .map(|row| {
                let mut pixel_values = vec![0.0f64; n];
                let mut row_result = vec![0.0f64; w];
                for (col, result) in row_result.iter_mut().enumerate() {
                    for (i, img) in images.iter().enumerate() {
                        pixel_values[i] = img[[row, col]];
                    }
                    *result = median_in_place(&mut pixel_values);
                }
                row_result
            })
            .collect();

        let mut result = Array2::<f64>::zeros((h, w));
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
        Ok(result)
    } else {
        let mut result = Array2::<f64>::zeros((h, w));
        let mut pixel_values = vec![0.0f64; n];

        for row in 0..h {
            for col in 0..w {
                for (i, img) in images.iter().enumerate() {
                    pixel_values[i] = img[[row, col]];
                }
                result[[row, col]] = median_in_place(&mut pixel_values);
            }
        }
        Ok(result)
    }
}
