use std::path::{Path, PathBuf};

use fitsio::hdu::FitsHdu;
use fitsio::images::{ImageDescription, ImageType, WriteImage};
use fitsio::FitsFile;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use photokit_core::frame::Frame;
use photokit_core::io::header::{Header, HeaderValue};
use photokit_core::io::write_fits;

/// Write a primary image straight through cfitsio, independent of the
/// crate's writer. `shape` is slowest axis first, e.g. `[height, width]`.
/// The open file is returned so callers can add keywords.
pub fn write_raw_fits<T: WriteImage>(
    path: &Path,
    data_type: ImageType,
    shape: &[usize],
    samples: &[T],
) -> (FitsFile, FitsHdu) {
    let description = ImageDescription {
        data_type,
        dimensions: shape,
    };
    let mut fptr = FitsFile::create(path)
        .with_custom_primary(&description)
        .overwrite()
        .open()
        .expect("create FITS");
    let hdu = fptr.primary_hdu().expect("primary HDU");
    hdu.write_image(&mut fptr, samples).expect("write image");
    (fptr, hdu)
}

/// Write `data` with the given header keywords using the crate's writer.
pub fn write_frame(
    dir: &Path,
    name: &str,
    data: &Array2<f64>,
    keywords: &[(&str, HeaderValue)],
) -> PathBuf {
    let mut header = Header::new();
    for (k, v) in keywords {
        header.set(k, v.clone());
    }
    let path = dir.join(name);
    write_fits(&path, &Frame::with_header(data.clone(), header)).expect("write FITS");
    path
}

/// Constant image.
pub fn flat_image(h: usize, w: usize, value: f64) -> Array2<f64> {
    Array2::from_elem((h, w), value)
}

/// Gaussian noise around `level` with a fixed seed.
pub fn noisy_image(h: usize, w: usize, level: f64, sigma: f64, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(level, sigma).expect("valid noise sigma");
    Array2::from_shape_fn((h, w), |_| normal.sample(&mut rng))
}

/// Add a circular Gaussian star of total `flux` centred at `(x, y)`.
pub fn add_star(data: &mut Array2<f64>, x: f64, y: f64, fwhm: f64, flux: f64) {
    let sigma = fwhm / 2.354_820_045;
    let norm = flux / (2.0 * std::f64::consts::PI * sigma * sigma);
    for ((row, col), v) in data.indexed_iter_mut() {
        let r2 = (col as f64 - x).powi(2) + (row as f64 - y).powi(2);
        *v += norm * (-r2 / (2.0 * sigma * sigma)).exp();
    }
}
