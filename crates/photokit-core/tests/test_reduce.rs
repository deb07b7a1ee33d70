#[allow(dead_code)]
mod common;

use ndarray::Array2;
use tempfile::tempdir;

use photokit_core::error::PhotoError;
use photokit_core::io::files::reduced_output_path;
use photokit_core::io::{load_fits, HeaderValue};
use photokit_core::reduce::{batch_reduce, batch_reduce_with_progress, reduce_science_frame};

use common::{flat_image, write_frame};

fn science(h: usize, w: usize) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| 1000.0 + (r * w + c) as f64)
}

#[test]
fn test_no_calibration_is_identity() {
    let dir = tempdir().unwrap();
    let data = science(5, 4);
    let file = write_frame(dir.path(), "sci.fits", &data, &[("FILTER", HeaderValue::from("V"))]);

    let frame = reduce_science_frame(&file, None, None, None).unwrap();
    assert_eq!(frame.data, data);
    assert!(frame.header.history().is_empty());
    assert_eq!(frame.header.get_str("FILTER"), Some("V"));
}

#[test]
fn test_bias_then_flat() {
    let dir = tempdir().unwrap();
    let data = science(4, 4);
    let file = write_frame(dir.path(), "sci.fits", &data, &[]);
    let bias = flat_image(4, 4, 100.0);
    let flat = flat_image(4, 4, 0.5);

    let frame = reduce_science_frame(&file, Some(&bias), Some(&flat), None).unwrap();
    for ((r, c), &v) in frame.data.indexed_iter() {
        let expected = (data[[r, c]] - 100.0) / 0.5;
        assert!((v - expected).abs() < 1e-9);
    }
    assert_eq!(frame.header.history(), vec!["Bias subtracted", "Flat fielded"]);
}

#[test]
fn test_flat_only_records_single_step() {
    let dir = tempdir().unwrap();
    let file = write_frame(dir.path(), "sci.fits", &science(3, 3), &[]);
    let frame = reduce_science_frame(&file, None, Some(&flat_image(3, 3, 2.0)), None).unwrap();
    assert_eq!(frame.header.history(), vec!["Flat fielded"]);
}

#[test]
fn test_zero_flat_pixel_is_not_finite() {
    let dir = tempdir().unwrap();
    let file = write_frame(dir.path(), "sci.fits", &science(3, 3), &[]);
    let mut flat = flat_image(3, 3, 1.0);
    flat[[1, 1]] = 0.0;
    let frame = reduce_science_frame(&file, None, Some(&flat), None).unwrap();
    assert!(!frame.data[[1, 1]].is_finite());
    assert!(frame.data[[0, 0]].is_finite());
}

#[test]
fn test_shape_mismatch_is_error() {
    let dir = tempdir().unwrap();
    let file = write_frame(dir.path(), "sci.fits", &science(4, 4), &[]);
    let bias = flat_image(4, 5, 0.0);
    assert!(matches!(
        reduce_science_frame(&file, Some(&bias), None, None),
        Err(PhotoError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_reduced_output_naming() {
    let out = reduced_output_path(std::path::Path::new("/data/reduced"), std::path::Path::new("/raw/hatp7_001.fits"));
    assert_eq!(out, std::path::PathBuf::from("/data/reduced/reduced_hatp7_001.fits"));
}

#[test]
fn test_batch_reduce_writes_prefixed_files() {
    let dir = tempdir().unwrap();
    let files: Vec<_> = (0..3)
        .map(|i| write_frame(dir.path(), &format!("sci{i}.fits"), &science(4, 4), &[]))
        .collect();
    let out_dir = dir.path().join("reduced");
    let bias = flat_image(4, 4, 1000.0);

    let mut calls = Vec::new();
    let written =
        batch_reduce_with_progress(&files, Some(&bias), None, Some(&out_dir), |n| calls.push(n))
            .unwrap();

    assert_eq!(calls, vec![1, 2, 3]);
    assert_eq!(written.len(), 3);
    assert_eq!(written[0], out_dir.join("reduced_sci0.fits"));
    let first = load_fits(&written[0]).unwrap();
    assert_eq!(first.data[[0, 0]], 0.0);
    assert_eq!(first.header.history(), vec!["Bias subtracted"]);
}

#[test]
fn test_batch_reduce_without_output_writes_nothing() {
    let dir = tempdir().unwrap();
    let files = vec![write_frame(dir.path(), "sci.fits", &science(2, 2), &[])];
    let written = batch_reduce(&files, None, None, None).unwrap();
    assert!(written.is_empty());
}
