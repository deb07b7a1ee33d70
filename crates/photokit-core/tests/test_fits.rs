#[allow(dead_code)]
mod common;

use fitsio::images::ImageType;
use ndarray::Array2;
use tempfile::tempdir;

use photokit_core::error::PhotoError;
use photokit_core::frame::Frame;
use photokit_core::io::{load_fits, read_header, write_fits, FitsReader, HeaderValue};

use common::{write_frame, write_raw_fits};

// ---------------------------------------------------------------------------
// Reading files written directly through cfitsio
// ---------------------------------------------------------------------------

#[test]
fn test_read_unsigned16_applies_bzero() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("u16.fits");
    let stored: [u16; 6] = [0, 1, 32768, 65535, 100, 32668];
    drop(write_raw_fits(&path, ImageType::UnsignedShort, &[2, 3], &stored));

    let frame = load_fits(&path).unwrap();
    assert_eq!(frame.shape(), (2, 3));
    assert_eq!(frame.data[[0, 0]], 0.0);
    assert_eq!(frame.data[[0, 1]], 1.0);
    assert_eq!(frame.data[[0, 2]], 32768.0);
    assert_eq!(frame.data[[1, 0]], 65535.0);
    assert_eq!(frame.data[[1, 2]], 32668.0);
    assert_eq!(frame.header.get_f64("BZERO"), Some(32768.0));
}

#[test]
fn test_read_float32() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("f32.fits");
    drop(write_raw_fits(&path, ImageType::Float, &[2, 2], &[1.5f32, 2.5, -1.0, 0.0]));

    let frame = load_fits(&path).unwrap();
    assert_eq!(frame.data[[0, 0]], 1.5);
    assert_eq!(frame.data[[0, 1]], 2.5);
    assert_eq!(frame.data[[1, 0]], -1.0);
}

#[test]
fn test_rows_follow_naxis2() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rows.fits");
    let samples: Vec<i32> = (0..12).collect();
    drop(write_raw_fits(&path, ImageType::Long, &[3, 4], &samples));

    let mut reader = FitsReader::open(&path).unwrap();
    assert_eq!(reader.layout.bitpix, 32);
    assert_eq!(reader.layout.width, 4);
    assert_eq!(reader.layout.height, 3);
    assert_eq!(reader.layout.planes, 1);

    let data = reader.read_data().unwrap();
    assert_eq!(data[[1, 0]], 4.0);
    assert_eq!(data[[2, 3]], 11.0);
}

#[test]
fn test_cube_reads_first_plane() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cube.fits");
    let samples: Vec<f64> = (0..24).map(f64::from).collect();
    drop(write_raw_fits(&path, ImageType::Double, &[2, 3, 4], &samples));

    let reader = FitsReader::open(&path).unwrap();
    assert_eq!(reader.layout.planes, 2);
    let frame = reader.read_frame().unwrap();
    assert_eq!(frame.shape(), (3, 4));
    assert_eq!(frame.data[[2, 3]], 11.0);
}

#[test]
fn test_header_values_are_typed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hdr.fits");
    {
        let (mut fptr, hdu) = write_raw_fits(&path, ImageType::UnsignedByte, &[1, 1], &[7u8]);
        hdu.write_key(&mut fptr, "EXPTIME", 30.0f64).unwrap();
        hdu.write_key(&mut fptr, "NCOMBINE", 5i64).unwrap();
        hdu.write_key(&mut fptr, "OBJECT", "HAT-P-7".to_string()).unwrap();
    }

    let header = read_header(&path).unwrap();
    assert_eq!(header.get_f64("EXPTIME"), Some(30.0));
    assert_eq!(header.get_i64("NCOMBINE"), Some(5));
    assert_eq!(header.get("NCOMBINE"), Some(&HeaderValue::Integer(5)));
    assert_eq!(header.get_str("object"), Some("HAT-P-7"));
    assert_eq!(header.get_i64("NAXIS1"), Some(1));
    assert!(!header.contains("FILTER"));
}

// ---------------------------------------------------------------------------
// Invalid input
// ---------------------------------------------------------------------------

#[test]
fn test_not_a_fits_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("junk.fits");
    std::fs::write(&path, vec![b'x'; 2880]).unwrap();
    assert!(matches!(load_fits(&path), Err(PhotoError::Fits(_))));
}

#[test]
fn test_truncated_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.fits");
    std::fs::write(&path, b"SIMPLE  =                    T").unwrap();
    assert!(load_fits(&path).is_err());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let result = load_fits(&dir.path().join("nope.fits"));
    assert!(matches!(result, Err(PhotoError::Io(_))));
}

#[test]
fn test_header_without_image_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.fits");
    drop(fitsio::FitsFile::create(&path).open().unwrap());
    assert!(matches!(load_fits(&path), Err(PhotoError::InvalidFits(_))));
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

#[test]
fn test_write_then_read_preserves_pixels_and_cards() {
    let dir = tempdir().unwrap();
    let data = Array2::from_shape_fn((7, 5), |(r, c)| r as f64 * 10.0 + c as f64 + 0.25);
    let path = write_frame(
        dir.path(),
        "out.fits",
        &data,
        &[
            ("FILTER", HeaderValue::from("V")),
            ("JD", HeaderValue::from(2459000.123456)),
            ("NCOMBINE", HeaderValue::from(3i64)),
            ("SIMULATE", HeaderValue::from(false)),
        ],
    );

    let frame = load_fits(&path).unwrap();
    assert_eq!(frame.data, data);
    assert_eq!(frame.header.get_str("FILTER"), Some("V"));
    let jd = frame.header.get_f64("JD").unwrap();
    assert!((jd - 2459000.123456).abs() < 1e-9);
    assert_eq!(frame.header.get_i64("NCOMBINE"), Some(3));
    assert_eq!(frame.header.get("SIMULATE"), Some(&HeaderValue::Logical(false)));
}

#[test]
fn test_history_survives_write() {
    let dir = tempdir().unwrap();
    let mut frame = Frame::new(Array2::zeros((2, 2)));
    frame.header.add_history("Bias subtracted");
    let path = dir.path().join("h.fits");
    write_fits(&path, &frame).unwrap();

    let back = load_fits(&path).unwrap();
    assert_eq!(back.header.history(), vec!["Bias subtracted"]);
}

#[test]
fn test_rewrite_does_not_duplicate_cards() {
    let dir = tempdir().unwrap();
    let first = write_frame(
        dir.path(),
        "a.fits",
        &Array2::zeros((3, 2)),
        &[("FILTER", HeaderValue::from("I"))],
    );
    let loaded = load_fits(&first).unwrap();
    let second = dir.path().join("b.fits");
    write_fits(&second, &loaded).unwrap();

    let again = load_fits(&second).unwrap();
    let count = |key: &str| {
        again
            .header
            .cards()
            .iter()
            .filter(|c| c.keyword == key)
            .count()
    };
    assert_eq!(count("FILTER"), 1);
    assert_eq!(count("NAXIS1"), 1);
    assert_eq!(count("BITPIX"), 1);
    assert_eq!(
        count("COMMENT"),
        loaded.header.cards().iter().filter(|c| c.keyword == "COMMENT").count()
    );
}
