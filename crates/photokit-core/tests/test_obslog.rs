#[allow(dead_code)]
mod common;

use tempfile::tempdir;

use photokit_core::io::HeaderValue;
use photokit_core::obslog::{create_observation_log, get_header_info, LogValue};

use common::{flat_image, write_frame};

#[test]
fn test_header_info_selected_keywords() {
    let dir = tempdir().unwrap();
    let file = write_frame(
        dir.path(),
        "a.fits",
        &flat_image(4, 4, 0.0),
        &[
            ("OBJECT", HeaderValue::from("M67")),
            ("EXPTIME", HeaderValue::from(60.0)),
        ],
    );

    let info = get_header_info(&file, Some(&["EXPTIME", "FILTER", "OBJECT"][..])).unwrap();
    assert_eq!(info.len(), 3);
    assert_eq!(info[0], ("EXPTIME".to_string(), Some(HeaderValue::Float(60.0))));
    assert_eq!(info[1], ("FILTER".to_string(), None));
    assert_eq!(info[2].1.as_ref().and_then(|v| v.as_str()), Some("M67"));
}

#[test]
fn test_header_info_all_cards() {
    let dir = tempdir().unwrap();
    let file = write_frame(
        dir.path(),
        "a.fits",
        &flat_image(4, 4, 0.0),
        &[("FILTER", HeaderValue::from("R"))],
    );
    let info = get_header_info(&file, None).unwrap();
    let keys: Vec<&str> = info.iter().map(|(k, _)| k.as_str()).collect();
    assert!(keys.contains(&"NAXIS1"));
    assert!(keys.contains(&"FILTER"));
}

#[test]
fn test_observation_log_rows_and_csv() {
    let dir = tempdir().unwrap();
    let first = write_frame(
        dir.path(),
        "obs1.fits",
        &flat_image(4, 4, 0.0),
        &[
            ("OBJECT", HeaderValue::from("HAT-P-7")),
            ("FILTER", HeaderValue::from("V")),
            ("EXPTIME", HeaderValue::from(30.0)),
            ("AIRMASS", HeaderValue::from(1.25)),
            ("DATE-OBS", HeaderValue::from("2024-06-01T03:14:15")),
        ],
    );
    let second = write_frame(dir.path(), "obs2.fits", &flat_image(4, 4, 0.0), &[]);
    let csv_path = dir.path().join("log.csv");

    let records = create_observation_log(&[first, second], Some(&csv_path)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].object.as_deref(), Some("HAT-P-7"));
    assert_eq!(records[0].exptime, Some(LogValue::Number(30.0)));
    assert_eq!(records[0].filename, "obs1.fits");
    assert_eq!(records[1].filter, None);
    assert_eq!(records[1].airmass, None);

    let text = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("OBJECT,FILTER,EXPTIME,AIRMASS,DATE-OBS,filename"));
    assert_eq!(lines.next(), Some("HAT-P-7,V,30.0,1.25,2024-06-01T03:14:15,obs1.fits"));
    assert_eq!(lines.next(), Some(",,,,,obs2.fits"));
}

#[test]
fn test_non_numeric_exposure_kept_as_text() {
    let dir = tempdir().unwrap();
    let file = write_frame(
        dir.path(),
        "odd.fits",
        &flat_image(2, 2, 0.0),
        &[
            ("EXPTIME", HeaderValue::from("unknown")),
            ("AIRMASS", HeaderValue::from("1.5")),
        ],
    );
    let csv_path = dir.path().join("log.csv");

    let records = create_observation_log(&[file], Some(&csv_path)).unwrap();
    assert_eq!(records[0].exptime, Some(LogValue::Text("unknown".into())));
    assert_eq!(records[0].airmass.as_ref().and_then(LogValue::as_f64), Some(1.5));

    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(text.lines().nth(1), Some(",,unknown,1.5,,odd.fits"));
}

#[test]
fn test_observation_log_without_csv() {
    let dir = tempdir().unwrap();
    let file = write_frame(dir.path(), "x.fits", &flat_image(2, 2, 0.0), &[]);
    let records = create_observation_log(&[file], None).unwrap();
    assert_eq!(records.len(), 1);
    assert!(!dir.path().join("log.csv").exists());
}
