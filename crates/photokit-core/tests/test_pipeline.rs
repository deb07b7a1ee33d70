#[allow(dead_code)]
mod common;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use tempfile::tempdir;

use photokit_core::config::ProjectConfig;
use photokit_core::error::PhotoError;
use photokit_core::frame::Position;
use photokit_core::io::{load_fits, HeaderValue};
use photokit_core::lightcurve::{LightCurve, TimeUnit};
use photokit_core::photometry::StandardStar;
use photokit_core::pipeline::{run_reduction, run_reduction_reported, PipelineStage, ProgressReporter};

use common::{add_star, flat_image, write_frame};

const BIAS: f64 = 300.0;

/// Lay out a small night: 3 bias, 3 flats and 4 science frames with a
/// target at (30, 30) and a comparison at (70, 70).
fn make_night(root: &Path) -> ProjectConfig {
    let raw = root.join("raw");
    let cal = root.join("cal");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::create_dir_all(&cal).unwrap();

    for i in 0..3 {
        write_frame(&cal, &format!("bias{i}.fits"), &flat_image(100, 100, BIAS), &[]);
        write_frame(&cal, &format!("flat{i}.fits"), &flat_image(100, 100, BIAS + 20_000.0), &[]);
    }
    for i in 0..4 {
        let mut sky = flat_image(100, 100, BIAS + 150.0);
        add_star(&mut sky, 30.0, 30.0, 4.0, 8_000.0);
        add_star(&mut sky, 70.0, 70.0, 4.0, 16_000.0);
        write_frame(
            &raw,
            &format!("sci{i}.fits"),
            &sky,
            &[
                ("JD", HeaderValue::from(2459000.5 + i as f64 * 0.01)),
                ("FILTER", HeaderValue::from(if i % 2 == 0 { "V" } else { "B" })),
            ],
        );
    }

    let mut config = ProjectConfig::default();
    config.paths.raw_dir = raw;
    config.paths.calibration_dir = cal;
    config.paths.reduced_dir = root.join("reduced");
    config.patterns.science = "sci*.fits".into();
    config.observation.target_position = Position::new(30.0, 30.0);
    config.observation.comparison_positions = vec![Position::new(70.0, 70.0)];
    config.output.light_curve_file = root.join("out").join("lightcurve.csv");
    config.output.calibration_file = root.join("out").join("zero_points.csv");
    config
}

#[test]
fn test_full_run() {
    let dir = tempdir().unwrap();
    let config = make_night(dir.path());

    let summary = run_reduction(&config).unwrap();
    assert_eq!(summary.bias_frames, 3);
    assert_eq!(summary.flat_frames, 3);
    assert_eq!(summary.science_frames, 4);
    assert_eq!(summary.reduced_files.len(), 4);
    assert!(summary.zero_points.is_empty());

    let master_bias = load_fits(summary.master_bias.as_ref().unwrap()).unwrap();
    assert!(master_bias.data.iter().all(|&v| v == BIAS));
    assert!(config.paths.calibration_dir.join("master_bias.png").exists());
    let master_flat = load_fits(summary.master_flat.as_ref().unwrap()).unwrap();
    assert!(master_flat.data.iter().all(|&v| (v - 1.0).abs() < 1e-12));

    let reduced = load_fits(&summary.reduced_files[0]).unwrap();
    assert!((reduced.data[[0, 0]] - 150.0).abs() < 1e-9);
    assert_eq!(reduced.header.history(), vec!["Bias subtracted", "Flat fielded"]);

    assert_eq!(summary.light_curve.len(), 4);
    for p in &summary.light_curve.points {
        assert!((p.relative_flux - 1.0).abs() < 1e-9);
        assert!((p.target_flux / p.comparison_flux - 0.5).abs() < 1e-3);
    }

    let written = LightCurve::read_csv(summary.light_curve_file.as_ref().unwrap()).unwrap();
    assert_eq!(written.len(), 4);
    assert_eq!(written.points[0].time, 2459000.5);
}

#[test]
fn test_rerun_ignores_master_frames() {
    let dir = tempdir().unwrap();
    let mut config = make_night(dir.path());
    // Science pattern that would also match the master frames.
    config.paths.raw_dir = config.paths.calibration_dir.clone();
    config.patterns.science = "*.fits".into();
    for i in 0..2 {
        write_frame(
            &config.paths.calibration_dir,
            &format!("obj{i}.fits"),
            &flat_image(100, 100, BIAS + 10.0),
            &[],
        );
    }

    run_reduction(&config).unwrap();
    let again = run_reduction(&config).unwrap();
    assert_eq!(again.science_frames, 2);
}

#[test]
fn test_mjd_output_and_no_saved_frames() {
    let dir = tempdir().unwrap();
    let mut config = make_night(dir.path());
    config.analysis.time_unit = TimeUnit::Mjd;
    config.output.save_reduced_frames = false;
    config.output.save_light_curve = false;

    let summary = run_reduction(&config).unwrap();
    assert!(summary.reduced_files.is_empty());
    assert!(!config.paths.reduced_dir.exists());
    assert!(summary.light_curve_file.is_none());
    assert!((summary.light_curve.points[0].time - 59000.0).abs() < 1e-9);
}

#[test]
fn test_missing_calibration_is_skipped() {
    let dir = tempdir().unwrap();
    let mut config = make_night(dir.path());
    config.patterns.bias = "nothing*.fits".into();
    config.patterns.flat = "nothing*.fits".into();

    let summary = run_reduction(&config).unwrap();
    assert!(summary.master_bias.is_none());
    assert!(summary.master_flat.is_none());
    let reduced = load_fits(&summary.reduced_files[0]).unwrap();
    assert!(reduced.header.history().is_empty());
}

#[test]
fn test_no_science_frames_is_error() {
    let dir = tempdir().unwrap();
    let mut config = make_night(dir.path());
    config.patterns.science = "none*.fits".into();
    assert!(matches!(run_reduction(&config), Err(PhotoError::EmptyInput(_))));
}

#[test]
fn test_zero_points_for_configured_filters() {
    let dir = tempdir().unwrap();
    let mut config = make_night(dir.path());
    config.observation.filters = vec!["V".into()];
    config.standard_stars = vec![StandardStar {
        name: "CMP".into(),
        ra: 0.0,
        dec: 0.0,
        position: Position::new(70.0, 70.0),
        magnitudes: BTreeMap::from([("V".to_string(), 14.0), ("B".to_string(), 14.5)]),
    }];

    let summary = run_reduction(&config).unwrap();
    assert_eq!(summary.zero_points.len(), 1);
    let zp = &summary.zero_points[0];
    assert_eq!(zp.filter, "V");
    assert_eq!(zp.n_stars, 1);
    // 16000 counts: instrumental -10.51, so the offset is about 24.51.
    assert!((zp.zero_point - (14.0 + 2.5 * 16_000f64.log10())).abs() < 0.01);
    assert!(summary.calibration_file.as_ref().unwrap().exists());
}

#[derive(Default)]
struct Recorder {
    stages: Mutex<Vec<PipelineStage>>,
    advances: Mutex<usize>,
}

impl ProgressReporter for Recorder {
    fn begin_stage(&self, stage: PipelineStage, _total: Option<usize>) {
        self.stages.lock().unwrap().push(stage);
    }

    fn advance(&self, _done: usize) {
        *self.advances.lock().unwrap() += 1;
    }
}

#[test]
fn test_reporter_sees_every_stage() {
    let dir = tempdir().unwrap();
    let config = make_night(dir.path());
    let recorder = Recorder::default();

    run_reduction_reported(&config, &recorder).unwrap();
    assert_eq!(
        *recorder.stages.lock().unwrap(),
        vec![
            PipelineStage::Discovering,
            PipelineStage::MasterBias,
            PipelineStage::MasterFlat,
            PipelineStage::Reducing,
            PipelineStage::Writing,
        ]
    );
    assert_eq!(*recorder.advances.lock().unwrap(), 4);
}
