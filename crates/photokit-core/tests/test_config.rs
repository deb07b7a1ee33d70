use photokit_core::config::ProjectConfig;
use photokit_core::lightcurve::TimeUnit;
use photokit_core::render::Colormap;

#[test]
fn test_defaults() {
    let config = ProjectConfig::default();
    assert_eq!(config.photometry.aperture_radius, 10.0);
    assert_eq!(config.photometry.annulus_inner, 15.0);
    assert_eq!(config.photometry.annulus_outer, 20.0);
    assert_eq!(config.photometry.fwhm, 5.0);
    assert_eq!(config.photometry.detection_threshold, 5.0);
    assert_eq!(config.patterns.bias, "bias*.fits");
    assert_eq!(config.observation.filters, vec!["B", "V", "R"]);
    assert_eq!(config.observation.comparison_positions.len(), 3);
    assert_eq!(config.analysis.time_unit, TimeUnit::Jd);
    assert!(config.analysis.normalize_light_curve);
    assert_eq!(config.advanced.worker_threads(), 1);
    assert!(config.standard_stars.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_fills_defaults() {
    let text = r#"
        [paths]
        raw_dir = "night1/raw"

        [photometry]
        aperture_radius = 6.0

        [analysis]
        time_unit = "MJD"

        [plot]
        colormap = "viridis"

        [advanced]
        use_parallel_processing = true
        num_processes = 8
    "#;
    let config: ProjectConfig = toml::from_str(text).unwrap();
    assert_eq!(config.paths.raw_dir, std::path::PathBuf::from("night1/raw"));
    assert_eq!(config.paths.reduced_dir, std::path::PathBuf::from("data/reduced"));
    assert_eq!(config.photometry.aperture_radius, 6.0);
    assert_eq!(config.photometry.annulus_inner, 15.0);
    assert_eq!(config.analysis.time_unit, TimeUnit::Mjd);
    assert_eq!(config.plot.colormap, Colormap::Viridis);
    assert_eq!(config.advanced.worker_threads(), 8);
}

#[test]
fn test_bjd_is_rejected() {
    let text = "[analysis]\ntime_unit = \"BJD\"\n";
    assert!(toml::from_str::<ProjectConfig>(text).is_err());
}

#[test]
fn test_example_roundtrips_through_toml_and_json() {
    let example = ProjectConfig::example();
    assert_eq!(example.standard_stars.len(), 2);
    assert_eq!(example.standard_stars[0].magnitudes["V"], 13.150);

    let text = toml::to_string_pretty(&example).unwrap();
    let back: ProjectConfig = toml::from_str(&text).unwrap();
    assert_eq!(back, example);

    let json = serde_json::to_string(&example).unwrap();
    let back: ProjectConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, example);
}

#[test]
fn test_invalid_radii_fail_validation() {
    let mut config = ProjectConfig::default();
    config.photometry.annulus_inner = 5.0;
    assert!(config.validate().is_err());

    let mut config = ProjectConfig::default();
    config.photometry.fwhm = 0.0;
    assert!(config.validate().is_err());
}
