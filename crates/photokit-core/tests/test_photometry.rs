#[allow(dead_code)]
mod common;

use std::collections::BTreeMap;
use std::f64::consts::PI;

use approx::assert_abs_diff_eq;

use photokit_core::frame::Position;
use photokit_core::photometry::aperture::{annulus_sum, circular_sum};
use photokit_core::photometry::{
    calculate_color_index, color_index_series, compute_zero_point, instrumental_magnitude,
    measure_aperture_photometry, write_zero_points_csv, ApertureRadii, StandardStar, ZeroPoint,
};

use common::{add_star, flat_image};

// ---------------------------------------------------------------------------
// Aperture geometry
// ---------------------------------------------------------------------------

#[test]
fn test_circular_sum_of_ones_is_area() {
    let ones = flat_image(60, 60, 1.0);
    for &(x, y, r) in &[(30.0, 30.0, 5.0), (29.5, 30.25, 7.3), (31.2, 28.9, 2.0)] {
        let sum = circular_sum(&ones, Position::new(x, y), r);
        assert!(
            (sum - PI * r * r).abs() < 1e-9,
            "r={r}: sum {sum} vs area {}",
            PI * r * r
        );
    }
}

#[test]
fn test_annulus_sum_of_ones_is_ring_area() {
    let ones = flat_image(80, 80, 1.0);
    let sum = annulus_sum(&ones, Position::new(40.0, 40.0), 15.0, 20.0);
    assert_abs_diff_eq!(sum, PI * (400.0 - 225.0), epsilon = 1e-9);
}

#[test]
fn test_aperture_off_image_contributes_nothing() {
    let ones = flat_image(20, 20, 1.0);
    assert_eq!(circular_sum(&ones, Position::new(-50.0, -50.0), 5.0), 0.0);
    // Half of a circle centred on the left edge (x = -0.5) falls outside.
    let half = circular_sum(&ones, Position::new(-0.5, 10.0), 4.0);
    assert_abs_diff_eq!(half, PI * 8.0, epsilon = 1e-9);
}

// ---------------------------------------------------------------------------
// Measurements
// ---------------------------------------------------------------------------

#[test]
fn test_flux_independent_of_background() {
    let radii = ApertureRadii::default();
    let pos = [Position::new(50.0, 50.0)];
    let mut fluxes = Vec::new();
    for background in [0.0, 100.0, 2500.0] {
        let mut data = flat_image(100, 100, background);
        add_star(&mut data, 50.0, 50.0, 4.0, 10_000.0);
        let m = &measure_aperture_photometry(&data, &pos, &radii)[0];
        assert!((m.background_mean - background).abs() < 1e-3);
        fluxes.push(m.flux);
    }
    for f in &fluxes[1..] {
        assert!((f - fluxes[0]).abs() < 1e-6);
    }
    // Nearly all of a 4 px FWHM star lands inside r = 10.
    assert!((fluxes[0] - 10_000.0).abs() < 10.0);
}

#[test]
fn test_results_follow_input_order() {
    let mut data = flat_image(100, 100, 10.0);
    add_star(&mut data, 30.0, 30.0, 4.0, 1_000.0);
    add_star(&mut data, 70.0, 70.0, 4.0, 4_000.0);
    let positions = [Position::new(70.0, 70.0), Position::new(30.0, 30.0)];
    let results = measure_aperture_photometry(&data, &positions, &ApertureRadii::default());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].position(), positions[0]);
    assert!(results[0].flux > results[1].flux);
    // 4x brighter is 1.505 magnitudes brighter.
    assert!((results[1].mag - results[0].mag - 2.5 * 4f64.log10()).abs() < 1e-3);
}

#[test]
fn test_empty_sky_has_zero_flux() {
    let data = flat_image(60, 60, 100.0);
    let m = &measure_aperture_photometry(&data, &[Position::new(30.0, 30.0)], &ApertureRadii::default())[0];
    assert!(m.flux.abs() < 1e-6);
}

#[test]
fn test_negative_flux_is_invalid() {
    // Aperture darker than the surrounding sky.
    let mut data = flat_image(60, 60, 100.0);
    for ((r, c), v) in data.indexed_iter_mut() {
        if (r as f64 - 30.0).hypot(c as f64 - 30.0) < 5.0 {
            *v = 50.0;
        }
    }
    let m = &measure_aperture_photometry(&data, &[Position::new(30.0, 30.0)], &ApertureRadii::default())[0];
    assert!(m.flux < 0.0);
    assert!(m.mag.is_nan());
    assert!(!m.is_valid());
}

#[test]
fn test_radii_validation() {
    assert!(ApertureRadii::new(10.0, 15.0, 20.0).validate().is_ok());
    assert!(ApertureRadii::new(10.0, 10.0, 20.0).validate().is_ok());
    assert!(ApertureRadii::new(0.0, 15.0, 20.0).validate().is_err());
    assert!(ApertureRadii::new(16.0, 15.0, 20.0).validate().is_err());
    assert!(ApertureRadii::new(10.0, 20.0, 20.0).validate().is_err());
}

// ---------------------------------------------------------------------------
// Magnitudes and colors
// ---------------------------------------------------------------------------

#[test]
fn test_instrumental_magnitude() {
    assert!((instrumental_magnitude(100.0) + 5.0).abs() < 1e-12);
    assert_eq!(instrumental_magnitude(0.0), f64::INFINITY);
    assert!(instrumental_magnitude(-1.0).is_nan());
}

#[test]
fn test_color_index() {
    assert_eq!(calculate_color_index(500.0, 500.0, 0.0, 0.0), 0.0);
    // Ten times fainter in the first filter: +2.5 mag.
    assert!((calculate_color_index(100.0, 1000.0, 0.0, 0.0) - 2.5).abs() < 1e-12);
    assert!((calculate_color_index(100.0, 100.0, 25.0, 24.6) - 0.4).abs() < 1e-12);
    assert!(calculate_color_index(-1.0, 100.0, 0.0, 0.0).is_nan());
}

#[test]
fn test_color_index_series_truncates_to_shorter() {
    let colors = color_index_series(&[100.0, 1000.0, 10.0], &[100.0, 100.0], 0.0, 0.0);
    assert_eq!(colors.len(), 2);
    assert_eq!(colors[0], 0.0);
    assert!((colors[1] + 2.5).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Zero points
// ---------------------------------------------------------------------------

#[test]
fn test_zero_point_median_over_stars() {
    let mut data = flat_image(120, 120, 50.0);
    add_star(&mut data, 30.0, 30.0, 4.0, 10_000.0);
    add_star(&mut data, 90.0, 90.0, 4.0, 1_000.0);
    let radii = ApertureRadii::default();

    // Both stars obey catalog = instrumental + 25.
    let stars = vec![
        StandardStar {
            name: "A".into(),
            ra: 0.0,
            dec: 0.0,
            position: Position::new(30.0, 30.0),
            magnitudes: BTreeMap::from([("V".to_string(), 15.0)]),
        },
        StandardStar {
            name: "B".into(),
            ra: 0.0,
            dec: 0.0,
            position: Position::new(90.0, 90.0),
            magnitudes: BTreeMap::from([("V".to_string(), 17.5)]),
        },
    ];
    let zp = compute_zero_point(&data, "V", &stars, &radii);
    assert_eq!(zp.n_stars, 2);
    assert!((zp.zero_point - 25.0).abs() < 0.01);
}

#[test]
fn test_zero_point_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cal").join("zp.csv");
    let zps = vec![
        ZeroPoint {
            filter: "B".into(),
            zero_point: 24.1,
            n_stars: 3,
        },
        ZeroPoint {
            filter: "V".into(),
            zero_point: 24.6,
            n_stars: 2,
        },
    ];
    write_zero_points_csv(&path, &zps).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("filter,zero_point,n_stars"));
    assert_eq!(lines.next(), Some("B,24.1,3"));
    assert_eq!(lines.next(), Some("V,24.6,2"));
}
