use std::collections::BTreeMap;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::frame::Position;
use crate::stats::median;

use super::aperture::{measure_position, ApertureRadii};

/// A photometric standard with catalog magnitudes per filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardStar {
    pub name: String,
    #[serde(default)]
    pub ra: f64,
    #[serde(default)]
    pub dec: f64,
    pub position: Position,
    /// Catalog magnitude keyed by filter name (e.g. `"V"`).
    #[serde(default)]
    pub magnitudes: BTreeMap<String, f64>,
}

/// Magnitude offset between catalog and instrumental scale for one filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZeroPoint {
    pub filter: String,
    pub zero_point: f64,
    pub n_stars: usize,
}

/// Zero point of `filter` from the standards visible in `data`: the median
/// of `catalog - instrumental` over stars with a catalog magnitude in that
/// filter and a finite instrumental magnitude. NaN when no star qualifies.
pub fn compute_zero_point(
    data: &Array2<f64>,
    filter: &str,
    stars: &[StandardStar],
    radii: &ApertureRadii,
) -> ZeroPoint {
    let offsets: Vec<f64> = stars
        .iter()
        .filter_map(|star| {
            let catalog = *star.magnitudes.get(filter)?;
            let m = measure_position(data, star.position, radii);
            m.is_valid().then(|| catalog - m.mag)
        })
        .collect();

    let n_stars = offsets.len();
    if n_stars == 0 {
        warn!(filter, "No usable standard stars for zero point");
    }
    let zero_point = median(offsets);
    info!(filter, zero_point, n_stars, "Zero point computed");

    ZeroPoint {
        filter: filter.to_string(),
        zero_point,
        n_stars,
    }
}

/// Write zero points as CSV with columns `filter,zero_point,n_stars`.
pub fn write_zero_points_csv(path: &Path, zero_points: &[ZeroPoint]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for zp in zero_points {
        writer.serialize(zp)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_point_from_known_star() {
        let mut data = Array2::<f64>::from_elem((60, 60), 10.0);
        data[[30, 30]] += 1000.0;
        let star = StandardStar {
            name: "S1".into(),
            ra: 0.0,
            dec: 0.0,
            position: Position::new(30.0, 30.0),
            magnitudes: BTreeMap::from([("V".to_string(), 12.0)]),
        };
        let radii = ApertureRadii::new(5.0, 8.0, 12.0);
        let zp = compute_zero_point(&data, "V", &[star.clone()], &radii);
        assert_eq!(zp.n_stars, 1);
        // instrumental = -2.5 log10(1000) = -7.5
        assert!((zp.zero_point - 19.5).abs() < 1e-9);

        let none = compute_zero_point(&data, "B", &[star], &radii);
        assert_eq!(none.n_stars, 0);
        assert!(none.zero_point.is_nan());
    }
}
