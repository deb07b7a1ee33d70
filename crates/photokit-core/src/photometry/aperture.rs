use std::f64::consts::PI;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ANNULUS_INNER, DEFAULT_ANNULUS_OUTER, DEFAULT_APERTURE_RADIUS};
use crate::error::{PhotoError, Result};
use crate::frame::Position;

use super::color::instrumental_magnitude;
use super::overlap::pixel_fraction;

/// Aperture and sky-annulus radii in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApertureRadii {
    #[serde(default = "default_aperture")]
    pub aperture: f64,
    #[serde(default = "default_annulus_inner")]
    pub annulus_inner: f64,
    #[serde(default = "default_annulus_outer")]
    pub annulus_outer: f64,
}

fn default_aperture() -> f64 {
    DEFAULT_APERTURE_RADIUS
}
fn default_annulus_inner() -> f64 {
    DEFAULT_ANNULUS_INNER
}
fn default_annulus_outer() -> f64 {
    DEFAULT_ANNULUS_OUTER
}

impl Default for ApertureRadii {
    fn default() -> Self {
        Self {
            aperture: DEFAULT_APERTURE_RADIUS,
            annulus_inner: DEFAULT_ANNULUS_INNER,
            annulus_outer: DEFAULT_ANNULUS_OUTER,
        }
    }
}

impl ApertureRadii {
    pub fn new(aperture: f64, annulus_inner: f64, annulus_outer: f64) -> Self {
        Self {
            aperture,
            annulus_inner,
            annulus_outer,
        }
    }

    /// Check `0 < aperture <= annulus_inner < annulus_outer`.
    ///
    /// Measurement itself never calls this; it is meant for user-facing input.
    pub fn validate(&self) -> Result<()> {
        let ok = self.aperture > 0.0
            && self.annulus_inner >= self.aperture
            && self.annulus_outer > self.annulus_inner
            && self.annulus_outer.is_finite();
        if ok {
            Ok(())
        } else {
            Err(PhotoError::InvalidRadii(format!(
                "need 0 < aperture <= inner < outer, got {} / {} / {}",
                self.aperture, self.annulus_inner, self.annulus_outer
            )))
        }
    }

    pub fn aperture_area(&self) -> f64 {
        PI * self.aperture * self.aperture
    }

    pub fn annulus_area(&self) -> f64 {
        PI * (self.annulus_outer * self.annulus_outer - self.annulus_inner * self.annulus_inner)
    }
}

/// Photometry of one position in one image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApertureMeasurement {
    pub x: f64,
    pub y: f64,
    pub aperture_sum: f64,
    pub annulus_sum: f64,
    /// Mean sky level per pixel from the annulus.
    pub background_mean: f64,
    /// Sky contribution scaled to the aperture area.
    pub background_sum: f64,
    /// Background-subtracted flux.
    pub flux: f64,
    /// `-2.5 log10(flux)`; non-finite when the flux is not positive.
    pub mag: f64,
}

impl ApertureMeasurement {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// True when the flux is positive and the magnitude is defined.
    pub fn is_valid(&self) -> bool {
        self.flux > 0.0 && self.mag.is_finite()
    }
}

/// Sum of pixel values weighted by their exact overlap with the circle of
/// radius `r`. Pixels outside the image contribute nothing.
pub fn circular_sum(data: &Array2<f64>, center: Position, r: f64) -> f64 {
    weighted_sum(data, center, r, |dx, dy| pixel_fraction(dx, dy, r))
}

/// Weighted sum over the ring between `r_inner` and `r_outer`.
pub fn annulus_sum(data: &Array2<f64>, center: Position, r_inner: f64, r_outer: f64) -> f64 {
    weighted_sum(data, center, r_outer, |dx, dy| {
        pixel_fraction(dx, dy, r_outer) - pixel_fraction(dx, dy, r_inner)
    })
}

fn weighted_sum(
    data: &Array2<f64>,
    center: Position,
    extent: f64,
    weight: impl Fn(f64, f64) -> f64,
) -> f64 {
    let (h, w) = data.dim();
    if h == 0 || w == 0 || extent.is_nan() || extent <= 0.0 {
        return 0.0;
    }

    let x_lo = (center.x - extent - 0.5).ceil().max(0.0);
    let y_lo = (center.y - extent - 0.5).ceil().max(0.0);
    let x_hi = (center.x + extent + 0.5).floor().min((w - 1) as f64);
    let y_hi = (center.y + extent + 0.5).floor().min((h - 1) as f64);
    if x_lo > x_hi || y_lo > y_hi {
        return 0.0;
    }

    let mut sum = 0.0;
    for row in y_lo as usize..=y_hi as usize {
        for col in x_lo as usize..=x_hi as usize {
            let frac = weight(col as f64 - center.x, row as f64 - center.y);
            if frac > 0.0 {
                sum += frac * data[[row, col]];
            }
        }
    }
    sum
}

/// Measure one star: aperture sum, annulus background, flux and magnitude.
pub fn measure_position(
    data: &Array2<f64>,
    position: Position,
    radii: &ApertureRadii,
) -> ApertureMeasurement {
    let aperture_sum = circular_sum(data, position, radii.aperture);
    let annulus_sum = annulus_sum(data, position, radii.annulus_inner, radii.annulus_outer);

    let background_mean = annulus_sum / radii.annulus_area();
    let background_sum = background_mean * radii.aperture_area();
    let flux = aperture_sum - background_sum;

    ApertureMeasurement {
        x: position.x,
        y: position.y,
        aperture_sum,
        annulus_sum,
        background_mean,
        background_sum,
        flux,
        mag: instrumental_magnitude(flux),
    }
}

/// Aperture photometry at each position, in input order.
///
/// Radii are taken as given; see [`ApertureRadii::validate`].
pub fn measure_aperture_photometry(
    data: &Array2<f64>,
    positions: &[Position],
    radii: &ApertureRadii,
) -> Vec<ApertureMeasurement> {
    positions
        .iter()
        .map(|&p| measure_position(data, p, radii))
        .collect()
}

/// Write measurements as CSV with one row per position.
pub fn write_measurements_csv(path: &Path, measurements: &[ApertureMeasurement]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for m in measurements {
        writer.serialize(m)?;
    }
    writer.flush()?;
    Ok(())
}
