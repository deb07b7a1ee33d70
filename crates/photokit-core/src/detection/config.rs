use serde::{Deserialize, Serialize};

use crate::consts::{
    DAOFIND_SIGMA_RADIUS, DEFAULT_DETECTION_THRESHOLD, DEFAULT_FWHM, DEFAULT_ROUND_HIGH,
    DEFAULT_ROUND_LOW, DEFAULT_SHARP_HIGH, DEFAULT_SHARP_LOW,
};
use crate::error::{PhotoError, Result};

/// Parameters of the DAOFIND-style point-source detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Full width at half maximum of the matched Gaussian, in pixels.
    #[serde(default = "default_fwhm")]
    pub fwhm: f64,
    /// Detection threshold in units of the background standard deviation.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Kernel truncation radius in units of the Gaussian sigma.
    #[serde(default = "default_sigma_radius")]
    pub sigma_radius: f64,
    #[serde(default = "default_sharp_low")]
    pub sharp_low: f64,
    #[serde(default = "default_sharp_high")]
    pub sharp_high: f64,
    #[serde(default = "default_round_low")]
    pub round_low: f64,
    #[serde(default = "default_round_high")]
    pub round_high: f64,
}

fn default_fwhm() -> f64 {
    DEFAULT_FWHM
}
fn default_threshold() -> f64 {
    DEFAULT_DETECTION_THRESHOLD
}
fn default_sigma_radius() -> f64 {
    DAOFIND_SIGMA_RADIUS
}
fn default_sharp_low() -> f64 {
    DEFAULT_SHARP_LOW
}
fn default_sharp_high() -> f64 {
    DEFAULT_SHARP_HIGH
}
fn default_round_low() -> f64 {
    DEFAULT_ROUND_LOW
}
fn default_round_high() -> f64 {
    DEFAULT_ROUND_HIGH
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            fwhm: DEFAULT_FWHM,
            threshold: DEFAULT_DETECTION_THRESHOLD,
            sigma_radius: DAOFIND_SIGMA_RADIUS,
            sharp_low: DEFAULT_SHARP_LOW,
            sharp_high: DEFAULT_SHARP_HIGH,
            round_low: DEFAULT_ROUND_LOW,
            round_high: DEFAULT_ROUND_HIGH,
        }
    }
}

impl FinderConfig {
    pub fn new(fwhm: f64, threshold: f64) -> Self {
        Self {
            fwhm,
            threshold,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fwhm.is_nan() || self.fwhm <= 0.0 {
            return Err(PhotoError::InvalidParameter(format!(
                "FWHM must be positive, got {}",
                self.fwhm
            )));
        }
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(PhotoError::InvalidParameter(format!(
                "Threshold must be non-negative, got {}",
                self.threshold
            )));
        }
        if self.sigma_radius.is_nan() || self.sigma_radius <= 0.0 {
            return Err(PhotoError::InvalidParameter(
                "Sigma radius must be positive".into(),
            ));
        }
        Ok(())
    }
}
