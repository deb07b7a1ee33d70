use std::str::FromStr;

use ndarray::{ArrayBase, Data, Ix2};
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CLIP_ITERATIONS, DEFAULT_CLIP_SIGMA};
use crate::error::PhotoError;

/// Median of `values`, reordering the slice in place. NaN for an empty slice.
///
/// Uses `select_nth_unstable` for O(n) selection without a full sort.
pub fn median_in_place(values: &mut [f64]) -> f64 {
    let n = values.len();
    match n {
        0 => f64::NAN,
        1 => values[0],
        _ if n % 2 == 1 => *values.select_nth_unstable_by(n / 2, |a, b| a.total_cmp(b)).1,
        _ => {
            let mid = n / 2;
            let (lower, upper, _) = values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
            let upper = *upper;
            let lower_max = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (lower_max + upper) / 2.0
        }
    }
}

/// Median of the finite values of an iterator.
pub fn median<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut buf: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    median_in_place(&mut buf)
}

/// Summary statistics of the pixels that survive sigma clipping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClippedStats {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
}

/// Iteratively reject values further than `sigma` standard deviations from
/// the median, for at most `max_iters` passes or until nothing changes.
///
/// Non-finite values are ignored. The standard deviation is the population
/// form.
pub fn sigma_clip_values(values: &[f64], sigma: f64, max_iters: usize) -> ClippedStats {
    let mut kept: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if kept.is_empty() {
        return ClippedStats {
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
        };
    }

    let mut scratch = Vec::with_capacity(kept.len());
    for _ in 0..max_iters {
        scratch.clear();
        scratch.extend_from_slice(&kept);
        let center = median_in_place(&mut scratch);
        let (_, std) = mean_std(&kept);
        let lo = center - sigma * std;
        let hi = center + sigma * std;

        let before = kept.len();
        kept.retain(|&v| v >= lo && v <= hi);
        if kept.len() == before || kept.is_empty() {
            break;
        }
    }

    if kept.is_empty() {
        return ClippedStats {
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
        };
    }

    let (mean, std) = mean_std(&kept);
    ClippedStats {
        mean,
        median: median_in_place(&mut kept),
        std,
    }
}

/// Sigma-clipped `(mean, median, std)` of an image with the default
/// five clipping passes.
pub fn sigma_clipped_stats<S: Data<Elem = f64>>(
    data: &ArrayBase<S, Ix2>,
    sigma: f64,
) -> ClippedStats {
    let values: Vec<f64> = data.iter().copied().collect();
    sigma_clip_values(&values, sigma, DEFAULT_CLIP_ITERATIONS)
}

pub(crate) fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Strategy for estimating the sky level of a whole image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMethod {
    #[default]
    Median,
    Mean,
    SigmaClipped,
}

impl std::fmt::Display for BackgroundMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Median => write!(f, "median"),
            Self::Mean => write!(f, "mean"),
            Self::SigmaClipped => write!(f, "sigma_clipped"),
        }
    }
}

impl FromStr for BackgroundMethod {
    type Err = PhotoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "median" => Ok(Self::Median),
            "mean" => Ok(Self::Mean),
            "sigma_clipped" | "sigma-clipped" => Ok(Self::SigmaClipped),
            other => Err(PhotoError::UnknownMethod(other.to_string())),
        }
    }
}

/// Single-number background estimate of an image.
pub fn estimate_background_level<S: Data<Elem = f64>>(
    data: &ArrayBase<S, Ix2>,
    method: BackgroundMethod,
) -> f64 {
    match method {
        BackgroundMethod::Median => median(data.iter().copied()),
        BackgroundMethod::Mean => {
            let finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
            mean_std(&finite).0
        }
        BackgroundMethod::SigmaClipped => sigma_clipped_stats(data, DEFAULT_CLIP_SIGMA).median,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median([3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median([4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(Vec::<f64>::new()).is_nan());
    }

    #[test]
    fn test_median_skips_nan() {
        assert_eq!(median([f64::NAN, 5.0, 1.0, 3.0]), 3.0);
    }

    #[test]
    fn test_sigma_clip_rejects_outlier() {
        let mut values = vec![10.0; 99];
        values.iter_mut().enumerate().for_each(|(i, v)| *v += (i % 3) as f64 - 1.0);
        values.push(1000.0);
        let stats = sigma_clip_values(&values, 3.0, 5);
        assert!((stats.median - 10.0).abs() < 1e-12);
        assert!((stats.mean - 10.0).abs() < 0.05);
        assert!(stats.std < 1.0);
    }

    #[test]
    fn test_background_level_methods() {
        let mut data = ndarray::Array2::from_elem((10, 10), 100.0);
        data[[0, 0]] = 10_100.0;
        assert_eq!(estimate_background_level(&data, BackgroundMethod::Median), 100.0);
        assert!((estimate_background_level(&data, BackgroundMethod::Mean) - 200.0).abs() < 1e-9);
        assert_eq!(estimate_background_level(&data, BackgroundMethod::SigmaClipped), 100.0);
    }

    #[test]
    fn test_background_method_parse() {
        assert_eq!("median".parse::<BackgroundMethod>().unwrap(), BackgroundMethod::Median);
        assert_eq!(
            "sigma_clipped".parse::<BackgroundMethod>().unwrap(),
            BackgroundMethod::SigmaClipped
        );
        assert!(matches!(
            "mode".parse::<BackgroundMethod>(),
            Err(PhotoError::UnknownMethod(_))
        ));
    }
}
