use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;
use serde::Serialize;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::Result;

use super::config::FinderConfig;
use super::kernel::GaussianKernel;

/// A detected point source, with DAOFIND-style shape statistics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Source {
    pub id: usize,
    pub xcentroid: f64,
    pub ycentroid: f64,
    pub sharpness: f64,
    pub roundness1: f64,
    pub roundness2: f64,
    pub npix: usize,
    pub sky: f64,
    pub peak: f64,
    pub flux: f64,
    pub mag: f64,
}

/// Matched-filter point source finder.
///
/// Expects background-subtracted data; the threshold is in data units.
pub struct DaoFinder {
    config: FinderConfig,
    kernel: GaussianKernel,
    threshold_eff: f64,
}

impl DaoFinder {
    /// `threshold` is an absolute level above zero in data units.
    pub fn new(config: FinderConfig, threshold: f64) -> Result<Self> {
        config.validate()?;
        let kernel = GaussianKernel::new(config.fwhm, config.sigma_radius);
        let threshold_eff = threshold * kernel.relerr;
        Ok(Self {
            config,
            kernel,
            threshold_eff,
        })
    }

    pub fn find(&self, data: &Array2<f64>) -> Vec<Source> {
        let convolved = convolve(data, &self.kernel.data);
        let peaks = self.find_peaks(&convolved);

        let mut sources: Vec<Source> = peaks
            .into_iter()
            .filter_map(|(x, y)| self.measure(data, &convolved, x, y))
            .filter(|s| self.accept(s))
            .collect();

        for (i, source) in sources.iter_mut().enumerate() {
            source.id = i + 1;
        }
        sources
    }

    /// Local maxima above the effective threshold, in scan order. On a flat
    /// top the first pixel in scan order is the peak.
    fn find_peaks(&self, convolved: &Array2<f64>) -> Vec<(usize, usize)> {
        let (h, w) = convolved.dim();
        let r = self.kernel.radius;
        let mut peaks = Vec::new();

        for y in 0..h {
            for x in 0..w {
                let value = convolved[[y, x]];
                if value <= self.threshold_eff {
                    continue;
                }

                let y0 = y.saturating_sub(r);
                let x0 = x.saturating_sub(r);
                let y1 = (y + r).min(h - 1);
                let x1 = (x + r).min(w - 1);

                let is_peak = (y0..=y1).all(|ny| {
                    (x0..=x1).all(|nx| {
                        let other = convolved[[ny, nx]];
                        if (ny, nx) < (y, x) {
                            other < value
                        } else {
                            (ny, nx) == (y, x) || other <= value
                        }
                    })
                });
                if is_peak {
                    peaks.push((x, y));
                }
            }
        }

        peaks
    }

    fn measure(
        &self,
        data: &Array2<f64>,
        convolved: &Array2<f64>,
        x: usize,
        y: usize,
    ) -> Option<Source> {
        let r = self.kernel.radius;
        let data_cut = window(data, x, y, r)?;
        let conv_cut = window(convolved, x, y, r)?;

        let peak = data_cut[[r, r]];
        let conv_peak = conv_cut[[r, r]];

        let masked_sum: f64 = data_cut
            .iter()
            .zip(self.kernel.mask.iter())
            .filter(|(_, &m)| m)
            .map(|(d, _)| d)
            .sum();
        let others_mean = (masked_sum - peak) / (self.kernel.npixels - 1) as f64;
        let sharpness = (peak - others_mean) / conv_peak;

        let roundness1 = self.roundness1(&conv_cut);

        let (dx, hx) = self.marginal_fit(&data_cut, Axis(0))?;
        let (dy, hy) = self.marginal_fit(&data_cut, Axis(1))?;
        let roundness2 = 2.0 * (hx - hy) / (hx + hy);

        let flux = masked_sum;
        Some(Source {
            id: 0,
            xcentroid: x as f64 + dx,
            ycentroid: y as f64 + dy,
            sharpness,
            roundness1,
            roundness2,
            npix: self.kernel.npixels,
            sky: 0.0,
            peak,
            flux,
            mag: -2.5 * flux.log10(),
        })
    }

    /// Symmetry-based roundness from quadrant sums of the convolved cutout.
    fn roundness1(&self, conv_cut: &ArrayView2<f64>) -> f64 {
        let c = self.kernel.radius;
        let mut cut = conv_cut.to_owned();
        cut[[c, c]] = 0.0;

        let quad1: f64 = cut.slice(s![..=c, c + 1..]).sum();
        let quad2: f64 = cut.slice(s![..c, ..=c]).sum();
        let quad3: f64 = cut.slice(s![c.., ..c]).sum();
        let quad4: f64 = cut.slice(s![c + 1.., c..]).sum();

        let sum2 = -quad1 + quad2 - quad3 + quad4;
        let sum4: f64 = cut.iter().map(|v| v.abs()).sum();
        if sum4 == 0.0 {
            0.0
        } else {
            2.0 * sum2 / sum4
        }
    }

    /// Fit `sky + h * kernel` to the weighted marginal distribution along
    /// one axis. Returns the centroid shift and the fitted amplitude, or
    /// `None` when the amplitude is not positive.
    ///
    /// `Axis(0)` collapses rows and yields the x marginal.
    fn marginal_fit(&self, data_cut: &ArrayView2<f64>, collapse: Axis) -> Option<(f64, f64)> {
        let c = self.kernel.radius;
        let n = self.kernel.size();
        let wt: Array1<f64> = (0..n)
            .map(|i| c as f64 - (i as f64 - c as f64).abs() + 1.0)
            .collect();

        let weighted = |img: ArrayView2<f64>| -> Array1<f64> {
            let mut out = Array1::<f64>::zeros(n);
            for ((row, col), v) in img.indexed_iter() {
                let (along, across) = if collapse == Axis(0) { (col, row) } else { (row, col) };
                out[along] += v * wt[across];
            }
            out
        };

        let kern = weighted(self.kernel.gaussian.view());
        let marg = weighted(data_cut.view());

        let wt_sum = wt.sum();
        let kern_sum: f64 = (&kern * &wt).sum();
        let kern2_sum: f64 = (&kern * &kern * &wt).sum();
        let data_sum: f64 = (&marg * &wt).sum();
        let data_kern_sum: f64 = (&marg * &kern * &wt).sum();

        let h_numer = data_kern_sum - data_sum * kern_sum / wt_sum;
        let h_denom = kern2_sum - kern_sum * kern_sum / wt_sum;
        if h_numer <= 0.0 || h_denom <= 0.0 {
            return None;
        }
        let amplitude = h_numer / h_denom;
        let sky = (data_sum - amplitude * kern_sum) / wt_sum;

        let mut moment = 0.0;
        let mut total = 0.0;
        for i in 0..n {
            let v = (marg[i] - sky) * wt[i];
            moment += v * (i as f64 - c as f64);
            total += v;
        }
        let mut shift = if total > 0.0 { moment / total } else { 0.0 };
        if !shift.is_finite() || shift.abs() > n as f64 / 2.0 {
            shift = 0.0;
        }

        Some((shift, amplitude))
    }

    fn accept(&self, s: &Source) -> bool {
        let cfg = &self.config;
        s.sharpness >= cfg.sharp_low
            && s.sharpness <= cfg.sharp_high
            && s.roundness1 >= cfg.round_low
            && s.roundness1 <= cfg.round_high
            && s.roundness2 >= cfg.round_low
            && s.roundness2 <= cfg.round_high
            && s.xcentroid.is_finite()
            && s.ycentroid.is_finite()
            && s.flux.is_finite()
    }
}

/// Square window of half-size `r` around `(x, y)`, or `None` if it would
/// leave the image.
fn window(data: &Array2<f64>, x: usize, y: usize, r: usize) -> Option<ArrayView2<'_, f64>> {
    let (h, w) = data.dim();
    if x < r || y < r || x + r >= w || y + r >= h {
        return None;
    }
    Some(data.slice(s![y - r..=y + r, x - r..=x + r]))
}

/// Direct 2D correlation with zero padding. Row-parallel for large images.
fn convolve(data: &Array2<f64>, kernel: &Array2<f64>) -> Array2<f64> {
    let (h, w) = data.dim();
    let (kh, kw) = kernel.dim();
    let (ph, pw) = (kh / 2, kw / 2);

    let row_at = |y: usize| -> Vec<f64> {
        let mut out = vec![0.0; w];
        for (x, result) in out.iter_mut().enumerate() {
            let mut sum = 0.0;
            for ky in 0..kh {
                let Some(sy) = (y + ky).checked_sub(ph).filter(|&sy| sy < h) else {
                    continue;
                };
                for kx in 0..kw {
                    let Some(sx) = (x + kx).checked_sub(pw).filter(|&sx| sx < w) else {
                        continue;
                    };
                    sum += data[[sy, sx]] * kernel[[ky, kx]];
                }
            }
            *result = sum;
        }
        out
    };

    let rows: Vec<Vec<f64>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(row_at).collect()
    } else {
        (0..h).map(row_at).collect()
    };

    let mut result = Array2::<f64>::zeros((h, w));
    for (y, row) in rows.into_iter().enumerate() {
        for (x, v) in row.into_iter().enumerate() {
            result[[y, x]] = v;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian_star(size: usize, cx: f64, cy: f64, sigma: f64, amp: f64) -> Array2<f64> {
        Array2::from_shape_fn((size, size), |(y, x)| {
            let r2 = (x as f64 - cx).powi(2) + (y as f64 - cy).powi(2);
            amp * (-r2 / (2.0 * sigma * sigma)).exp()
        })
    }

    #[test]
    fn test_single_star_centroid() {
        let data = gaussian_star(50, 25.3, 24.6, 2.0, 100.0);
        let finder = DaoFinder::new(FinderConfig::new(4.7, 0.0), 10.0).unwrap();
        let sources = finder.find(&data);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, 1);
        assert!((sources[0].xcentroid - 25.3).abs() < 0.5);
        assert!((sources[0].ycentroid - 24.6).abs() < 0.5);
    }

    #[test]
    fn test_zero_image_has_no_sources() {
        let data = Array2::<f64>::zeros((40, 40));
        let finder = DaoFinder::new(FinderConfig::default(), 1.0).unwrap();
        assert!(finder.find(&data).is_empty());
    }

    #[test]
    fn test_flat_topped_peak_is_kept_once() {
        let mut convolved = Array2::<f64>::zeros((30, 30));
        convolved.slice_mut(s![14..16, 12..15]).fill(50.0);
        convolved[[5, 5]] = 20.0;
        convolved[[5, 6]] = 20.0;
        let finder = DaoFinder::new(FinderConfig::default(), 1.0).unwrap();
        assert_eq!(finder.find_peaks(&convolved), vec![(5, 5), (12, 14)]);
    }

    #[test]
    fn test_invalid_fwhm_rejected() {
        assert!(DaoFinder::new(FinderConfig::new(0.0, 5.0), 1.0).is_err());
    }
}
