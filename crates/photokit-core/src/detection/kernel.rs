use ndarray::Array2;

/// Circular Gaussian matched filter, normalized to zero sum over its mask.
#[derive(Clone, Debug)]
pub(crate) struct GaussianKernel {
    /// Zero-sum kernel used for convolution.
    pub data: Array2<f64>,
    /// Pixels that belong to the kernel footprint.
    pub mask: Array2<bool>,
    /// Unnormalized Gaussian values inside the mask.
    pub gaussian: Array2<f64>,
    pub radius: usize,
    pub npixels: usize,
    /// Converts a threshold in data units to one in convolved units.
    pub relerr: f64,
}

impl GaussianKernel {
    pub fn new(fwhm: f64, sigma_radius: f64) -> Self {
        let sigma = fwhm / (2.0 * (2.0 * std::f64::consts::LN_2).sqrt());
        let a = 1.0 / (2.0 * sigma * sigma);
        let f = sigma_radius * sigma_radius / 2.0;

        let radius = ((f / a).sqrt() as usize).max(2);
        let size = 2 * radius + 1;

        let mut mask = Array2::from_elem((size, size), false);
        let mut gaussian = Array2::<f64>::zeros((size, size));
        for y in 0..size {
            for x in 0..size {
                let dx = x as f64 - radius as f64;
                let dy = y as f64 - radius as f64;
                let r2 = dx * dx + dy * dy;
                let elliptical = a * r2;
                if elliptical <= f || r2.sqrt() <= 2.0 {
                    mask[[y, x]] = true;
                    gaussian[[y, x]] = (-elliptical).exp();
                }
            }
        }

        let npixels = mask.iter().filter(|&&m| m).count();
        let sum: f64 = gaussian.iter().sum();
        let sum2: f64 = gaussian.iter().map(|g| g * g).sum();
        let variance = sum2 - sum * sum / npixels as f64;
        let mean = sum / npixels as f64;

        let mut data = Array2::<f64>::zeros((size, size));
        for ((idx, &m), &g) in mask.indexed_iter().zip(gaussian.iter()) {
            if m {
                data[idx] = (g - mean) / variance;
            }
        }

        Self {
            data,
            mask,
            gaussian,
            radius,
            npixels,
            relerr: 1.0 / variance.sqrt(),
        }
    }

    pub fn size(&self) -> usize {
        2 * self.radius + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_zero_sum() {
        let k = GaussianKernel::new(5.0, 1.5);
        let sum: f64 = k.data.iter().sum();
        assert!(sum.abs() < 1e-9);
        assert_eq!(k.size(), 7);
        assert!(k.mask[[k.radius, k.radius]]);
    }

    #[test]
    fn test_small_fwhm_keeps_minimum_radius() {
        let k = GaussianKernel::new(1.0, 1.5);
        assert_eq!(k.radius, 2);
    }
}
