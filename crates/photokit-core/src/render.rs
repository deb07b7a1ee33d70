use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use ndarray::{ArrayBase, Data, Ix2};
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CLIP_SIGMA, DISPLAY_SIGMA_HIGH, DISPLAY_SIGMA_LOW};
use crate::error::Result;
use crate::stats::sigma_clipped_stats;

/// Color map for display rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Gray,
    Viridis,
}

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gray => write!(f, "Gray"),
            Self::Viridis => write!(f, "Viridis"),
        }
    }
}

/// Anchor colors of the viridis map at evenly spaced positions.
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

impl Colormap {
    pub const ALL: [Colormap; 2] = [Colormap::Gray, Colormap::Viridis];

    /// Color for a normalized value; inputs are clamped to `[0, 1]` and NaN
    /// maps to the low end.
    pub fn color(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Gray => {
                let v = (t * 255.0).round() as u8;
                [v, v, v]
            }
            Self::Viridis => {
                let pos = t * (VIRIDIS.len() - 1) as f64;
                let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
                let frac = pos - i as f64;
                let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
                let mix = |k: usize| (a[k] as f64 + (b[k] as f64 - a[k] as f64) * frac).round() as u8;
                [mix(0), mix(1), mix(2)]
            }
        }
    }
}

/// Linear display range mapped onto the colormap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayRange {
    pub min: f64,
    pub max: f64,
}

impl DisplayRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `median - 2 sigma .. median + 5 sigma` of the sigma-clipped pixels.
    pub fn auto<S: Data<Elem = f64>>(data: &ArrayBase<S, Ix2>) -> Self {
        let stats = sigma_clipped_stats(data, DEFAULT_CLIP_SIGMA);
        Self {
            min: stats.median - DISPLAY_SIGMA_LOW * stats.std,
            max: stats.median + DISPLAY_SIGMA_HIGH * stats.std,
        }
    }

    /// Position of `value` within the range; 0 for an empty range.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            (value - self.min) / span
        } else {
            0.0
        }
    }
}

/// Render pixel data as RGB with the origin at the lower left: array row 0
/// becomes the bottom row of the image.
pub fn render_rgb<S: Data<Elem = f64>>(
    data: &ArrayBase<S, Ix2>,
    range: DisplayRange,
    cmap: Colormap,
) -> RgbImage {
    let (h, w) = data.dim();
    let mut img = RgbImage::new(w as u32, h as u32);
    for ((row, col), &v) in data.indexed_iter() {
        let color = cmap.color(range.normalize(v));
        img.put_pixel(col as u32, (h - 1 - row) as u32, Rgb(color));
    }
    img
}

/// Save a rendered preview as PNG.
pub fn save_preview<S: Data<Elem = f64>>(
    path: &Path,
    data: &ArrayBase<S, Ix2>,
    range: Option<DisplayRange>,
    cmap: Colormap,
) -> Result<()> {
    let range = range.unwrap_or_else(|| DisplayRange::auto(data));
    let img = render_rgb(data, range, cmap);
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
