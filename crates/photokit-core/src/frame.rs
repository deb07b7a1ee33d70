use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::io::header::Header;

/// A single calibrated or raw CCD image.
///
/// Pixel data is stored row-major with shape `(height, width)`; row index is
/// the y coordinate and column index is x. Pixel `(x, y)` covers the square
/// `[x-0.5, x+0.5] x [y-0.5, y+0.5]`.
#[derive(Clone, Debug)]
pub struct Frame {
    pub data: Array2<f64>,
    pub header: Header,
}

impl Frame {
    pub fn new(data: Array2<f64>) -> Self {
        Self {
            data,
            header: Header::new(),
        }
    }

    pub fn with_header(data: Array2<f64>, header: Header) -> Self {
        Self { data, header }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// `(height, width)`, matching `Array2::dim`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Copy out the window of `half_size` pixels around `center`, clipped to
    /// the image bounds.
    pub fn cutout(&self, center: Position, half_size: usize) -> Cutout {
        let (h, w) = self.shape();
        let cx = center.x.round().max(0.0) as usize;
        let cy = center.y.round().max(0.0) as usize;
        let x0 = cx.saturating_sub(half_size).min(w);
        let y0 = cy.saturating_sub(half_size).min(h);
        let x1 = (cx + half_size).min(w);
        let y1 = (cy + half_size).min(h);

        Cutout {
            data: self.data.slice(s![y0..y1, x0..x1]).to_owned(),
            origin_x: x0,
            origin_y: y0,
        }
    }
}

/// A rectangular piece of a frame together with its offset in the parent.
#[derive(Clone, Debug)]
pub struct Cutout {
    pub data: Array2<f64>,
    pub origin_x: usize,
    pub origin_y: usize,
}

impl Cutout {
    /// Translate a parent-frame position into cutout coordinates.
    pub fn to_local(&self, pos: Position) -> Position {
        Position::new(pos.x - self.origin_x as f64, pos.y - self.origin_y as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Pixel coordinate of a star, in image pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
