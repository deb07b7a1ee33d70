use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FITS error: {0}")]
    Fits(#[from] fitsio::errors::Error),

    #[error("Invalid FITS file: {0}")]
    InvalidFits(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Shape mismatch in {file}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        file: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("{0}")]
    EmptyInput(String),

    #[error("Invalid DATE-OBS value: {0}")]
    InvalidDate(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid aperture radii: {0}")]
    InvalidRadii(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("File listing error: {0}")]
    Glob(#[from] glob::GlobError),
}

pub type Result<T> = std::result::Result<T, PhotoError>;
