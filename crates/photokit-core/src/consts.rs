/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Length of a single FITS header card.
pub const FITS_CARD_SIZE: usize = 80;

/// Decimal places used when writing floating-point header values.
pub const FITS_FLOAT_DECIMALS: i32 = 15;

/// Default clipping threshold (in standard deviations) for sigma-clipped stats.
pub const DEFAULT_CLIP_SIGMA: f64 = 3.0;

/// Maximum number of clipping passes for sigma-clipped stats.
pub const DEFAULT_CLIP_ITERATIONS: usize = 5;

/// Default source FWHM in pixels.
pub const DEFAULT_FWHM: f64 = 5.0;

/// Default detection threshold in units of background standard deviation.
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 5.0;

/// Kernel half-extent in units of the Gaussian sigma (DAOFIND `sigma_radius`).
pub const DAOFIND_SIGMA_RADIUS: f64 = 1.5;

/// Accepted sharpness range for detected sources.
pub const DEFAULT_SHARP_LOW: f64 = 0.2;
pub const DEFAULT_SHARP_HIGH: f64 = 1.0;

/// Accepted roundness range for detected sources.
pub const DEFAULT_ROUND_LOW: f64 = -1.0;
pub const DEFAULT_ROUND_HIGH: f64 = 1.0;

/// Default aperture radius in pixels.
pub const DEFAULT_APERTURE_RADIUS: f64 = 10.0;

/// Default inner radius of the background annulus in pixels.
pub const DEFAULT_ANNULUS_INNER: f64 = 15.0;

/// Default outer radius of the background annulus in pixels.
pub const DEFAULT_ANNULUS_OUTER: f64 = 20.0;

/// Julian Date of the Unix epoch (1970-01-01T00:00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Offset between Julian Date and Modified Julian Date.
pub const MJD_OFFSET: f64 = 2_400_000.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Lower display bound in standard deviations below the median.
pub const DISPLAY_SIGMA_LOW: f64 = 2.0;

/// Upper display bound in standard deviations above the median.
pub const DISPLAY_SIGMA_HIGH: f64 = 5.0;

/// Keywords collected for every frame in the observation log.
pub const OBSLOG_KEYWORDS: [&str; 5] = ["OBJECT", "FILTER", "EXPTIME", "AIRMASS", "DATE-OBS"];
