pub mod aperture;
pub mod color;
pub mod overlap;
pub mod zero_point;

pub use aperture::{
    measure_aperture_photometry, write_measurements_csv, ApertureMeasurement, ApertureRadii,
};
pub use color::{calculate_color_index, color_index_series, instrumental_magnitude};
pub use zero_point::{compute_zero_point, write_zero_points_csv, StandardStar, ZeroPoint};
