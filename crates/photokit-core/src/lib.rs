pub mod calibration;
pub mod config;
pub mod consts;
pub mod detection;
pub mod error;
pub mod frame;
pub mod io;
pub mod lightcurve;
pub mod obslog;
pub mod photometry;
pub mod pipeline;
pub mod reduce;
pub mod render;
pub mod stats;
