pub mod config;
pub mod dao;
mod kernel;

use std::path::Path;

use ndarray::Array2;
use tracing::{debug, info};

use crate::consts::DEFAULT_CLIP_SIGMA;
use crate::error::Result;
use crate::stats::sigma_clipped_stats;

pub use config::FinderConfig;
pub use dao::{DaoFinder, Source};

/// Detect point sources in an image.
///
/// The background is estimated with sigma-clipped statistics; sources are
/// searched on the median-subtracted image with a detection level of
/// `threshold` times the clipped standard deviation. An empty result is a
/// valid outcome.
pub fn find_sources(data: &Array2<f64>, fwhm: f64, threshold: f64) -> Result<Vec<Source>> {
    find_sources_with(data, &FinderConfig::new(fwhm, threshold))
}

/// [`find_sources`] with full control over the finder's shape filters.
pub fn find_sources_with(data: &Array2<f64>, config: &FinderConfig) -> Result<Vec<Source>> {
    config.validate()?;

    let stats = sigma_clipped_stats(data, DEFAULT_CLIP_SIGMA);
    if !stats.median.is_finite() {
        return Ok(Vec::new());
    }
    debug!(
        mean = stats.mean,
        median = stats.median,
        std = stats.std,
        "Background statistics"
    );

    // Non-finite pixels (e.g. from a zero flat) carry no signal.
    let subtracted = data.mapv(|v| if v.is_finite() { v - stats.median } else { 0.0 });
    let finder = DaoFinder::new(config.clone(), config.threshold * stats.std)?;
    let sources = finder.find(&subtracted);

    info!(
        count = sources.len(),
        fwhm = config.fwhm,
        threshold = config.threshold,
        "Source detection complete"
    );
    Ok(sources)
}

/// Write a source table as CSV, one row per source in id order.
pub fn write_sources_csv(path: &Path, sources: &[Source]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for source in sources {
        writer.serialize(source)?;
    }
    writer.flush()?;
    Ok(())
}
