use std::path::PathBuf;

use crate::lightcurve::LightCurve;
use crate::photometry::ZeroPoint;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Discovering,
    MasterBias,
    MasterFlat,
    Reducing,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovering => write!(f, "Finding files"),
            Self::MasterBias => write!(f, "Building master bias"),
            Self::MasterFlat => write!(f, "Building master flat"),
            Self::Reducing => write!(f, "Reducing and measuring"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// What a pipeline run produced.
#[derive(Clone, Debug, Default)]
pub struct ReductionSummary {
    pub bias_frames: usize,
    pub flat_frames: usize,
    pub science_frames: usize,
    pub master_bias: Option<PathBuf>,
    pub master_flat: Option<PathBuf>,
    pub reduced_files: Vec<PathBuf>,
    pub light_curve: LightCurve,
    pub light_curve_file: Option<PathBuf>,
    pub zero_points: Vec<ZeroPoint>,
    pub calibration_file: Option<PathBuf>,
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_reduction` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
