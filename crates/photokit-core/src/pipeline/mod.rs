mod orchestrator;
mod types;

pub use orchestrator::{run_reduction, run_reduction_reported};
pub use types::{PipelineStage, ProgressReporter, ReductionSummary};
