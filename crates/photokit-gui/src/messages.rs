use std::path::PathBuf;

use photokit_core::frame::Frame;
use photokit_core::lightcurve::LightCurve;

/// Which image a load request is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSlot {
    Standard,
    ClusterV,
    ClusterI,
}

impl std::fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard star"),
            Self::ClusterV => write!(f, "cluster V"),
            Self::ClusterI => write!(f, "cluster I"),
        }
    }
}

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    LoadImage { slot: ImageSlot, path: PathBuf },
    LoadLightCurve { path: PathBuf },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    ImageLoaded {
        slot: ImageSlot,
        path: PathBuf,
        frame: Frame,
    },
    LightCurveLoaded {
        path: PathBuf,
        curve: LightCurve,
    },
    Error {
        message: String,
    },
}
