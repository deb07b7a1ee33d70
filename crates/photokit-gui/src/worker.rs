use std::path::Path;
use std::sync::mpsc;

use anyhow::{Context, Result};
use photokit_core::io::load_fits;
use photokit_core::lightcurve::LightCurve;

use crate::messages::{ImageSlot, WorkerCommand, WorkerResult};

/// Start the background loader. Returns `None` if the thread cannot start.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> Option<mpsc::Sender<WorkerCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    let spawned = std::thread::Builder::new()
        .name("photokit-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        });
    if let Err(e) = spawned {
        tracing::error!("Failed to spawn worker thread: {e}");
        return None;
    }

    Some(cmd_tx)
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        let result = match cmd {
            WorkerCommand::LoadImage { slot, path } => load_image(slot, &path),
            WorkerCommand::LoadLightCurve { path } => load_light_curve(&path),
        };
        let message = result.unwrap_or_else(|e| WorkerResult::Error {
            message: format!("{e:#}"),
        });
        send(&tx, &ctx, message);
    }
}

fn load_image(slot: ImageSlot, path: &Path) -> Result<WorkerResult> {
    let frame = load_fits(path).with_context(|| format!("Failed to load {}", path.display()))?;
    tracing::info!(path = %path.display(), %slot, "Image loaded");
    Ok(WorkerResult::ImageLoaded {
        slot,
        path: path.to_path_buf(),
        frame,
    })
}

fn load_light_curve(path: &Path) -> Result<WorkerResult> {
    let curve =
        LightCurve::read_csv(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(WorkerResult::LightCurveLoaded {
        path: path.to_path_buf(),
        curve,
    })
}
