use std::sync::mpsc;

use crate::messages::{ImageSlot, WorkerCommand, WorkerResult};
use crate::panels;
use crate::state::{
    ClusterState, GridState, LightCurveState, StandardStarState, UIState, View,
};
use crate::worker;

pub struct PhotokitApp {
    pub cmd_tx: Option<mpsc::Sender<WorkerCommand>>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub ui_state: UIState,
    pub view: View,
    pub standard: StandardStarState,
    pub cluster: ClusterState,
    pub grid: GridState,
    pub light_curve: LightCurveState,
    pub show_about: bool,
}

impl PhotokitApp {
    pub fn new(ctx: &egui::Context) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx, ctx.clone());

        let mut ui_state = UIState::default();
        if cmd_tx.is_none() {
            ui_state.add_log("ERROR: background loader unavailable; files cannot be opened".into());
        }

        Self {
            cmd_tx,
            result_rx,
            ui_state,
            view: View::default(),
            standard: StandardStarState::default(),
            cluster: ClusterState::default(),
            grid: GridState::default(),
            light_curve: LightCurveState::default(),
            show_about: false,
        }
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::ImageLoaded { slot, path, frame } => {
                    self.ui_state.add_log(format!(
                        "Opened {slot}: {} ({}x{})",
                        path.display(),
                        frame.width(),
                        frame.height()
                    ));
                    let view = match slot {
                        ImageSlot::Standard => {
                            self.view = View::Standard;
                            &mut self.standard.image
                        }
                        ImageSlot::ClusterV => {
                            self.view = View::Cluster;
                            &mut self.cluster.v
                        }
                        ImageSlot::ClusterI => {
                            self.view = View::Cluster;
                            &mut self.cluster.i
                        }
                    };
                    view.set_frame(path, frame);
                }
                WorkerResult::LightCurveLoaded { path, curve } => {
                    self.ui_state.add_log(format!(
                        "Opened light curve: {} ({} points)",
                        path.display(),
                        curve.len()
                    ));
                    self.light_curve.path = Some(path);
                    self.light_curve.curve = Some(curve);
                    self.view = View::LightCurve;
                }
                WorkerResult::Error { message } => {
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
            }
        }
    }

    /// Cut out every recorded cluster position and switch to the grid.
    pub fn build_grid(&mut self) {
        let centers = self.cluster.clicks.positions();
        self.grid.rebuild(
            &centers,
            self.cluster.v.frame.as_ref(),
            self.cluster.i.frame.as_ref(),
        );
        self.grid.filter = self.cluster.filter;
        self.grid.range.select_filter(self.grid.filter);
        self.ui_state
            .add_log(format!("Aperture grid built from {} positions", centers.len()));
        self.view = View::Grid;
    }
}

impl eframe::App for PhotokitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        match self.view {
            View::Standard => panels::standard::show(ctx, self),
            View::Cluster => panels::cluster::show(ctx, self),
            View::Grid => panels::grid::show(ctx, self),
            View::LightCurve => panels::light_curve::show(ctx, self),
        }

        if self.show_about {
            egui::Window::new("About Photokit")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Photokit");
                        ui.label("CCD reduction and aperture photometry");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
