use egui_plot::{Plot, PlotPoints, Points};

use crate::app::PhotokitApp;
use crate::panels::helpers::show_placeholder;

pub fn show(ctx: &egui::Context, app: &mut PhotokitApp) {
    app.ui_state.hover = None;
    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(curve) = app.light_curve.curve.as_ref() else {
            show_placeholder(ui, "Open a light-curve CSV to plot it");
            return;
        };

        let points: Vec<[f64; 2]> = curve
            .points
            .iter()
            .filter(|p| p.time.is_finite() && p.relative_flux.is_finite())
            .map(|p| [p.time, p.relative_flux])
            .collect();

        Plot::new("lightcurve")
            .x_axis_label("Time")
            .y_axis_label("Relative flux")
            .show(ui, |plot_ui| {
                plot_ui.points(Points::new("relative flux", PlotPoints::from(points)).radius(2.5));
            });
    });
}
