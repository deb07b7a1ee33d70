use egui::Color32;

use crate::app::PhotokitApp;
use crate::panels::overlay::{draw_apertures, draw_cross};
use crate::panels::viewport;

pub fn show(ctx: &egui::Context, app: &mut PhotokitApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let state = &mut app.standard;
        let range = state.range.display_range();
        let (center, radius) = (state.center, state.radius);

        let response = viewport::show_image(ui, "standard", &mut state.image, range, |painter, t| {
            if let Some(center) = center {
                draw_cross(painter, t, center, Color32::RED);
                if let Some(radius) = radius {
                    draw_apertures(painter, t, center, radius);
                }
            }
        });
        app.ui_state.hover = response.hover;
    });
}
