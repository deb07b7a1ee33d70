use egui::Color32;

use crate::app::PhotokitApp;
use crate::panels::overlay::draw_cross;
use crate::panels::viewport;

pub fn show(ctx: &egui::Context, app: &mut PhotokitApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let range = app.cluster.range.display_range();
        let clicks = app.cluster.clicks.positions();
        let name = format!("cluster_{}", app.cluster.filter);

        let response = viewport::show_image(ui, &name, app.cluster.image_mut(), range, |painter, t| {
            for &pos in &clicks {
                draw_cross(painter, t, pos, Color32::RED);
            }
        });
        app.ui_state.hover = response.hover;

        if let Some(pos) = response.double_clicked {
            app.cluster.clicks.push(pos);
            app.ui_state
                .add_log(format!("Recorded ({:.1}, {:.1})", pos.x, pos.y));
        }
    });
}
