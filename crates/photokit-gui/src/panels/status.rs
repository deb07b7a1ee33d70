use crate::app::PhotokitApp;
use crate::state::View;

pub fn show(ctx: &egui::Context, app: &mut PhotokitApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area: fixed height for 4 lines, scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    // Reserve space for 4 empty lines to prevent layout jump.
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        ui.horizontal(|ui| {
            let image = match app.view {
                View::Standard => Some(&app.standard.image),
                View::Cluster => Some(app.cluster.image()),
                View::Grid | View::LightCurve => None,
            };
            if let Some(image) = image {
                if let Some(size) = image.image_size() {
                    ui.label(format!("{}x{}", size[0], size[1]));
                    ui.separator();
                }
                ui.label(format!("Zoom: {:.0}%", image.zoom * 100.0));
            }
            if let Some((pos, value)) = app.ui_state.hover {
                ui.separator();
                ui.label(format!("x {:.1}  y {:.1}  value {value:.1}", pos.x, pos.y));
            }
        });

        ui.add_space(2.0);
    });
}
