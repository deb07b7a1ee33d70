use egui::{Color32, Rect};

use crate::app::PhotokitApp;
use crate::convert::ImageTransform;
use crate::panels::helpers::show_placeholder;
use crate::panels::overlay::draw_apertures;
use crate::state::{GRID_COLUMNS, GRID_VIEW_SPAN};

const MIN_CELL_SIZE: f32 = 120.0;

pub fn show(ctx: &egui::Context, app: &mut PhotokitApp) {
    app.ui_state.hover = None;
    egui::CentralPanel::default().show(ctx, |ui| {
        let grid = &mut app.grid;
        if grid.panels.is_empty() {
            show_placeholder(ui, "Double-click stars in the cluster view, then build the grid");
            return;
        }

        let spacing = ui.spacing().item_spacing.x;
        let cell = ((ui.available_width() - spacing * GRID_COLUMNS as f32) / GRID_COLUMNS as f32)
            .max(MIN_CELL_SIZE);
        let range = grid.range.display_range();
        let (filter, radius) = (grid.filter, grid.radius);

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (row, chunk) in grid.panels.chunks_mut(GRID_COLUMNS).enumerate() {
                ui.horizontal(|ui| {
                    for (col, panel) in chunk.iter_mut().enumerate() {
                        let index = row * GRID_COLUMNS + col;
                        ui.vertical(|ui| {
                            let (rect, _) =
                                ui.allocate_exact_size(egui::vec2(cell, cell), egui::Sense::hover());
                            let painter = ui.painter_at(rect);
                            painter.rect_filled(rect, 0.0, Color32::from_gray(30));

                            let center = panel.center;
                            let half = GRID_VIEW_SPAN / 2.0;
                            let t = ImageTransform::window(
                                rect,
                                center.x + 0.5 - half,
                                center.y + 0.5 - half,
                                GRID_VIEW_SPAN,
                            );
                            match panel.cutout_mut(filter) {
                                Some(cutout) => {
                                    let name = format!("grid_{filter}_{index}");
                                    let id = cutout.texture.texture_id(
                                        ui.ctx(),
                                        &name,
                                        &cutout.frame,
                                        range,
                                    );
                                    let size = [cutout.frame.width(), cutout.frame.height()];
                                    painter.image(
                                        id,
                                        t.image_rect(cutout.origin, size),
                                        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                                        Color32::WHITE,
                                    );
                                }
                                None => {
                                    painter.text(
                                        rect.center(),
                                        egui::Align2::CENTER_CENTER,
                                        format!("No {filter} image"),
                                        egui::FontId::proportional(12.0),
                                        Color32::from_gray(120),
                                    );
                                }
                            }
                            draw_apertures(&painter, &t, center, radius);
                            ui.small(format!("#{} ({:.1}, {:.1})", index + 1, center.x, center.y));
                        });
                    }
                });
            }
        });
    });
}
