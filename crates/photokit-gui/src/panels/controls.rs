use crate::app::PhotokitApp;
use crate::messages::ImageSlot;
use crate::panels::helpers::{enum_combo, section_header};
use crate::panels::menu_bar::{open_image, open_light_curve};
use crate::state::{ColorRange, Filter, UIState, View};

const LEFT_PANEL_WIDTH: f32 = 260.0;
const TEXT_WIDTH: f32 = 70.0;

pub fn show(ctx: &egui::Context, app: &mut PhotokitApp) {
    egui::SidePanel::left("controls")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                let mut view = app.view;
                enum_combo(ui, "View", &mut view, &View::ALL);
                app.view = view;
                ui.separator();

                match app.view {
                    View::Standard => standard_sections(ui, app),
                    View::Cluster => cluster_sections(ui, app),
                    View::Grid => grid_sections(ui, app),
                    View::LightCurve => light_curve_sections(ui, app),
                }
            });
        });
}

/// Slider pair for the display range plus min/max boxes for its bounds.
fn colorbar_section(ui: &mut egui::Ui, range: &mut ColorRange, log: &mut UIState) {
    section_header(ui, "Colorbar", None);
    ui.add(egui::Slider::new(&mut range.low, range.start..=range.end).text("low"));
    ui.add(egui::Slider::new(&mut range.high, range.start..=range.end).text("high"));
    if range.low > range.high {
        range.high = range.low;
    }

    ui.horizontal(|ui| {
        ui.label("min");
        ui.add(egui::TextEdit::singleline(&mut range.min_text).desired_width(TEXT_WIDTH));
        ui.label("max");
        ui.add(egui::TextEdit::singleline(&mut range.max_text).desired_width(TEXT_WIDTH));
    });
    if ui.button("Update colorbar").clicked() {
        if let Err(e) = range.apply_limits() {
            log.add_log(format!("ERROR: {e}"));
        }
    }
}

fn standard_sections(ui: &mut egui::Ui, app: &mut PhotokitApp) {
    let status = app
        .standard
        .image
        .path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());
    section_header(ui, "Image", status.as_deref());
    ui.horizontal(|ui| {
        if ui.button("Open...").clicked() {
            open_image(app, ImageSlot::Standard);
        }
        if ui.button("Fit").clicked() {
            app.standard.image.needs_fit = true;
        }
    });
    ui.separator();

    colorbar_section(ui, &mut app.standard.range, &mut app.ui_state);
    ui.separator();

    section_header(ui, "Star", None);
    let state = &mut app.standard;
    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(&mut state.x_text).hint_text("x").desired_width(TEXT_WIDTH));
        ui.add(egui::TextEdit::singleline(&mut state.y_text).hint_text("y").desired_width(TEXT_WIDTH));
    });
    if ui.button("Center of star (x, y)").clicked() {
        if let Err(e) = state.apply_center() {
            app.ui_state.add_log(format!("ERROR: {e}"));
        }
    }
    ui.add_space(4.0);
    ui.add(egui::TextEdit::singleline(&mut state.radius_text).hint_text("radius").desired_width(TEXT_WIDTH));
    if ui.button("Update radius").clicked() {
        if let Err(e) = state.apply_radius() {
            app.ui_state.add_log(format!("ERROR: {e}"));
        }
    }
}

fn cluster_sections(ui: &mut egui::Ui, app: &mut PhotokitApp) {
    section_header(ui, "Images", None);
    ui.horizontal(|ui| {
        if ui.button("Open V...").clicked() {
            open_image(app, ImageSlot::ClusterV);
        }
        if ui.button("Open I...").clicked() {
            open_image(app, ImageSlot::ClusterI);
        }
        if ui.button("Fit").clicked() {
            app.cluster.image_mut().needs_fit = true;
        }
    });
    let mut filter = app.cluster.filter;
    if enum_combo(ui, "Filter", &mut filter, &Filter::ALL) {
        app.cluster.filter = filter;
        app.cluster.range.select_filter(filter);
    }
    if app.cluster.image().frame.is_none() {
        ui.small(format!("No {filter} image loaded"));
    }
    ui.separator();

    colorbar_section(ui, &mut app.cluster.range, &mut app.ui_state);
    ui.separator();

    let count = format!("{} recorded", app.cluster.clicks.len());
    section_header(ui, "Positions", Some(&count));
    ui.small("Double-click a star to record it");
    egui::ScrollArea::vertical()
        .id_salt("clicks")
        .max_height(200.0)
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for (i, pos) in app.cluster.clicks.positions().iter().enumerate() {
                ui.monospace(format!("{:>2}  {:8.1} {:8.1}", i + 1, pos.x, pos.y));
            }
        });
    ui.horizontal(|ui| {
        if ui.button("Clear").clicked() {
            app.cluster.clicks.clear();
        }
        if ui
            .add_enabled(!app.cluster.clicks.is_empty(), egui::Button::new("Aperture grid"))
            .clicked()
        {
            app.build_grid();
        }
    });
}

fn grid_sections(ui: &mut egui::Ui, app: &mut PhotokitApp) {
    let mut filter = app.grid.filter;
    if enum_combo(ui, "Filter", &mut filter, &Filter::ALL) {
        app.grid.filter = filter;
        app.grid.range.select_filter(filter);
    }
    ui.separator();

    colorbar_section(ui, &mut app.grid.range, &mut app.ui_state);
    ui.separator();

    section_header(ui, "Aperture", None);
    ui.add(
        egui::TextEdit::singleline(&mut app.grid.radius_text)
            .hint_text("radius")
            .desired_width(TEXT_WIDTH),
    );
    if ui.button("Update radius").clicked() {
        if let Err(e) = app.grid.apply_radius() {
            app.ui_state.add_log(format!("ERROR: {e}"));
        }
    }
    ui.separator();

    if ui.button("Rebuild from cluster positions").clicked() {
        app.build_grid();
    }
}

fn light_curve_sections(ui: &mut egui::Ui, app: &mut PhotokitApp) {
    let status = app
        .light_curve
        .path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());
    section_header(ui, "Light curve", status.as_deref());
    if ui.button("Open CSV...").clicked() {
        open_light_curve(app);
    }
    if let Some(curve) = &app.light_curve.curve {
        let times = curve.times();
        let first = times.iter().copied().fold(f64::INFINITY, f64::min);
        let last = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        ui.label(format!("{} points", curve.len()));
        if first <= last {
            ui.label(format!("Time {first:.5} to {last:.5}"));
        }
    }
}
