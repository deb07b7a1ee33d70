use crate::app::PhotokitApp;
use crate::messages::{ImageSlot, WorkerCommand};
use crate::state::View;

pub fn show(ctx: &egui::Context, app: &mut PhotokitApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut =
                    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui
                    .add(
                        egui::Button::new("Open Standard Star...")
                            .shortcut_text(ctx.format_shortcut(&open_shortcut)),
                    )
                    .clicked()
                {
                    ui.close();
                    open_image(app, ImageSlot::Standard);
                }
                if ui.button("Open Cluster V...").clicked() {
                    ui.close();
                    open_image(app, ImageSlot::ClusterV);
                }
                if ui.button("Open Cluster I...").clicked() {
                    ui.close();
                    open_image(app, ImageSlot::ClusterI);
                }

                ui.separator();

                if ui.button("Open Light Curve...").clicked() {
                    ui.close();
                    open_light_curve(app);
                }

                ui.separator();

                let quit_shortcut =
                    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui
                    .add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut)))
                    .clicked()
                {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                for view in View::ALL {
                    if ui.selectable_label(app.view == view, view.to_string()).clicked() {
                        ui.close();
                        app.view = view;
                    }
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        if ctx.input_mut(|i| {
            i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))
        }) {
            open_image(app, ImageSlot::Standard);
        }
        if ctx.input_mut(|i| {
            i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))
        }) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Pick a FITS file off the UI thread and hand it to the worker.
pub(crate) fn open_image(app: &mut PhotokitApp, slot: ImageSlot) {
    let Some(cmd_tx) = app.cmd_tx.clone() else {
        app.ui_state.add_log("ERROR: background loader is not running".into());
        return;
    };
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("FITS files", &["fits", "fit", "fts"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = cmd_tx.send(WorkerCommand::LoadImage { slot, path });
        }
    });
}

pub(crate) fn open_light_curve(app: &mut PhotokitApp) {
    let Some(cmd_tx) = app.cmd_tx.clone() else {
        app.ui_state.add_log("ERROR: background loader is not running".into());
        return;
    };
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
        {
            let _ = cmd_tx.send(WorkerCommand::LoadLightCurve { path });
        }
    });
}
