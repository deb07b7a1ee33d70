use egui::{Painter, Rect};
use photokit_core::frame::Position;
use photokit_core::render::DisplayRange;

use crate::convert::ImageTransform;
use crate::panels::helpers::show_placeholder;
use crate::state::ImageView;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 20.0;

/// Pointer interaction with a drawn image, in image coordinates.
#[derive(Default)]
pub struct ViewportResponse {
    /// Pixel under the mouse and its value.
    pub hover: Option<(Position, f64)>,
    pub double_clicked: Option<Position>,
}

/// Draw a zoomable, pannable image filling the remaining space, then let
/// `overlay` paint on top of it.
pub fn show_image(
    ui: &mut egui::Ui,
    texture_name: &str,
    image: &mut ImageView,
    range: DisplayRange,
    overlay: impl FnOnce(&Painter, &ImageTransform),
) -> ViewportResponse {
    let rect = ui.available_rect_before_wrap();
    paint_background(ui, rect);

    let ImageView {
        frame,
        texture,
        zoom,
        pan,
        needs_fit,
        ..
    } = image;
    let Some(frame) = frame.as_ref() else {
        show_placeholder(ui, "Open a FITS image to begin");
        return ViewportResponse::default();
    };

    let size = [frame.width(), frame.height()];
    let image_size = egui::vec2(size[0] as f32, size[1] as f32);
    let texture_id = texture.texture_id(ui.ctx(), texture_name, frame, range);
    let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

    if *needs_fit {
        fit_to_rect(zoom, pan, image_size, rect);
        *needs_fit = false;
    }
    handle_zoom(ui, &response, zoom, pan, rect);
    handle_pan(ui, &response, pan);

    let img_rect = Rect::from_center_size(rect.center() + *pan, image_size * *zoom);
    let transform = ImageTransform::fit(img_rect, size);
    let painter = ui.painter_at(rect);
    painter.image(
        texture_id,
        img_rect,
        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
    overlay(&painter, &transform);

    let pixel_at = |screen: egui::Pos2| {
        let p = transform.to_image(screen);
        let (col, row) = (p.x.round(), p.y.round());
        let inside = col >= 0.0 && row >= 0.0 && (col as usize) < size[0] && (row as usize) < size[1];
        inside.then(|| (p, frame.data[[row as usize, col as usize]]))
    };

    ViewportResponse {
        hover: response.hover_pos().and_then(pixel_at),
        double_clicked: response
            .double_clicked()
            .then(|| response.interact_pointer_pos())
            .flatten()
            .and_then(pixel_at)
            .map(|(p, _)| p),
    }
}

fn paint_background(ui: &egui::Ui, rect: Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn handle_zoom(
    ui: &egui::Ui,
    response: &egui::Response,
    zoom: &mut f32,
    pan: &mut egui::Vec2,
    rect: Rect,
) {
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }

    let zoom_factor = (scroll_delta * 0.005).exp();
    let new_zoom = (*zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);

    // Zoom toward mouse cursor
    if let Some(mouse_pos) = ui.input(|i| i.pointer.hover_pos()) {
        let center = rect.center().to_vec2() + *pan;
        let mouse_rel = mouse_pos.to_vec2() - center;
        *pan += mouse_rel * (1.0 - new_zoom / *zoom);
    }

    *zoom = new_zoom;
}

fn handle_pan(ui: &egui::Ui, response: &egui::Response, pan: &mut egui::Vec2) {
    if response.dragged_by(egui::PointerButton::Middle)
        || (response.dragged_by(egui::PointerButton::Primary) && ui.input(|i| i.modifiers.command))
    {
        *pan += response.drag_delta();
    }
}

fn fit_to_rect(zoom: &mut f32, pan: &mut egui::Vec2, image_size: egui::Vec2, rect: Rect) {
    let available = rect.size();
    let fit_x = available.x / image_size.x.max(1.0);
    let fit_y = available.y / image_size.y.max(1.0);
    *zoom = fit_x.min(fit_y).clamp(MIN_ZOOM, MAX_ZOOM);
    *pan = egui::Vec2::ZERO;
}
