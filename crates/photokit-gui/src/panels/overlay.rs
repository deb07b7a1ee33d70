use egui::{Color32, Painter, Stroke};
use photokit_core::frame::Position;

use crate::convert::ImageTransform;
use crate::state::{SKY_INNER_FACTOR, SKY_OUTER_FACTOR};

const CROSS_ARM: f32 = 8.0;
const LINE_WIDTH: f32 = 1.5;

pub(crate) fn draw_cross(painter: &Painter, t: &ImageTransform, pos: Position, color: Color32) {
    let c = t.to_screen(pos);
    let stroke = Stroke::new(LINE_WIDTH, color);
    painter.line_segment([c - egui::vec2(CROSS_ARM, 0.0), c + egui::vec2(CROSS_ARM, 0.0)], stroke);
    painter.line_segment([c - egui::vec2(0.0, CROSS_ARM), c + egui::vec2(0.0, CROSS_ARM)], stroke);
}

/// Aperture circle in white, sky annulus bounds in red.
pub(crate) fn draw_apertures(painter: &Painter, t: &ImageTransform, center: Position, radius: f64) {
    let c = t.to_screen(center);
    painter.circle_stroke(c, t.length(radius), Stroke::new(LINE_WIDTH, Color32::WHITE));
    for factor in [SKY_INNER_FACTOR, SKY_OUTER_FACTOR] {
        painter.circle_stroke(
            c,
            t.length(radius * factor),
            Stroke::new(LINE_WIDTH, Color32::RED),
        );
    }
}
