use egui::{pos2, ColorImage, Pos2, Rect};
use photokit_core::frame::{Frame, Position};
use photokit_core::render::{render_rgb, Colormap, DisplayRange};

/// Render a frame into an egui image, origin at the lower left.
pub fn frame_to_color_image(frame: &Frame, range: DisplayRange, cmap: Colormap) -> ColorImage {
    let rgb = render_rgb(&frame.data, range, cmap);
    let size = [rgb.width() as usize, rgb.height() as usize];
    ColorImage::from_rgb(size, rgb.as_raw())
}

/// Maps image pixel coordinates to screen points and back.
///
/// Integer pixel coordinates land on pixel centers. Pixel-edge coordinates
/// are shifted by half a pixel, so pixel `i` spans `[i, i + 1]` in them.
/// Image `y` grows upward while screen `y` grows downward.
#[derive(Clone, Copy, Debug)]
pub struct ImageTransform {
    /// Screen area showing the window.
    pub rect: Rect,
    /// Pixel-edge coordinates shown at the lower-left corner of `rect`.
    pub x0: f64,
    pub y0: f64,
    /// Screen points per image pixel.
    pub scale: f32,
}

impl ImageTransform {
    /// Whole image of `[width, height]` stretched over `rect`.
    pub fn fit(rect: Rect, image_size: [usize; 2]) -> Self {
        Self {
            rect,
            x0: 0.0,
            y0: 0.0,
            scale: rect.width() / image_size[0].max(1) as f32,
        }
    }

    /// Square window `span` pixels wide starting at pixel edge `(x0, y0)`.
    pub fn window(rect: Rect, x0: f64, y0: f64, span: f64) -> Self {
        Self {
            rect,
            x0,
            y0,
            scale: rect.width() / span.max(1.0) as f32,
        }
    }

    pub fn to_screen(&self, p: Position) -> Pos2 {
        let dx = (p.x + 0.5 - self.x0) as f32 * self.scale;
        let dy = (p.y + 0.5 - self.y0) as f32 * self.scale;
        pos2(self.rect.left() + dx, self.rect.bottom() - dy)
    }

    pub fn to_image(&self, s: Pos2) -> Position {
        let x = ((s.x - self.rect.left()) / self.scale) as f64 + self.x0 - 0.5;
        let y = ((self.rect.bottom() - s.y) / self.scale) as f64 + self.y0 - 0.5;
        Position::new(x, y)
    }

    /// Screen length of `pixels` image pixels.
    pub fn length(&self, pixels: f64) -> f32 {
        pixels as f32 * self.scale
    }

    /// Screen rectangle of an image of `[width, height]` whose lower-left
    /// corner sits at pixel edge `origin`.
    pub fn image_rect(&self, origin: (f64, f64), size: [usize; 2]) -> Rect {
        let left = self.rect.left() + (origin.0 - self.x0) as f32 * self.scale;
        let bottom = self.rect.bottom() - (origin.1 - self.y0) as f32 * self.scale;
        Rect::from_min_max(
            pos2(left, bottom - size[1] as f32 * self.scale),
            pos2(left + size[0] as f32 * self.scale, bottom),
        )
    }
}
