use std::collections::VecDeque;
use std::path::PathBuf;

use egui::{TextureHandle, TextureId, TextureOptions};
use photokit_core::frame::{Frame, Position};
use photokit_core::lightcurve::LightCurve;
use photokit_core::render::{Colormap, DisplayRange};

use crate::convert::frame_to_color_image;

/// Clicked positions kept by the cluster view.
pub const MAX_CLICKS: usize = 35;
/// Aperture-grid cutouts are `2 * CUTOUT_HALF_SIZE` pixels on a side.
pub const CUTOUT_HALF_SIZE: usize = 50;
/// Pixels shown around each star in the aperture grid.
pub const GRID_VIEW_SPAN: f64 = 60.0;
pub const GRID_COLUMNS: usize = 5;
pub const DEFAULT_RADIUS: f64 = 3.0;
/// Sky circle radii as multiples of the aperture radius.
pub const SKY_INNER_FACTOR: f64 = 1.5;
pub const SKY_OUTER_FACTOR: f64 = 2.0;

const DISPLAY_COLORMAP: Colormap = Colormap::Viridis;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Standard,
    Cluster,
    Grid,
    LightCurve,
}

impl View {
    pub const ALL: [View; 4] = [View::Standard, View::Cluster, View::Grid, View::LightCurve];
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "Standard star"),
            Self::Cluster => write!(f, "Cluster"),
            Self::Grid => write!(f, "Aperture grid"),
            Self::LightCurve => write!(f, "Light curve"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    V,
    I,
}

impl Filter {
    pub const ALL: [Filter; 2] = [Filter::V, Filter::I];

    /// Slider end and selected display range used when switching filters.
    pub fn default_range(self) -> (f64, f64, f64) {
        match self {
            Self::V => (100.0, 15.0, 35.0),
            Self::I => (1000.0, 150.0, 600.0),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V => write!(f, "V"),
            Self::I => write!(f, "I"),
        }
    }
}

fn parse_number(text: &str, label: &str) -> Result<f64, String> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{label} must be a number, got '{}'", text.trim()))
}

/// Range slider state: slider bounds, selected range and the text boxes
/// used to change the bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRange {
    pub start: f64,
    pub end: f64,
    pub low: f64,
    pub high: f64,
    pub min_text: String,
    pub max_text: String,
}

impl ColorRange {
    pub fn new(start: f64, end: f64, low: f64, high: f64) -> Self {
        Self {
            start,
            end,
            low,
            high,
            min_text: "-200".into(),
            max_text: "5000".into(),
        }
    }

    /// Use the typed min/max as new slider bounds, keeping the selection
    /// inside them.
    pub fn apply_limits(&mut self) -> Result<(), String> {
        let min = parse_number(&self.min_text, "min")?;
        let max = parse_number(&self.max_text, "max")?;
        if min >= max {
            return Err(format!("min ({min}) must be below max ({max})"));
        }
        self.start = min;
        self.end = max;
        self.low = self.low.clamp(min, max);
        self.high = self.high.clamp(self.low, max);
        Ok(())
    }

    pub fn select_filter(&mut self, filter: Filter) {
        let (end, low, high) = filter.default_range();
        self.end = end;
        self.low = low;
        self.high = high;
    }

    pub fn display_range(&self) -> DisplayRange {
        DisplayRange::new(self.low, self.high)
    }
}

/// GPU texture of a frame, re-rendered only when the display range changes.
#[derive(Default)]
pub struct TextureCache {
    handle: Option<TextureHandle>,
    rendered: Option<DisplayRange>,
}

impl TextureCache {
    pub fn texture_id(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        frame: &Frame,
        range: DisplayRange,
    ) -> TextureId {
        if let (Some(handle), Some(rendered)) = (&self.handle, self.rendered) {
            if rendered == range {
                return handle.id();
            }
        }
        let image = frame_to_color_image(frame, range, DISPLAY_COLORMAP);
        let id = match &mut self.handle {
            Some(handle) => {
                handle.set(image, TextureOptions::NEAREST);
                handle.id()
            }
            None => {
                let handle = ctx.load_texture(name, image, TextureOptions::NEAREST);
                let id = handle.id();
                self.handle = Some(handle);
                id
            }
        };
        self.rendered = Some(range);
        id
    }

    pub fn clear(&mut self) {
        self.handle = None;
        self.rendered = None;
    }
}

/// A loaded image with its zoom and pan.
pub struct ImageView {
    pub frame: Option<Frame>,
    pub path: Option<PathBuf>,
    pub texture: TextureCache,
    pub zoom: f32,
    pub pan: egui::Vec2,
    /// Fit to the panel on next draw.
    pub needs_fit: bool,
}

impl Default for ImageView {
    fn default() -> Self {
        Self {
            frame: None,
            path: None,
            texture: TextureCache::default(),
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
            needs_fit: true,
        }
    }
}

impl ImageView {
    pub fn set_frame(&mut self, path: PathBuf, frame: Frame) {
        self.frame = Some(frame);
        self.path = Some(path);
        self.texture.clear();
        self.pan = egui::Vec2::ZERO;
        self.needs_fit = true;
    }

    /// `[width, height]` of the loaded frame.
    pub fn image_size(&self) -> Option<[usize; 2]> {
        self.frame.as_ref().map(|f| [f.width(), f.height()])
    }
}

/// Single-star inspection: cross at a typed center, aperture and sky
/// circles at a typed radius.
pub struct StandardStarState {
    pub image: ImageView,
    pub range: ColorRange,
    pub x_text: String,
    pub y_text: String,
    pub radius_text: String,
    pub center: Option<Position>,
    pub radius: Option<f64>,
}

impl Default for StandardStarState {
    fn default() -> Self {
        Self {
            image: ImageView::default(),
            range: ColorRange::new(-200.0, 5000.0, 100.0, 1000.0),
            x_text: String::new(),
            y_text: String::new(),
            radius_text: format!("{DEFAULT_RADIUS}"),
            center: None,
            radius: None,
        }
    }
}

impl StandardStarState {
    pub fn apply_center(&mut self) -> Result<(), String> {
        let x = parse_number(&self.x_text, "x")?;
        let y = parse_number(&self.y_text, "y")?;
        self.center = Some(Position::new(x, y));
        Ok(())
    }

    pub fn apply_radius(&mut self) -> Result<(), String> {
        self.radius = Some(parse_radius(&self.radius_text)?);
        Ok(())
    }
}

fn parse_radius(text: &str) -> Result<f64, String> {
    let r = parse_number(text, "radius")?;
    if r <= 0.0 {
        return Err(format!("radius must be positive, got {r}"));
    }
    Ok(r)
}

/// Most recent clicked positions, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ClickLog {
    positions: VecDeque<Position>,
}

impl ClickLog {
    pub fn push(&mut self, pos: Position) {
        self.positions.push_back(pos);
        while self.positions.len() > MAX_CLICKS {
            self.positions.pop_front();
        }
    }

    pub fn positions(&self) -> Vec<Position> {
        self.positions.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }
}

/// Two-filter cluster view recording double-clicked star positions.
pub struct ClusterState {
    pub v: ImageView,
    pub i: ImageView,
    pub filter: Filter,
    pub range: ColorRange,
    pub clicks: ClickLog,
}

impl Default for ClusterState {
    fn default() -> Self {
        Self {
            v: ImageView::default(),
            i: ImageView::default(),
            filter: Filter::V,
            range: ColorRange::new(0.0, 100.0, 15.0, 35.0),
            clicks: ClickLog::default(),
        }
    }
}

impl ClusterState {
    pub fn image(&self) -> &ImageView {
        match self.filter {
            Filter::V => &self.v,
            Filter::I => &self.i,
        }
    }

    pub fn image_mut(&mut self) -> &mut ImageView {
        match self.filter {
            Filter::V => &mut self.v,
            Filter::I => &mut self.i,
        }
    }
}

/// A cutout and the pixel-edge position of its lower-left corner in the
/// parent frame.
pub struct CutoutView {
    pub frame: Frame,
    pub origin: (f64, f64),
    pub texture: TextureCache,
}

impl CutoutView {
    fn from_frame(frame: &Frame, center: Position) -> Option<Self> {
        let cutout = frame.cutout(center, CUTOUT_HALF_SIZE);
        if cutout.is_empty() {
            return None;
        }
        Some(Self {
            origin: (cutout.origin_x as f64, cutout.origin_y as f64),
            frame: Frame::new(cutout.data),
            texture: TextureCache::default(),
        })
    }
}

pub struct GridPanel {
    pub center: Position,
    pub v: Option<CutoutView>,
    pub i: Option<CutoutView>,
}

impl GridPanel {
    pub fn cutout_mut(&mut self, filter: Filter) -> Option<&mut CutoutView> {
        match filter {
            Filter::V => self.v.as_mut(),
            Filter::I => self.i.as_mut(),
        }
    }
}

/// Cutouts around every recorded position with aperture and sky circles.
pub struct GridState {
    pub panels: Vec<GridPanel>,
    pub filter: Filter,
    pub range: ColorRange,
    pub radius_text: String,
    pub radius: f64,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            panels: Vec::new(),
            filter: Filter::V,
            range: ColorRange::new(-200.0, 500.0, 15.0, 35.0),
            radius_text: format!("{DEFAULT_RADIUS}"),
            radius: DEFAULT_RADIUS,
        }
    }
}

impl GridState {
    pub fn rebuild(&mut self, centers: &[Position], v: Option<&Frame>, i: Option<&Frame>) {
        self.panels = centers
            .iter()
            .map(|&center| GridPanel {
                center,
                v: v.and_then(|f| CutoutView::from_frame(f, center)),
                i: i.and_then(|f| CutoutView::from_frame(f, center)),
            })
            .collect();
    }

    pub fn apply_radius(&mut self) -> Result<(), String> {
        self.radius = parse_radius(&self.radius_text)?;
        Ok(())
    }
}

/// Log lines and hover readout shared by all views.
#[derive(Default)]
pub struct UIState {
    pub log_messages: Vec<String>,
    /// Pixel under the mouse and its value.
    pub hover: Option<(Position, f64)>,
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }
}

#[derive(Default)]
pub struct LightCurveState {
    pub path: Option<PathBuf>,
    pub curve: Option<LightCurve>,
}
