//! Zoom and pan over the drawing surface.

use crate::config::EditorConfig;
use kurbo::Point;
use mm_render::ViewBox;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    /// Surface size in screen units.
    pub width: f64,
    pub height: f64,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
}

impl Viewport {
    /// Zoom limits and the surface size must be positive and the zoom step
    /// above 1; other values fall back to the defaults.
    pub fn new(config: &EditorConfig) -> Self {
        let defaults = EditorConfig::default();
        let min_zoom = positive(config.min_zoom, defaults.min_zoom);
        let max_zoom = positive(config.max_zoom, defaults.max_zoom).max(min_zoom);
        let zoom_step = if config.zoom_step.is_finite() && config.zoom_step > 1.0 {
            config.zoom_step
        } else {
            log::warn!("zoom step {} ignored", config.zoom_step);
            defaults.zoom_step
        };
        Self {
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            pan_x: 0.0,
            pan_y: 0.0,
            width: positive(config.surface_width, defaults.surface_width),
            height: positive(config.surface_height, defaults.surface_height),
            min_zoom,
            max_zoom,
            zoom_step,
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * self.zoom_step).min(self.max_zoom);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / self.zoom_step).max(self.min_zoom);
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// The world rectangle currently on screen.
    pub fn view_box(&self) -> ViewBox {
        ViewBox {
            x: -self.pan_x,
            y: -self.pan_y,
            width: self.width / self.zoom,
            height: self.height / self.zoom,
        }
    }

    /// Map a surface point to world coordinates.
    pub fn to_world(&self, sx: f64, sy: f64) -> Point {
        let vb = self.view_box();
        Point::new(vb.x + sx / self.zoom, vb.y + sy / self.zoom)
    }
}

fn positive(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("viewport setting {value} ignored, using {fallback}");
        fallback
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
