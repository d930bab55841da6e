#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::geom::Bounds;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    #[must_use]
    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    #[must_use]
    pub fn scale(self, k: f64) -> Point {
        Point::new(self.x * k, self.y * k)
    }

    #[must_use]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        self.sub(other).length()
    }

    /// Point at fraction `t` of the way from `self` to `other`.
    #[must_use]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self.add(other.sub(self).scale(t))
    }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `x` / `y` are the world coordinates shown at the viewport's top-left corner.
/// `zoom` is a scale factor (1.0 = one world unit per CSS pixel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point { x: self.x + screen.x / self.zoom, y: self.y + screen.y / self.zoom }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point { x: (world.x - self.x) * self.zoom, y: (world.y - self.y) * self.zoom }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Change zoom while keeping the world point under `screen` fixed on screen.
    ///
    /// The requested zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_at(&mut self, screen: Point, new_zoom: f64) {
        if !new_zoom.is_finite() {
            return;
        }
        let anchor = self.screen_to_world(screen);
        let zoom = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = zoom;
        self.x = anchor.x - screen.x / zoom;
        self.y = anchor.y - screen.y / zoom;
    }

    /// Pan by a screen-space delta. Dragging right moves the content right.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x -= dx / self.zoom;
        self.y -= dy / self.zoom;
    }

    /// Frame `content` (already padded) so it fills a `viewport_w` × `viewport_h` viewport.
    ///
    /// Zoom is capped at `max_zoom`, and the content is centered along the axis
    /// with slack. Returns `false` (camera untouched) for an empty viewport or
    /// degenerate content.
    pub fn fit_bounds(&mut self, content: Bounds, viewport_w: f64, viewport_h: f64, max_zoom: f64) -> bool {
        let (w, h) = (content.width(), content.height());
        if viewport_w <= 0.0 || viewport_h <= 0.0 || w <= 0.0 || h <= 0.0 {
            return false;
        }
        let zoom = (viewport_w / w)
            .min(viewport_h / h)
            .min(max_zoom)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = zoom;
        self.x = content.min_x - (viewport_w / zoom - w) / 2.0;
        self.y = content.min_y - (viewport_h / zoom - h) / 2.0;
        true
    }
}
