//! Pan/zoom transform and conversions between viewport, canvas, and world space.
//!
//! Three coordinate spaces are in play:
//!
//! - **viewport**: pixels relative to the browser window, as reported by pointer events
//! - **canvas**: pixels relative to the drawing surface's top-left corner
//! - **world**: the pan/zoom-independent space cells are laid out in
//!
//! `canvas = viewport - origin` and `world = (canvas - pan) / zoom`.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_SCALE, MIN_SCALE};

/// A point in viewport, canvas, or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Camera state for pan/zoom over the infinite grid.
///
/// `pan_x` / `pan_y` are in canvas pixels. `zoom` is a scale factor kept within
/// `[min_zoom, max_zoom]`. `origin` is the surface's top-left corner in viewport
/// pixels.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub origin: Point,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
            min_zoom: MIN_SCALE,
            max_zoom: MAX_SCALE,
            origin: Point::new(0.0, 0.0),
        }
    }
}

impl Camera {
    /// Identity camera with the given zoom bounds.
    #[must_use]
    pub fn with_bounds(min_zoom: f64, max_zoom: f64) -> Self {
        Self { min_zoom, max_zoom, ..Self::default() }
    }

    /// Convert a viewport point to canvas pixels.
    #[must_use]
    pub fn viewport_to_canvas(&self, viewport: Point) -> Point {
        Point { x: viewport.x - self.origin.x, y: viewport.y - self.origin.y }
    }

    /// Convert a canvas point to viewport pixels.
    #[must_use]
    pub fn canvas_to_viewport(&self, canvas: Point) -> Point {
        Point { x: canvas.x + self.origin.x, y: canvas.y + self.origin.y }
    }

    /// Convert a canvas-space point to world coordinates.
    #[must_use]
    pub fn canvas_to_world(&self, canvas: Point) -> Point {
        Point {
            x: (canvas.x - self.pan_x) / self.zoom,
            y: (canvas.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to canvas coordinates.
    #[must_use]
    pub fn world_to_canvas(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a viewport point to world coordinates.
    #[must_use]
    pub fn viewport_to_world(&self, viewport: Point) -> Point {
        self.canvas_to_world(self.viewport_to_canvas(viewport))
    }

    /// Convert a world point to viewport coordinates.
    #[must_use]
    pub fn world_to_viewport(&self, world: Point) -> Point {
        self.canvas_to_viewport(self.world_to_canvas(world))
    }

    /// Convert a canvas-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn canvas_dist_to_world(&self, dist: f64) -> f64 {
        dist / self.zoom
    }

    /// Translate the view by a viewport-space delta.
    ///
    /// This is a world translation of `delta / zoom`, which lands as exactly
    /// `delta` pixels on screen, so content follows the pointer.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Change the zoom by `scale_delta`, keeping the world point under
    /// `viewport_pt` fixed on screen.
    ///
    /// The new zoom is clamped to `[min_zoom, max_zoom]`. Returns `true` when
    /// the zoom actually changed.
    pub fn zoom_at(&mut self, viewport_pt: Point, scale_delta: f64) -> bool {
        if scale_delta.is_nan() {
            return false;
        }
        let target = (self.zoom + scale_delta).clamp(self.min_zoom, self.max_zoom);
        if (target - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        // Translate to the cursor, scale, translate back.
        let factor = target / self.zoom;
        let anchor = self.viewport_to_canvas(viewport_pt);
        self.pan_x = anchor.x - (anchor.x - self.pan_x) * factor;
        self.pan_y = anchor.y - (anchor.y - self.pan_y) * factor;
        self.zoom = target;
        true
    }

    /// World-space rectangle visible on a canvas of the given size, as
    /// `(top_left, bottom_right)`.
    #[must_use]
    pub fn visible_world(&self, width: f64, height: f64) -> (Point, Point) {
        let top_left = self.canvas_to_world(Point::new(0.0, 0.0));
        let bottom_right = self.canvas_to_world(Point::new(width, height));
        (top_left, bottom_right)
    }
}
