//! Pan/zoom state for the display surface.
//!
//! A [`ViewTransform`] maps content space to screen space:
//!
//! ```text
//! screen = content * scale + (x, y)
//! ```
//!
//! Zooming keeps a chosen screen point (the pointer, or the container
//! centre) over the same content point.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Smallest allowed view scale.
pub const MIN_SCALE: f64 = 0.05;
/// Largest allowed view scale.
pub const MAX_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

impl ViewTransform {
    pub fn new(scale: f64, x: f64, y: f64) -> Self {
        Self {
            scale: clamp_scale(scale),
            x,
            y,
        }
    }

    /// Back to identity scale with no translation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn content_to_screen(&self, content: Point) -> Point {
        Point {
            x: content.x * self.scale + self.x,
            y: content.y * self.scale + self.y,
        }
    }

    pub fn screen_to_content(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.x) / self.scale,
            y: (screen.y - self.y) / self.scale,
        }
    }

    /// Translate by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Change the scale by `delta_scale`, keeping the content point under
    /// `(pointer_x, pointer_y)` fixed on screen.
    pub fn zoom_at_point(&mut self, pointer_x: f64, pointer_y: f64, delta_scale: f64) {
        let new_scale = clamp_scale(self.scale + delta_scale);
        let content = self.screen_to_content(Point::new(pointer_x, pointer_y));
        self.x = pointer_x - content.x * new_scale;
        self.y = pointer_y - content.y * new_scale;
        self.scale = new_scale;
    }

    /// Zoom around the centre of the container (discrete +/- controls).
    pub fn zoom_at_center(&mut self, container_width: f64, container_height: f64, delta_scale: f64) {
        self.zoom_at_point(container_width / 2.0, container_height / 2.0, delta_scale);
    }

    /// Scroll-wheel zoom: wheel up (negative `delta_y`) zooms in.
    pub fn zoom_by_wheel(&mut self, pointer: Point, delta_y: f64, sensitivity: f64) {
        self.zoom_at_point(pointer.x, pointer.y, -delta_y * sensitivity);
    }

    /// Scale content to fit the container (never above 1:1) and centre it.
    ///
    /// Degenerate content or container sizes leave the transform unchanged.
    pub fn fit_to_container(
        &mut self,
        content_width: f64,
        content_height: f64,
        container_width: f64,
        container_height: f64,
        padding: f64,
    ) {
        if content_width <= 0.0 || content_height <= 0.0 || container_width <= 0.0 || container_height <= 0.0 {
            return;
        }

        let scale = ((container_width - padding) / content_width)
            .min((container_height - padding) / content_height)
            .min(1.0);
        let scale = clamp_scale(scale);

        self.scale = scale;
        self.x = (container_width - content_width * scale) / 2.0;
        self.y = (container_height - content_height * scale) / 2.0;
    }

    /// A fitted transform, for the first successful load.
    pub fn fitted(
        content_width: f64,
        content_height: f64,
        container_width: f64,
        container_height: f64,
        padding: f64,
    ) -> Self {
        let mut view = Self::default();
        view.fit_to_container(content_width, content_height, container_width, container_height, padding);
        view
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
