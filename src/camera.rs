use glam::{Mat3, Vec2, Vec3};

use crate::traits::EventCamera;

/// 2D camera that renders a canvas into a viewport with pan and zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportCamera {
    /// Screen position of the viewport's top-left corner
    pub viewport_origin: Vec2,
    /// Canvas point shown at the viewport origin
    pub pan: Vec2,
    /// Screen pixels per canvas pixel
    pub zoom: f32,
}

impl ViewportCamera {
    pub fn new() -> Self {
        Self {
            viewport_origin: Vec2::ZERO,
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    pub fn with_pan(mut self, pan: Vec2) -> Self {
        self.pan = pan;
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_viewport_origin(mut self, origin: Vec2) -> Self {
        self.viewport_origin = origin;
        self
    }

    /// Canvas -> screen transform as a homogeneous 2D matrix
    pub fn canvas_to_screen(&self) -> Mat3 {
        Mat3::from_translation(self.viewport_origin)
            * Mat3::from_scale(Vec2::splat(self.zoom))
            * Mat3::from_translation(-self.pan)
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl EventCamera for ViewportCamera {
    fn screen_to_canvas(&self, screen_point: Vec2) -> Vec2 {
        if self.zoom == 0.0 {
            return self.pan;
        }
        let inverse = self.canvas_to_screen().inverse();
        let p = inverse * Vec3::new(screen_point.x, screen_point.y, 1.0);
        Vec2::new(p.x, p.y)
    }
}
