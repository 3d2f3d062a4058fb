use glam::Vec2;

/// Camera used by the host input system when it raycasts into a panel
pub trait EventCamera {
    /// Map a screen-space point onto the canvas the panel is drawn on
    fn screen_to_canvas(&self, screen_point: Vec2) -> Vec2;
}
