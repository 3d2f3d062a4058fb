use glam::Vec2;

/// Host engine services a panel reads or toggles
pub trait HostEnvironment {
    /// Enable or disable the host's automatic touch -> mouse event synthesis
    fn set_touch_mouse_synthesis(&mut self, enabled: bool);

    /// Most recent pointer position in screen pixels
    fn pointer_position(&self) -> Vec2;

    /// Whether the host's event system has an active focus target
    fn has_focus_target(&self) -> bool;
}
