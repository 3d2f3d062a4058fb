use crate::core::event::HostEvent;
use crate::core::metrics::ViewMetrics;

/// Window owned by the external retained-mode UI framework.
///
/// The framework keeps the widget tree, layout and painting; the panel host
/// only decides when to call into it.
pub trait FrameworkWindow {
    /// Root widget type accepted by `attach_root_widget`
    type Widget;

    /// Called once after the adapter wrapping this window is enabled
    fn on_enable(&mut self);

    /// Called once when the owning panel is disabled
    fn on_disable(&mut self);

    /// Per-frame housekeeping (timers, animations, microtasks)
    fn update(&mut self);

    /// Handle a host GUI event. Repaint events run a paint pass.
    fn on_gui(&mut self, event: &HostEvent, has_focus: bool);

    /// Request a frame, optionally rebuilding the retained layer tree
    fn schedule_frame(&mut self, regenerate_layer_tree: bool);

    /// The host signalled that viewport metrics changed out of band
    fn on_view_metrics_changed(&mut self);

    /// Push freshly queried metrics into the framework's coordinate model
    fn apply_view_metrics(&mut self, metrics: &ViewMetrics);

    /// Replace the root of the widget tree
    fn attach_root_widget(&mut self, root: Option<Self::Widget>);

    /// Frames the framework requested on its own since the last call.
    /// Returns the layer-tree regeneration hint if a frame is pending.
    fn take_frame_request(&mut self) -> Option<bool> {
        None
    }

    /// Deep textual dump of the render tree, if the framework supports it
    fn render_tree_dump(&self) -> Option<String> {
        None
    }
}
