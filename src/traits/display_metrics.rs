use glam::Vec2;

use crate::core::metrics::EdgeInsets;

/// Per-frame snapshot of device metrics for one panel
pub trait DisplayMetrics {
    /// Start polling the device
    fn on_enable(&mut self);

    /// Refresh the snapshot; called once per host frame
    fn update(&mut self);

    /// The host reported a viewport change out of band
    fn on_view_metrics_changed(&mut self);

    /// Physical pixels per logical pixel
    fn device_pixel_ratio(&self) -> f32;

    /// Safe-area padding (notches, rounded corners)
    fn view_padding(&self) -> EdgeInsets;

    /// Insets obscured by system UI such as an on-screen keyboard
    fn view_insets(&self) -> EdgeInsets;
}

/// Source of `DisplayMetrics` snapshots, one per enabled panel
pub trait DisplayMetricsProvider {
    /// Acquire a fresh snapshot
    fn provide(&self) -> Box<dyn DisplayMetrics>;
}

/// Metrics as resolved by a panel (overrides applied)
pub trait MetricsSource {
    fn device_pixel_ratio(&self) -> f32;
    fn anti_aliasing(&self) -> u32;
    fn window_size(&self) -> Vec2;
    fn view_padding(&self) -> EdgeInsets;
    fn view_insets(&self) -> EdgeInsets;
}
