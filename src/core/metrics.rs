use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::traits::{DisplayMetrics, DisplayMetricsProvider, MetricsSource};

/// MSAA sample count used when hardware anti-aliasing is enabled
pub const DEFAULT_ANTI_ALIASING: u32 = 4;

/// Rectangular inset in logical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl EdgeInsets {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Same inset on every edge
    pub const fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Scale into physical pixels
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(
            self.left * factor,
            self.top * factor,
            self.right * factor,
            self.bottom * factor,
        )
    }
}

/// Everything the framework's coordinate model needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMetrics {
    pub device_pixel_ratio: f32,
    pub anti_aliasing: u32,
    /// Logical window size
    pub window_size: Vec2,
    pub padding: EdgeInsets,
    pub insets: EdgeInsets,
}

impl ViewMetrics {
    /// Query every value from a metrics source
    pub fn from_source(source: &dyn MetricsSource) -> Self {
        Self {
            device_pixel_ratio: source.device_pixel_ratio(),
            anti_aliasing: source.anti_aliasing(),
            window_size: source.window_size(),
            padding: source.view_padding(),
            insets: source.view_insets(),
        }
    }

    /// Window size in physical pixels
    pub fn physical_size(&self) -> Vec2 {
        self.window_size * self.device_pixel_ratio
    }
}

/// Override wins when positive, otherwise the provider's value is used.
/// A provider reporting NaN, infinity or a non-positive ratio reads as 1.
pub fn resolve_device_pixel_ratio(override_ratio: f32, provider_ratio: f32) -> f32 {
    if override_ratio > 0.0 {
        override_ratio
    } else if provider_ratio > 0.0 && provider_ratio.is_finite() {
        provider_ratio
    } else {
        1.0
    }
}

/// Raw values a device reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceReadings {
    pub device_pixel_ratio: f32,
    pub padding: EdgeInsets,
    pub insets: EdgeInsets,
}

impl Default for DeviceReadings {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            padding: EdgeInsets::ZERO,
            insets: EdgeInsets::ZERO,
        }
    }
}

/// Provider whose readings are set by hand. Embedders without a platform
/// metrics source and tests use it; every snapshot it hands out polls the
/// same shared readings.
#[derive(Debug, Clone, Default)]
pub struct ManualMetricsProvider {
    readings: Rc<RefCell<DeviceReadings>>,
}

impl ManualMetricsProvider {
    pub fn new(device_pixel_ratio: f32) -> Self {
        Self {
            readings: Rc::new(RefCell::new(DeviceReadings {
                device_pixel_ratio,
                ..DeviceReadings::default()
            })),
        }
    }

    pub fn readings(&self) -> DeviceReadings {
        *self.readings.borrow()
    }

    pub fn set_device_pixel_ratio(&self, ratio: f32) {
        self.readings.borrow_mut().device_pixel_ratio = ratio;
    }

    pub fn set_padding(&self, padding: EdgeInsets) {
        self.readings.borrow_mut().padding = padding;
    }

    pub fn set_insets(&self, insets: EdgeInsets) {
        self.readings.borrow_mut().insets = insets;
    }
}

impl DisplayMetricsProvider for ManualMetricsProvider {
    fn provide(&self) -> Box<dyn DisplayMetrics> {
        Box::new(PolledDisplayMetrics::new(Rc::clone(&self.readings)))
    }
}

/// Snapshot refreshed from shared readings once per `update`
#[derive(Debug)]
pub struct PolledDisplayMetrics {
    source: Rc<RefCell<DeviceReadings>>,
    snapshot: DeviceReadings,
    enabled: bool,
}

impl PolledDisplayMetrics {
    pub fn new(source: Rc<RefCell<DeviceReadings>>) -> Self {
        let snapshot = *source.borrow();
        Self {
            source,
            snapshot,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn poll(&mut self) {
        self.snapshot = *self.source.borrow();
    }
}

impl DisplayMetrics for PolledDisplayMetrics {
    fn on_enable(&mut self) {
        self.enabled = true;
        self.poll();
    }

    fn update(&mut self) {
        self.poll();
    }

    fn on_view_metrics_changed(&mut self) {
        self.poll();
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.snapshot.device_pixel_ratio
    }

    fn view_padding(&self) -> EdgeInsets {
        self.snapshot.padding
    }

    fn view_insets(&self) -> EdgeInsets {
        self.snapshot.insets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_ratio_prefers_positive_override() {
        for provider in [0.5, 1.0, 2.0, 3.5] {
            assert_eq!(resolve_device_pixel_ratio(3.0, provider), 3.0);
        }
    }

    #[test]
    fn test_resolve_ratio_zero_override_uses_provider() {
        assert_eq!(resolve_device_pixel_ratio(0.0, 2.0), 2.0);
        assert_eq!(resolve_device_pixel_ratio(0.0, 1.25), 1.25);
    }

    #[test]
    fn test_resolve_ratio_rejects_broken_provider_values() {
        assert_eq!(resolve_device_pixel_ratio(0.0, f32::NAN), 1.0);
        assert_eq!(resolve_device_pixel_ratio(0.0, f32::INFINITY), 1.0);
        assert_eq!(resolve_device_pixel_ratio(0.0, -2.0), 1.0);
        assert_eq!(resolve_device_pixel_ratio(2.0, f32::NAN), 2.0);
    }

    #[test]
    fn test_edge_insets_sums_and_scaling() {
        let insets = EdgeInsets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.horizontal(), 4.0);
        assert_eq!(insets.vertical(), 6.0);
        assert_eq!(insets.scaled(2.0), EdgeInsets::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(EdgeInsets::all(5.0).horizontal(), 10.0);
    }

    #[test]
    fn test_physical_size() {
        let metrics = ViewMetrics {
            device_pixel_ratio: 2.0,
            anti_aliasing: 0,
            window_size: Vec2::new(400.0, 300.0),
            padding: EdgeInsets::ZERO,
            insets: EdgeInsets::ZERO,
        };
        assert_eq!(metrics.physical_size(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_polled_metrics_only_change_on_update() {
        let provider = ManualMetricsProvider::new(1.0);
        let mut metrics = provider.provide();
        metrics.on_enable();
        assert_eq!(metrics.device_pixel_ratio(), 1.0);

        provider.set_device_pixel_ratio(2.0);
        provider.set_insets(EdgeInsets::new(0.0, 0.0, 0.0, 120.0));
        // Snapshot holds until polled
        assert_eq!(metrics.device_pixel_ratio(), 1.0);

        metrics.update();
        assert_eq!(metrics.device_pixel_ratio(), 2.0);
        assert_eq!(metrics.view_insets().bottom, 120.0);
    }

    #[test]
    fn test_view_metrics_changed_repolls() {
        let provider = ManualMetricsProvider::new(1.0);
        let mut metrics = provider.provide();
        metrics.on_enable();

        provider.set_padding(EdgeInsets::all(8.0));
        metrics.on_view_metrics_changed();
        assert_eq!(metrics.view_padding(), EdgeInsets::all(8.0));
    }

    #[test]
    fn test_edge_insets_deserialize() {
        let insets: EdgeInsets =
            serde_json::from_str(r#"{"left":1.0,"top":2.0,"right":3.0,"bottom":4.0}"#).unwrap();
        assert_eq!(insets, EdgeInsets::new(1.0, 2.0, 3.0, 4.0));
    }
}
