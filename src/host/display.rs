use std::sync::Arc;

use winit::window::Window;

use crate::core::metrics::EdgeInsets;
use crate::traits::{DisplayMetrics, DisplayMetricsProvider};

/// Metrics provider backed by a winit window's scale factor
pub struct WinitMetricsProvider {
    window: Arc<Window>,
}

impl WinitMetricsProvider {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl DisplayMetricsProvider for WinitMetricsProvider {
    fn provide(&self) -> Box<dyn DisplayMetrics> {
        Box::new(WinitDisplayMetrics {
            window: Arc::clone(&self.window),
            device_pixel_ratio: 1.0,
        })
    }
}

/// Desktop windows report no safe area, only a scale factor
pub struct WinitDisplayMetrics {
    window: Arc<Window>,
    device_pixel_ratio: f32,
}

impl WinitDisplayMetrics {
    fn poll(&mut self) {
        self.device_pixel_ratio = self.window.scale_factor() as f32;
    }
}

impl DisplayMetrics for WinitDisplayMetrics {
    fn on_enable(&mut self) {
        self.poll();
    }

    fn update(&mut self) {
        self.poll();
    }

    fn on_view_metrics_changed(&mut self) {
        self.poll();
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    fn view_padding(&self) -> EdgeInsets {
        EdgeInsets::ZERO
    }

    fn view_insets(&self) -> EdgeInsets {
        EdgeInsets::ZERO
    }
}
