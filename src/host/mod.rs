//! Winit, egui and wgpu glue for running panels in a desktop window

pub mod display;
pub mod egui_window;
pub mod surface;
pub mod winit_host;

pub use display::{WinitDisplayMetrics, WinitMetricsProvider};
pub use egui_window::{translate_event, EguiWidget, EguiWindow, PaintJob};
pub use surface::SurfaceRenderer;
pub use winit_host::WinitHost;
