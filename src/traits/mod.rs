pub mod camera;
pub mod content;
pub mod display_metrics;
pub mod host;
pub mod window;

pub use camera::*;
pub use content::*;
pub use display_metrics::*;
pub use host::*;
pub use window::*;
