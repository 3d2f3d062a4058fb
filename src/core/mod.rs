pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod messages;
pub mod metrics;
pub mod panel;
pub mod raycast;
pub mod scope;
pub mod window_adapter;

pub use config::PanelConfig;
pub use context::HostContext;
pub use error::PanelError;
pub use event::{EventKind, HostEvent, Key, PointerButton, PointerId, MOUSE_POINTER_ID};
pub use messages::{MessageManager, SubscriberId, VIEW_METRICS_CHANNEL};
pub use metrics::{
    DeviceReadings, EdgeInsets, ManualMetricsProvider, PolledDisplayMetrics, ViewMetrics, DEFAULT_ANTI_ALIASING,
};
pub use panel::{Panel, PanelMetrics, PanelState};
pub use raycast::{HitPolicy, HitTestParticipant, RaycastRegistry, RaycastState, RaycastableRect, WidgetId};
pub use scope::{current_window, WindowScope};
pub use window_adapter::{AdapterState, Dispatch, WindowAdapter, WindowId};
