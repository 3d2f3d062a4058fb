use std::fmt;

use crate::traits::{FrameworkWindow, HostEnvironment, MetricsSource};

use super::event::HostEvent;
use super::metrics::{EdgeInsets, ViewMetrics};
use super::scope::WindowScope;

/// Opaque identity of a framework window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Adapter lifecycle; `Disabled` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Uninitialized,
    Enabled,
    Disabled,
}

/// Outcome of handing a GUI event to the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Event reached the framework window
    Forwarded,
    /// Idle repaint, nothing changed since the last paint
    Suppressed,
}

impl Dispatch {
    pub fn was_forwarded(&self) -> bool {
        *self == Dispatch::Forwarded
    }
}

/// Translates host frame and input callbacks into calls on one framework
/// window, and skips paint passes when nothing changed.
pub struct WindowAdapter<W: FrameworkWindow> {
    id: WindowId,
    window: W,
    state: AdapterState,
    needs_paint: bool,
    last_metrics: Option<ViewMetrics>,
    safe_area_padding: EdgeInsets,
    safe_area_insets: EdgeInsets,
}

impl<W: FrameworkWindow> WindowAdapter<W> {
    pub fn new(id: WindowId, window: W) -> Self {
        Self {
            id,
            window,
            state: AdapterState::Uninitialized,
            needs_paint: false,
            last_metrics: None,
            safe_area_padding: EdgeInsets::ZERO,
            safe_area_insets: EdgeInsets::ZERO,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    pub fn needs_paint(&self) -> bool {
        self.needs_paint
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    /// Metrics most recently pushed into the framework
    pub fn metrics(&self) -> Option<&ViewMetrics> {
        self.last_metrics.as_ref()
    }

    pub fn safe_area_padding(&self) -> EdgeInsets {
        self.safe_area_padding
    }

    pub fn safe_area_insets(&self) -> EdgeInsets {
        self.safe_area_insets
    }

    fn assert_enabled(&self) {
        debug_assert_eq!(
            self.state,
            AdapterState::Enabled,
            "{} used while {:?}",
            self.id,
            self.state
        );
    }

    pub fn on_enable(&mut self) {
        debug_assert_eq!(self.state, AdapterState::Uninitialized, "{} enabled twice", self.id);
        self.state = AdapterState::Enabled;
        self.window.on_enable();
        log::debug!("{} enabled", self.id);
    }

    pub fn on_disable(&mut self) {
        self.assert_enabled();
        self.window.on_disable();
        self.state = AdapterState::Disabled;
        log::debug!("{} disabled", self.id);
    }

    /// Per-frame framework housekeeping; picks up frames the framework
    /// scheduled on its own.
    pub fn update(&mut self) {
        self.assert_enabled();
        self.window.update();
        if self.window.take_frame_request().is_some() {
            self.needs_paint = true;
        }
    }

    pub fn schedule_frame(&mut self, regenerate_layer_tree: bool) {
        self.assert_enabled();
        self.window.schedule_frame(regenerate_layer_tree);
        self.needs_paint = true;
    }

    /// Out-of-band viewport change: the next GUI pass re-reads metrics
    pub fn on_view_metrics_changed(&mut self) {
        self.assert_enabled();
        self.window.on_view_metrics_changed();
        self.last_metrics = None;
    }

    pub fn update_safe_area(&mut self, source: &dyn MetricsSource) {
        self.safe_area_padding = source.view_padding();
        self.safe_area_insets = source.view_insets();
    }

    pub fn display_metrics_changed(&self, source: &dyn MetricsSource) -> bool {
        self.last_metrics != Some(ViewMetrics::from_source(source))
    }

    pub fn has_focus(&self, host: &dyn HostEnvironment) -> bool {
        host.has_focus_target()
    }

    /// One host GUI pass. Repaint events are dropped unless a frame was
    /// scheduled or the metrics moved since the last paint.
    pub fn on_gui(&mut self, event: &HostEvent, source: &dyn MetricsSource, has_focus: bool) -> Dispatch {
        self.assert_enabled();

        let current = ViewMetrics::from_source(source);
        if self.last_metrics != Some(current) {
            self.update_safe_area(source);
            self.window.apply_view_metrics(&current);
            self.last_metrics = Some(current);
            self.needs_paint = true;
        }

        if event.is_repaint() {
            if !self.needs_paint {
                log::trace!("{} idle repaint suppressed", self.id);
                return Dispatch::Suppressed;
            }
            self.needs_paint = false;
        }

        self.window.on_gui(event, has_focus);
        Dispatch::Forwarded
    }

    /// Make this window ambient until the returned guard drops
    pub fn scope(&self) -> WindowScope {
        WindowScope::enter(self.id)
    }

    /// Replace the root widget. `scope` proves the tree was built with this
    /// window ambient.
    pub fn attach_root_widget(&mut self, scope: &WindowScope, root: Option<W::Widget>) {
        self.assert_enabled();
        debug_assert_eq!(
            scope.window_id(),
            self.id,
            "root attached to {} under a scope for {}",
            self.id,
            scope.window_id()
        );
        self.window.attach_root_widget(root);
        self.needs_paint = true;
    }
}

impl<W: FrameworkWindow> fmt::Debug for WindowAdapter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowAdapter")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("needs_paint", &self.needs_paint)
            .finish_non_exhaustive()
    }
}
