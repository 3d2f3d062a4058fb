use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::window_adapter::WindowId;

/// Identifier a widget uses for its raycastable rectangle
pub type WidgetId = u64;

/// Area of a widget that accepts hits, in panel-local logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastableRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    /// Layout moved the widget and the rect has not been refreshed yet
    pub dirty: bool,
}

impl RaycastableRect {
    pub fn from_offset_size(offset: Vec2, size: Vec2) -> Self {
        Self {
            left: offset.x,
            top: offset.y,
            right: offset.x + size.x,
            bottom: offset.y + size.y,
            dirty: false,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Hit-test state of one registered window
#[derive(Debug, Clone, Default)]
pub struct RaycastState {
    rects: HashMap<WidgetId, RaycastableRect>,
}

impl RaycastState {
    pub fn rect(&self, widget: WidgetId) -> Option<&RaycastableRect> {
        self.rects.get(&widget)
    }

    pub fn rect_count(&self) -> usize {
        self.rects.len()
    }

    /// Whether a clean rect covers `point`
    pub fn accepts(&self, point: Vec2) -> bool {
        self.rects.values().any(|rect| !rect.dirty && rect.contains(point))
    }
}

/// Table shared by every panel that answers host raycasts.
///
/// Single-threaded like the rest of the frame loop; a multi-threaded host
/// needs an exclusive-writer/many-reader lock around it.
#[derive(Debug, Default)]
pub struct RaycastRegistry {
    windows: HashMap<WindowId, RaycastState>,
}

impl RaycastRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window. A duplicate registration is rejected and the existing
    /// entry kept; returns whether an entry was created.
    pub fn register(&mut self, window: WindowId) -> bool {
        if self.windows.contains_key(&window) {
            log::warn!("{} already registered for raycasts", window);
            return false;
        }
        self.windows.insert(window, RaycastState::default());
        log::debug!("{} registered for raycasts", window);
        true
    }

    /// Remove a window; unknown ids are ignored
    pub fn unregister(&mut self, window: WindowId) -> bool {
        let removed = self.windows.remove(&window).is_some();
        if removed {
            log::debug!("{} unregistered from raycasts", window);
        }
        removed
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn state(&self, window: WindowId) -> Option<&RaycastState> {
        self.windows.get(&window)
    }

    /// Whether a hit at panel-local `point` lands on a raycastable widget.
    /// `None` means the window is not registered.
    pub fn is_valid(&self, window: WindowId, point: Vec2) -> Option<bool> {
        self.windows.get(&window).map(|state| state.accepts(point))
    }

    /// Store a widget's laid-out rect and mark it clean
    pub fn update_rect(&mut self, window: WindowId, widget: WidgetId, offset: Vec2, size: Vec2) -> bool {
        match self.windows.get_mut(&window) {
            Some(state) => {
                state
                    .rects
                    .insert(widget, RaycastableRect::from_offset_size(offset, size));
                true
            }
            None => false,
        }
    }

    /// Flag a widget's rect as stale until its next `update_rect`
    pub fn mark_dirty(&mut self, window: WindowId, widget: WidgetId) -> bool {
        match self
            .windows
            .get_mut(&window)
            .and_then(|state| state.rects.get_mut(&widget))
        {
            Some(rect) => {
                rect.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn dispose_widget(&mut self, window: WindowId, widget: WidgetId) -> bool {
        self.windows
            .get_mut(&window)
            .is_some_and(|state| state.rects.remove(&widget).is_some())
    }
}

/// How a raycastable panel decides hit validity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// Every hit inside the panel is accepted
    #[default]
    AlwaysValid,
    /// Hits are accepted only over registered widget rects
    Registry,
}

/// Capability that lets a panel take part in host raycasts
#[derive(Debug, Clone, Default)]
pub struct HitTestParticipant {
    policy: HitPolicy,
    window: Option<WindowId>,
}

impl HitTestParticipant {
    pub fn new(policy: HitPolicy) -> Self {
        Self { policy, window: None }
    }

    pub fn policy(&self) -> HitPolicy {
        self.policy
    }

    pub fn window_id(&self) -> Option<WindowId> {
        self.window
    }

    /// Register the panel's freshly created window
    pub fn attach(&mut self, registry: &mut RaycastRegistry, window: WindowId) {
        debug_assert!(self.window.is_none(), "hit-test participant attached twice");
        registry.register(window);
        self.window = Some(window);
    }

    /// Remove the registry entry once the panel's window is gone
    pub fn detach(&mut self, registry: &mut RaycastRegistry) {
        if let Some(window) = self.window.take() {
            registry.unregister(window);
        }
    }

    pub fn is_hit_valid(&self, registry: &RaycastRegistry, local_point: Vec2) -> bool {
        match self.policy {
            HitPolicy::AlwaysValid => true,
            HitPolicy::Registry => self
                .window
                .and_then(|window| registry.is_valid(window, local_point))
                .unwrap_or(false),
        }
    }
}
