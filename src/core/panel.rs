use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use glam::Vec2;

use crate::traits::{
    DisplayMetrics, DisplayMetricsProvider, EventCamera, FrameworkWindow, HostEnvironment, MetricsSource,
    PanelContent,
};

use super::config::{sanitize_ratio_override, PanelConfig};
use super::context::HostContext;
use super::error::PanelError;
use super::event::{EventKind, HostEvent, PointerId};
use super::messages::{SubscriberId, VIEW_METRICS_CHANNEL};
use super::metrics::{resolve_device_pixel_ratio, EdgeInsets, DEFAULT_ANTI_ALIASING};
use super::raycast::HitTestParticipant;
use super::window_adapter::{Dispatch, WindowAdapter};

/// Panel lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Disabled,
    Enabling,
    Enabled,
    Disabling,
}

/// Metrics as the panel resolves them: config overrides applied on top of
/// the device snapshot.
pub struct PanelMetrics<'a> {
    config: &'a PanelConfig,
    metrics: Option<&'a dyn DisplayMetrics>,
    size: Vec2,
}

impl<'a> PanelMetrics<'a> {
    pub fn new(config: &'a PanelConfig, metrics: Option<&'a dyn DisplayMetrics>, size: Vec2) -> Self {
        Self { config, metrics, size }
    }
}

impl MetricsSource for PanelMetrics<'_> {
    fn device_pixel_ratio(&self) -> f32 {
        let provider_ratio = self.metrics.map_or(1.0, |m| m.device_pixel_ratio());
        resolve_device_pixel_ratio(self.config.device_pixel_ratio_override, provider_ratio)
    }

    fn anti_aliasing(&self) -> u32 {
        if self.config.hardware_anti_aliasing {
            DEFAULT_ANTI_ALIASING
        } else {
            0
        }
    }

    fn window_size(&self) -> Vec2 {
        self.size
    }

    fn view_padding(&self) -> EdgeInsets {
        self.metrics.map_or(EdgeInsets::ZERO, |m| m.view_padding())
    }

    fn view_insets(&self) -> EdgeInsets {
        self.metrics.map_or(EdgeInsets::ZERO, |m| m.view_insets())
    }
}

/// Host object that owns one framework window while enabled and drives it
/// from the host's per-frame callbacks.
pub struct Panel<C: PanelContent> {
    content: C,
    config: PanelConfig,
    provider: Option<Rc<dyn DisplayMetricsProvider>>,
    state: PanelState,
    adapter: Option<WindowAdapter<C::Window>>,
    metrics: Option<Box<dyn DisplayMetrics>>,
    entered_pointers: HashSet<PointerId>,
    view_metrics_callback_registered: bool,
    subscriber: Option<SubscriberId>,
    view_metrics_pending: Rc<Cell<bool>>,
    last_pointer_position: Vec2,
    origin: Vec2,
    size: Vec2,
    hit_test: Option<HitTestParticipant>,
}

impl<C: PanelContent> Panel<C> {
    /// Create a disabled panel. `config.raycastable` adds a hit-test
    /// participant using `config.hit_policy`.
    pub fn new(content: C, config: PanelConfig) -> Self {
        let config = config.sanitized();
        let hit_test = config
            .raycastable
            .then(|| HitTestParticipant::new(config.hit_policy));
        Self {
            content,
            config,
            provider: None,
            state: PanelState::Disabled,
            adapter: None,
            metrics: None,
            entered_pointers: HashSet::new(),
            view_metrics_callback_registered: false,
            subscriber: None,
            view_metrics_pending: Rc::new(Cell::new(false)),
            last_pointer_position: Vec2::ZERO,
            origin: Vec2::ZERO,
            size: Vec2::ZERO,
            hit_test,
        }
    }

    pub fn with_metrics_provider(mut self, provider: Rc<dyn DisplayMetricsProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_hit_test(mut self, participant: HitTestParticipant) -> Self {
        debug_assert_eq!(self.state, PanelState::Disabled);
        self.hit_test = Some(participant);
        self
    }

    /// Takes effect on the next enable
    pub fn set_metrics_provider(&mut self, provider: Rc<dyn DisplayMetricsProvider>) {
        self.provider = Some(provider);
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == PanelState::Enabled
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    /// The live window adapter, if enabled
    pub fn window(&self) -> Option<&WindowAdapter<C::Window>> {
        self.adapter.as_ref()
    }

    pub fn window_mut(&mut self) -> Option<&mut WindowAdapter<C::Window>> {
        self.adapter.as_mut()
    }

    pub fn hit_test(&self) -> Option<&HitTestParticipant> {
        self.hit_test.as_ref()
    }

    pub fn metrics(&self) -> PanelMetrics<'_> {
        PanelMetrics::new(&self.config, self.metrics.as_deref(), self.size)
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.metrics().device_pixel_ratio()
    }

    pub fn anti_aliasing(&self) -> u32 {
        self.metrics().anti_aliasing()
    }

    pub fn view_padding(&self) -> EdgeInsets {
        self.metrics().view_padding()
    }

    pub fn view_insets(&self) -> EdgeInsets {
        self.metrics().view_insets()
    }

    pub fn set_device_pixel_ratio_override(&mut self, ratio: f32) {
        self.config.device_pixel_ratio_override = sanitize_ratio_override(ratio);
    }

    pub fn set_hardware_anti_aliasing(&mut self, enabled: bool) {
        self.config.hardware_anti_aliasing = enabled;
    }

    pub fn set_show_root(&mut self, show: bool) {
        self.config.show_root = show;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Logical size reported to the framework as the window size
    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Screen-space origin of the panel, used to localise raycasts
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn last_pointer_position(&self) -> Vec2 {
        self.last_pointer_position
    }

    pub fn mouse_entered(&self) -> bool {
        !self.entered_pointers.is_empty()
    }

    pub fn is_pointer_entered(&self, pointer: PointerId) -> bool {
        self.entered_pointers.contains(&pointer)
    }

    pub fn view_metrics_callback_registered(&self) -> bool {
        self.view_metrics_callback_registered
    }

    pub fn enable(&mut self, ctx: &mut HostContext, host: &mut dyn HostEnvironment) -> Result<(), PanelError> {
        if self.state != PanelState::Disabled {
            return Err(PanelError::AlreadyEnabled);
        }
        let provider = self
            .provider
            .clone()
            .ok_or(PanelError::MissingMetricsProvider)?;
        self.state = PanelState::Enabling;

        // Pointer semantics are handled here, not by host emulation
        host.set_touch_mouse_synthesis(false);

        let mut metrics = provider.provide();
        metrics.on_enable();
        self.metrics = Some(metrics);

        self.entered_pointers.clear();
        ctx.repaint_event();
        self.init_window_adapter(ctx);

        if let Err(err) = self.build_root() {
            log::warn!("panel enable rolled back: {}", err);
            self.teardown(ctx);
            self.state = PanelState::Disabled;
            return Err(err);
        }

        self.last_pointer_position = host.pointer_position();
        self.state = PanelState::Enabled;
        if let Some(adapter) = &self.adapter {
            log::info!("panel enabled on {}", adapter.id());
        }
        Ok(())
    }

    fn init_window_adapter(&mut self, ctx: &mut HostContext) {
        debug_assert!(self.adapter.is_none(), "panel already owns a window adapter");
        let id = ctx.allocate_window_id();
        let mut adapter = WindowAdapter::new(id, self.content.create_window());
        adapter.on_enable();
        self.adapter = Some(adapter);

        if let Some(hit_test) = self.hit_test.as_mut() {
            hit_test.attach(ctx.raycast_mut(), id);
        }
    }

    fn build_root(&mut self) -> Result<(), PanelError> {
        let adapter = self.adapter.as_mut().ok_or(PanelError::NotEnabled)?;
        let scope = adapter.scope();
        let root = self
            .content
            .create_widget(&scope)
            .map_err(PanelError::WidgetBuild)?;
        adapter.attach_root_widget(&scope, root);
        Ok(())
    }

    /// Rebuild the widget tree in place; the window keeps its identity
    pub fn recreate_widget(&mut self) -> Result<(), PanelError> {
        if self.state != PanelState::Enabled {
            return Err(PanelError::NotEnabled);
        }
        self.build_root()
    }

    /// Listen for out-of-band viewport changes. Only the first call
    /// registers a handler.
    pub fn subscribe_view_metrics(&mut self, ctx: &HostContext) {
        let messages = ctx.messages();
        if self.view_metrics_callback_registered {
            return;
        }
        self.view_metrics_callback_registered = true;

        let owner = *self
            .subscriber
            .get_or_insert_with(|| messages.allocate_subscriber());
        let pending = Rc::clone(&self.view_metrics_pending);
        messages.add_channel_message_delegate(VIEW_METRICS_CHANNEL, owner, move |method, _args| {
            log::debug!("{} received on {}", method, VIEW_METRICS_CHANNEL);
            pending.set(true);
        });
    }

    /// Drop this panel's channel handlers
    pub fn unsubscribe(&mut self, ctx: &HostContext) {
        if let Some(owner) = self.subscriber {
            ctx.messages().remove_subscriber(owner);
        }
        self.view_metrics_callback_registered = false;
        self.view_metrics_pending.set(false);
    }

    /// Forward a viewport change to both the window and the metrics snapshot
    pub fn handle_view_metrics_changed(&mut self) {
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.on_view_metrics_changed();
        }
        if let Some(metrics) = self.metrics.as_mut() {
            metrics.on_view_metrics_changed();
        }
    }

    // Channel handlers only flag the change; it lands here
    fn apply_pending_view_metrics(&mut self) {
        if self.view_metrics_pending.replace(false) {
            self.handle_view_metrics_changed();
        }
    }

    /// Per-frame tick: refresh metrics, then run the window's update and
    /// its repaint pass.
    pub fn update(&mut self, ctx: &HostContext, host: &dyn HostEnvironment) -> Result<Dispatch, PanelError> {
        if self.state != PanelState::Enabled {
            return Err(PanelError::NotEnabled);
        }
        if let Some(metrics) = self.metrics.as_mut() {
            metrics.update();
        }

        self.subscribe_view_metrics(ctx);
        self.apply_pending_view_metrics();

        self.last_pointer_position = host.pointer_position();

        let adapter = self.adapter.as_mut().ok_or(PanelError::NotEnabled)?;
        adapter.update();
        let has_focus = adapter.has_focus(host);
        let view = PanelMetrics::new(&self.config, self.metrics.as_deref(), self.size);
        let dispatch = adapter.on_gui(ctx.repaint_event(), &view, has_focus);

        if self.config.show_root {
            if let Some(dump) = adapter.window().render_tree_dump() {
                log::info!("render tree of {}:\n{}", adapter.id(), dump);
            }
        }
        Ok(dispatch)
    }

    /// Route a host input event into the window
    pub fn dispatch_input(&mut self, host: &dyn HostEnvironment, event: &HostEvent) -> Result<Dispatch, PanelError> {
        if self.state != PanelState::Enabled {
            return Err(PanelError::NotEnabled);
        }
        match event.kind {
            EventKind::PointerEnter => {
                self.on_pointer_enter(event.pointer);
            }
            EventKind::PointerExit => {
                self.on_pointer_exit(event.pointer);
            }
            _ => {}
        }
        if event.kind.is_pointer() {
            self.last_pointer_position = event.position;
        }
        self.apply_pending_view_metrics();

        let adapter = self.adapter.as_mut().ok_or(PanelError::NotEnabled)?;
        let has_focus = adapter.has_focus(host);
        let view = PanelMetrics::new(&self.config, self.metrics.as_deref(), self.size);
        Ok(adapter.on_gui(event, &view, has_focus))
    }

    /// Returns whether the pointer was not already inside
    pub fn on_pointer_enter(&mut self, pointer: PointerId) -> bool {
        self.entered_pointers.insert(pointer)
    }

    pub fn on_pointer_exit(&mut self, pointer: PointerId) -> bool {
        self.entered_pointers.remove(&pointer)
    }

    pub fn schedule_frame(&mut self, regenerate_layer_tree: bool) -> Result<(), PanelError> {
        let adapter = self.adapter.as_mut().ok_or(PanelError::NotEnabled)?;
        adapter.schedule_frame(regenerate_layer_tree);
        Ok(())
    }

    /// Convert a screen point into panel-local logical pixels
    pub fn screen_to_local(&self, screen_point: Vec2, camera: Option<&dyn EventCamera>) -> Vec2 {
        let canvas_point = camera.map_or(screen_point, |c| c.screen_to_canvas(screen_point));
        let local = canvas_point - self.origin;
        let ratio = self.device_pixel_ratio();
        if ratio > 0.0 {
            local / ratio
        } else {
            local
        }
    }

    /// Whether the host input system should deliver a hit at `screen_point`
    /// to this panel. Panels without a hit-test participant accept all hits.
    pub fn is_hit_valid(&self, ctx: &HostContext, screen_point: Vec2, camera: Option<&dyn EventCamera>) -> bool {
        match &self.hit_test {
            Some(hit_test) => hit_test.is_hit_valid(ctx.raycast(), self.screen_to_local(screen_point, camera)),
            None => true,
        }
    }

    pub fn disable(&mut self, ctx: &mut HostContext) -> Result<(), PanelError> {
        if self.state != PanelState::Enabled {
            return Err(PanelError::NotEnabled);
        }
        self.state = PanelState::Disabling;
        self.teardown(ctx);
        self.state = PanelState::Disabled;
        log::info!("panel disabled");
        Ok(())
    }

    // Window first, then channel handlers, registry entry last
    fn teardown(&mut self, ctx: &mut HostContext) {
        if let Some(mut adapter) = self.adapter.take() {
            adapter.on_disable();
        }
        self.unsubscribe(ctx);
        self.metrics = None;
        self.entered_pointers.clear();
        if let Some(hit_test) = self.hit_test.as_mut() {
            hit_test.detach(ctx.raycast_mut());
        }
    }
}

impl<C: PanelContent> Drop for Panel<C> {
    fn drop(&mut self) {
        if self.state != PanelState::Disabled {
            log::warn!(
                "panel dropped while {:?}; disable it first to release its channel handler and registry entry",
                self.state
            );
        }
    }
}
