use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use glam::Vec2;
use panel_host::core::{
    current_window, Dispatch, EventKind, HostContext, HostEvent, ManualMetricsProvider, Panel, PanelConfig,
    PanelError, PanelState, ViewMetrics, WindowId, WindowScope, MOUSE_POINTER_ID, VIEW_METRICS_CHANNEL,
};
use panel_host::traits::{FrameworkWindow, HostEnvironment, PanelContent};

/// What the framework side observed, shared with the test body
#[derive(Default)]
struct Stats {
    live_windows: usize,
    windows_created: usize,
    paints: usize,
    inputs: Vec<EventKind>,
    roots: Vec<Option<String>>,
    applied: Vec<ViewMetrics>,
    view_metrics_changes: usize,
    scheduled: Vec<bool>,
    build_scopes: Vec<Option<WindowId>>,
}

struct CountingWindow {
    stats: Rc<RefCell<Stats>>,
}

impl Drop for CountingWindow {
    fn drop(&mut self) {
        self.stats.borrow_mut().live_windows -= 1;
    }
}

impl FrameworkWindow for CountingWindow {
    type Widget = String;

    fn on_enable(&mut self) {}

    fn on_disable(&mut self) {}

    fn update(&mut self) {}

    fn on_gui(&mut self, event: &HostEvent, _has_focus: bool) {
        let mut stats = self.stats.borrow_mut();
        if event.is_repaint() {
            stats.paints += 1;
        } else {
            stats.inputs.push(event.kind);
        }
    }

    fn schedule_frame(&mut self, regenerate_layer_tree: bool) {
        self.stats.borrow_mut().scheduled.push(regenerate_layer_tree);
    }

    fn on_view_metrics_changed(&mut self) {
        self.stats.borrow_mut().view_metrics_changes += 1;
    }

    fn apply_view_metrics(&mut self, metrics: &ViewMetrics) {
        self.stats.borrow_mut().applied.push(*metrics);
    }

    fn attach_root_widget(&mut self, root: Option<String>) {
        self.stats.borrow_mut().roots.push(root);
    }
}

struct LabelContent {
    stats: Rc<RefCell<Stats>>,
    builds: u32,
    fail_next_build: bool,
}

impl PanelContent for LabelContent {
    type Window = CountingWindow;

    fn create_window(&mut self) -> CountingWindow {
        let mut stats = self.stats.borrow_mut();
        stats.live_windows += 1;
        stats.windows_created += 1;
        assert!(stats.live_windows <= 1, "more than one live window for a panel");
        CountingWindow {
            stats: Rc::clone(&self.stats),
        }
    }

    fn create_widget(&mut self, scope: &WindowScope) -> anyhow::Result<Option<String>> {
        self.stats.borrow_mut().build_scopes.push(current_window());
        assert_eq!(current_window(), Some(scope.window_id()));
        if std::mem::take(&mut self.fail_next_build) {
            return Err(anyhow!("widget tree failed to build"));
        }
        self.builds += 1;
        Ok(Some(format!("label #{}", self.builds)))
    }
}

struct MockHost {
    synthesis: bool,
    pointer: Vec2,
    focused: bool,
}

impl HostEnvironment for MockHost {
    fn set_touch_mouse_synthesis(&mut self, enabled: bool) {
        self.synthesis = enabled;
    }

    fn pointer_position(&self) -> Vec2 {
        self.pointer
    }

    fn has_focus_target(&self) -> bool {
        self.focused
    }
}

struct Fixture {
    ctx: HostContext,
    host: MockHost,
    provider: ManualMetricsProvider,
    stats: Rc<RefCell<Stats>>,
    panel: Panel<LabelContent>,
}

fn fixture(config: PanelConfig) -> Fixture {
    let stats = Rc::new(RefCell::new(Stats::default()));
    let provider = ManualMetricsProvider::new(1.0);
    let content = LabelContent {
        stats: Rc::clone(&stats),
        builds: 0,
        fail_next_build: false,
    };
    let mut panel = Panel::new(content, config).with_metrics_provider(Rc::new(provider.clone()));
    panel.set_size(Vec2::new(320.0, 240.0));
    Fixture {
        ctx: HostContext::new(),
        host: MockHost {
            synthesis: true,
            pointer: Vec2::new(3.0, 4.0),
            focused: true,
        },
        provider,
        stats,
        panel,
    }
}

fn enabled(config: PanelConfig) -> Fixture {
    let mut f = fixture(config);
    f.panel.enable(&mut f.ctx, &mut f.host).unwrap();
    f
}

impl Fixture {
    fn update(&mut self) -> Dispatch {
        self.panel.update(&self.ctx, &self.host).unwrap()
    }

    fn disable(&mut self) {
        self.panel.disable(&mut self.ctx).unwrap();
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_enable_disable_keeps_at_most_one_live_window() {
    let mut f = enabled(PanelConfig::default());
    assert_eq!(f.stats.borrow().live_windows, 1);
    let first_id = f.panel.window().unwrap().id();

    f.disable();
    assert_eq!(f.stats.borrow().live_windows, 0);
    assert!(f.panel.window().is_none());

    f.panel.enable(&mut f.ctx, &mut f.host).unwrap();
    assert_eq!(f.stats.borrow().live_windows, 1);
    assert_eq!(f.stats.borrow().windows_created, 2);
    assert_ne!(f.panel.window().unwrap().id(), first_id);
    f.disable();
}

#[test]
fn test_enable_turns_off_touch_synthesis_and_records_pointer() {
    let mut f = enabled(PanelConfig::default());
    assert!(!f.host.synthesis);
    assert_eq!(f.panel.last_pointer_position(), Vec2::new(3.0, 4.0));
    assert!(f.ctx.has_repaint_event());
    assert_eq!(f.panel.state(), PanelState::Enabled);
    f.disable();
}

#[test]
fn test_root_built_inside_window_scope() {
    let mut f = enabled(PanelConfig::default());
    let id = f.panel.window().unwrap().id();
    assert_eq!(f.stats.borrow().build_scopes, vec![Some(id)]);
    assert_eq!(f.stats.borrow().roots, vec![Some("label #1".to_string())]);
    // Scope released after the build
    assert_eq!(current_window(), None);
    f.disable();
}

#[test]
fn test_failed_build_leaves_panel_disabled() {
    let mut f = fixture(PanelConfig::default());
    f.panel.content_mut().fail_next_build = true;

    let err = f.panel.enable(&mut f.ctx, &mut f.host).unwrap_err();
    assert!(matches!(err, PanelError::WidgetBuild(_)));
    assert_eq!(f.panel.state(), PanelState::Disabled);
    assert_eq!(f.stats.borrow().live_windows, 0);

    // Retry succeeds
    f.panel.enable(&mut f.ctx, &mut f.host).unwrap();
    assert_eq!(f.stats.borrow().live_windows, 1);
    f.disable();
}

#[test]
fn test_recreate_widget_keeps_window_identity() {
    let mut f = enabled(PanelConfig::default());
    let id = f.panel.window().unwrap().id();

    f.panel.recreate_widget().unwrap();

    assert_eq!(f.panel.window().unwrap().id(), id);
    assert_eq!(f.stats.borrow().windows_created, 1);
    assert_eq!(
        f.stats.borrow().roots,
        vec![Some("label #1".to_string()), Some("label #2".to_string())]
    );
    f.disable();
}

#[test]
fn test_recreate_widget_while_disabled_fails() {
    let mut f = fixture(PanelConfig::default());
    assert!(matches!(f.panel.recreate_widget(), Err(PanelError::NotEnabled)));
}

// ============================================================================
// Repaint gating
// ============================================================================

#[test]
fn test_idle_frames_paint_once() {
    let mut f = enabled(PanelConfig::default());

    assert_eq!(f.update(), Dispatch::Forwarded);
    for _ in 0..10 {
        assert_eq!(f.update(), Dispatch::Suppressed);
    }
    assert_eq!(f.stats.borrow().paints, 1);
    f.disable();
}

#[test]
fn test_scheduled_frame_paints_exactly_once() {
    let mut f = enabled(PanelConfig::default());
    f.update();

    f.panel.schedule_frame(true).unwrap();
    assert_eq!(f.update(), Dispatch::Forwarded);
    assert_eq!(f.update(), Dispatch::Suppressed);
    assert_eq!(f.stats.borrow().paints, 2);
    assert_eq!(f.stats.borrow().scheduled, vec![true]);
    f.disable();
}

#[test]
fn test_input_forwarded_while_idle() {
    let mut f = enabled(PanelConfig::default());
    f.update();

    let event = HostEvent::pointer(EventKind::PointerMove, MOUSE_POINTER_ID, Vec2::new(9.0, 9.0));
    assert_eq!(f.panel.dispatch_input(&f.host, &event).unwrap(), Dispatch::Forwarded);
    assert_eq!(f.stats.borrow().inputs, vec![EventKind::PointerMove]);
    assert_eq!(f.panel.last_pointer_position(), Vec2::new(9.0, 9.0));

    // Input alone does not schedule a paint
    assert_eq!(f.update(), Dispatch::Suppressed);
    f.disable();
}

#[test]
fn test_device_ratio_change_repaints() {
    let mut f = enabled(PanelConfig::default());
    f.update();
    assert_eq!(f.update(), Dispatch::Suppressed);

    f.provider.set_device_pixel_ratio(2.0);
    assert_eq!(f.update(), Dispatch::Forwarded);

    let stats = f.stats.borrow();
    let last = stats.applied.last().unwrap();
    assert_eq!(last.device_pixel_ratio, 2.0);
    assert_eq!(last.physical_size(), Vec2::new(640.0, 480.0));
    drop(stats);
    f.disable();
}

#[test]
fn test_resize_repaints() {
    let mut f = enabled(PanelConfig::default());
    f.update();

    f.panel.set_size(Vec2::new(100.0, 50.0));
    assert_eq!(f.update(), Dispatch::Forwarded);
    assert_eq!(f.stats.borrow().applied.last().unwrap().window_size, Vec2::new(100.0, 50.0));
    f.disable();
}

// ============================================================================
// Metrics
// ============================================================================

#[test]
fn test_ratio_override_beats_device() {
    let config = PanelConfig {
        device_pixel_ratio_override: 2.0,
        ..PanelConfig::default()
    };
    let mut f = enabled(config);
    f.provider.set_device_pixel_ratio(3.0);
    f.update();
    assert_eq!(f.panel.device_pixel_ratio(), 2.0);
    assert_eq!(f.stats.borrow().applied.last().unwrap().device_pixel_ratio, 2.0);

    // Clearing the override falls back to the device
    f.panel.set_device_pixel_ratio_override(0.0);
    assert_eq!(f.update(), Dispatch::Forwarded);
    assert_eq!(f.panel.device_pixel_ratio(), 3.0);
    assert_eq!(f.stats.borrow().applied.last().unwrap().device_pixel_ratio, 3.0);
    f.disable();
}

#[test]
fn test_anti_aliasing_reported_as_four_samples() {
    let config = PanelConfig {
        hardware_anti_aliasing: true,
        ..PanelConfig::default()
    };
    let mut f = enabled(config);
    f.update();
    assert_eq!(f.stats.borrow().applied.last().unwrap().anti_aliasing, 4);

    f.panel.set_hardware_anti_aliasing(false);
    f.update();
    assert_eq!(f.stats.borrow().applied.last().unwrap().anti_aliasing, 0);
    f.disable();
}

#[test]
fn test_view_metrics_channel_subscribed_once() {
    let mut f = enabled(PanelConfig::default());
    for _ in 0..5 {
        f.update();
    }
    assert!(f.panel.view_metrics_callback_registered());
    assert_eq!(f.ctx.messages().handler_count(VIEW_METRICS_CHANNEL), 1);

    let delivered = f
        .ctx
        .messages()
        .deliver(VIEW_METRICS_CHANNEL, "onViewMetricsChanged", &[serde_json::json!(2.0)]);
    assert_eq!(delivered, 1);

    // Picked up on the next frame, which repaints with fresh metrics
    assert_eq!(f.update(), Dispatch::Forwarded);
    assert_eq!(f.stats.borrow().view_metrics_changes, 1);

    f.panel.unsubscribe(&f.ctx);
    assert_eq!(f.ctx.messages().handler_count(VIEW_METRICS_CHANNEL), 0);
    f.disable();
}

#[test]
fn test_disabled_panels_leave_no_channel_handlers() {
    let mut ctx = HostContext::new();
    let mut host = MockHost {
        synthesis: true,
        pointer: Vec2::ZERO,
        focused: true,
    };

    for _ in 0..5 {
        let mut f = fixture(PanelConfig::default());
        f.panel.enable(&mut ctx, &mut host).unwrap();
        f.panel.update(&ctx, &host).unwrap();
        assert_eq!(ctx.messages().handler_count(VIEW_METRICS_CHANNEL), 1);

        f.panel.disable(&mut ctx).unwrap();
        assert_eq!(ctx.messages().handler_count(VIEW_METRICS_CHANNEL), 0);
    }

    let delivered = ctx
        .messages()
        .deliver(VIEW_METRICS_CHANNEL, "onViewMetricsChanged", &[]);
    assert_eq!(delivered, 0);
}

#[test]
fn test_reenabled_panel_subscribes_again_once() {
    let mut f = enabled(PanelConfig::default());
    f.update();
    f.disable();

    f.panel.enable(&mut f.ctx, &mut f.host).unwrap();
    f.update();
    f.update();
    assert!(f.panel.view_metrics_callback_registered());
    assert_eq!(f.ctx.messages().handler_count(VIEW_METRICS_CHANNEL), 1);
    f.disable();
}

#[test]
fn test_non_finite_device_ratio_still_idles() {
    let mut f = enabled(PanelConfig::default());
    f.provider.set_device_pixel_ratio(f32::NAN);

    assert_eq!(f.update(), Dispatch::Forwarded);
    assert_eq!(f.panel.device_pixel_ratio(), 1.0);
    for _ in 0..3 {
        assert_eq!(f.update(), Dispatch::Suppressed);
    }
    assert_eq!(f.stats.borrow().paints, 1);
    f.disable();
}

#[test]
fn test_safe_area_follows_device() {
    let mut f = enabled(PanelConfig::default());
    f.update();

    let padding = panel_host::core::EdgeInsets::new(0.0, 44.0, 0.0, 34.0);
    f.provider.set_padding(padding);
    assert_eq!(f.update(), Dispatch::Forwarded);
    assert_eq!(f.panel.view_padding(), padding);
    assert_eq!(f.panel.window().unwrap().safe_area_padding(), padding);
    f.disable();
}

// ============================================================================
// Pointers
// ============================================================================

#[test]
fn test_pointer_enter_exit_routed_through_dispatch() {
    let mut f = enabled(PanelConfig::default());

    let enter = HostEvent::pointer(EventKind::PointerEnter, 5, Vec2::ZERO);
    f.panel.dispatch_input(&f.host, &enter).unwrap();
    assert!(f.panel.mouse_entered());
    assert!(f.panel.is_pointer_entered(5));

    let exit = HostEvent::pointer(EventKind::PointerExit, 5, Vec2::ZERO);
    f.panel.dispatch_input(&f.host, &exit).unwrap();
    assert!(!f.panel.mouse_entered());
    f.disable();
}

#[test]
fn test_dispatch_while_disabled_fails() {
    let mut f = fixture(PanelConfig::default());
    let event = HostEvent::text("x");
    assert!(matches!(f.panel.dispatch_input(&f.host, &event), Err(PanelError::NotEnabled)));
}
