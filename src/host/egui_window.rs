use std::fmt::Write as _;
use std::sync::Arc;

use winit::window::Window;

use crate::core::event::{EventKind, HostEvent, Key, PointerButton};
use crate::core::metrics::ViewMetrics;
use crate::traits::FrameworkWindow;

/// Root widget of an egui-backed panel: a UI closure run once per frame
pub type EguiWidget = Box<dyn FnMut(&egui::Context)>;

/// Output of one paint pass, ready for the surface renderer
pub struct PaintJob {
    pub shapes: Vec<egui::epaint::ClippedShape>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// Framework window driving an egui context.
///
/// Host events are queued into egui's raw input; a repaint event runs the
/// root widget and leaves a `PaintJob` behind. When nothing invalidated the
/// layer tree the previous shapes are replayed instead of re-running the UI.
pub struct EguiWindow {
    window: Arc<Window>,
    ctx: egui::Context,
    state: egui_winit::State,
    root: Option<EguiWidget>,
    last_shapes: Option<Vec<egui::epaint::ClippedShape>>,
    paint_job: Option<PaintJob>,
    device_pixel_ratio: f32,
    frame_requested: bool,
    regenerate_layer_tree: bool,
    frames: u64,
}

impl EguiWindow {
    pub fn new(window: Arc<Window>) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let device_pixel_ratio = window.scale_factor() as f32;

        Self {
            window,
            ctx,
            state,
            root: None,
            last_shapes: None,
            paint_job: None,
            device_pixel_ratio,
            frame_requested: false,
            regenerate_layer_tree: true,
            frames: 0,
        }
    }

    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    /// Frames painted since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn take_paint_job(&mut self) -> Option<PaintJob> {
        self.paint_job.take()
    }

    fn paint(&mut self, has_focus: bool) {
        let job = match self.last_shapes.as_ref() {
            Some(shapes) if !self.regenerate_layer_tree => PaintJob {
                shapes: shapes.clone(),
                textures_delta: egui::TexturesDelta::default(),
                pixels_per_point: self.ctx.pixels_per_point(),
            },
            _ => self.run_frame(has_focus),
        };
        self.regenerate_layer_tree = false;
        self.frames += 1;
        self.paint_job = Some(job);
    }

    fn run_frame(&mut self, has_focus: bool) -> PaintJob {
        let mut raw_input = self.state.take_egui_input(&self.window);
        raw_input.focused = has_focus;

        let root = &mut self.root;
        let full_output = self.ctx.run(raw_input, |ctx| {
            if let Some(root) = root.as_mut() {
                root(ctx);
            }
        });

        self.state
            .handle_platform_output(&self.window, full_output.platform_output);

        self.last_shapes = Some(full_output.shapes.clone());
        PaintJob {
            shapes: full_output.shapes,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }
}

impl FrameworkWindow for EguiWindow {
    type Widget = EguiWidget;

    fn on_enable(&mut self) {
        self.regenerate_layer_tree = true;
        self.frame_requested = true;
    }

    fn on_disable(&mut self) {
        self.root = None;
        self.last_shapes = None;
        self.paint_job = None;
        self.frame_requested = false;
    }

    fn update(&mut self) {
        if self.ctx.has_requested_repaint() {
            self.frame_requested = true;
        }
    }

    fn on_gui(&mut self, event: &HostEvent, has_focus: bool) {
        match event.kind {
            EventKind::Repaint => self.paint(has_focus),
            EventKind::Layout => {}
            _ => {
                if let Some(egui_event) = translate_event(event, self.device_pixel_ratio) {
                    self.state.egui_input_mut().events.push(egui_event);
                    self.regenerate_layer_tree = true;
                    self.frame_requested = true;
                }
            }
        }
    }

    fn schedule_frame(&mut self, regenerate_layer_tree: bool) {
        self.regenerate_layer_tree |= regenerate_layer_tree;
        self.ctx.request_repaint();
    }

    fn on_view_metrics_changed(&mut self) {
        self.regenerate_layer_tree = true;
    }

    fn apply_view_metrics(&mut self, metrics: &ViewMetrics) {
        self.device_pixel_ratio = metrics.device_pixel_ratio;
        let native = self.window.scale_factor() as f32;
        if native > 0.0 {
            self.ctx.set_zoom_factor(metrics.device_pixel_ratio / native);
        }
        let feathering = metrics.anti_aliasing > 0;
        self.ctx
            .tessellation_options_mut(|options| options.feathering = feathering);
        self.regenerate_layer_tree = true;
    }

    fn attach_root_widget(&mut self, root: Option<EguiWidget>) {
        self.root = root;
        self.regenerate_layer_tree = true;
    }

    fn take_frame_request(&mut self) -> Option<bool> {
        if std::mem::take(&mut self.frame_requested) {
            Some(self.regenerate_layer_tree)
        } else {
            None
        }
    }

    fn render_tree_dump(&self) -> Option<String> {
        let shapes = self.last_shapes.as_ref()?;
        let mut dump = format!("frame {} ({} shapes)\n", self.frames, shapes.len());
        for clipped in shapes {
            let _ = writeln!(dump, "  {} clip={:?}", shape_name(&clipped.shape), clipped.clip_rect);
        }
        Some(dump)
    }
}

fn shape_name(shape: &egui::Shape) -> &'static str {
    match shape {
        egui::Shape::Noop => "noop",
        egui::Shape::Vec(_) => "group",
        egui::Shape::Circle(_) => "circle",
        egui::Shape::LineSegment { .. } => "line",
        egui::Shape::Path(_) => "path",
        egui::Shape::Rect(_) => "rect",
        egui::Shape::Text(_) => "text",
        egui::Shape::Mesh(_) => "mesh",
        _ => "other",
    }
}

/// Convert a host event in physical pixels into an egui event in points
pub fn translate_event(event: &HostEvent, device_pixel_ratio: f32) -> Option<egui::Event> {
    let ratio = if device_pixel_ratio > 0.0 { device_pixel_ratio } else { 1.0 };
    let pos = egui::pos2(event.position.x / ratio, event.position.y / ratio);

    match event.kind {
        EventKind::PointerMove | EventKind::PointerEnter => Some(egui::Event::PointerMoved(pos)),
        EventKind::PointerExit => Some(egui::Event::PointerGone),
        EventKind::PointerDown | EventKind::PointerUp => event.button.map(|button| egui::Event::PointerButton {
            pos,
            button: map_button(button),
            pressed: event.kind == EventKind::PointerDown,
            modifiers: egui::Modifiers::NONE,
        }),
        EventKind::KeyDown | EventKind::KeyUp => event.key.map(|key| egui::Event::Key {
            key: map_key(key),
            physical_key: None,
            pressed: event.kind == EventKind::KeyDown,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }),
        EventKind::Text => event.text.clone().map(egui::Event::Text),
        EventKind::Repaint | EventKind::Layout => None,
    }
}

fn map_button(button: PointerButton) -> egui::PointerButton {
    match button {
        PointerButton::Primary => egui::PointerButton::Primary,
        PointerButton::Secondary => egui::PointerButton::Secondary,
        PointerButton::Middle => egui::PointerButton::Middle,
    }
}

fn map_key(key: Key) -> egui::Key {
    match key {
        Key::Escape => egui::Key::Escape,
        Key::Enter => egui::Key::Enter,
        Key::Tab => egui::Key::Tab,
        Key::Backspace => egui::Key::Backspace,
        Key::Delete => egui::Key::Delete,
        Key::Space => egui::Key::Space,
        Key::ArrowLeft => egui::Key::ArrowLeft,
        Key::ArrowRight => egui::Key::ArrowRight,
        Key::ArrowUp => egui::Key::ArrowUp,
        Key::ArrowDown => egui::Key::ArrowDown,
        Key::Home => egui::Key::Home,
        Key::End => egui::Key::End,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::MOUSE_POINTER_ID;
    use glam::Vec2;

    #[test]
    fn test_pointer_position_converted_to_points() {
        let event = HostEvent::pointer(EventKind::PointerMove, MOUSE_POINTER_ID, Vec2::new(200.0, 100.0));
        match translate_event(&event, 2.0) {
            Some(egui::Event::PointerMoved(pos)) => assert_eq!(pos, egui::pos2(100.0, 50.0)),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_zero_ratio_treated_as_one() {
        let event = HostEvent::pointer(EventKind::PointerMove, MOUSE_POINTER_ID, Vec2::new(8.0, 4.0));
        match translate_event(&event, 0.0) {
            Some(egui::Event::PointerMoved(pos)) => assert_eq!(pos, egui::pos2(8.0, 4.0)),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_button_press() {
        let event = HostEvent::button(true, MOUSE_POINTER_ID, Vec2::ZERO, PointerButton::Secondary);
        match translate_event(&event, 1.0) {
            Some(egui::Event::PointerButton { button, pressed, .. }) => {
                assert_eq!(button, egui::PointerButton::Secondary);
                assert!(pressed);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_key_and_text() {
        match translate_event(&HostEvent::key(false, Key::Tab), 1.0) {
            Some(egui::Event::Key { key, pressed, .. }) => {
                assert_eq!(key, egui::Key::Tab);
                assert!(!pressed);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(
            translate_event(&HostEvent::text("hi"), 1.0),
            Some(egui::Event::Text("hi".to_string()))
        );
    }

    #[test]
    fn test_exit_and_paint_events() {
        let exit = HostEvent::pointer(EventKind::PointerExit, MOUSE_POINTER_ID, Vec2::ZERO);
        assert_eq!(translate_event(&exit, 1.0), Some(egui::Event::PointerGone));
        assert_eq!(translate_event(&HostEvent::repaint(), 1.0), None);
        assert_eq!(translate_event(&HostEvent::layout(), 1.0), None);
    }
}
