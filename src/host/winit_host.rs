use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::core::event::{EventKind, HostEvent, Key, PointerButton, PointerId, MOUSE_POINTER_ID};
use crate::traits::HostEnvironment;

/// Adapter that turns winit window events into host GUI events and
/// answers the panel's host queries.
#[derive(Debug, Clone)]
pub struct WinitHost {
    /// Last cursor position in physical pixels
    cursor: Vec2,
    focused: bool,
    touch_mouse_synthesis: bool,
}

impl WinitHost {
    pub fn new() -> Self {
        Self {
            cursor: Vec2::ZERO,
            focused: true,
            touch_mouse_synthesis: true,
        }
    }

    pub fn touch_mouse_synthesis(&self) -> bool {
        self.touch_mouse_synthesis
    }

    /// Translate one winit event; some produce several host events
    /// (a key press with text, a touch that starts inside the window).
    pub fn process_event(&mut self, event: &WindowEvent) -> Vec<HostEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::CursorEntered { .. } => {
                vec![HostEvent::pointer(EventKind::PointerEnter, MOUSE_POINTER_ID, self.cursor)]
            }
            WindowEvent::CursorLeft { .. } => {
                vec![HostEvent::pointer(EventKind::PointerExit, MOUSE_POINTER_ID, self.cursor)]
            }
            WindowEvent::MouseInput { state, button, .. } => Self::mouse_button(*button)
                .map(|b| HostEvent::button(state.is_pressed(), MOUSE_POINTER_ID, self.cursor, b))
                .into_iter()
                .collect(),
            WindowEvent::KeyboardInput { event, .. } => Self::key_events(event),
            WindowEvent::Focused(focused) => {
                self.focused = *focused;
                Vec::new()
            }
            WindowEvent::Touch(touch) => self.touch(
                touch.id,
                touch.phase,
                Vec2::new(touch.location.x as f32, touch.location.y as f32),
            ),
            _ => Vec::new(),
        }
    }

    fn cursor_moved(&mut self, position: Vec2) -> Vec<HostEvent> {
        self.cursor = position;
        vec![HostEvent::pointer(EventKind::PointerMove, MOUSE_POINTER_ID, position)]
    }

    /// Touch ids beyond `i64::MAX` saturate so they never alias the mouse
    fn touch_pointer_id(id: u64) -> PointerId {
        PointerId::try_from(id).unwrap_or_else(|_| {
            log::warn!("touch id {} out of range, clamped", id);
            PointerId::MAX
        })
    }

    fn touch(&mut self, id: u64, phase: TouchPhase, position: Vec2) -> Vec<HostEvent> {
        let pointer = Self::touch_pointer_id(id);
        if self.touch_mouse_synthesis {
            self.cursor = position;
        }
        match phase {
            TouchPhase::Started => vec![
                HostEvent::pointer(EventKind::PointerEnter, pointer, position),
                HostEvent::button(true, pointer, position, PointerButton::Primary),
            ],
            TouchPhase::Moved => vec![HostEvent::pointer(EventKind::PointerMove, pointer, position)],
            TouchPhase::Ended | TouchPhase::Cancelled => vec![
                HostEvent::button(false, pointer, position, PointerButton::Primary),
                HostEvent::pointer(EventKind::PointerExit, pointer, position),
            ],
        }
    }

    fn key_events(event: &KeyEvent) -> Vec<HostEvent> {
        let pressed = event.state == ElementState::Pressed;
        let mut events = Vec::new();
        if let PhysicalKey::Code(code) = event.physical_key {
            if let Some(key) = Self::keycode_to_key(code) {
                events.push(HostEvent::key(pressed, key));
            }
        }
        if pressed {
            if let Some(text) = event.text.as_ref().filter(|t| !t.chars().any(char::is_control)) {
                events.push(HostEvent::text(text.as_str()));
            }
        }
        events
    }

    /// Map winit KeyCode to Key
    fn keycode_to_key(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::Escape => Some(Key::Escape),
            KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Delete => Some(Key::Delete),
            KeyCode::Space => Some(Key::Space),
            KeyCode::ArrowLeft => Some(Key::ArrowLeft),
            KeyCode::ArrowRight => Some(Key::ArrowRight),
            KeyCode::ArrowUp => Some(Key::ArrowUp),
            KeyCode::ArrowDown => Some(Key::ArrowDown),
            KeyCode::Home => Some(Key::Home),
            KeyCode::End => Some(Key::End),
            _ => None,
        }
    }

    /// Map winit MouseButton to PointerButton
    fn mouse_button(button: MouseButton) -> Option<PointerButton> {
        match button {
            MouseButton::Left => Some(PointerButton::Primary),
            MouseButton::Right => Some(PointerButton::Secondary),
            MouseButton::Middle => Some(PointerButton::Middle),
            _ => None,
        }
    }
}

impl Default for WinitHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnvironment for WinitHost {
    fn set_touch_mouse_synthesis(&mut self, enabled: bool) {
        self.touch_mouse_synthesis = enabled;
    }

    fn pointer_position(&self) -> Vec2 {
        self.cursor
    }

    fn has_focus_target(&self) -> bool {
        self.focused
    }
}
