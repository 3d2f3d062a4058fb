use glam::Vec2;

/// Identifier of a mouse or touch pointer
pub type PointerId = i64;

/// Pointer id used for the mouse; touches use their own ids
pub const MOUSE_POINTER_ID: PointerId = -1;

/// Kind tag of a host GUI event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Paint pass request; coalesced by the window adapter
    Repaint,
    Layout,
    PointerDown,
    PointerUp,
    PointerMove,
    PointerEnter,
    PointerExit,
    KeyDown,
    KeyUp,
    Text,
}

impl EventKind {
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            EventKind::PointerDown
                | EventKind::PointerUp
                | EventKind::PointerMove
                | EventKind::PointerEnter
                | EventKind::PointerExit
        )
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, EventKind::KeyDown | EventKind::KeyUp | EventKind::Text)
    }
}

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keys the host forwards to panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Delete,
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
}

/// Host GUI event, positions in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    pub kind: EventKind,
    pub pointer: PointerId,
    pub position: Vec2,
    pub button: Option<PointerButton>,
    pub key: Option<Key>,
    pub text: Option<String>,
}

impl HostEvent {
    fn with_kind(kind: EventKind) -> Self {
        Self {
            kind,
            pointer: MOUSE_POINTER_ID,
            position: Vec2::ZERO,
            button: None,
            key: None,
            text: None,
        }
    }

    pub fn repaint() -> Self {
        Self::with_kind(EventKind::Repaint)
    }

    pub fn layout() -> Self {
        Self::with_kind(EventKind::Layout)
    }

    pub fn pointer(kind: EventKind, pointer: PointerId, position: Vec2) -> Self {
        debug_assert!(kind.is_pointer());
        Self {
            pointer,
            position,
            ..Self::with_kind(kind)
        }
    }

    pub fn button(pressed: bool, pointer: PointerId, position: Vec2, button: PointerButton) -> Self {
        let kind = if pressed {
            EventKind::PointerDown
        } else {
            EventKind::PointerUp
        };
        Self {
            button: Some(button),
            ..Self::pointer(kind, pointer, position)
        }
    }

    pub fn key(pressed: bool, key: Key) -> Self {
        let kind = if pressed { EventKind::KeyDown } else { EventKind::KeyUp };
        Self {
            key: Some(key),
            ..Self::with_kind(kind)
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::with_kind(EventKind::Text)
        }
    }

    pub fn is_repaint(&self) -> bool {
        self.kind == EventKind::Repaint
    }
}
