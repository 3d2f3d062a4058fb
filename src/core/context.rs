use once_cell::unsync::OnceCell;

use super::event::HostEvent;
use super::messages::MessageManager;
use super::raycast::RaycastRegistry;
use super::window_adapter::WindowId;

/// State shared by every panel on one host loop.
///
/// The repaint token and the message manager are created on first use and
/// live as long as the context. Tests build one context per case.
#[derive(Default)]
pub struct HostContext {
    repaint_event: OnceCell<HostEvent>,
    messages: OnceCell<MessageManager>,
    raycast: RaycastRegistry,
    next_window_id: u64,
}

impl HostContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared repaint event handed to every adapter's GUI pass
    pub fn repaint_event(&self) -> &HostEvent {
        self.repaint_event.get_or_init(|| {
            log::debug!("repaint token created");
            HostEvent::repaint()
        })
    }

    pub fn has_repaint_event(&self) -> bool {
        self.repaint_event.get().is_some()
    }

    /// Message manager, created on first access
    pub fn messages(&self) -> &MessageManager {
        self.messages.get_or_init(|| {
            log::debug!("message manager created");
            MessageManager::new()
        })
    }

    pub fn has_messages(&self) -> bool {
        self.messages.get().is_some()
    }

    pub fn raycast(&self) -> &RaycastRegistry {
        &self.raycast
    }

    pub fn raycast_mut(&mut self) -> &mut RaycastRegistry {
        &mut self.raycast
    }

    pub fn allocate_window_id(&mut self) -> WindowId {
        self.next_window_id += 1;
        WindowId::new(self.next_window_id)
    }
}
