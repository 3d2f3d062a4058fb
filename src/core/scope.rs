use std::cell::RefCell;
use std::marker::PhantomData;

use super::window_adapter::WindowId;

thread_local! {
    static AMBIENT_WINDOWS: RefCell<Vec<WindowId>> = const { RefCell::new(Vec::new()) };
}

/// RAII guard that makes a window the framework's ambient window.
/// Dropping it restores whatever was ambient before, so scopes nest.
#[must_use = "the window is only ambient while the scope is alive"]
#[derive(Debug)]
pub struct WindowScope {
    window: WindowId,
    depth: usize,
    // Ambient state is per thread
    _not_send: PhantomData<*const ()>,
}

impl WindowScope {
    pub(crate) fn enter(window: WindowId) -> Self {
        let depth = AMBIENT_WINDOWS.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(window);
            stack.len()
        });
        log::trace!("enter scope {:?} (depth {})", window, depth);
        Self {
            window,
            depth,
            _not_send: PhantomData,
        }
    }

    /// Window this scope made ambient
    pub fn window_id(&self) -> WindowId {
        self.window
    }
}

impl Drop for WindowScope {
    fn drop(&mut self) {
        AMBIENT_WINDOWS.with(|stack| {
            let mut stack = stack.borrow_mut();
            debug_assert_eq!(stack.len(), self.depth, "window scopes released out of order");
            stack.truncate(self.depth - 1);
        });
        log::trace!("leave scope {:?}", self.window);
    }
}

/// Window currently ambient on this thread
pub fn current_window() -> Option<WindowId> {
    AMBIENT_WINDOWS.with(|stack| stack.borrow().last().copied())
}

/// Number of live scopes on this thread
pub fn scope_depth() -> usize {
    AMBIENT_WINDOWS.with(|stack| stack.borrow().len())
}
