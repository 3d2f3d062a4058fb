use crate::core::scope::WindowScope;

use super::window::FrameworkWindow;

/// Root widget type produced for a given panel content
pub type WidgetOf<C> = <<C as PanelContent>::Window as FrameworkWindow>::Widget;

/// What a panel hosts: the framework window it drives and the widget tree
/// built into that window.
pub trait PanelContent {
    type Window: FrameworkWindow;

    /// Create the framework window for a newly enabled panel
    fn create_window(&mut self) -> Self::Window;

    /// Build the root widget. Runs while `scope` makes the panel's window
    /// the ambient window.
    fn create_widget(&mut self, scope: &WindowScope) -> anyhow::Result<Option<WidgetOf<Self>>>;
}
