use std::sync::Arc;

use winit::window::Window;

use crate::core::scope::WindowScope;
use crate::host::{EguiWidget, EguiWindow};
use crate::traits::PanelContent;

/// Small egui UI used by the `panel-host` binary
pub struct DemoContent {
    window: Arc<Window>,
    builds: u32,
}

impl DemoContent {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window, builds: 0 }
    }

    /// Number of root widgets built so far
    pub fn builds(&self) -> u32 {
        self.builds
    }
}

impl PanelContent for DemoContent {
    type Window = EguiWindow;

    fn create_window(&mut self) -> EguiWindow {
        EguiWindow::new(Arc::clone(&self.window))
    }

    fn create_widget(&mut self, scope: &WindowScope) -> anyhow::Result<Option<EguiWidget>> {
        self.builds += 1;
        let window_id = scope.window_id();
        let build = self.builds;
        let mut clicks = 0u32;
        let mut name = String::from("panel");

        Ok(Some(Box::new(move |ctx: &egui::Context| {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("Panel Host");
                ui.label(format!("{} (build {})", window_id, build));
                ui.separator();
                if ui.button("Click me").clicked() {
                    clicks += 1;
                }
                ui.label(format!("Clicked {} times", clicks));
                ui.horizontal(|ui| {
                    ui.label("Name:");
                    ui.text_edit_singleline(&mut name);
                });
                ui.label(format!("Hello, {}!", name));
                ui.separator();
                ui.label(format!("{:.2} pixels per point", ctx.pixels_per_point()));
            });
        })))
    }
}
