use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use panel_host::cli::Cli;
use panel_host::core::{HostContext, Panel, PanelConfig, VIEW_METRICS_CHANNEL};
use panel_host::demo::DemoContent;
use panel_host::host::{SurfaceRenderer, WinitHost, WinitMetricsProvider};

const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;

struct App {
    config: PanelConfig,
    ctx: HostContext,
    host: WinitHost,
    window: Option<Arc<Window>>,
    renderer: Option<SurfaceRenderer>,
    panel: Option<Panel<DemoContent>>,
}

impl App {
    fn new(config: PanelConfig) -> Self {
        Self {
            config,
            ctx: HostContext::new(),
            host: WinitHost::new(),
            window: None,
            renderer: None,
            panel: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("Panel Host")
                        .with_inner_size(winit::dpi::LogicalSize::new(
                            INITIAL_WINDOW_WIDTH,
                            INITIAL_WINDOW_HEIGHT,
                        )),
                )
                .context("Failed to create window")?,
        );

        let renderer = pollster::block_on(SurfaceRenderer::new(window.clone()))?;

        let mut panel = Panel::new(DemoContent::new(window.clone()), self.config.clone())
            .with_metrics_provider(Rc::new(WinitMetricsProvider::new(window.clone())));
        panel.set_size(logical_size(&window, window.inner_size()));
        panel.enable(&mut self.ctx, &mut self.host)?;

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.panel = Some(panel);
        Ok(())
    }

    fn redraw(&mut self) {
        let (Some(panel), Some(renderer)) = (self.panel.as_mut(), self.renderer.as_mut()) else {
            return;
        };

        match panel.update(&self.ctx, &self.host) {
            Ok(dispatch) if dispatch.was_forwarded() => {
                if let Some(adapter) = panel.window_mut() {
                    let egui_window = adapter.window_mut();
                    if let Some(job) = egui_window.take_paint_job() {
                        if let Err(e) = renderer.render(egui_window.context(), job) {
                            log::warn!("Render error: {}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Panel update failed: {}", e),
        }
    }

    fn forward_input(&mut self, event: &WindowEvent) {
        let host_events = self.host.process_event(event);
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        for host_event in &host_events {
            if let Err(e) = panel.dispatch_input(&self.host, host_event) {
                log::debug!("Dropped {:?}: {}", host_event.kind, e);
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(panel) = self.panel.as_mut() {
            panel.unsubscribe(&self.ctx);
            if panel.is_enabled() {
                if let Err(e) = panel.disable(&mut self.ctx) {
                    log::warn!("Failed to disable panel: {}", e);
                }
            }
        }
    }
}

fn logical_size(window: &Window, size: winit::dpi::PhysicalSize<u32>) -> Vec2 {
    let logical = size.to_logical::<f32>(window.scale_factor());
    Vec2::new(logical.width, logical.height)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.start(event_loop) {
                log::error!("Failed to start panel host: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
                if let (Some(panel), Some(window)) = (self.panel.as_mut(), self.window.as_ref()) {
                    panel.set_size(logical_size(window, size));
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let delivered = self.ctx.messages().deliver(
                    VIEW_METRICS_CHANNEL,
                    "onViewMetricsChanged",
                    &[serde_json::json!({ "devicePixelRatio": scale_factor })],
                );
                log::debug!("Scale factor {} delivered to {} handlers", scale_factor, delivered);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            other => self.forward_input(&other),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.panel_config()?;
    log::info!("Panel config: {:?}", config);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    event_loop.run_app(&mut app)?;

    Ok(())
}
