//! Windowed platform: a winit event loop presenting through a wgpu surface.

use std::sync::Arc;

use anyhow::Context as _;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{WindowAttributes, WindowId},
};

use super::{InputState, Platform, Window};
use crate::app::Sandbox;
use crate::config::AppConfig;
use crate::error::RenderError;
use crate::gfx::rendering::GpuContext;
use crate::ui::Editor;

pub struct WinitBackend;

impl Platform for WinitBackend {
    fn name(&self) -> &'static str {
        "winit"
    }

    fn run(&mut self, config: AppConfig) -> anyhow::Result<()> {
        let event_loop = EventLoop::new().context("creating the event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = WinitApp {
            config,
            input: InputState::new(),
            running: None,
            error: None,
        };
        event_loop
            .run_app(&mut app)
            .context("running the event loop")?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// A winit window as seen by the frame loop.
struct WinitWindow {
    window: Arc<winit::window::Window>,
    size: (u32, u32),
    closed: bool,
}

impl Window for WinitWindow {
    fn closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn update(&mut self) {
        self.window.request_redraw();
    }
}

/// Everything that exists once the window is up.
struct Running {
    sandbox: Sandbox,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    gpu: GpuContext,
    window: WinitWindow,
}

impl Running {
    fn new(event_loop: &ActiveEventLoop, config: &AppConfig) -> anyhow::Result<Self> {
        let attributes = WindowAttributes::default()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("creating the window")?,
        );

        let instance = GpuContext::create_instance();
        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;
        let gpu = pollster::block_on(GpuContext::new(instance, Some(&surface)))?;

        let capabilities = surface.get_capabilities(&gpu.adapter);
        let format = pick_surface_format(&capabilities.formats)
            .context("the surface supports no texture formats")?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: config.present_mode(),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);
        log::info!(
            "surface configured: {:?} {}x{} {:?}",
            format,
            surface_config.width,
            surface_config.height,
            surface_config.present_mode
        );

        let mut sandbox = Sandbox::new(&gpu, config, format)?;
        if config.editor {
            sandbox.attach_editor(Editor::new(&gpu, format, window.clone()));
        }

        Ok(Self {
            sandbox,
            surface,
            window: WinitWindow {
                window,
                size: (surface_config.width, surface_config.height),
                closed: false,
            },
            surface_config,
            gpu,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(self.gpu.device(), &self.surface_config);
        self.window.size = (width, height);
    }

    fn redraw(&mut self, input: &InputState) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out acquiring the next surface texture");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.sandbox
            .frame(&self.gpu, &mut self.window, input, &view)?;
        surface_texture.present();
        Ok(())
    }
}

struct WinitApp {
    config: AppConfig,
    input: InputState,
    running: Option<Running>,
    error: Option<anyhow::Error>,
}

impl WinitApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match Running::new(event_loop, &self.config) {
            Ok(running) => self.running = Some(running),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        let captured = running
            .sandbox
            .editor_mut()
            .is_some_and(|editor| editor.handle_event(window_id, &event));
        // Releases always reach the input state so nothing stays held under the UI.
        if !captured || is_release(&event) {
            self.input.handle_event(&event);
        }

        match event {
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                running.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let result = running.redraw(&self.input);
                let closed = running.window.closed();
                let frames = running.sandbox.frame_index();
                match result {
                    Err(err) => self.fail(event_loop, err.into()),
                    Ok(()) if closed => {
                        log::info!("window closed after {frames} frames");
                        event_loop.exit();
                    }
                    Ok(()) => {}
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.window.request_redraw();
        }
    }
}

/// First non-sRGB format, else whatever the surface lists first.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}

fn is_release(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => event.state == ElementState::Released,
        WindowEvent::MouseInput { state, .. } => *state == ElementState::Released,
        WindowEvent::Focused(false) => true,
        _ => false,
    }
}
