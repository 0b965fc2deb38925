//! The live-editing overlay: a set of windows over borrowed render state.

use std::sync::Arc;

use cgmath::Vector3;
use winit::event::WindowEvent;
use winit::window::WindowId;

use super::manager::UiManager;
use crate::gfx::camera::Camera;
use crate::gfx::rendering::{Frame, GpuContext, RenderPass};
use crate::gfx::resources::{Light, Material, Texture};
use crate::gfx::Transform;
use crate::physics::RayHit;

/// Read-only numbers for the stats window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub delta: f32,
    pub total_time: f32,
    pub frame_index: u64,
    pub draw_calls: u32,
    pub last_hit: Option<RayHit>,
}

/// The render state editor windows may change.
///
/// Built fresh every frame from borrows of the owning sandbox, so no window
/// can hold on to an object past the frame it was handed over in.
pub struct EditorTargets<'a> {
    pub light: &'a mut Light,
    pub material: &'a mut Material,
    pub camera: &'a mut Camera,
    pub camera_transform: &'a mut Transform,
    pub camera_position: &'a mut Vector3<f32>,
    pub render_pass: &'a mut RenderPass,
    pub texture: &'a mut Texture,
    pub show_colliders: &'a mut bool,
    pub stats: FrameStats,
}

pub trait EditorWindow {
    fn title(&self) -> &str;
    fn draw(&mut self, ui: &imgui::Ui, targets: &mut EditorTargets<'_>);
}

/// ImGui overlay hosting a list of [`EditorWindow`]s.
pub struct Editor {
    ui: UiManager,
    window: Arc<winit::window::Window>,
    windows: Vec<Box<dyn EditorWindow>>,
    last_time: f32,
    frame_built: bool,
}

impl Editor {
    pub fn new(
        gpu: &GpuContext,
        format: wgpu::TextureFormat,
        window: Arc<winit::window::Window>,
    ) -> Self {
        let ui = UiManager::new(gpu.device(), gpu.queue(), format, &window);
        Self {
            ui,
            window,
            windows: Vec::new(),
            last_time: 0.0,
            frame_built: false,
        }
    }

    pub fn add_window(&mut self, window: Box<dyn EditorWindow>) -> &mut Self {
        log::debug!("editor window '{}' added", window.title());
        self.windows.push(window);
        self
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Returns true if the UI captured the event.
    pub fn handle_event(&mut self, window_id: WindowId, event: &WindowEvent) -> bool {
        self.ui.handle_input(&self.window, window_id, event)
    }

    pub fn wants_input(&self) -> bool {
        self.ui.wants_input()
    }

    /// Starts a UI frame of `width` x `height` pixels at `time` seconds.
    pub fn begin(&mut self, width: u32, height: u32, time: f32) {
        let delta = time - self.last_time;
        self.last_time = time;
        self.ui.prepare(&self.window, width, height, delta);
    }

    /// Lets every window edit `targets` and finishes the UI frame.
    pub fn end(&mut self, mut targets: EditorTargets<'_>) {
        let windows = &mut self.windows;
        self.ui.build(&self.window, |ui| {
            for window in windows.iter_mut() {
                window.draw(ui, &mut targets);
            }
        });
        self.frame_built = true;
    }

    /// Renders the finished UI frame over `frame`.
    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        if !std::mem::take(&mut self.frame_built) {
            return;
        }
        let ui = &mut self.ui;
        frame.overlay(|device, queue, encoder, view| {
            ui.render(device, queue, encoder, view);
        });
    }
}
