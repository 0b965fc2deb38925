//! Offscreen platform: renders a fixed number of frames with no window.

use anyhow::Context as _;

use super::{InputState, Platform, Window};
use crate::app::Sandbox;
use crate::config::AppConfig;
use crate::gfx::rendering::GpuContext;

const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub struct HeadlessBackend;

impl Platform for HeadlessBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn run(&mut self, config: AppConfig) -> anyhow::Result<()> {
        let gpu = GpuContext::headless().context("opening a headless GPU context")?;
        let target = offscreen_target(&gpu, config.width, config.height);
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        if config.editor {
            log::warn!("the editor needs a window and is disabled on the headless platform");
        }
        let mut sandbox = Sandbox::new(&gpu, &config, OFFSCREEN_FORMAT)?;

        let mut window = HeadlessWindow::new(config.width, config.height, config.headless_frames);
        let input = InputState::new();
        while !window.closed() {
            sandbox.frame(&gpu, &mut window, &input, &view)?;
        }

        gpu.device()
            .poll(wgpu::PollType::Wait)
            .context("waiting for queued frames")?;
        log::info!("rendered {} headless frames", window.frames());
        Ok(())
    }
}

fn offscreen_target(gpu: &GpuContext, width: u32, height: u32) -> wgpu::Texture {
    gpu.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen color"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OFFSCREEN_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

/// A window that exists only as a size and closes itself after `max_frames`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    size: (u32, u32),
    frames: u64,
    max_frames: u64,
    closed: bool,
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32, max_frames: u64) -> Self {
        Self {
            size: (width, height),
            frames: 0,
            max_frames,
            closed: max_frames == 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

impl Window for HeadlessWindow {
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
        self.frames += 1;
        if self.frames >= self.max_frames {
            self.closed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::gpu::tests::gpu;

    #[test]
    fn closes_after_the_frame_budget() {
        let mut window = HeadlessWindow::new(640, 480, 3);
        for _ in 0..2 {
            window.update();
            assert!(!window.closed());
        }
        window.update();
        assert!(window.closed());
        assert_eq!(window.frames(), 3);
    }

    #[test]
    fn zero_frames_starts_closed() {
        assert!(HeadlessWindow::new(640, 480, 0).closed());
    }

    #[test]
    fn close_is_immediate() {
        let mut window = HeadlessWindow::new(640, 480, 100);
        window.close();
        assert!(window.closed());
        assert_eq!(window.size(), (640, 480));
    }

    #[test]
    fn sandbox_renders_offscreen_frames() {
        let Some(gpu) = gpu() else { return };
        let config = AppConfig::default().with_size(320, 240).with_editor(false);
        let target = offscreen_target(&gpu, 320, 240);
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let mut sandbox = Sandbox::new(&gpu, &config, OFFSCREEN_FORMAT).expect("sandbox");
        let mut window = HeadlessWindow::new(320, 240, 2);
        let input = InputState::new();
        while !window.closed() {
            sandbox.frame(&gpu, &mut window, &input, &view).expect("frame");
        }
        assert_eq!(window.frames(), 2);
        assert_eq!(sandbox.frame_index(), 2);
    }
}
