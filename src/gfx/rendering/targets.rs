//! Depth and multisample attachments sized to the viewport.

use crate::gfx::rendering::GpuContext;
use crate::gfx::resources::DEPTH_FORMAT;

struct Attachment {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Attachment {
    fn new(
        gpu: &GpuContext,
        label: &str,
        format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        sample_count: u32,
    ) -> Self {
        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Attachments shared by every pass of a frame.
///
/// The multisampled colour texture only exists while the sample count is
/// above one; it resolves into the frame's colour view.
pub struct RenderTargets {
    format: wgpu::TextureFormat,
    size: (u32, u32),
    sample_count: u32,
    depth: Option<Attachment>,
    msaa: Option<Attachment>,
}

impl RenderTargets {
    pub fn new(format: wgpu::TextureFormat) -> Self {
        Self {
            format,
            size: (0, 0),
            sample_count: 1,
            depth: None,
            msaa: None,
        }
    }

    /// Recreates the attachments when the size or sample count changed.
    pub fn prepare(&mut self, gpu: &GpuContext, width: u32, height: u32, sample_count: u32) {
        let size = (width.max(1), height.max(1));
        if self.depth.is_some() && self.size == size && self.sample_count == sample_count {
            return;
        }

        self.depth = Some(Attachment::new(
            gpu,
            "depth_texture",
            DEPTH_FORMAT,
            size,
            sample_count,
        ));
        self.msaa = (sample_count > 1)
            .then(|| Attachment::new(gpu, "msaa_color", self.format, size, sample_count));
        self.size = size;
        self.sample_count = sample_count;

        log::debug!(
            "render targets {}x{} with {} sample(s)",
            size.0,
            size.1,
            sample_count
        );
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth.as_ref().map(|attachment| &attachment.view)
    }

    pub fn msaa_view(&self) -> Option<&wgpu::TextureView> {
        self.msaa.as_ref().map(|attachment| &attachment.view)
    }
}
