//! Texture resource management for wgpu
//!
//! Sampled 2D textures uploaded from imported pixels, and the depth format
//! shared by the render targets and every depth-tested pipeline.

use crate::gfx::rendering::GpuContext;
use crate::importer::PixelData;

/// Standard depth buffer format used throughout the sandbox
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Sampler state adjustable after upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureParameter {
    MinFilter(wgpu::FilterMode),
    MagFilter(wgpu::FilterMode),
    Wrap(wgpu::AddressMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerSettings {
    pub min_filter: wgpu::FilterMode,
    pub mag_filter: wgpu::FilterMode,
    pub wrap: wgpu::AddressMode,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            min_filter: wgpu::FilterMode::Nearest,
            mag_filter: wgpu::FilterMode::Nearest,
            wrap: wgpu::AddressMode::ClampToEdge,
        }
    }
}

impl SamplerSettings {
    pub fn apply(&mut self, parameter: TextureParameter) {
        match parameter {
            TextureParameter::MinFilter(mode) => self.min_filter = mode,
            TextureParameter::MagFilter(mode) => self.mag_filter = mode,
            TextureParameter::Wrap(mode) => self.wrap = mode,
        }
    }
}

/// A sampled 2D texture. Bound at group 1: texture at binding 0, sampler at 1.
pub struct Texture {
    label: String,
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    sampler: Option<wgpu::Sampler>,
    settings: SamplerSettings,
    size: (u32, u32),
}

impl Texture {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            texture: None,
            view: None,
            sampler: None,
            settings: SamplerSettings::default(),
            size: (0, 0),
        }
    }

    /// Uploads `pixels` as RGBA8, replacing any previous image.
    pub fn source(&mut self, gpu: &GpuContext, pixels: &PixelData) {
        let (width, height) = (pixels.width, pixels.height);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(&self.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels.to_rgba8(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.size = (width, height);
        log::debug!("texture '{}' uploaded {width}x{height}", self.label);
    }

    /// Changes sampler state; the sampler is rebuilt on next bind.
    pub fn parameter(&mut self, parameter: TextureParameter) -> &mut Self {
        let before = self.settings;
        self.settings.apply(parameter);
        if self.settings != before {
            self.sampler = None;
        }
        self
    }

    pub fn settings(&self) -> SamplerSettings {
        self.settings
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_uploaded(&self) -> bool {
        self.view.is_some()
    }

    /// Bind group for `layout`, or `None` before the first upload.
    pub fn bind_group(
        &mut self,
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
    ) -> Option<wgpu::BindGroup> {
        let view = self.view.as_ref()?;
        let settings = self.settings;
        let label = &self.label;
        let sampler = self.sampler.get_or_insert_with(|| {
            gpu.device().create_sampler(&wgpu::SamplerDescriptor {
                label: Some(&format!("{label} Sampler")),
                address_mode_u: settings.wrap,
                address_mode_v: settings.wrap,
                address_mode_w: settings.wrap,
                mag_filter: settings.mag_filter,
                min_filter: settings.min_filter,
                mipmap_filter: wgpu::FilterMode::Nearest,
                ..Default::default()
            })
        });

        Some(gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }))
    }
}
