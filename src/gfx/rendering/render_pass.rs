//! Fixed per-frame GPU state: clear mask, capabilities, clear colour and viewport.

use std::ops::BitOr;

use super::frame::Frame;

/// Which attachments [`RenderPass::clear_buffers`] clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
}

impl ClearMask {
    pub const NONE: Self = Self {
        color: false,
        depth: false,
    };
    pub const COLOR: Self = Self {
        color: true,
        depth: false,
    };
    pub const DEPTH: Self = Self {
        color: false,
        depth: true,
    };
}

impl BitOr for ClearMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            color: self.color || rhs.color,
            depth: self.depth || rhs.depth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    Multisample,
    CullFace,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::DepthTest,
        Capability::Multisample,
        Capability::CullFace,
    ];
}

/// Pixel rectangle, origin top-left. A zero size covers the whole target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// The rectangle clamped to a `width` x `height` target.
    pub fn fit(&self, width: u32, height: u32) -> Viewport {
        if self.width == 0 || self.height == 0 {
            return Viewport {
                x: 0,
                y: 0,
                width,
                height,
            };
        }
        let x = self.x.min(width);
        let y = self.y.min(height);
        Viewport {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }
}

pub const MSAA_SAMPLES: u32 = 4;

/// Recorded render state, applied by every pass a [`Frame`] encodes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    mask: ClearMask,
    clear_color: [f32; 3],
    viewport: Viewport,
    depth_test: bool,
    multisample: bool,
    cull_face: bool,
}

impl RenderPass {
    pub fn new(mask: ClearMask) -> Self {
        Self {
            mask,
            clear_color: [0.0, 0.0, 0.0],
            viewport: Viewport::default(),
            depth_test: false,
            multisample: false,
            cull_face: false,
        }
    }

    pub fn viewport(&mut self, origin: [u32; 2], size: [u32; 2]) -> &mut Self {
        self.viewport = Viewport {
            x: origin[0],
            y: origin[1],
            width: size[0],
            height: size[1],
        };
        self
    }

    pub fn clear_color(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.clear_color = [r, g, b];
        self
    }

    pub fn enable(&mut self, capability: Capability) -> &mut Self {
        *self.flag(capability) = true;
        self
    }

    pub fn disable(&mut self, capability: Capability) -> &mut Self {
        *self.flag(capability) = false;
        self
    }

    pub fn set_enabled(&mut self, capability: Capability, enabled: bool) -> &mut Self {
        *self.flag(capability) = enabled;
        self
    }

    fn flag(&mut self, capability: Capability) -> &mut bool {
        match capability {
            Capability::DepthTest => &mut self.depth_test,
            Capability::Multisample => &mut self.multisample,
            Capability::CullFace => &mut self.cull_face,
        }
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        match capability {
            Capability::DepthTest => self.depth_test,
            Capability::Multisample => self.multisample,
            Capability::CullFace => self.cull_face,
        }
    }

    /// Clears the masked attachments of `frame` with the last clear colour.
    pub fn clear_buffers(&self, frame: &mut Frame<'_>) {
        frame.clear(self);
    }

    pub fn mask(&self) -> ClearMask {
        self.mask
    }

    pub fn set_mask(&mut self, mask: ClearMask) -> &mut Self {
        self.mask = mask;
        self
    }

    pub fn current_clear_color(&self) -> [f32; 3] {
        self.clear_color
    }

    pub fn clear_color_mut(&mut self) -> &mut [f32; 3] {
        &mut self.clear_color
    }

    pub fn current_viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn color_load_op(&self) -> wgpu::LoadOp<wgpu::Color> {
        if self.mask.color {
            let [r, g, b] = self.clear_color.map(f64::from);
            wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 })
        } else {
            wgpu::LoadOp::Load
        }
    }

    pub fn depth_load_op(&self) -> wgpu::LoadOp<f32> {
        if self.mask.depth {
            wgpu::LoadOp::Clear(1.0)
        } else {
            wgpu::LoadOp::Load
        }
    }

    pub fn sample_count(&self) -> u32 {
        if self.multisample {
            MSAA_SAMPLES
        } else {
            1
        }
    }

    pub fn cull_mode(&self) -> Option<wgpu::Face> {
        self.cull_face.then_some(wgpu::Face::Back)
    }
}

impl Default for RenderPass {
    fn default() -> Self {
        Self::new(ClearMask::COLOR | ClearMask::DEPTH)
    }
}
