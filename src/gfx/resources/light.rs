//! Point light uniform.

/// GPU uniform data for the scene light.
/// MUST match the `Light` struct in the diffuse shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Light {
    pub position: [f32; 3],
    _padding1: f32,
    pub color: [f32; 3],
    _padding2: f32,
}
// Total: 3*4 + 4 + 3*4 + 4 = 32 bytes

impl Light {
    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            _padding1: 0.0,
            color,
            _padding2: 0.0,
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new([0.0, 0.0, 5.0], [1.0, 1.0, 1.0])
    }
}
