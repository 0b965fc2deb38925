//! Surface colour uniform.

/// GPU uniform data for a material.
/// MUST match the `Material` struct in the diffuse shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Material {
    pub color: [f32; 3],
    _padding: f32,
}
// Total: 3*4 + 4 = 16 bytes

impl Material {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            _padding: 0.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_is_one_vec4() {
        assert_eq!(std::mem::size_of::<Material>(), 16);
        let material = Material::new([1.0, 1.0, 0.0]);
        let bytes = bytemuck::bytes_of(&material);
        assert_eq!(&bytes[..12], bytemuck::cast_slice::<f32, u8>(&[1.0, 1.0, 0.0]));
    }
}
