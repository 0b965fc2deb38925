//! # Vertex Data Structures
//!
//! GPU-compatible vertex formats used by the sandbox's programs. Each struct is
//! `#[repr(C)]` so its field order and padding are what the attribute layout
//! describes, byte for byte.

use std::mem::offset_of;

use crate::gfx::resources::vertex_array::{ScalarType, VertexAttribute, VertexAttributes};

/// A lit 3D vertex with position and normal data.
///
/// # Memory Layout
///
/// - `position`: location 0, 3 × f32 at byte 0
/// - `normal`: location 1, 3 × f32 at byte 12
///
/// # Examples
///
/// ```
/// use playground::gfx::geometry::DiffuseVertex;
///
/// let vertex = DiffuseVertex {
///     position: [0.0, 1.0, 0.0],
///     normal: [0.0, 1.0, 0.0],
/// };
/// # let _ = vertex;
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DiffuseVertex {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
}

impl DiffuseVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Attribute layout matching the diffuse vertex shader inputs.
    pub fn attributes() -> VertexAttributes {
        vec![
            VertexAttribute::new(0, 3, ScalarType::F32, offset_of!(DiffuseVertex, position)),
            VertexAttribute::new(1, 3, ScalarType::F32, offset_of!(DiffuseVertex, normal)),
        ]
    }
}

/// A screen-space sprite vertex: pixel position and texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl SpriteVertex {
    pub fn new(position: [f32; 2], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    pub fn attributes() -> VertexAttributes {
        vec![
            VertexAttribute::new(0, 2, ScalarType::F32, offset_of!(SpriteVertex, position)),
            VertexAttribute::new(1, 2, ScalarType::F32, offset_of!(SpriteVertex, uv)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    fn assert_layout_covers<V>(attributes: &VertexAttributes) {
        let mut covered = 0;
        for attribute in attributes {
            let end = attribute.offset + attribute.byte_size();
            assert!(end <= size_of::<V>() as u64, "attribute {attribute:?} exceeds stride");
            covered += attribute.byte_size();
        }
        // No padding hides between or after the attributes.
        assert_eq!(covered, size_of::<V>() as u64);
    }

    #[test]
    fn diffuse_layout_matches_struct() {
        assert_eq!(size_of::<DiffuseVertex>(), 24);
        let attributes = DiffuseVertex::attributes();
        assert_eq!(attributes[0].offset, 0);
        assert_eq!(attributes[1].offset, 12);
        assert_layout_covers::<DiffuseVertex>(&attributes);
    }

    #[test]
    fn sprite_layout_matches_struct() {
        assert_eq!(size_of::<SpriteVertex>(), 16);
        let attributes = SpriteVertex::attributes();
        assert_eq!(attributes[1].offset, 8);
        assert_layout_covers::<SpriteVertex>(&attributes);
    }
}
