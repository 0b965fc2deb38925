//! Vertex/index buffer pair plus the attribute layout describing the vertex bytes.

use super::buffer::{Buffer, BufferTarget};

/// Scalar type of one attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    F32,
    U32,
    I32,
}

impl ScalarType {
    pub fn byte_size(self) -> u64 {
        4
    }
}

/// One shader input: slot, `components` × `scalar`, at `offset` bytes into the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: u32,
    pub scalar: ScalarType,
    pub offset: u64,
}

pub type VertexAttributes = Vec<VertexAttribute>;

impl VertexAttribute {
    pub fn new(location: u32, components: u32, scalar: ScalarType, offset: usize) -> Self {
        Self {
            location,
            components,
            scalar,
            offset: offset as u64,
        }
    }

    pub fn byte_size(&self) -> u64 {
        self.components as u64 * self.scalar.byte_size()
    }

    /// # Panics
    /// If `components` is not 1 to 4.
    pub fn format(&self) -> wgpu::VertexFormat {
        use wgpu::VertexFormat as F;
        match (self.scalar, self.components) {
            (ScalarType::F32, 1) => F::Float32,
            (ScalarType::F32, 2) => F::Float32x2,
            (ScalarType::F32, 3) => F::Float32x3,
            (ScalarType::F32, 4) => F::Float32x4,
            (ScalarType::U32, 1) => F::Uint32,
            (ScalarType::U32, 2) => F::Uint32x2,
            (ScalarType::U32, 3) => F::Uint32x3,
            (ScalarType::U32, 4) => F::Uint32x4,
            (ScalarType::I32, 1) => F::Sint32,
            (ScalarType::I32, 2) => F::Sint32x2,
            (ScalarType::I32, 3) => F::Sint32x3,
            (ScalarType::I32, 4) => F::Sint32x4,
            (scalar, n) => panic!("unsupported vertex attribute: {n} x {scalar:?}"),
        }
    }

    fn to_wgpu(self) -> wgpu::VertexAttribute {
        wgpu::VertexAttribute {
            format: self.format(),
            offset: self.offset,
            shader_location: self.location,
        }
    }
}

/// Vertex layout as a pipeline sees it; part of the pipeline cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Binds a vertex buffer and an index buffer to a fixed attribute layout.
///
/// Attach the vertex buffer first, then describe it with
/// [`VertexArray::init_attributes_of_type`]; the layout must mirror the
/// vertex struct the buffer was filled from.
#[derive(Debug)]
pub struct VertexArray {
    label: String,
    vertex_buffer: Option<Buffer>,
    index_buffer: Option<Buffer>,
    layout: Option<VertexLayout>,
}

impl VertexArray {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            vertex_buffer: None,
            index_buffer: None,
            layout: None,
        }
    }

    pub fn attach_vertex_buffer(&mut self, buffer: Buffer) -> &mut Self {
        assert_eq!(
            buffer.target(),
            BufferTarget::Vertex,
            "vertex array '{}' given '{}' as its vertex buffer",
            self.label,
            buffer.label()
        );
        self.vertex_buffer = Some(buffer);
        self
    }

    pub fn attach_index_buffer(&mut self, buffer: Buffer) -> &mut Self {
        assert_eq!(
            buffer.target(),
            BufferTarget::Index,
            "vertex array '{}' given '{}' as its index buffer",
            self.label,
            buffer.label()
        );
        self.index_buffer = Some(buffer);
        self
    }

    /// Records `attributes` with a stride of `size_of::<V>()`.
    ///
    /// # Panics
    /// If no vertex buffer is attached yet.
    pub fn init_attributes_of_type<V: bytemuck::Pod>(&mut self, attributes: &[VertexAttribute]) {
        assert!(
            self.vertex_buffer.is_some(),
            "vertex array '{}': attach a vertex buffer before describing its attributes",
            self.label
        );

        let stride = std::mem::size_of::<V>() as u64;
        for attribute in attributes {
            debug_assert!(
                attribute.offset + attribute.byte_size() <= stride,
                "attribute at location {} overruns the {stride}-byte vertex",
                attribute.location
            );
        }

        self.layout = Some(VertexLayout {
            stride,
            attributes: attributes.iter().map(|a| a.to_wgpu()).collect(),
        });
        log::debug!(
            "vertex array '{}': {} attributes, stride {stride}",
            self.label,
            attributes.len()
        );
    }

    pub fn layout(&self) -> Option<&VertexLayout> {
        self.layout.as_ref()
    }

    pub fn vertex_buffer(&self) -> Option<&Buffer> {
        self.vertex_buffer.as_ref()
    }

    pub fn vertex_buffer_mut(&mut self) -> Option<&mut Buffer> {
        self.vertex_buffer.as_mut()
    }

    pub fn index_buffer(&self) -> Option<&Buffer> {
        self.index_buffer.as_ref()
    }

    pub fn index_buffer_mut(&mut self) -> Option<&mut Buffer> {
        self.index_buffer.as_mut()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sets vertex slot 0 and the `Uint32` index buffer on `pass`.
    ///
    /// Returns `false` when either buffer has no allocation yet.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let vertices = self.vertex_buffer.as_ref().and_then(Buffer::raw);
        let indices = self.index_buffer.as_ref().and_then(Buffer::raw);
        match (vertices, indices) {
            (Some(vertices), Some(indices)) => {
                pass.set_vertex_buffer(0, vertices.slice(..));
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                true
            }
            _ => {
                log::warn!("vertex array '{}' bound without uploaded buffers", self.label);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{DiffuseVertex, SpriteVertex};
    use crate::gfx::resources::buffer::BufferUsage;

    fn vertex_buffer() -> Buffer {
        Buffer::new("vertices", BufferTarget::Vertex, BufferUsage::Static)
    }

    #[test]
    fn diffuse_layout() {
        let mut array = VertexArray::new("cube");
        array.attach_vertex_buffer(vertex_buffer());
        array.init_attributes_of_type::<DiffuseVertex>(&DiffuseVertex::attributes());

        let layout = array.layout().expect("layout recorded");
        assert_eq!(layout.stride, 24);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }

    #[test]
    fn sprite_layout() {
        let mut array = VertexArray::new("square");
        array.attach_vertex_buffer(vertex_buffer());
        array.init_attributes_of_type::<SpriteVertex>(&SpriteVertex::attributes());

        let layout = array.layout().expect("layout recorded");
        assert_eq!(layout.stride, 16);
        assert!(layout.attributes.iter().all(|a| a.format == wgpu::VertexFormat::Float32x2));
        assert_eq!(layout.buffer_layout().array_stride, 16);
    }

    #[test]
    #[should_panic(expected = "attach a vertex buffer")]
    fn attributes_require_a_vertex_buffer() {
        let mut array = VertexArray::new("empty");
        array.init_attributes_of_type::<SpriteVertex>(&SpriteVertex::attributes());
    }

    #[test]
    #[should_panic(expected = "as its index buffer")]
    fn index_slot_rejects_vertex_buffers() {
        VertexArray::new("mixed").attach_index_buffer(vertex_buffer());
    }

    #[test]
    fn formats_cover_every_scalar() {
        let attribute = VertexAttribute::new(0, 4, ScalarType::I32, 0);
        assert_eq!(attribute.format(), wgpu::VertexFormat::Sint32x4);
        assert_eq!(attribute.byte_size(), 16);
        assert_eq!(
            VertexAttribute::new(3, 1, ScalarType::U32, 8).format(),
            wgpu::VertexFormat::Uint32
        );
    }
}
