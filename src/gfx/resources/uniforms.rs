//! The per-draw model/view/projection uniform block.

use cgmath::Matrix4;

use super::buffer::{Buffer, BufferTarget, BufferUsage};
use crate::gfx::camera::convert_matrix4_to_array;
use crate::gfx::rendering::GpuContext;

/// GPU uniform data for one draw's matrices.
/// MUST match the `Matrices` struct in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Matrices {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}
// Total: 3 * 64 = 192 bytes

impl Matrices {
    pub const MATRIX_SIZE: u64 = std::mem::size_of::<[[f32; 4]; 4]>() as u64;
    pub const MODEL_OFFSET: u64 = 0;
    pub const VIEW_OFFSET: u64 = Self::MATRIX_SIZE;
    pub const PROJECTION_OFFSET: u64 = 2 * Self::MATRIX_SIZE;

    pub fn new(model: Matrix4<f32>, view: Matrix4<f32>, projection: Matrix4<f32>) -> Self {
        Self {
            model: convert_matrix4_to_array(model),
            view: convert_matrix4_to_array(view),
            projection: convert_matrix4_to_array(projection),
        }
    }
}

/// A uniform [`Buffer`] holding one [`Matrices`] block.
///
/// Callers choose between re-uploading the whole block and rewriting only
/// the matrices that changed since the previous draw.
#[derive(Debug)]
pub struct MatrixBlock {
    buffer: Buffer,
}

impl MatrixBlock {
    pub fn new(label: &str, location: u32) -> Self {
        let mut buffer = Buffer::new(label, BufferTarget::Uniform, BufferUsage::Dynamic);
        buffer.bind_at_location(location);
        Self { buffer }
    }

    /// Writes all three matrices. The first call allocates the block.
    pub fn upload_all(&mut self, gpu: &GpuContext, matrices: &Matrices) {
        if self.buffer.raw().is_none() {
            self.buffer.data_of(gpu, std::slice::from_ref(matrices));
        } else {
            self.buffer.sub_data_of(gpu, matrices, 0);
        }
    }

    /// Rewrites the 64-byte model matrix only.
    ///
    /// # Panics
    /// If the block has not been allocated by [`MatrixBlock::upload_all`].
    pub fn upload_model(&self, gpu: &GpuContext, model: Matrix4<f32>) {
        self.upload_matrix(gpu, Matrices::MODEL_OFFSET, model);
    }

    pub fn upload_view(&self, gpu: &GpuContext, view: Matrix4<f32>) {
        self.upload_matrix(gpu, Matrices::VIEW_OFFSET, view);
    }

    pub fn upload_projection(&self, gpu: &GpuContext, projection: Matrix4<f32>) {
        self.upload_matrix(gpu, Matrices::PROJECTION_OFFSET, projection);
    }

    fn upload_matrix(&self, gpu: &GpuContext, offset: u64, matrix: Matrix4<f32>) {
        self.buffer
            .sub_data_of(gpu, &convert_matrix4_to_array(matrix), offset);
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }
}
