// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Owning wrappers over buffers, vertex layouts, shader programs and
//! textures, plus the plain uniform structs uploaded into them.

pub mod buffer;
pub mod light;
pub mod material;
pub mod shader;
pub mod texture_resource;
pub mod uniforms;
pub mod vertex_array;

// Re-export main types
pub use buffer::{Buffer, BufferTarget, BufferUsage};
pub use light::Light;
pub use material::Material;
pub use shader::{PipelineKey, Program, ProgramState, ShaderSource, ShaderStage, StageKind};
pub use texture_resource::{SamplerSettings, Texture, TextureParameter, DEPTH_FORMAT};
pub use uniforms::{MatrixBlock, Matrices};
pub use vertex_array::{
    ScalarType, VertexArray, VertexAttribute, VertexAttributes, VertexLayout,
};
