//! # Graphics Module
//!
//! The render-resource and frame-composition layer of the sandbox.
//!
//! ## Architecture Overview
//!
//! - **Transforms** ([`transform`]) - translation/rotation/scale to model matrices
//! - **Geometry** ([`geometry`]) - mesh builders, combined meshes and submeshes
//! - **Resources** ([`resources`]) - buffers, vertex arrays, shader programs, textures
//! - **Camera System** ([`camera`]) - perspective and orthographic projections
//! - **Rendering** ([`rendering`]) - GPU context, render pass state, frame composition
//! - **Picking** ([`picking`]) - rays and bounding boxes
//!
//! ## Usage
//!
//! ```no_run
//! use playground::gfx::geometry::{cube, CombinedGeometry};
//! use playground::gfx::rendering::GpuContext;
//! use playground::gfx::resources::{Buffer, BufferTarget, BufferUsage};
//!
//! let gpu = GpuContext::headless().expect("adapter");
//! let combined = CombinedGeometry::combine(&[&cube(2.0), &cube(1.0)]);
//!
//! let mut vertices = Buffer::new("vertices", BufferTarget::Vertex, BufferUsage::Static);
//! vertices.data_of(&gpu, combined.vertices());
//! ```

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod transform;

// Re-export commonly used types
pub use camera::{Camera, Projection};
pub use rendering::{DrawCall, Frame, GpuContext, RenderPass};
pub use transform::Transform;
