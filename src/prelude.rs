//! # Playground Prelude
//!
//! The types most sandbox code touches, in one import:
//!
//! ```rust
//! use playground::prelude::*;
//!
//! let mut transform = Transform::default();
//! transform.translate(Vector3::new(2.0, 0.0, 0.0));
//! let camera = Camera::perspective(60.0, 4.0 / 3.0);
//! let _ = (transform.matrix(), camera.projection());
//! ```

pub use crate::app::Sandbox;
pub use crate::config::AppConfig;
pub use crate::error::{ImportError, RenderError};
pub use crate::gfx::camera::{Camera, Projection};
pub use crate::gfx::geometry::{
    cube, cylinder, quad, CombinedGeometry, DiffuseVertex, MeshGeometry, SpriteVertex, Submesh,
};
pub use crate::gfx::picking::Ray;
pub use crate::gfx::rendering::{
    Capability, ClearMask, DrawCall, Frame, GpuContext, RenderPass, RenderTargets,
};
pub use crate::gfx::resources::{
    Buffer, BufferTarget, BufferUsage, Light, Material, MatrixBlock, Matrices, Program,
    ShaderSource, ShaderStage, StageKind, Texture, TextureParameter, VertexArray,
};
pub use crate::gfx::Transform;
pub use crate::physics::{CollisionWorld, RayHit};
pub use crate::platform::{Input, Key, MouseButton, Platform, PlatformKind, Window};
pub use crate::time::Time;

pub use cgmath::{Matrix4, Vector2, Vector3};
