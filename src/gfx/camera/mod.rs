//! Projection cameras. The view matrix is supplied by a paired
//! [`Transform`](crate::gfx::Transform).

#[allow(clippy::module_inception)]
pub mod camera;
pub mod camera_utils;

pub use camera::{Camera, Projection};
pub use camera_utils::{convert_matrix4_to_array, OPENGL_TO_WGPU_MATRIX};
