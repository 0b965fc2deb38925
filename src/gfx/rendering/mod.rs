// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The graphics context, per-frame render state and the frame composer
//! that turns draw calls into submitted render passes.

pub mod frame;
pub mod gpu;
pub mod render_pass;
pub mod targets;

// Re-export main types
pub use frame::{DrawCall, Frame};
pub use gpu::GpuContext;
pub use render_pass::{Capability, ClearMask, RenderPass, Viewport};
pub use targets::RenderTargets;
