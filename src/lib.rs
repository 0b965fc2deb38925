// src/lib.rs
//! Playground
//!
//! A minimal real-time 3D rendering sandbox built on wgpu and winit: GPU
//! buffer, shader and texture wrappers, combined meshes drawn by submesh,
//! screen-to-world picking against box colliders, and an imgui editor over
//! the live render state.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod importer;
pub mod logging;
pub mod physics;
pub mod platform;
pub mod prelude;
pub mod time;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::Sandbox;
pub use config::AppConfig;
pub use error::{ImportError, RenderError};

/// Runs the sandbox with configuration taken from the environment.
pub fn run_from_env() -> anyhow::Result<()> {
    platform::run(AppConfig::from_env())
}
