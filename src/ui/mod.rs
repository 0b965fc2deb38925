//! # User Interface Module
//!
//! A Dear ImGui overlay for editing the sandbox's render state while it runs.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`Editor`] - hosts [`EditorWindow`]s and draws them over a frame
//! - [`windows`] - light, material, camera, render pass, texture and stats windows
//!
//! Windows never own what they edit. Each frame the sandbox builds an
//! [`EditorTargets`] from borrows of its own fields and hands it to
//! [`Editor::end`]; the borrows end with that call.

pub mod editor;
pub mod manager;
pub mod windows;

// Re-export main types
pub use editor::{Editor, EditorTargets, EditorWindow, FrameStats};
pub use manager::UiManager;
pub use windows::{
    CameraWindow, LightWindow, MaterialWindow, RenderPassWindow, StatsWindow, TextureWindow,
};
