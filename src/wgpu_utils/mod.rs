// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Small wrappers shared by the resource types.

pub mod buffer_data;

pub use buffer_data::BufferData;
