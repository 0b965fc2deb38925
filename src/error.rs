//! Error types for the playground render core
//!
//! Startup failures (no adapter, shader diagnostics, unreadable assets) are
//! reported through these types. Misuse of the resource wrappers, such as writing
//! past a buffer's capacity, is a programming error and panics instead.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while creating or preparing GPU resources.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The backend refused to hand out an adapter, device or surface.
    #[error("failed to create GPU resource: {0}")]
    ResourceCreation(String),

    /// A shader stage failed to compile. `log` carries the driver diagnostics.
    #[error("shader stage '{label}' failed to compile:\n{log}")]
    ShaderCompile { label: String, log: String },

    /// A program failed to link. `log` carries the diagnostics.
    #[error("program '{label}' failed to link:\n{log}")]
    ShaderLink { label: String, log: String },

    /// The presentation surface could not provide a frame.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl RenderError {
    /// Diagnostic text attached to shader errors, if any.
    pub fn log(&self) -> Option<&str> {
        match self {
            RenderError::ShaderCompile { log, .. } | RenderError::ShaderLink { log, .. } => {
                Some(log)
            }
            _ => None,
        }
    }
}

/// Failures raised by the mesh and texture importers.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to load mesh '{path}': {source}")]
    Mesh {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to load texture '{path}': {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' contains no meshes")]
    Empty { path: PathBuf },
}
