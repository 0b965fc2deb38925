//! Asset importers: OBJ meshes through `tobj`, JPEG/PNG textures through `image`.

pub mod mesh_importer;
pub mod texture_importer;

pub use mesh_importer::MeshImporter;
pub use texture_importer::{PixelData, PixelFormat, TextureImporter};
