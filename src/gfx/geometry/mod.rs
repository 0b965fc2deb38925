//! # Geometry
//!
//! CPU-side mesh data: vertex formats, the editable [`MeshGeometry`] builder,
//! [`CombinedGeometry`] for packing several meshes into one buffer pair, and
//! procedural primitives.
//!
//! ```rust
//! use playground::gfx::geometry::{cube, cylinder, CombinedGeometry};
//!
//! let cube = cube(1.0);
//! let cylinder = cylinder(0.5, 1.0, 24);
//! let combined = CombinedGeometry::combine(&[&cube, &cylinder]);
//!
//! assert_eq!(combined.get_submesh(1).first_index() as usize, cube.index_count());
//! ```

pub mod combine;
pub mod mesh_geometry;
pub mod primitives;
pub mod vertex;

pub use combine::{CombinedGeometry, Submesh};
pub use mesh_geometry::{Face, MeshGeometry, INDEX_BYTE_SIZE};
pub use primitives::*;
pub use vertex::{DiffuseVertex, SpriteVertex};
