//! Concatenating several meshes into one vertex/index buffer pair.
//!
//! Every source mesh becomes a [`Submesh`]: a slice of the shared index buffer
//! that one indexed draw can address. One vertex array then serves many
//! logically separate objects without rebinding buffers between draws.

use std::ops::{Index, Range};

use super::mesh_geometry::{MeshGeometry, INDEX_BYTE_SIZE};

/// `{byte offset, index count}` of one object's slice of a shared index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Submesh {
    pub byte_offset: u64,
    pub count: u32,
}

impl Submesh {
    /// The submesh spanning every index of `geometry`.
    pub fn whole<V: Copy>(geometry: &MeshGeometry<V>) -> Self {
        Self {
            byte_offset: 0,
            count: geometry.index_count() as u32,
        }
    }

    /// Offset in indices rather than bytes; wgpu addresses index ranges by element.
    pub fn first_index(&self) -> u32 {
        (self.byte_offset / INDEX_BYTE_SIZE) as u32
    }

    pub fn index_range(&self) -> Range<u32> {
        let first = self.first_index();
        first..first + self.count
    }
}

/// Several meshes concatenated end to end, plus one [`Submesh`] per source
/// mesh in submission order.
#[derive(Debug, Clone)]
pub struct CombinedGeometry<V> {
    geometry: MeshGeometry<V>,
    submeshes: Vec<Submesh>,
}

impl<V: Copy> CombinedGeometry<V> {
    /// Appends each mesh's vertices unchanged and its faces shifted by the
    /// number of vertices appended before it.
    pub fn combine(meshes: &[&MeshGeometry<V>]) -> Self {
        let vertex_total: usize = meshes.iter().map(|m| m.vertex_count()).sum();
        let face_total: usize = meshes.iter().map(|m| m.face_count()).sum();

        let mut vertices = Vec::with_capacity(vertex_total);
        let mut faces = Vec::with_capacity(face_total);
        let mut submeshes = Vec::with_capacity(meshes.len());

        let mut vertex_offset: u32 = 0;
        let mut index_offset: u64 = 0;

        for mesh in meshes {
            vertices.extend_from_slice(mesh.vertices());
            faces.extend(mesh.faces().iter().map(|face| face.offset(vertex_offset)));

            let count = mesh.index_count() as u32;
            submeshes.push(Submesh {
                byte_offset: index_offset * INDEX_BYTE_SIZE,
                count,
            });

            vertex_offset += mesh.vertex_count() as u32;
            index_offset += count as u64;
        }

        log::debug!(
            "combined {} meshes: {} vertices, {} faces",
            meshes.len(),
            vertices.len(),
            faces.len()
        );

        Self {
            geometry: MeshGeometry::from_parts(vertices, faces),
            submeshes,
        }
    }

    /// Submesh of the `index`-th source mesh.
    ///
    /// # Panics
    /// If `index` is not a submitted mesh.
    pub fn get_submesh(&self, index: usize) -> Submesh {
        self.submeshes[index]
    }

    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    pub fn geometry(&self) -> &MeshGeometry<V> {
        &self.geometry
    }

    pub fn vertices(&self) -> &[V] {
        self.geometry.vertices()
    }

    pub fn indices(&self) -> &[u32] {
        self.geometry.indices()
    }
}

impl<V> Index<usize> for CombinedGeometry<V> {
    type Output = Submesh;

    fn index(&self, index: usize) -> &Submesh {
        &self.submeshes[index]
    }
}
