//! OBJ loading into diffuse mesh geometries.

use std::io::BufReader;
use std::path::Path;

use cgmath::{InnerSpace, Vector3};

use crate::error::ImportError;
use crate::gfx::geometry::{DiffuseVertex, Face, MeshGeometry};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

pub struct MeshImporter;

impl MeshImporter {
    /// One geometry per OBJ object, in file order. Materials are ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<MeshGeometry<DiffuseVertex>>, ImportError> {
        let path = path.as_ref();
        let (models, _materials) =
            tobj::load_obj(path, &load_options()).map_err(|source| ImportError::Mesh {
                path: path.to_path_buf(),
                source,
            })?;

        if models.is_empty() {
            return Err(ImportError::Empty {
                path: path.to_path_buf(),
            });
        }

        log::info!("loaded {} meshes from {}", models.len(), path.display());
        Ok(models.iter().map(|model| Self::convert(&model.mesh)).collect())
    }

    /// Parses OBJ text; `mtllib` references are not followed.
    pub fn load_from_str(source: &str) -> Result<Vec<MeshGeometry<DiffuseVertex>>, tobj::LoadError> {
        let mut reader = BufReader::new(source.as_bytes());
        let (models, _) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;
        Ok(models.iter().map(|model| Self::convert(&model.mesh)).collect())
    }

    fn convert(mesh: &tobj::Mesh) -> MeshGeometry<DiffuseVertex> {
        // Use normals from OBJ if available, otherwise calculate them
        let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            calculate_vertex_normals(&mesh.positions, &mesh.indices)
        };

        let vertices = mesh
            .positions
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .map(|(p, n)| DiffuseVertex::new([p[0], p[1], p[2]], [n[0], n[1], n[2]]))
            .collect();
        let faces = mesh
            .indices
            .chunks_exact(3)
            .map(|t| Face::new(t[0], t[1], t[2]))
            .collect();

        MeshGeometry::from_parts(vertices, faces)
    }
}

/// Per-vertex normals averaged from the faces sharing each vertex.
pub fn calculate_vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let position = |i: usize| Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]);
    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); positions.len() / 3];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        let (v0, v1, v2) = (position(i0), position(i1), position(i2));
        // Area-weighted: the unnormalized cross product.
        let face_normal = (v1 - v0).cross(v2 - v0);
        for index in [i0, i1, i2] {
            sums[index] += face_normal;
        }
    }

    sums.into_iter()
        .flat_map(|sum| {
            let n = if sum.magnitude2() > f32::EPSILON {
                sum.normalize()
            } else {
                Vector3::unit_y()
            };
            [n.x, n.y, n.z]
        })
        .collect()
}
