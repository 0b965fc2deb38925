//! # Primitive Shape Generation
//!
//! Built-in shapes used when no OBJ file is configured, plus the box meshes the
//! physics debug view draws. All 3D shapes have outward normals and
//! counter-clockwise winding.

use std::f32::consts::PI;

use super::mesh_geometry::{Face, MeshGeometry};
use super::vertex::{DiffuseVertex, SpriteVertex};

/// Cube of edge `size` centered at the origin: 24 vertices, 12 faces.
pub fn cube(size: f32) -> MeshGeometry<DiffuseVertex> {
    let h = size * 0.5;
    box_geometry([h, h, h], [0.0, 0.0, 0.0])
}

/// Axis-aligned box with the given half extents around `center`.
///
/// Every side gets its own four vertices so normals stay flat.
pub fn box_geometry(half_extents: [f32; 3], center: [f32; 3]) -> MeshGeometry<DiffuseVertex> {
    // (normal, four unit corners in counter-clockwise order seen from outside)
    const SIDES: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // Front (+Z)
        ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
        // Back (-Z)
        ([0.0, 0.0, -1.0], [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]]),
        // Left (-X)
        ([-1.0, 0.0, 0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
        // Right (+X)
        ([1.0, 0.0, 0.0], [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]]),
        // Top (+Y)
        ([0.0, 1.0, 0.0], [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]]),
        // Bottom (-Y)
        ([0.0, -1.0, 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(12);

    for (normal, corners) in SIDES {
        let base = vertices.len() as u32;
        for corner in corners {
            let position = [
                center[0] + corner[0] * half_extents[0],
                center[1] + corner[1] * half_extents[1],
                center[2] + corner[2] * half_extents[2],
            ];
            vertices.push(DiffuseVertex::new(position, normal));
        }
        faces.push(Face::new(base, base + 1, base + 2));
        faces.push(Face::new(base + 2, base + 3, base));
    }

    MeshGeometry::from_parts(vertices, faces)
}

/// Cylinder along the Y axis, from `-height/2` to `height/2`, with capped ends.
///
/// `segments` is clamped to at least 3.
pub fn cylinder(radius: f32, height: f32, segments: u32) -> MeshGeometry<DiffuseVertex> {
    let segs = segments.max(3);
    let half_height = height * 0.5;

    let mut vertices = Vec::with_capacity(((segs + 1) * 2 + 2 + segs * 2) as usize);
    let mut faces = Vec::with_capacity((segs * 4) as usize);

    let ring = |i: u32| {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        (angle.cos(), angle.sin())
    };

    // Side: a bottom/top pair per ring step, the seam duplicated.
    for i in 0..=segs {
        let (cos_a, sin_a) = ring(i);
        let (x, z) = (radius * cos_a, radius * sin_a);
        let normal = [cos_a, 0.0, sin_a];
        vertices.push(DiffuseVertex::new([x, -half_height, z], normal));
        vertices.push(DiffuseVertex::new([x, half_height, z], normal));
    }
    for i in 0..segs {
        let bottom = i * 2;
        let top = bottom + 1;
        let bottom_next = bottom + 2;
        let top_next = bottom + 3;
        faces.push(Face::new(bottom, top, bottom_next));
        faces.push(Face::new(top, top_next, bottom_next));
    }

    // Caps get their own ring vertices so the cap normals stay flat.
    for (y, normal_y) in [(-half_height, -1.0), (half_height, 1.0)] {
        let center = vertices.len() as u32;
        vertices.push(DiffuseVertex::new([0.0, y, 0.0], [0.0, normal_y, 0.0]));
        for i in 0..segs {
            let (cos_a, sin_a) = ring(i);
            vertices.push(DiffuseVertex::new(
                [radius * cos_a, y, radius * sin_a],
                [0.0, normal_y, 0.0],
            ));
        }
        for i in 0..segs {
            let current = center + 1 + i;
            let next = center + 1 + (i + 1) % segs;
            if normal_y > 0.0 {
                faces.push(Face::new(center, next, current));
            } else {
                faces.push(Face::new(center, current, next));
            }
        }
    }

    MeshGeometry::from_parts(vertices, faces)
}

/// Screen-space rectangle of `width` × `height` pixels centered at the origin,
/// UVs spanning the full texture.
pub fn quad(width: f32, height: f32) -> MeshGeometry<SpriteVertex> {
    let (w, h) = (width * 0.5, height * 0.5);

    let mut geometry = MeshGeometry::new();
    geometry.begin(4, 2);
    let top_right = geometry.add_vertex(SpriteVertex::new([w, h], [1.0, 1.0]));
    let bottom_right = geometry.add_vertex(SpriteVertex::new([w, -h], [1.0, 0.0]));
    let bottom_left = geometry.add_vertex(SpriteVertex::new([-w, -h], [0.0, 0.0]));
    let top_left = geometry.add_vertex(SpriteVertex::new([-w, h], [0.0, 1.0]));
    geometry.add_face(top_right, bottom_right, top_left);
    geometry.add_face(bottom_right, bottom_left, top_left);
    geometry.end();
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Every face's winding agrees with its vertices' stored normal.
    fn assert_outward_winding(mesh: &MeshGeometry<DiffuseVertex>) {
        let vertices = mesh.vertices();
        for face in mesh.faces() {
            let [a, b, c] = face.indices().map(|i| vertices[i as usize]);
            let winding = cross(sub(b.position, a.position), sub(c.position, a.position));
            assert!(
                dot(winding, a.normal) > 0.0,
                "face {face:?} winds against its normal {:?}",
                a.normal
            );
        }
    }

    #[test]
    fn cube_generation() {
        let cube = cube(1.0);
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.index_count(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.face_count(), 12);
        for v in cube.vertices() {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
        }
        assert_outward_winding(&cube);
    }

    #[test]
    fn box_is_offset_by_center() {
        let mesh = box_geometry([1.0, 2.0, 3.0], [10.0, 0.0, -5.0]);
        let xs = mesh.vertices().iter().map(|v| v.position[0]);
        let (min, max) = xs.fold((f32::MAX, f32::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)));
        assert_eq!((min, max), (9.0, 11.0));
    }

    #[test]
    fn cylinder_generation() {
        let cylinder = cylinder(0.5, 2.0, 16);
        assert_eq!(cylinder.vertex_count(), 17 * 2 + 2 * (1 + 16));
        assert_eq!(cylinder.face_count(), 16 * 4);
        for v in cylinder.vertices() {
            assert!(v.position[1].abs() <= 1.0 + 1e-6);
        }
        assert_outward_winding(&cylinder);
    }

    #[test]
    fn cylinder_clamps_segments() {
        assert_eq!(cylinder(1.0, 1.0, 1).face_count(), 3 * 4);
    }

    #[test]
    fn quad_is_two_triangles_in_pixels() {
        let quad = quad(256.0, 128.0);
        assert_eq!(quad.face_count(), 2);
        assert_eq!(quad.vertices()[0].position, [128.0, 64.0]);
        assert_eq!(quad.vertices()[2].uv, [0.0, 0.0]);
    }
}
