//! Editable vertex + index builder.

/// Byte size of one index in every index buffer the sandbox builds (`Uint32`).
pub const INDEX_BYTE_SIZE: u64 = std::mem::size_of::<u32>() as u64;

/// One triangle: three indices into the owning geometry's vertex list.
///
/// `Pod`, so a `&[Face]` is directly a `Uint32` index buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Face(pub [u32; 3]);

impl Face {
    pub fn new(i0: u32, i1: u32, i2: u32) -> Self {
        Self([i0, i1, i2])
    }

    pub fn indices(&self) -> [u32; 3] {
        self.0
    }

    /// The same triangle with every index shifted by `offset`.
    pub fn offset(&self, offset: u32) -> Self {
        let [a, b, c] = self.0;
        Self([a + offset, b + offset, c + offset])
    }
}

/// Ordered vertices plus ordered triangles, built with
/// `begin` / `add_vertex` / `add_face` / `end`.
///
/// Adding outside a `begin`/`end` bracket, referencing a vertex that was not
/// added yet, or reading an unfinished geometry are contract violations and
/// panic.
///
/// ```
/// use playground::gfx::geometry::{MeshGeometry, SpriteVertex};
///
/// let mut square = MeshGeometry::new();
/// square.begin(4, 2);
/// let a = square.add_vertex(SpriteVertex::new([ 128.0,  128.0], [1.0, 1.0]));
/// let b = square.add_vertex(SpriteVertex::new([ 128.0, -128.0], [1.0, 0.0]));
/// let c = square.add_vertex(SpriteVertex::new([-128.0, -128.0], [0.0, 0.0]));
/// let d = square.add_vertex(SpriteVertex::new([-128.0,  128.0], [0.0, 1.0]));
/// square.add_face(a, b, d);
/// square.add_face(b, c, d);
/// square.end();
///
/// assert_eq!(square.index_count(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry<V> {
    vertices: Vec<V>,
    faces: Vec<Face>,
    building: bool,
}

impl<V> Default for MeshGeometry<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            building: false,
        }
    }
}

impl<V: Copy> MeshGeometry<V> {
    /// An empty, finished geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a finished geometry from existing lists.
    ///
    /// # Panics
    /// If any face references a vertex outside `vertices`.
    pub fn from_parts(vertices: Vec<V>, faces: Vec<Face>) -> Self {
        let vertex_count = vertices.len();
        for (i, face) in faces.iter().enumerate() {
            for index in face.indices() {
                assert!(
                    (index as usize) < vertex_count,
                    "face {i} references vertex {index} but only {vertex_count} vertices exist"
                );
            }
        }

        Self {
            vertices,
            faces,
            building: false,
        }
    }

    /// Clears the geometry and opens it for editing.
    pub fn begin(&mut self, vertex_capacity: usize, face_capacity: usize) {
        self.vertices.clear();
        self.faces.clear();
        self.vertices.reserve(vertex_capacity);
        self.faces.reserve(face_capacity);
        self.building = true;
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(&mut self, vertex: V) -> u32 {
        assert!(self.building, "add_vertex called outside begin()/end()");
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Appends a triangle over three already-added vertices.
    pub fn add_face(&mut self, i0: u32, i1: u32, i2: u32) {
        assert!(self.building, "add_face called outside begin()/end()");
        let vertex_count = self.vertices.len();
        for index in [i0, i1, i2] {
            assert!(
                (index as usize) < vertex_count,
                "face index {index} out of range: {vertex_count} vertices added"
            );
        }
        self.faces.push(Face::new(i0, i1, i2));
    }

    /// Closes the geometry; `vertices()` and `faces()` become readable.
    pub fn end(&mut self) {
        assert!(self.building, "end() without matching begin()");
        self.building = false;
    }

    pub fn is_finished(&self) -> bool {
        !self.building
    }

    pub fn vertices(&self) -> &[V] {
        assert!(!self.building, "geometry read before end()");
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        assert!(!self.building, "geometry read before end()");
        &self.faces
    }

    /// Faces flattened into the index sequence uploaded to the GPU.
    pub fn indices(&self) -> &[u32] {
        bytemuck::cast_slice(self.faces())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn index_count(&self) -> usize {
        self.faces.len() * 3
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Moves the vertex and face lists out.
    pub fn into_parts(self) -> (Vec<V>, Vec<Face>) {
        assert!(!self.building, "geometry read before end()");
        (self.vertices, self.faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_strip(vertex_count: u32) -> MeshGeometry<[f32; 2]> {
        let mut geometry = MeshGeometry::new();
        geometry.begin(vertex_count as usize, 0);
        for i in 0..vertex_count {
            geometry.add_vertex([i as f32, (i % 2) as f32]);
        }
        for i in 2..vertex_count {
            geometry.add_face(i - 2, i - 1, i);
        }
        geometry.end();
        geometry
    }

    #[test]
    fn build_reproduces_inputs_in_order() {
        let input_vertices = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let input_faces = [[0, 1, 2], [2, 3, 0]];

        let mut geometry = MeshGeometry::new();
        geometry.begin(4, 2);
        for (i, v) in input_vertices.iter().enumerate() {
            assert_eq!(geometry.add_vertex(*v), i as u32);
        }
        for [a, b, c] in input_faces {
            geometry.add_face(a, b, c);
        }
        geometry.end();

        assert_eq!(geometry.vertices(), &input_vertices);
        let faces: Vec<[u32; 3]> = geometry.faces().iter().map(Face::indices).collect();
        assert_eq!(faces, input_faces);
        assert_eq!(geometry.indices(), &[0u32, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn begin_resets_previous_contents() {
        let mut geometry = triangle_strip(5);
        assert_eq!(geometry.face_count(), 3);

        geometry.begin(0, 0);
        geometry.add_vertex([9.0, 9.0]);
        geometry.end();

        assert_eq!(geometry.vertex_count(), 1);
        assert_eq!(geometry.face_count(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn face_must_reference_added_vertices() {
        let mut geometry = MeshGeometry::new();
        geometry.begin(2, 1);
        geometry.add_vertex([0.0f32, 0.0]);
        geometry.add_vertex([1.0f32, 0.0]);
        geometry.add_face(0, 1, 2);
    }

    #[test]
    #[should_panic(expected = "outside begin")]
    fn adding_to_a_finished_geometry_panics() {
        let mut geometry = triangle_strip(3);
        geometry.add_vertex([0.0, 0.0]);
    }

    #[test]
    #[should_panic(expected = "before end")]
    fn reading_before_end_panics() {
        let mut geometry = MeshGeometry::<[f32; 2]>::new();
        geometry.begin(1, 0);
        let _ = geometry.vertices();
    }

    #[test]
    #[should_panic(expected = "references vertex 3")]
    fn from_parts_validates_faces() {
        let _ = MeshGeometry::from_parts(vec![[0.0f32; 3]; 3], vec![Face::new(0, 1, 3)]);
    }

    #[test]
    fn face_offset_shifts_every_index() {
        assert_eq!(Face::new(0, 1, 2).offset(10), Face::new(10, 11, 12));
    }
}
