//! Level geometry as handed over by the mesh loader

use glam::{Vec2, Vec3};

/// A polygon referencing level vertices by index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshFace {
    /// Zero-based indices into [`LevelMesh::vertices`]
    pub indices: Vec<usize>,
    /// Material tag assigned by the source file
    pub material: Option<String>,
}

impl MeshFace {
    /// Create a face without a material
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            material: None,
        }
    }

    /// Attach a material tag
    #[must_use]
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }
}

/// World-space level mesh: vertex positions plus polygon faces
#[derive(Debug, Clone, Default)]
pub struct LevelMesh {
    /// Vertex positions in world space
    pub vertices: Vec<Vec3>,
    /// Faces referencing `vertices`
    pub faces: Vec<MeshFace>,
}

impl LevelMesh {
    /// Create an empty mesh
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and faces
    #[must_use]
    pub fn from_data(vertices: Vec<Vec3>, faces: Vec<MeshFace>) -> Self {
        Self { vertices, faces }
    }

    /// Add a vertex and return its index
    pub fn push_vertex(&mut self, position: Vec3) -> usize {
        self.vertices.push(position);
        self.vertices.len() - 1
    }

    /// Add a face
    pub fn push_face(&mut self, face: MeshFace) {
        self.faces.push(face);
    }

    /// Resolve a face's indices to positions, dropping indices that do not exist
    #[must_use]
    pub fn resolve(&self, face: &MeshFace) -> Vec<Vec3> {
        face.indices
            .iter()
            .filter_map(|&index| self.vertices.get(index).copied())
            .collect()
    }

    /// Check whether the mesh has no faces
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Get the number of faces
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Add a vertical quad standing on the segment `from`..`to` (x, z)
    pub fn add_wall(&mut self, from: Vec2, to: Vec2, bottom: f32, top: f32) {
        let a = self.push_vertex(Vec3::new(from.x, bottom, from.y));
        let b = self.push_vertex(Vec3::new(to.x, bottom, to.y));
        let c = self.push_vertex(Vec3::new(to.x, top, to.y));
        let d = self.push_vertex(Vec3::new(from.x, top, from.y));
        self.push_face(MeshFace::new(vec![a, b, c, d]).with_material("wall"));
    }

    /// Add an axis-aligned box as six quads
    pub fn add_box(&mut self, min: Vec3, max: Vec3) {
        let corners = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];
        let base = self.vertices.len();
        self.vertices.extend_from_slice(&corners);

        let quads: [[usize; 4]; 6] = [
            [0, 3, 2, 1], // Bottom
            [4, 5, 6, 7], // Top
            [0, 1, 5, 4], // -Z side
            [2, 3, 7, 6], // +Z side
            [1, 2, 6, 5], // +X side
            [3, 0, 4, 7], // -X side
        ];
        for quad in quads {
            let indices = quad.iter().map(|i| base + i).collect();
            self.push_face(MeshFace::new(indices).with_material("box"));
        }
    }

    /// Add a floor quad at height `y` covering `[-half, half]` on both axes
    pub fn add_floor(&mut self, half: f32, y: f32) {
        let a = self.push_vertex(Vec3::new(-half, y, half));
        let b = self.push_vertex(Vec3::new(half, y, half));
        let c = self.push_vertex(Vec3::new(half, y, -half));
        let d = self.push_vertex(Vec3::new(-half, y, -half));
        self.push_face(MeshFace::new(vec![a, b, c, d]).with_material("floor"));
    }
}
