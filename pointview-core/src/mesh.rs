//! Mesh and scene data structures produced by the importer

use crate::point::*;

/// A triangle mesh with vertices, faces and optional per-vertex attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
    pub colors: Option<Vec<Color>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
            colors: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when there is exactly one color per vertex
    pub fn has_vertex_colors(&self) -> bool {
        matches!(&self.colors, Some(colors) if colors.len() == self.vertices.len())
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        self.normals = Some(normals);
    }

    /// Set vertex colors
    pub fn set_colors(&mut self, colors: Vec<Color>) {
        self.colors = Some(colors);
    }
}

/// The result of importing a model file. PLY files yield at most one mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub meshes: Vec<TriangleMesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mesh(mesh: TriangleMesh) -> Self {
        Self { meshes: vec![mesh] }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn first_mesh(&self) -> Option<&TriangleMesh> {
        self.meshes.first()
    }
}
