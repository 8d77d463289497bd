//! Mesh import adapter: imported mesh -> flat position/color vertex list

use crate::read_scene;
use pointview_core::{Error, PointVertex, Result, TriangleMesh, VertexCloud};
use std::path::Path;

/// Convert a mesh into one render vertex per mesh vertex.
///
/// Colors are taken from the mesh's vertex colors (alpha dropped) when every
/// vertex has one; otherwise every vertex is opaque white.
pub fn extract_vertices(mesh: &TriangleMesh) -> VertexCloud {
    match mesh.colors.as_ref().filter(|_| mesh.has_vertex_colors()) {
        Some(colors) => mesh
            .vertices
            .iter()
            .zip(colors)
            .map(|(point, color)| PointVertex::from_point(point, [color[0], color[1], color[2]]))
            .collect(),
        None => mesh
            .vertices
            .iter()
            .map(|point| PointVertex::from_point(point, PointVertex::WHITE))
            .collect(),
    }
}

/// Import a model file and convert its first mesh into render vertices.
///
/// A file that yields no mesh is an error. A mesh without vertices is not: the
/// empty cloud is returned and the caller decides what to do with it. The PLY
/// importer never produces such a mesh (zero vertices means zero meshes), so
/// only other readers reach the empty-cloud warning.
pub fn load_point_cloud<P: AsRef<Path>>(path: P) -> Result<VertexCloud> {
    let path = path.as_ref();
    tracing::info!("Loading model: {}", path.display());

    let scene = read_scene(path)?;
    let Some(mesh) = scene.first_mesh() else {
        return Err(Error::NoMeshes {
            path: path.to_path_buf(),
        });
    };
    if scene.mesh_count() > 1 {
        tracing::debug!("ignoring {} additional meshes", scene.mesh_count() - 1);
    }

    let cloud = extract_vertices(mesh);
    tracing::info!("Loaded {} vertices from {}", cloud.len(), path.display());

    if cloud.is_empty() {
        tracing::warn!("No vertices loaded! Check if the PLY file is valid.");
    } else if let Some(bounds) = cloud.bounds() {
        tracing::debug!(
            min = ?bounds.min.coords.as_slice(),
            max = ?bounds.max.coords.as_slice(),
            colored = mesh.has_vertex_colors(),
            "point cloud bounds"
        );
    }

    Ok(cloud)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointview_core::Point3f;

    fn mesh() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 2.0, 3.0),
            ],
            vec![],
        )
    }

    #[test]
    fn test_white_fallback_without_colors() {
        let cloud = extract_vertices(&mesh());
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[1].position, [1.0, 2.0, 3.0]);
        assert!(cloud.iter().all(|v| v.color == [1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_vertex_colors_are_copied_without_alpha() {
        let mut mesh = mesh();
        mesh.set_colors(vec![[0.1, 0.2, 0.3, 0.0], [1.0, 0.5, 0.0, 1.0]]);

        let cloud = extract_vertices(&mesh);
        assert_eq!(cloud[0].color, [0.1, 0.2, 0.3]);
        assert_eq!(cloud[1].color, [1.0, 0.5, 0.0]);
        assert_eq!(cloud[0].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_mismatched_color_count_falls_back_to_white() {
        let mut mesh = mesh();
        mesh.set_colors(vec![[1.0, 0.0, 0.0, 1.0]]);

        let cloud = extract_vertices(&mesh);
        assert_eq!(cloud.len(), 2);
        assert!(cloud.iter().all(|v| v.color == PointVertex::WHITE));
    }

    #[test]
    fn test_empty_mesh() {
        assert!(extract_vertices(&TriangleMesh::new()).is_empty());
    }
}
