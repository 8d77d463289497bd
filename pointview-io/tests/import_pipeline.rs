//! Integration tests for the PLY -> vertex list pipeline

use approx::assert_relative_eq;
use pointview_core::{Error, PointVertex};
use pointview_io::load_point_cloud;
use std::fs;
use std::path::PathBuf;

/// Write a PLY file into the system temp directory and return its path
fn write_temp_ply(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("pointview_{}_{}.ply", name, std::process::id()));
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_colored_point_cloud() {
    let path = write_temp_ply(
        "colored",
        "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
end_header
-0.1 0.0 0.05 255 128 0
0.0 0.1 0.0 0 0 0
0.1 -0.1 -0.05 12 34 56
",
    );

    let cloud = load_point_cloud(&path).unwrap();
    assert_eq!(cloud.len(), 3);

    assert_eq!(cloud[0].position, [-0.1, 0.0, 0.05]);
    assert_relative_eq!(cloud[0].color[0], 1.0);
    assert_relative_eq!(cloud[0].color[1], 128.0 / 255.0);
    assert_relative_eq!(cloud[0].color[2], 0.0);
    assert_eq!(cloud[1].color, [0.0, 0.0, 0.0]);
    assert_relative_eq!(cloud[2].color[2], 56.0 / 255.0);

    let _ = fs::remove_file(path);
}

#[test]
fn test_uncolored_mesh_defaults_to_white() {
    let path = write_temp_ply(
        "uncolored",
        "ply
format ascii 1.0
comment zipper-style mesh, positions only
element vertex 4
property float x
property float y
property float z
element face 2
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
1 1 0
0 1 0
3 0 1 2
3 0 2 3
",
    );

    let cloud = load_point_cloud(&path).unwrap();
    assert_eq!(cloud.len(), 4);
    assert!(cloud.iter().all(|v| v.color == PointVertex::WHITE));
    assert_eq!(cloud[2].position, [1.0, 1.0, 0.0]);

    let bounds = cloud.bounds().unwrap();
    assert_eq!(bounds.min.coords.as_slice(), &[0.0, 0.0, 0.0]);
    assert_eq!(bounds.max.coords.as_slice(), &[1.0, 1.0, 0.0]);

    let _ = fs::remove_file(path);
}

#[test]
fn test_file_without_vertices_reports_no_meshes() {
    let path = write_temp_ply(
        "empty",
        "ply
format ascii 1.0
element vertex 0
property float x
property float y
property float z
end_header
",
    );

    match load_point_cloud(&path) {
        Err(Error::NoMeshes { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected NoMeshes, got {:?}", other),
    }

    let _ = fs::remove_file(path);
}

#[test]
fn test_missing_file() {
    let err = load_point_cloud("bunny/reconstruction/not_here.ply").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_unsupported_format() {
    let err = load_point_cloud("scan.xyz").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
}
