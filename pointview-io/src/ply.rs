//! PLY format support

use crate::SceneReader;
use ply_rs::{
    parser::Parser,
    ply::{DefaultElement, ElementDef, Property},
};
use pointview_core::{Color, Error, Point3f, Result, Scene, TriangleMesh, Vector3f};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const RED: &[&str] = &["red", "r", "diffuse_red"];
const GREEN: &[&str] = &["green", "g", "diffuse_green"];
const BLUE: &[&str] = &["blue", "b", "diffuse_blue"];
const ALPHA: &[&str] = &["alpha", "a", "diffuse_alpha"];

/// Importer for Stanford PLY files (ASCII and binary)
pub struct PlyImporter;

impl SceneReader for PlyImporter {
    fn read_scene<P: AsRef<Path>>(path: P) -> Result<Scene> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        PlyImporter::read_scene_from(&mut reader).map_err(|e| match e {
            Error::InvalidData(message) => {
                Error::InvalidData(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }
}

impl PlyImporter {
    /// Import a scene from any buffered PLY source
    pub fn read_scene_from<R: BufRead>(reader: &mut R) -> Result<Scene> {
        let parser = Parser::<DefaultElement>::new();
        let ply = parser
            .read_ply(reader)
            .map_err(|e| Error::InvalidData(format!("failed to parse PLY: {}", e)))?;

        let Some(vertex_def) = ply.header.elements.get("vertex") else {
            tracing::debug!("PLY has no vertex element");
            return Ok(Scene::new());
        };

        let vertex_elements = match ply.payload.get("vertex") {
            Some(elements) if !elements.is_empty() => elements,
            _ => {
                tracing::debug!("PLY vertex element is empty");
                return Ok(Scene::new());
            }
        };

        let mut vertices = Vec::with_capacity(vertex_elements.len());
        for vertex in vertex_elements {
            vertices.push(Point3f::new(
                extract_scalar(vertex, "x")?,
                extract_scalar(vertex, "y")?,
                extract_scalar(vertex, "z")?,
            ));
        }

        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, Vec::new());

        if let Some(channel) = ColorChannel::from_element(vertex_def) {
            let colors = vertex_elements
                .iter()
                .map(|vertex| channel.read(vertex))
                .collect::<Result<Vec<Color>>>()?;
            mesh.set_colors(colors);
        }

        if ["nx", "ny", "nz"].iter().all(|n| vertex_def.properties.contains_key(*n)) {
            let normals = vertex_elements
                .iter()
                .map(|vertex| {
                    Ok(Vector3f::new(
                        extract_scalar(vertex, "nx")?,
                        extract_scalar(vertex, "ny")?,
                        extract_scalar(vertex, "nz")?,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            mesh.set_normals(normals);
        }

        if let Some(face_elements) = ply.payload.get("face") {
            let vertex_count = mesh.vertex_count();
            for face in face_elements {
                let indices = extract_face_indices(face)?;
                if let Some(&bad) = indices.iter().find(|&&i| i >= vertex_count) {
                    return Err(Error::InvalidData(format!(
                        "face references vertex {} but only {} vertices exist",
                        bad, vertex_count
                    )));
                }
                triangulate_fan(&indices, &mut mesh.faces);
            }
        }

        tracing::debug!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            colors = mesh.has_vertex_colors(),
            normals = mesh.normals.is_some(),
            "parsed PLY mesh"
        );

        Ok(Scene::from_mesh(mesh))
    }
}

/// Property names carrying the RGB(A) channel of a vertex element
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColorChannel {
    red: &'static str,
    green: &'static str,
    blue: &'static str,
    alpha: Option<&'static str>,
}

impl ColorChannel {
    /// Present only when red, green and blue are all declared in the header
    fn from_element(def: &ElementDef) -> Option<Self> {
        let find = |names: &[&'static str]| {
            names.iter().copied().find(|n| def.properties.contains_key(*n))
        };

        Some(Self {
            red: find(RED)?,
            green: find(GREEN)?,
            blue: find(BLUE)?,
            alpha: find(ALPHA),
        })
    }

    fn read(&self, element: &DefaultElement) -> Result<Color> {
        let alpha = match self.alpha {
            Some(name) => extract_color(element, name)?,
            None => 1.0,
        };

        Ok([
            extract_color(element, self.red)?,
            extract_color(element, self.green)?,
            extract_color(element, self.blue)?,
            alpha,
        ])
    }
}

/// Split a polygon into triangles sharing its first vertex
fn triangulate_fan(indices: &[usize], faces: &mut Vec<[usize; 3]>) {
    if indices.len() < 3 {
        return;
    }
    for pair in indices[1..].windows(2) {
        faces.push([indices[0], pair[0], pair[1]]);
    }
}

/// Extract a scalar property as f32
fn extract_scalar(element: &DefaultElement, name: &str) -> Result<f32> {
    element
        .get(name)
        .and_then(scalar_as_f32)
        .ok_or_else(|| Error::InvalidData(format!("Property '{}' not found or invalid type", name)))
}

/// Extract a color component normalized to `[0, 1]`
fn extract_color(element: &DefaultElement, name: &str) -> Result<f32> {
    element
        .get(name)
        .and_then(normalize_color)
        .ok_or_else(|| Error::InvalidData(format!("Color property '{}' not found or invalid type", name)))
}

fn scalar_as_f32(property: &Property) -> Option<f32> {
    let value = match *property {
        Property::Char(v) => v as f32,
        Property::UChar(v) => v as f32,
        Property::Short(v) => v as f32,
        Property::UShort(v) => v as f32,
        Property::Int(v) => v as f32,
        Property::UInt(v) => v as f32,
        Property::Float(v) => v,
        Property::Double(v) => v as f32,
        _ => return None,
    };
    Some(value)
}

/// Integer channels are scaled by their type's range, floats are taken as-is
fn normalize_color(property: &Property) -> Option<f32> {
    let value = match *property {
        Property::UChar(v) => v as f32 / 255.0,
        Property::UShort(v) => v as f32 / 65535.0,
        Property::UInt(v) => (v as f64 / u32::MAX as f64) as f32,
        Property::Char(v) => ((v as f32 + 127.0) / 255.0).clamp(0.0, 1.0),
        Property::Short(v) => ((v as f32 + 32767.0) / 65535.0).clamp(0.0, 1.0),
        Property::Int(v) => ((v as f64 + i32::MAX as f64) / u32::MAX as f64).clamp(0.0, 1.0) as f32,
        Property::Float(v) => v,
        Property::Double(v) => v as f32,
        _ => return None,
    };
    Some(value)
}

/// Extract face indices from a PLY face element
fn extract_face_indices(element: &DefaultElement) -> Result<Vec<usize>> {
    fn convert<T: Copy + TryInto<usize>>(values: &[T]) -> Result<Vec<usize>> {
        values
            .iter()
            .map(|&v| {
                v.try_into()
                    .map_err(|_| Error::InvalidData("negative face index".to_string()))
            })
            .collect()
    }

    match element.get("vertex_indices").or_else(|| element.get("vertex_index")) {
        Some(Property::ListChar(indices)) => convert(indices),
        Some(Property::ListUChar(indices)) => convert(indices),
        Some(Property::ListShort(indices)) => convert(indices),
        Some(Property::ListUShort(indices)) => convert(indices),
        Some(Property::ListInt(indices)) => convert(indices),
        Some(Property::ListUInt(indices)) => convert(indices),
        _ => Err(Error::InvalidData("Face indices not found".to_string())),
    }
}
