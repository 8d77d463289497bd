//! Core data structures for pointview
//!
//! This crate provides the fundamental types shared by the importer, the GPU
//! upload step and the viewer: render vertices, point clouds, meshes and the
//! imported scene, plus the common error type.

pub mod point;
pub mod point_cloud;
pub mod mesh;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use mesh::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
