//! Model import for pointview
//!
//! This crate reads model files into an imported [`Scene`] and converts the
//! first mesh of that scene into a flat list of [`PointVertex`] records that
//! can be uploaded to the GPU as-is.
//!
//! ```rust,no_run
//! use pointview_io::load_point_cloud;
//!
//! let cloud = load_point_cloud("bunny/reconstruction/bun_zipper.ply")?;
//! println!("{} points", cloud.len());
//! # Ok::<(), pointview_core::Error>(())
//! ```
//!
//! [`PointVertex`]: pointview_core::PointVertex

pub mod ply;
pub mod import;

pub use ply::PlyImporter;
pub use import::{extract_vertices, load_point_cloud};

use pointview_core::{Error, Result, Scene};
use std::path::Path;

/// Trait for importers that turn a file into a scene
pub trait SceneReader {
    fn read_scene<P: AsRef<Path>>(path: P) -> Result<Scene>;
}

/// Auto-detect format and import a scene
pub fn read_scene<P: AsRef<Path>>(path: P) -> Result<Scene> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    match extension.as_deref() {
        Some("ply") => PlyImporter::read_scene(path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported model format: {:?}",
            path.extension()
        ))),
    }
}
