//! Desktop viewer for a single PLY point cloud
//!
//! Opens one window, imports the model's first mesh, uploads its vertices to
//! the GPU once and draws them as fixed-size points every frame until the
//! window is closed.

pub mod config;
pub mod viewer;

pub use config::{Cli, ViewerConfig};
pub use viewer::Viewer;
