//! Error types for pointview

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pointview operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to load PLY file: {}", path.display())]
    NoMeshes { path: PathBuf },

    #[error("No vertices loaded from {}", path.display())]
    EmptyPointCloud { path: PathBuf },
}

/// Result type alias for pointview operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "gpu")]
impl From<wgpu::BufferAsyncError> for Error {
    fn from(e: wgpu::BufferAsyncError) -> Self {
        Error::Gpu(e.to_string())
    }
}
