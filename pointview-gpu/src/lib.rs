//! # pointview GPU
//!
//! wgpu plumbing for pointview: device setup, uploading a vertex list into a
//! GPU buffer, and drawing it as fixed-size points every frame.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pointview_gpu::{GpuContext, PointBuffer};
//! use pointview_core::PointVertex;
//!
//! async fn example() -> pointview_core::Result<()> {
//!     let gpu = GpuContext::new().await?;
//!     let vertices = vec![PointVertex::new([0.0, 0.0, 0.0], PointVertex::WHITE)];
//!     let points = PointBuffer::upload(&gpu, &vertices)?;
//!     assert_eq!(points.len(), 1);
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod upload;
pub mod renderer;

// Re-export commonly used items
pub use device::GpuContext;
pub use upload::PointBuffer;
pub use renderer::{PointCloudRenderer, PointUniform, RenderConfig};
