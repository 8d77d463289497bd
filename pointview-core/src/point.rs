//! Point and vertex types

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Linear RGBA color, components in `[0, 1]`
pub type Color = [f32; 4];

/// Vertex record uploaded to the GPU: position followed by RGB color.
///
/// The layout is fixed at 24 bytes with the color starting at byte 12, so the
/// buffer can be bound with a two-attribute layout and no padding.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointVertex {
    /// Opaque white, used when the source mesh carries no vertex colors
    pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

    /// Distance in bytes between consecutive vertices
    pub const STRIDE: usize = std::mem::size_of::<PointVertex>();

    /// Byte offset of the color attribute
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 3]>();

    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    /// Create vertex from Point3f with the given color
    pub fn from_point(point: &Point3f, color: [f32; 3]) -> Self {
        Self {
            position: [point.x, point.y, point.z],
            color,
        }
    }

    /// Position as an nalgebra point
    pub fn point(&self) -> Point3f {
        Point3f::new(self.position[0], self.position[1], self.position[2])
    }
}

#[cfg(feature = "gpu")]
impl PointVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        // Position
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        // Color
        wgpu::VertexAttribute {
            offset: Self::COLOR_OFFSET as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ];

    /// Vertex buffer layout descriptor.
    ///
    /// Each point is expanded into a screen-space quad by the vertex shader,
    /// so the buffer advances once per instance rather than once per vertex.
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
