//! Vertex upload: copy a point list into a single GPU vertex buffer

use crate::device::GpuContext;
use pointview_core::{Error, PointVertex, Result};

/// Point vertices resident on the GPU, laid out as described by [`PointVertex::desc`]
pub struct PointBuffer {
    buffer: wgpu::Buffer,
    len: u32,
}

impl PointBuffer {
    /// Upload vertices into a static vertex buffer
    pub fn upload(gpu: &GpuContext, vertices: &[PointVertex]) -> Result<Self> {
        if vertices.is_empty() {
            return Err(Error::InvalidData("cannot upload an empty point cloud".to_string()));
        }
        let len = u32::try_from(vertices.len()).map_err(|_| {
            Error::InvalidData(format!("{} points exceed the drawable range", vertices.len()))
        })?;

        let buffer = gpu.create_buffer_init(
            "Point Cloud Vertex Buffer",
            vertices,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_SRC,
        );

        tracing::info!("Point cloud uploaded to GPU buffers.");
        tracing::debug!(points = len, bytes = buffer.size(), "vertex buffer created");

        Ok(Self { buffer, len })
    }

    /// Number of points in the buffer
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Size of the buffer contents in bytes
    pub fn byte_size(&self) -> u64 {
        self.len as u64 * PointVertex::STRIDE as u64
    }

    /// Copy the buffer back to the host
    pub async fn read_back(&self, gpu: &GpuContext) -> Result<Vec<PointVertex>> {
        let staging_buffer = gpu.create_buffer(
            "Point Cloud Staging Buffer",
            self.byte_size(),
            wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        );

        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Point Cloud Readback Encoder"),
        });
        encoder.copy_buffer_to_buffer(&self.buffer, 0, &staging_buffer, 0, self.byte_size());
        gpu.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..);
        let (sender, receiver) = flume::bounded(1);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        gpu.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv_async()
            .await
            .map_err(|_| Error::Gpu("Failed to receive mapping result".into()))??;

        let data = buffer_slice.get_mapped_range();
        let vertices: Vec<PointVertex> = bytemuck::cast_slice(&data).to_vec();

        drop(data);
        staging_buffer.unmap();

        Ok(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Try to create a GPU context, return None if not available
    async fn try_create_gpu_context() -> Option<GpuContext> {
        match GpuContext::new().await {
            Ok(gpu) => Some(gpu),
            Err(_) => {
                println!("GPU not available, skipping GPU-dependent test");
                None
            }
        }
    }

    fn sample_vertices() -> Vec<PointVertex> {
        vec![
            PointVertex::new([0.0, 0.0, 0.0], PointVertex::WHITE),
            PointVertex::new([0.5, -0.5, 0.25], [1.0, 0.0, 0.0]),
            PointVertex::new([-0.5, 0.5, -0.25], [0.0, 0.5, 1.0]),
        ]
    }

    #[test]
    fn test_upload_sizes_buffer_by_stride() {
        pollster::block_on(async {
            let Some(gpu) = try_create_gpu_context().await else {
                return;
            };

            let points = PointBuffer::upload(&gpu, &sample_vertices()).unwrap();
            assert_eq!(points.len(), 3);
            assert_eq!(points.byte_size(), 72);
            assert_eq!(points.buffer().size(), 72);
            assert!(points.buffer().usage().contains(wgpu::BufferUsages::VERTEX));
        });
    }

    #[test]
    fn test_upload_round_trips_contents() {
        pollster::block_on(async {
            let Some(gpu) = try_create_gpu_context().await else {
                return;
            };

            let vertices = sample_vertices();
            let points = PointBuffer::upload(&gpu, &vertices).unwrap();
            let read = points.read_back(&gpu).await.unwrap();
            assert_eq!(read, vertices);
        });
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        pollster::block_on(async {
            let Some(gpu) = try_create_gpu_context().await else {
                return;
            };

            let err = PointBuffer::upload(&gpu, &[]).err().unwrap();
            assert!(matches!(err, Error::InvalidData(_)));
        });
    }
}
