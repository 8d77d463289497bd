use crate::device::GpuContext;
use crate::upload::PointBuffer;
use bytemuck::{Pod, Zeroable};
use pointview_core::{Error, PointVertex, Result};
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Quad corners emitted per point
const VERTICES_PER_POINT: u32 = 6;

/// Per-frame parameters consumed by the point shader
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointUniform {
    /// Quad size in NDC units; NDC spans 2 units across the viewport
    pub extent: [f32; 2],
    pub viewport: [f32; 2],
}

impl PointUniform {
    pub fn new(width: u32, height: u32, point_size: f32) -> Self {
        let viewport = [width.max(1) as f32, height.max(1) as f32];
        Self {
            extent: [point_size * 2.0 / viewport[0], point_size * 2.0 / viewport[1]],
            viewport,
        }
    }

    /// Quad size in pixels after the viewport transform
    pub fn pixel_size(&self) -> [f32; 2] {
        [
            self.extent[0] * self.viewport[0] / 2.0,
            self.extent[1] * self.viewport[1] / 2.0,
        ]
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Point diameter in pixels
    pub point_size: f32,
    pub background_color: [f64; 4],
    pub enable_depth_test: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_size: 5.0,
            background_color: [0.1, 0.1, 0.1, 1.0],
            enable_depth_test: true,
        }
    }
}

/// Draws an uploaded point cloud into a window every frame
pub struct PointCloudRenderer {
    pub gpu_context: GpuContext,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub render_pipeline: wgpu::RenderPipeline,
    pub uniform: PointUniform,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub depth_view: Option<wgpu::TextureView>,
    pub config: RenderConfig,
}

impl PointCloudRenderer {
    /// Create a renderer bound to the given window
    pub async fn new(window: Arc<Window>, config: RenderConfig) -> Result<Self> {
        let size = window.inner_size();

        let instance = GpuContext::create_instance();
        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Gpu(format!("Failed to create surface: {}", e)))?;
        let gpu_context = GpuContext::with_instance(&instance, Some(&surface)).await?;

        let surface_caps = surface.get_capabilities(&gpu_context.adapter);
        // Colors are written unconverted, as into a framebuffer without sRGB encoding.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("Surface is incompatible with the adapter".to_string()))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu_context.device, &surface_config);
        tracing::debug!(
            format = ?surface_format,
            width = surface_config.width,
            height = surface_config.height,
            "surface configured"
        );

        let uniform = PointUniform::new(surface_config.width, surface_config.height, config.point_size);
        let uniform_buffer = gpu_context.create_buffer_init(
            "Point Uniform Buffer",
            &[uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let uniform_bind_group_layout = gpu_context.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("point_uniform_bind_group_layout"),
        });

        let uniform_bind_group = gpu_context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("point_uniform_bind_group"),
        });

        let shader = gpu_context.create_shader_module(
            "Point Cloud Shader",
            include_str!("shaders/point_cloud.wgsl"),
        );

        let render_pipeline_layout = gpu_context.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Cloud Render Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = gpu_context.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Cloud Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[PointVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: if config.enable_depth_test {
                Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                })
            } else {
                None
            },
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let depth_view = config
            .enable_depth_test
            .then(|| create_depth_view(&gpu_context.device, &surface_config));

        Ok(Self {
            gpu_context,
            surface,
            surface_config,
            render_pipeline,
            uniform,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            config,
        })
    }

    /// Resize renderer surface
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.gpu_context.device, &self.surface_config);

        if self.depth_view.is_some() {
            self.depth_view = Some(create_depth_view(&self.gpu_context.device, &self.surface_config));
        }

        self.uniform = PointUniform::new(new_size.width, new_size.height, self.config.point_size);
        self.gpu_context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniform),
        );
        tracing::debug!(width = new_size.width, height = new_size.height, "surface resized");
    }

    /// Upload vertices through this renderer's device
    pub fn upload(&self, vertices: &[PointVertex]) -> Result<PointBuffer> {
        PointBuffer::upload(&self.gpu_context, vertices)
    }

    /// Clear the frame and draw every point in the buffer
    pub fn render(&mut self, points: &PointBuffer) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.gpu_context.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(Error::Gpu("Out of memory acquiring surface texture".to_string()));
            }
            Err(e) => {
                tracing::warn!("skipping frame: {}", e);
                return Ok(());
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.gpu_context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Point Cloud Render Encoder"),
        });

        {
            let [r, g, b, a] = self.config.background_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Point Cloud Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.depth_view.as_ref().map(|depth_view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, points.buffer().slice(..));
            render_pass.draw(0..VERTICES_PER_POINT, 0..points.len());
        }

        self.gpu_context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Create depth texture for depth testing
fn create_depth_view(device: &wgpu::Device, surface_config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: surface_config.width,
        height: surface_config.height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.point_size, 5.0);
        assert_eq!(config.background_color, [0.1, 0.1, 0.1, 1.0]);
        assert!(config.enable_depth_test);
    }

    #[test]
    fn test_uniform_layout_and_clamping() {
        assert_eq!(std::mem::size_of::<PointUniform>(), 16);

        let uniform = PointUniform::new(800, 600, 5.0);
        assert_eq!(uniform.viewport, [800.0, 600.0]);

        let uniform = PointUniform::new(0, 0, 5.0);
        assert_eq!(uniform.viewport, [1.0, 1.0]);
        assert_eq!(uniform.extent, [10.0, 10.0]);
    }

    #[test]
    fn test_quad_spans_point_size_pixels() {
        for (width, height) in [(800, 600), (1920, 1080), (37, 1)] {
            let uniform = PointUniform::new(width, height, 5.0);
            let [w, h] = uniform.pixel_size();
            assert_relative_eq!(w, 5.0, epsilon = 1e-4);
            assert_relative_eq!(h, 5.0, epsilon = 1e-4);
        }

        let uniform = PointUniform::new(800, 600, 5.0);
        assert_relative_eq!(uniform.extent[0], 0.0125);
        assert_relative_eq!(uniform.extent[1], 10.0 / 600.0);
    }

    fn shader_module() -> naga::Module {
        let module = naga::front::wgsl::parse_str(include_str!("shaders/point_cloud.wgsl"))
            .unwrap_or_else(|e| panic!("point shader does not parse: {:?}", e));
        naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::empty())
            .validate(&module)
            .unwrap_or_else(|e| panic!("point shader does not validate: {:?}", e));
        module
    }

    fn entry_point<'a>(module: &'a naga::Module, name: &str, stage: naga::ShaderStage) -> &'a naga::EntryPoint {
        module
            .entry_points
            .iter()
            .find(|ep| ep.name == name && ep.stage == stage)
            .unwrap_or_else(|| panic!("missing entry point {}", name))
    }

    #[test]
    fn test_shader_validates() {
        let module = shader_module();
        entry_point(&module, "vs_main", naga::ShaderStage::Vertex);
        entry_point(&module, "fs_main", naga::ShaderStage::Fragment);
    }

    #[test]
    fn test_shader_vertex_inputs_match_point_layout() {
        let module = shader_module();
        let vs_main = entry_point(&module, "vs_main", naga::ShaderStage::Vertex);

        let mut inputs = Vec::new();
        for argument in &vs_main.function.arguments {
            match (&argument.binding, &module.types[argument.ty].inner) {
                (Some(naga::Binding::Location { location, .. }), inner) => inputs.push((*location, inner.clone())),
                (None, naga::TypeInner::Struct { members, .. }) => {
                    for member in members {
                        if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                            inputs.push((*location, module.types[member.ty].inner.clone()));
                        }
                    }
                }
                _ => {}
            }
        }

        let vec3 = naga::TypeInner::Vector {
            size: naga::VectorSize::Tri,
            scalar: naga::Scalar::F32,
        };
        let layout = PointVertex::desc();
        assert_eq!(layout.array_stride, PointVertex::STRIDE as wgpu::BufferAddress);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(inputs.len(), layout.attributes.len());
        for attribute in layout.attributes {
            assert_eq!(attribute.format, wgpu::VertexFormat::Float32x3);
            let input = inputs
                .iter()
                .find(|(location, _)| *location == attribute.shader_location)
                .unwrap_or_else(|| panic!("shader has no input at location {}", attribute.shader_location));
            assert_eq!(input.1, vec3);
        }
    }

    #[test]
    fn test_shader_uniform_matches_point_uniform() {
        let module = shader_module();
        let (_, params) = module
            .global_variables
            .iter()
            .find(|(_, var)| var.space == naga::AddressSpace::Uniform)
            .expect("shader declares no uniform");

        assert_eq!(params.binding, Some(naga::ResourceBinding { group: 0, binding: 0 }));
        match &module.types[params.ty].inner {
            naga::TypeInner::Struct { members, span } => {
                assert_eq!(*span as usize, std::mem::size_of::<PointUniform>());
                assert_eq!(members.len(), 2);
                assert_eq!(members[0].name.as_deref(), Some("extent"));
                assert_eq!(members[1].offset, 8);
            }
            other => panic!("uniform is not a struct: {:?}", other),
        }
    }
}
