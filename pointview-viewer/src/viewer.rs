//! Window bootstrap and render loop

use crate::config::ViewerConfig;
use pointview_core::{Error, Result};
use pointview_gpu::PointCloudRenderer;
use pointview_io::load_point_cloud;
use std::sync::Arc;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

/// Single-window point cloud viewer
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    /// Open the window, load and upload the model, then draw until the window closes
    pub fn run(self) -> Result<()> {
        let ViewerConfig {
            model_path,
            title,
            width,
            height,
            render,
        } = self.config;

        tracing::info!("Starting {}...", title);

        let event_loop = EventLoop::new()
            .map_err(|e| Error::Window(format!("Failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(title.as_str())
                .with_inner_size(LogicalSize::new(width as f64, height as f64))
                .build(&event_loop)
                .map_err(|e| Error::Window(format!("Failed to create window: {}", e)))?,
        );
        tracing::info!("Window created successfully.");

        let mut renderer = pollster::block_on(PointCloudRenderer::new(window.clone(), render))?;

        let cloud = load_point_cloud(&model_path)?;
        if cloud.is_empty() {
            return Err(Error::EmptyPointCloud { path: model_path });
        }

        let points = renderer.upload(cloud.as_slice())?;
        tracing::info!("Rendering {} points...", points.len());

        let mut failure = None;
        event_loop
            .run(|event, target| {
                target.set_control_flow(ControlFlow::Poll);

                match event {
                    Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                        WindowEvent::CloseRequested => {
                            target.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            renderer.resize(new_size);
                        }
                        WindowEvent::RedrawRequested => {
                            tracing::trace!("Rendering frame...");
                            if let Err(e) = renderer.render(&points) {
                                tracing::error!("Render error: {}", e);
                                failure = Some(e);
                                target.exit();
                            }
                        }
                        _ => {}
                    },
                    Event::AboutToWait => {
                        window.request_redraw();
                    }
                    Event::LoopExiting => {
                        tracing::info!("Closing application...");
                    }
                    _ => {}
                }
            })
            .map_err(|e| Error::Window(format!("Event loop error: {}", e)))?;

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
