//! Command line and viewer configuration

use clap::Parser;
use pointview_gpu::RenderConfig;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "bunny/reconstruction/bun_zipper.ply";
pub const DEFAULT_TITLE: &str = "Gaussian Splatting Renderer";
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

#[derive(Parser, Debug, Clone)]
#[command(name = "pointview", version, about = "Render a PLY point cloud as GPU points")]
pub struct Cli {
    /// PLY model to display
    #[arg(value_name = "MODEL", default_value = DEFAULT_MODEL)]
    pub model: PathBuf,

    /// Window width in logical pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Window title
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Point diameter in pixels
    #[arg(long, default_value_t = 5.0, value_parser = parse_point_size)]
    pub point_size: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pub pause_on_exit: bool,
}

impl Cli {
    /// Log filter used when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            model_path: self.model.clone(),
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            render: RenderConfig {
                point_size: self.point_size,
                ..RenderConfig::default()
            },
        }
    }
}

fn parse_point_size(value: &str) -> Result<f32, String> {
    let size: f32 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err("point size must be a positive number".to_string())
    }
}

/// Everything the viewer needs to open its window and draw
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub model_path: PathBuf,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub render: RenderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL),
            title: DEFAULT_TITLE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            render: RenderConfig::default(),
        }
    }
}
