use anyhow::{Context, Result};
use clap::Parser;
use pointview_viewer::{Cli, Viewer};
use std::io::BufRead;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn run(cli: &Cli) -> Result<()> {
    let config = cli.viewer_config();
    let model = config.model_path.display().to_string();
    Viewer::new(config)
        .run()
        .with_context(|| format!("failed to display {}", model))
}

fn wait_for_enter() {
    println!("Press Enter to exit...");
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let code = match run(&cli) {
        Ok(()) => {
            tracing::info!("Application closed successfully!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    };

    if cli.pause_on_exit {
        wait_for_enter();
    }

    code
}
