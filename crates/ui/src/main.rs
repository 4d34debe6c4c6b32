use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cone_viewer_client::{ClientConfig, HttpConeApi, ViewerSession};
use cone_viewer_core::state::FilterMode;
use cone_viewer_ui::ConeViewerApp;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    // Optional single argument: path to a TOML config file.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ClientConfig::load(config_path.as_deref()).context("failed to load configuration")?;
    let api = HttpConeApi::new(&config).context("failed to build API client")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let session = ViewerSession::new(
        Arc::new(api),
        runtime.handle().clone(),
        FilterMode::Single,
        config.display_ids,
    );
    info!(base_url = %config.base_url, "starting desktop viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Cone Viewer")
            .with_inner_size([1200.0, 820.0]),
        ..Default::default()
    };
    eframe::run_native(
        "cone-viewer",
        options,
        Box::new(move |cc| Ok(Box::new(ConeViewerApp::new(cc, session)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with an error: {e}"))
}
