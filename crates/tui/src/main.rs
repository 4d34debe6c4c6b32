mod args;
mod batch;
mod interactive;
mod renderer;

use std::fs::File;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use cone_viewer_client::{ClientConfig, HttpConeApi, ViewerSession};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ClientConfig::load(args.config.as_deref())?;
    let api = HttpConeApi::new(&config)?;
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;

    if args.is_batch() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();
        info!(base_url = api.base_url(), "cone-viewer batch");
        let written = runtime.block_on(batch::run(&api, &args))?;
        for path in written {
            eprintln!("{}", path.display());
        }
        return Ok(());
    }

    // The terminal belongs to the viewer; logs go to a file instead.
    let log_path = std::env::temp_dir().join("cone-viewer.log");
    let log_file = File::create(&log_path)
        .with_context(|| format!("creating {}", log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let session = ViewerSession::new(
        Arc::new(api),
        runtime.handle().clone(),
        args.mode(),
        config.display_ids,
    );
    interactive::run(&session, &args)
}
