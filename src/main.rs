// SPDX-License-Identifier: GPL-3.0-only

use camshot::backends::camera::V4l2FrameSource;
use camshot::config::Config;
use camshot::constants::JpegQuality;
use camshot::pipelines::capture::{CapturePipeline, JpegArtifactEncoder};
use camshot::pipelines::publish::HttpBlobStore;
use camshot::server::AppState;
use camshot::{lifecycle, server};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Parser)]
#[command(name = "camshot")]
#[command(about = "HTTP-triggered camera snapshot service")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Bind address for the HTTP server
    #[arg(long, default_value = camshot::constants::DEFAULT_BIND)]
    bind: String,

    /// HTTP listen port
    #[arg(short, long, default_value_t = camshot::constants::DEFAULT_PORT)]
    port: u16,

    /// Camera device index (/dev/video<N>)
    #[arg(short, long, default_value_t = 0)]
    device: usize,

    /// Directory for the two per-capture spool JPEGs
    #[arg(long)]
    spool_dir: Option<PathBuf>,

    /// JPEG quality: low, medium, high, maximum
    #[arg(long, default_value = "high")]
    quality: JpegQuality,

    /// Blob-store upload endpoint
    #[arg(long)]
    storage_endpoint: Option<String>,

    /// Blob-store bucket name
    #[arg(long)]
    bucket: Option<String>,

    /// Public base URL uploaded objects are served from
    #[arg(long)]
    public_base: Option<String>,

    /// Webhook control endpoint; omit to disable registration
    #[arg(long)]
    webhook_url: Option<String>,

    /// Externally visible path registered with the webhook
    #[arg(long, default_value = "/")]
    webhook_path: String,

    /// Disable the keep-awake inhibitor task
    #[arg(long)]
    no_keep_awake: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default when no subcommand is given)
    Serve,

    /// Capture once and spool the two artifacts locally, without uploading
    Capture,

    /// Send the set_webhook control message and exit
    Register,

    /// Send the unset_webhook control message and exit
    Unregister,
}

impl Cli {
    fn to_config(&self) -> Config {
        let defaults = Config::default();
        Config {
            bind: self.bind.clone(),
            port: self.port,
            device_index: self.device,
            spool_dir: self.spool_dir.clone().unwrap_or(defaults.spool_dir),
            jpeg_quality: self.quality,
            storage_endpoint: self
                .storage_endpoint
                .clone()
                .unwrap_or(defaults.storage_endpoint),
            bucket: self.bucket.clone().unwrap_or(defaults.bucket),
            public_base: self.public_base.clone().unwrap_or(defaults.public_base),
            webhook_url: self.webhook_url.clone(),
            webhook_path: self.webhook_path.clone(),
            keep_awake: !self.no_keep_awake,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camshot=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = cli.to_config();

    match cli.command {
        None | Some(Commands::Serve) => serve(config),
        Some(Commands::Capture) => capture_once(config),
        Some(Commands::Register) => Ok(lifecycle::register_webhook(&config)?),
        Some(Commands::Unregister) => Ok(lifecycle::unregister_webhook(&config)?),
    }
}

fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    lifecycle::spawn_webhook_registration(config.clone());
    if config.keep_awake {
        lifecycle::spawn_keep_awake();
    }

    // Best-effort webhook removal on Ctrl-C before exiting.
    let shutdown_config = config.clone();
    ctrlc::set_handler(move || {
        if let Err(e) = lifecycle::unregister_webhook(&shutdown_config) {
            warn!(error = %e, "Webhook removal on shutdown failed");
        }
        std::process::exit(0);
    })?;

    let state = AppState {
        camera: Mutex::new(Box::new(V4l2FrameSource::new(config.device_index))),
        capture: CapturePipeline::new(
            JpegArtifactEncoder::new(config.jpeg_quality),
            &config.spool_dir,
        ),
        store: Box::new(HttpBlobStore::from_config(&config)),
    };

    server::run(&config.listen_addr(), Arc::new(state))?;
    Ok(())
}

fn capture_once(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = V4l2FrameSource::new(config.device_index);
    let pipeline = CapturePipeline::new(
        JpegArtifactEncoder::new(config.jpeg_quality),
        &config.spool_dir,
    );

    let artifacts = pipeline.capture(&mut source)?;
    println!(
        "Original: {} ({}x{})",
        artifacts.original.path.display(),
        artifacts.original.width,
        artifacts.original.height
    );
    println!(
        "Preview:  {} ({}x{})",
        artifacts.preview.path.display(),
        artifacts.preview.width,
        artifacts.preview.height
    );
    Ok(())
}
