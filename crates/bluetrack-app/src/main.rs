//! Bluetrack - terminal view over a Bluetooth device session
//!
//! Polls the device backend, renders the device list and distance chart, and
//! forwards scan, pair, and disconnect commands.

mod config;
mod render;
mod watch;

use anyhow::Result;
use bluetrack_client::HttpBackend;
use bluetrack_core::Mac;
use bluetrack_session::Session;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "bluetrack")]
#[command(about = "Bluetooth device list and distance view")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "bluetrack.toml")]
    config: PathBuf,

    /// Backend base URL, overrides the configuration file
    #[arg(short, long)]
    backend: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Keep a live view open and accept commands on stdin (default)
    Watch,
    /// Fetch the device list once and print it
    Devices,
    /// Run one active scan and print the result
    Scan {
        /// Scan duration in seconds, defaults to the configured duration
        #[arg(short, long)]
        duration: Option<u64>,
    },
    /// Pair with and connect to a device
    Pair { mac: String },
    /// Disconnect a device
    Disconnect { mac: String },
    /// Write the default configuration to the config path
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout belongs to the rendered view
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Bluetrack v{}", env!("CARGO_PKG_VERSION"));

    let command = args.command.unwrap_or(Command::Watch);
    if let Command::InitConfig = command {
        config::save_default_config(&args.config)?;
        println!("Wrote {}", args.config.display());
        return Ok(());
    }

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // Override backend if specified
    if let Some(backend) = args.backend {
        config.backend.base_url = backend;
    }

    info!(
        backend = %config.backend.base_url,
        poll_interval = config.session.poll_interval_secs,
        policy = ?config.session.apply_policy,
        "Configuration loaded"
    );

    let backend = Arc::new(HttpBackend::new(
        &config.backend.base_url,
        config.request_timeout(),
    )?);
    let session_config = config.to_session_config();

    if let Command::Watch = command {
        let handle = Session::mount(backend, session_config);
        return watch::run(handle).await;
    }

    // One-shot commands run against an unmounted session
    let session = Session::new(backend, session_config);
    let result = match command {
        Command::Devices => session.refresh().await,
        Command::Scan { duration } => match duration {
            Some(secs) => session.scan(secs).await,
            None => session.scan_default().await,
        },
        Command::Pair { mac } => session.pair(Mac::from(mac)).await,
        Command::Disconnect { mac } => session.disconnect(Mac::from(mac)).await,
        Command::Watch | Command::InitConfig => Ok(()),
    };

    print!("{}", render::render_view(&session.snapshot().await));
    result?;
    Ok(())
}
