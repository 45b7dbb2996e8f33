//! Bluetrack mock backend - serves a fixture device list over HTTP

use anyhow::Result;
use bluetrack_mock::{load_fixtures, Behavior, MockState};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "bluetrack-mock")]
#[command(about = "In-memory scanning backend for Bluetrack")]
#[command(version)]
struct Args {
    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    bind: String,

    /// TOML file with [[device]] entries
    #[arg(short, long)]
    fixtures: Option<PathBuf>,

    /// Fraction of the requested scan duration to wait before answering
    #[arg(long, default_value_t = 0.1)]
    scan_time_scale: f64,

    /// Delay in milliseconds before answering any request
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Answer device lists without a devices field
    #[arg(long)]
    malformed: bool,

    /// Fail every pair, connect, and disconnect command
    #[arg(long)]
    fail_actions: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = args.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let devices = match &args.fixtures {
        Some(path) => {
            let devices = load_fixtures(path)?;
            info!(path = %path.display(), count = devices.len(), "Loaded fixtures");
            devices
        }
        None => Vec::new(),
    };

    let state = Arc::new(MockState::new(devices));
    state
        .set_behavior(Behavior {
            malformed: args.malformed,
            fail_actions: args.fail_actions,
            delay: Duration::from_millis(args.delay_ms),
            scan_time_scale: args.scan_time_scale,
        })
        .await;

    bluetrack_mock::run(state, &args.bind).await
}
