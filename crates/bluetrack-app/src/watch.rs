//! Live terminal view driven by session events and stdin commands

use anyhow::Result;
use bluetrack_client::Backend;
use bluetrack_core::Mac;
use bluetrack_session::{Session, SessionEvent, SessionHandle};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::render::render_view;

/// A line typed into the live view
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Scan for the given seconds, or the configured default
    Scan(Option<u64>),
    Pair(Mac),
    Disconnect(Mac),
    Refresh,
    Quit,
}

pub const HELP: &str = "Commands: scan [secs], pair <mac>, disconnect <mac>, refresh, quit";

impl Command {
    /// Parse one input line; `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("Too many arguments for '{}'", verb));
        }

        let command = match (verb.to_lowercase().as_str(), arg) {
            ("scan", None) => Command::Scan(None),
            ("scan", Some(secs)) => Command::Scan(Some(
                secs.parse()
                    .map_err(|_| format!("Invalid scan duration '{}'", secs))?,
            )),
            ("pair", Some(mac)) => Command::Pair(Mac::from(mac)),
            ("disconnect", Some(mac)) => Command::Disconnect(Mac::from(mac)),
            ("pair", None) | ("disconnect", None) => {
                return Err(format!("'{}' needs a device address", verb))
            }
            ("refresh", None) => Command::Refresh,
            ("quit", None) | ("exit", None) => Command::Quit,
            _ => return Err(format!("Unknown command '{}'. {}", line.trim(), HELP)),
        };
        Ok(Some(command))
    }
}

/// Run `command` in the background; its effects arrive as session events
fn dispatch<B: Backend>(session: &Arc<Session<B>>, command: Command) {
    let session = Arc::clone(session);
    tokio::spawn(async move {
        let result = match command {
            Command::Scan(Some(secs)) => session.scan(secs).await,
            Command::Scan(None) => session.scan_default().await,
            Command::Pair(mac) => session.pair(mac).await,
            Command::Disconnect(mac) => session.disconnect(mac).await,
            Command::Refresh => session.refresh().await,
            Command::Quit => Ok(()),
        };
        if let Err(e) = result {
            debug!(error = %e, "Command finished with error");
        }
    });
}

async fn redraw<B: Backend>(session: &Session<B>) {
    let snapshot = session.snapshot().await;
    println!("\n{}", render_view(&snapshot));
}

/// Render on every session event until `quit`, end of input, or Ctrl-C
pub async fn run<B: Backend>(handle: SessionHandle<B>) -> Result<()> {
    let session = handle.session().clone();
    let mut events = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("{}", HELP);
    redraw(&session).await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }

            event = events.recv() => {
                match event {
                    Ok(SessionEvent::Unmounted) | Err(RecvError::Closed) => break,
                    Ok(SessionEvent::StaleResponseDropped { .. }) => {}
                    Ok(_) => redraw(&session).await,
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "Session event channel lagged");
                        redraw(&session).await;
                    }
                }
            }

            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match Command::parse(&line) {
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(command)) => dispatch(&session, command),
                        Ok(None) => {}
                        Err(message) => println!("{}", message),
                    },
                    // Keep watching without input, e.g. when stdin is /dev/null
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        stdin_open = false;
                    }
                }
            }
        }
    }

    handle.unmount().await;
    Ok(())
}
