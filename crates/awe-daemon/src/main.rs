//! awelauncher resident server.
//!
//! Headless daemon: resolves the default provider set at startup and serves
//! socket requests until SIGINT/SIGTERM. `awelaunch daemon` runs the same
//! server from the user-facing binary.

use std::path::PathBuf;

use anyhow::Context;
use awe_core::config::{Config, Directories};
use awe_core::resolver::SetRequest;
use awe_core::Launcher;
use awe_daemon::{ServerOptions, logging, server};
use clap::Parser;
use tracing::info;

/// awelauncher daemon - socket server for the launcher
#[derive(Parser, Debug)]
#[command(name = "awe-daemon")]
#[command(version, about, long_about = None)]
struct Args {
    /// Custom socket path (defaults to `$XDG_RUNTIME_DIR/awelauncher.sock`)
    #[arg(long, value_name = "PATH")]
    socket: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'g', long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init(args.debug, "awe-daemon");

    info!("Starting awelauncher daemon...");

    let dirs = Directories::new();
    if let Err(e) = dirs.ensure_exists() {
        tracing::warn!("Cannot create launcher directories: {e}");
    }
    let config = Config::load_or_default(&dirs.config_file);

    let mut launcher = Launcher::system(config, &dirs, None).resident(true);
    launcher.load_set(SetRequest::default());

    let socket = args.socket.unwrap_or_else(awe_ipc::socket_path);
    let options = ServerOptions::new(socket).watch_config(dirs.config_file.clone());
    server::run(launcher, options)
        .await
        .context("launcher server failed")?;

    info!("awelauncher daemon stopped");
    Ok(())
}
