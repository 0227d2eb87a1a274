//! Resident awelauncher process.
//!
//! Binds the per-user socket, accepts one request per connection and routes
//! every request through a single owner of the [`awe_core::Launcher`], so
//! commands are applied strictly in arrival order.

pub(crate) mod config_watcher;
pub mod error;
pub(crate) mod handlers;
pub mod logging;
pub mod server;

pub use error::{DaemonError, Result};
pub use server::{IDLE_TIMEOUT, ServerOptions, cleanup_stale_socket, run, serve, shutdown_signal};
