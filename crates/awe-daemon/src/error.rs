//! Error types for the awelauncher daemon.

use std::path::PathBuf;

/// Errors that can occur in the daemon
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Another launcher answers on the socket
    #[error("Another launcher is already listening on {}", .0.display())]
    AddrInUse(PathBuf),

    /// Codec error on a client connection
    #[error("IPC error: {0}")]
    Ipc(#[from] awe_ipc::CodecError),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] awe_core::Error),

    /// The launcher owner stopped before answering
    #[error("Launcher owner is gone")]
    OwnerGone,

    /// File watcher error
    #[error("Watcher error: {0}")]
    Watcher(#[from] notify::Error),
}

/// Result type alias for daemon operations
pub type Result<T> = std::result::Result<T, DaemonError>;
