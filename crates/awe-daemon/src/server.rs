//! Socket server for the resident launcher.
//!
//! One connection carries one request. Connection tasks buffer until a
//! complete JSON document arrives, then hand the request to the launcher
//! owner and write back its single response. The owner runs on a blocking
//! thread because provider scans and process spawning are synchronous.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use awe_core::Launcher;
use awe_core::config::Config;
use awe_ipc::{CodecError, JsonCodec, Request, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};
use tokio_util::codec::Framed;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config_watcher::spawn_config_watcher;
use crate::error::{DaemonError, Result};
use crate::handlers;

/// How long a connection may stay silent before it is dropped
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

const OWNER_QUEUE: usize = 64;
const RELOAD_SETTLE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub socket_path: PathBuf,
    /// Watched for hot reload when set
    pub config_file: Option<PathBuf>,
}

impl ServerOptions {
    #[must_use]
    pub fn new(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            config_file: None,
        }
    }

    #[must_use]
    pub fn watch_config(mut self, config_file: PathBuf) -> Self {
        self.config_file = Some(config_file);
        self
    }
}

pub(crate) enum OwnerMessage {
    Request {
        request: Request,
        reply: oneshot::Sender<Response>,
    },
    ConfigChanged,
    Shutdown,
}

/// Remove a socket file nobody is listening on.
///
/// # Errors
///
/// Returns `DaemonError::AddrInUse` if a launcher answers on `path`, or an
/// I/O error if the stale file cannot be removed.
pub async fn cleanup_stale_socket(path: &Path) -> Result<()> {
    if path.exists() {
        if UnixStream::connect(path).await.is_ok() {
            return Err(DaemonError::AddrInUse(path.to_path_buf()));
        }
        info!("Removing stale socket at {}", path.display());
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Cannot listen for SIGTERM: {e}");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
        _ = terminate.recv() => info!("Received SIGTERM"),
    }
}

/// Serve `launcher` until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if another launcher owns the socket or binding fails.
pub async fn run(launcher: Launcher, options: ServerOptions) -> Result<()> {
    serve(launcher, options, shutdown_signal()).await
}

/// Serve `launcher` until `shutdown` resolves, then remove the socket file.
///
/// # Errors
///
/// Returns an error if another launcher owns the socket or binding fails.
pub async fn serve(
    launcher: Launcher,
    options: ServerOptions,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let path = options.socket_path;
    cleanup_stale_socket(&path).await?;

    let listener = UnixListener::bind(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            DaemonError::AddrInUse(path.clone())
        } else {
            DaemonError::Io(e)
        }
    })?;
    info!("Launcher listening on {}", path.display());

    let (owner_tx, owner_rx) = mpsc::channel(OWNER_QUEUE);
    let config_file = options.config_file.clone();
    let owner = tokio::task::spawn_blocking(move || owner_loop(launcher, owner_rx, config_file));

    let _watcher = options
        .config_file
        .and_then(|file| watch_config(file, owner_tx.clone()));

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown requested, stopping server");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, _addr)) => {
                    let owner = owner_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, owner).await {
                            error!("Connection error: {e}");
                        }
                    });
                }
                Err(e) => error!("Accept error: {e}"),
            },
        }
    }

    drop(listener);
    if let Err(e) = std::fs::remove_file(&path) {
        warn!("Failed to remove socket file {}: {e}", path.display());
    }

    if owner_tx.send(OwnerMessage::Shutdown).await.is_ok()
        && let Err(e) = owner.await
    {
        error!("Launcher owner panicked: {e}");
    }

    Ok(())
}

fn watch_config(
    config_file: PathBuf,
    owner: mpsc::Sender<OwnerMessage>,
) -> Option<crate::config_watcher::ConfigWatcher> {
    let (reload_tx, mut reload_rx) = mpsc::unbounded_channel::<()>();
    let watcher = match spawn_config_watcher(config_file, reload_tx) {
        Ok(watcher) => watcher,
        Err(e) => {
            warn!("Config hot reload disabled: {e}");
            return None;
        }
    };

    tokio::spawn(async move {
        while reload_rx.recv().await.is_some() {
            // Editors write in several steps
            tokio::time::sleep(RELOAD_SETTLE_DELAY).await;
            if owner.send(OwnerMessage::ConfigChanged).await.is_err() {
                break;
            }
        }
        debug!("Config watcher task ended");
    });

    Some(watcher)
}

fn owner_loop(
    mut launcher: Launcher,
    mut rx: mpsc::Receiver<OwnerMessage>,
    config_file: Option<PathBuf>,
) {
    while let Some(message) = rx.blocking_recv() {
        match message {
            OwnerMessage::Request { request, reply } => {
                let response = handlers::handle(&mut launcher, &request);
                if reply.send(response).is_err() {
                    debug!("Client left before the reply to {}", request.action);
                }
            }
            OwnerMessage::ConfigChanged => {
                let Some(path) = config_file.as_deref() else {
                    continue;
                };
                match reload_config_file(path) {
                    Ok(config) => launcher.reload_config(config),
                    Err(e) => warn!("Keeping previous config, reload failed: {e}"),
                }
            }
            OwnerMessage::Shutdown => break,
        }
    }
    debug!("Launcher owner stopped");
}

fn reload_config_file(path: &Path) -> Result<Config> {
    Ok(Config::load(path)?)
}

async fn dispatch(owner: &mpsc::Sender<OwnerMessage>, request: Request) -> Result<Response> {
    let (reply, response) = oneshot::channel();
    owner
        .send(OwnerMessage::Request { request, reply })
        .await
        .map_err(|_| DaemonError::OwnerGone)?;
    response.await.map_err(|_| DaemonError::OwnerGone)
}

async fn handle_connection(stream: UnixStream, owner: mpsc::Sender<OwnerMessage>) -> Result<()> {
    let id = Uuid::new_v4();
    let mut framed = Framed::new(stream, JsonCodec::new());
    debug!("[{id}] Connection accepted");

    let response = match tokio::time::timeout(IDLE_TIMEOUT, framed.next()).await {
        Err(_) => {
            debug!("[{id}] Idle timeout");
            return Ok(());
        }
        Ok(None) => {
            debug!("[{id}] Closed without a request");
            return Ok(());
        }
        Ok(Some(Err(e))) => {
            warn!("[{id}] Malformed request: {e}");
            Response::error(format!("Invalid request: {e}"))
        }
        Ok(Some(Ok(value))) => match serde_json::from_value::<Request>(value) {
            Ok(request) => {
                debug!("[{id}] Request {}", request.action);
                dispatch(&owner, request).await?
            }
            Err(e) => {
                warn!("[{id}] Malformed request: {e}");
                Response::error(format!("Invalid request: {e}"))
            }
        },
    };

    match framed.send(&response).await {
        Ok(()) => Ok(()),
        // Fire-and-forget clients close without reading the reply
        Err(CodecError::Io(e))
            if matches!(
                e.kind(),
                std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset
            ) =>
        {
            debug!("[{id}] Client gone before reply: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cleanup_removes_stale_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stale.sock");
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());
        assert!(path.exists());

        cleanup_stale_socket(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_cleanup_refuses_live_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.sock");
        let _listener = UnixListener::bind(&path).unwrap();

        let result = cleanup_stale_socket(&path).await;
        assert!(matches!(result, Err(DaemonError::AddrInUse(_))));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_cleanup_missing_path_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        cleanup_stale_socket(&dir.path().join("none.sock"))
            .await
            .unwrap();
    }

    #[test]
    fn test_reload_of_broken_config_is_core_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();

        let err = reload_config_file(&path).unwrap_err();
        assert!(matches!(err, DaemonError::Core(awe_core::Error::Config(_))));

        std::fs::write(&path, r#"{"pins": ["foot.desktop"]}"#).unwrap();
        assert_eq!(reload_config_file(&path).unwrap().pins, vec!["foot.desktop"]);
    }

    #[tokio::test]
    async fn test_oversized_reply_is_ipc_error() {
        let (client, server) = UnixStream::pair().unwrap();
        let (owner_tx, mut owner_rx) = mpsc::channel(1);
        let owner = tokio::spawn(async move {
            if let Some(OwnerMessage::Request { reply, .. }) = owner_rx.recv().await {
                let huge = "x".repeat(awe_ipc::MAX_MESSAGE_SIZE + 1);
                let _ = reply.send(Response::ok_with(serde_json::json!({ "blob": huge })));
            }
        });

        let mut framed = Framed::new(client, JsonCodec::new());
        framed
            .send(&Request::bare(awe_ipc::Action::Status))
            .await
            .unwrap();

        let result = handle_connection(server, owner_tx).await;
        assert!(matches!(
            result,
            Err(DaemonError::Ipc(CodecError::MessageTooLarge(_)))
        ));
        owner.await.unwrap();
    }

    #[test]
    fn test_server_options_builder() {
        let options = ServerOptions::new(PathBuf::from("/tmp/a.sock"))
            .watch_config(PathBuf::from("/tmp/config.json"));
        assert_eq!(options.socket_path, PathBuf::from("/tmp/a.sock"));
        assert_eq!(options.config_file, Some(PathBuf::from("/tmp/config.json")));
    }
}
