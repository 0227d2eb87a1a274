//! One-shot client for a running launcher.
//!
//! Each connection carries exactly one request. Fire-and-forget actions
//! close after sending; `query` and `status` wait a bounded time for the
//! response.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::UnixStream;
use tokio_util::codec::Framed;
use tracing::debug;

use crate::error::Result;
use crate::protocol::{Request, Response};
use crate::transport::JsonCodec;

pub use crate::error::ClientError;

/// File name of the socket under `$XDG_RUNTIME_DIR`
pub const SOCKET_NAME: &str = "awelauncher.sock";

/// How long a client waits for a reply
pub const REPLY_TIMEOUT: Duration = Duration::from_secs(1);

fn current_uid() -> u32 {
    // SAFETY: getuid has no preconditions and never fails.
    unsafe { libc::getuid() }
}

/// Per-user rendezvous socket.
///
/// Prefers `$XDG_RUNTIME_DIR/awelauncher.sock`, falling back to
/// `$TMPDIR/awelauncher-<uid>.sock`.
#[must_use]
pub fn socket_path() -> PathBuf {
    match std::env::var_os("XDG_RUNTIME_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir).join(SOCKET_NAME),
        _ => std::env::temp_dir().join(format!("awelauncher-{}.sock", current_uid())),
    }
}

/// Connection to the resident launcher
pub struct IpcClient {
    framed: Framed<UnixStream, JsonCodec>,
}

impl IpcClient {
    /// Connect to the launcher listening at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Connect` if nothing accepts on the socket.
    pub async fn connect(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path)
            .await
            .map_err(ClientError::Connect)?;
        debug!("Connected to {}", path.display());
        Ok(Self {
            framed: Framed::new(stream, JsonCodec::new()),
        })
    }

    /// Send `request` and close without waiting for a reply.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Codec` if the write fails.
    pub async fn send(mut self, request: &Request) -> Result<()> {
        self.framed.send(request).await?;
        Ok(())
    }

    /// Send `request` and wait up to [`REPLY_TIMEOUT`] for the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails, the server closes without
    /// replying, the wait times out, or the reply is not a `Response`.
    pub async fn request(self, request: &Request) -> Result<Response> {
        self.request_with_timeout(request, REPLY_TIMEOUT).await
    }

    /// Like [`IpcClient::request`] with a custom bound on the wait.
    ///
    /// # Errors
    ///
    /// See [`IpcClient::request`].
    pub async fn request_with_timeout(
        mut self,
        request: &Request,
        timeout: Duration,
    ) -> Result<Response> {
        self.framed.send(request).await?;

        let reply = tokio::time::timeout(timeout, self.framed.next())
            .await
            .map_err(|_| ClientError::Timeout)?
            .ok_or(ClientError::ConnectionClosed)??;

        Ok(serde_json::from_value(reply)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Action;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixListener;

    #[test]
    fn test_socket_path_names_launcher() {
        let path = socket_path();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name == SOCKET_NAME || name.starts_with("awelauncher-"));
        assert!(name.ends_with(".sock"));
    }

    #[tokio::test]
    async fn test_connect_without_listener_is_connect_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = IpcClient::connect(&dir.path().join("missing.sock")).await;
        assert!(matches!(result, Err(ClientError::Connect(_))));
    }

    #[tokio::test]
    async fn test_request_reads_reply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reply.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 256];
            let n = stream.read(&mut buf).await.unwrap();
            let request: Request = serde_json::from_slice(&buf[..n]).unwrap();
            assert_eq!(request.action, "status");
            stream
                .write_all(br#"{"status":"ok","data":{"visible":false}}"#)
                .await
                .unwrap();
        });

        let client = IpcClient::connect(&path).await.unwrap();
        let response = client.request(&Request::bare(Action::Status)).await.unwrap();
        assert!(response.is_ok());
        assert_eq!(response.data.unwrap()["visible"], false);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silent.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            drop(stream);
        });

        let client = IpcClient::connect(&path).await.unwrap();
        let result = client
            .request_with_timeout(&Request::bare(Action::Status), Duration::from_millis(50))
            .await;
        assert!(matches!(result, Err(ClientError::Timeout)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_closing_without_reply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("closing.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 256];
            let _ = stream.read(&mut buf).await.unwrap();
        });

        let client = IpcClient::connect(&path).await.unwrap();
        let result = client.request(&Request::bare(Action::Query)).await;
        assert!(matches!(result, Err(ClientError::ConnectionClosed)));
        server.await.unwrap();
    }
}
