//! Wire protocol between `awelaunch` and the resident launcher.
//!
//! - [`protocol`]: request/response envelopes and typed payloads
//! - [`transport`]: JSON document codec for the Unix socket
//! - [`client`]: socket path resolution and a one-shot client
//!
//! # Example
//!
//! ```no_run
//! use awe_ipc::{Action, IpcClient, Request, socket_path};
//!
//! # async fn example() -> Result<(), awe_ipc::ClientError> {
//! let client = IpcClient::connect(&socket_path()).await?;
//! let response = client.request(&Request::bare(Action::Status)).await?;
//! println!("{:?}", response.data);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod transport;

pub use client::{IpcClient, REPLY_TIMEOUT, SOCKET_NAME, socket_path};
pub use error::{ClientError, Result};
pub use protocol::{
    Action, ActivatePayload, DEFAULT_QUERY_LIMIT, MoveToMonitorPayload, QueryPayload, Request,
    Response, ShowPayload, Status, UnknownAction, WindowActionPayload,
};
pub use transport::{CodecError, JsonCodec, MAX_MESSAGE_SIZE};

pub use awe_types::{CandidateSummary, QueryResults, StatusReport, WindowAction};
