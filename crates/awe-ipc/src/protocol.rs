//! Request/response envelope exchanged over the launcher socket.
//!
//! ```text
//! -> {"action": "query", "payload": {"text": "fire", "limit": 1}}
//! <- {"status": "ok", "data": {"count": 1, "items": [...]}}
//! ```

use awe_types::WindowAction;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Default number of items returned by `query`
pub const DEFAULT_QUERY_LIMIT: usize = 10;

/// Commands understood by the resident launcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Show,
    Hide,
    Toggle,
    Reload,
    Query,
    Status,
    Activate,
    MoveToMonitor,
    WindowAction,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Show,
        Action::Hide,
        Action::Toggle,
        Action::Reload,
        Action::Query,
        Action::Status,
        Action::Activate,
        Action::MoveToMonitor,
        Action::WindowAction,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Show => "show",
            Action::Hide => "hide",
            Action::Toggle => "toggle",
            Action::Reload => "reload",
            Action::Query => "query",
            Action::Status => "status",
            Action::Activate => "activate",
            Action::MoveToMonitor => "moveToMonitor",
            Action::WindowAction => "windowAction",
        }
    }

    /// Whether a client waits for the response. Everything else is
    /// fire-and-forget.
    #[must_use]
    pub fn expects_reply(self) -> bool {
        matches!(self, Action::Query | Action::Status)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

fn empty_payload() -> Value {
    Value::Object(Map::new())
}

/// One client request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub action: String,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

impl Request {
    pub fn new(action: Action, payload: impl Serialize) -> serde_json::Result<Self> {
        Ok(Self {
            action: action.as_str().to_string(),
            payload: serde_json::to_value(payload)?,
        })
    }

    /// Request with an empty payload.
    #[must_use]
    pub fn bare(action: Action) -> Self {
        Self {
            action: action.as_str().to_string(),
            payload: empty_payload(),
        }
    }

    /// Parsed action name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAction` naming the unrecognized action.
    pub fn parsed_action(&self) -> Result<Action, UnknownAction> {
        self.action.parse()
    }

    /// Decode the payload; a `null` payload reads as `{}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not fit `T`.
    pub fn payload_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        if self.payload.is_null() {
            return serde_json::from_value(empty_payload());
        }
        T::deserialize(&self.payload)
    }
}

/// Payload of `show`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

fn default_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

/// Payload of `query`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for QueryPayload {
    fn default() -> Self {
        Self {
            text: String::new(),
            limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

/// Payload of `activate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivatePayload {
    pub index: usize,
    #[serde(default)]
    pub terminal: bool,
    #[serde(default)]
    pub hold_open: bool,
}

/// Payload of `moveToMonitor`: the window entry to move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveToMonitorPayload {
    pub index: usize,
}

/// Payload of `windowAction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowActionPayload {
    pub index: usize,
    pub action: WindowAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Server reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            message: None,
            data: None,
        }
    }

    #[must_use]
    pub fn ok_with(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::ok()
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            data: None,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}
