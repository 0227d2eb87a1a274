//! Window management through the niri compositor IPC socket.
//!
//! Protocol:
//! - Socket path from `$NIRI_SOCKET`
//! - Send one JSON request on a single line
//! - Receive one JSON reply on a single line: `{"Ok": ...}` or `{"Err": "message"}`
//!
//! Query replies wrap their payload in an object named after the request
//! (`{"Ok":{"Windows":[...]}}`); actions reply `{"Ok":"Handled"}`.

use super::windowing::{WINDOW_ID_PREFIX, WindowManager, parse_window_id};
use crate::{Error, Result};
use awe_types::Candidate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, trace};

const SOCKET_TIMEOUT: Duration = Duration::from_millis(500);

/// Niri IPC client
#[derive(Debug, Clone)]
pub struct NiriWindows {
    socket_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
struct NiriWindow {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    app_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct NiriOutput {
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum NiriRequest {
    Simple(&'static str),
    Action {
        #[serde(rename = "Action")]
        action: NiriAction,
    },
}

impl NiriRequest {
    fn name(&self) -> &'static str {
        match self {
            NiriRequest::Simple(name) => *name,
            NiriRequest::Action { .. } => "Action",
        }
    }
}

#[derive(Debug, Serialize)]
enum NiriAction {
    FocusWindow { id: u64 },
    CloseWindow { id: Option<u64> },
    FullscreenWindow { id: Option<u64> },
    MaximizeColumn {},
    MoveWindowToMonitor { id: Option<u64>, output: String },
}

impl NiriWindows {
    /// Create a client from `$NIRI_SOCKET`.
    pub fn from_env() -> Option<Self> {
        let socket_path = std::env::var_os("NIRI_SOCKET")?;
        debug!("Niri IPC socket path: {}", PathBuf::from(&socket_path).display());
        Some(Self::new(socket_path.into()))
    }

    #[must_use]
    pub fn new(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }

    fn request<T: DeserializeOwned>(&self, request: &NiriRequest) -> Result<T> {
        let mut stream = UnixStream::connect(&self.socket_path)
            .map_err(|e| Error::Windowing(format!("failed to connect to niri: {e}")))?;
        stream.set_read_timeout(Some(SOCKET_TIMEOUT))?;
        stream.set_write_timeout(Some(SOCKET_TIMEOUT))?;

        let request_json = serde_json::to_string(request)?;
        trace!("Niri IPC request: {}", request_json);
        writeln!(stream, "{request_json}")?;
        stream.flush()?;

        let mut reply = String::new();
        BufReader::new(stream).read_line(&mut reply)?;
        trace!("Niri IPC reply: {}", reply.trim());

        parse_reply(&reply, request.name())
    }

    fn action(&self, action: NiriAction) -> Result<()> {
        let reply: String = self.request(&NiriRequest::Action { action })?;
        if reply == "Handled" {
            Ok(())
        } else {
            Err(Error::Windowing(format!("unexpected niri reply: {reply}")))
        }
    }
}

/// Unwrap `{"Ok": payload}`, including the request-named wrapper object.
fn parse_reply<T: DeserializeOwned>(reply: &str, request_name: &str) -> Result<T> {
    let value: Value = serde_json::from_str(reply)?;

    if let Some(err) = value.get("Err") {
        let message = err.as_str().map_or_else(|| err.to_string(), str::to_string);
        return Err(Error::Windowing(message));
    }

    let Some(ok) = value.get("Ok") else {
        return Err(Error::Windowing(format!(
            "malformed niri reply: {}",
            reply.trim()
        )));
    };

    let payload = match ok {
        Value::Object(map) if map.len() == 1 && map.contains_key(request_name) => {
            map[request_name].clone()
        }
        other => other.clone(),
    };
    Ok(serde_json::from_value(payload)?)
}

fn window_candidate(window: NiriWindow) -> Candidate {
    let app_id = window.app_id.unwrap_or_default();
    let title = window.title.filter(|t| !t.is_empty()).unwrap_or_else(|| app_id.clone());
    Candidate::new(format!("{WINDOW_ID_PREFIX}{}", window.id), title)
        .with_secondary(app_id.clone())
        .with_icon(app_id)
}

impl WindowManager for NiriWindows {
    fn initialize(&self) -> Result<()> {
        let version: Value = self.request(&NiriRequest::Simple("Version"))?;
        debug!("Connected to niri {}", version);
        Ok(())
    }

    fn list_windows(&self) -> Result<Vec<Candidate>> {
        let windows: Vec<NiriWindow> = self.request(&NiriRequest::Simple("Windows"))?;
        Ok(windows.into_iter().map(window_candidate).collect())
    }

    fn activate(&self, id: &str) -> Result<()> {
        self.action(NiriAction::FocusWindow {
            id: parse_window_id(id)?,
        })
    }

    fn close(&self, id: &str) -> Result<()> {
        self.action(NiriAction::CloseWindow {
            id: Some(parse_window_id(id)?),
        })
    }

    fn toggle_fullscreen(&self, id: &str) -> Result<()> {
        self.action(NiriAction::FullscreenWindow {
            id: Some(parse_window_id(id)?),
        })
    }

    // niri only maximizes the focused column
    fn toggle_maximize(&self, id: &str) -> Result<()> {
        self.activate(id)?;
        self.action(NiriAction::MaximizeColumn {})
    }

    fn toggle_minimize(&self, _id: &str) -> Result<()> {
        Err(Error::Unsupported("niri has no minimized windows".to_string()))
    }

    fn move_to_output(&self, id: &str, output: &str) -> Result<()> {
        self.action(NiriAction::MoveWindowToMonitor {
            id: Some(parse_window_id(id)?),
            output: output.to_string(),
        })
    }

    fn list_output_names(&self) -> Result<Vec<String>> {
        let outputs: HashMap<String, NiriOutput> = self.request(&NiriRequest::Simple("Outputs"))?;
        let mut names: Vec<String> = outputs.into_values().map(|o| o.name).collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixListener;

    #[test]
    fn test_request_serialization() {
        let json = serde_json::to_string(&NiriRequest::Simple("Windows")).unwrap();
        assert_eq!(json, "\"Windows\"");

        let focus = NiriRequest::Action {
            action: NiriAction::FocusWindow { id: 42 },
        };
        assert_eq!(
            serde_json::to_string(&focus).unwrap(),
            r#"{"Action":{"FocusWindow":{"id":42}}}"#
        );

        let mv = NiriRequest::Action {
            action: NiriAction::MoveWindowToMonitor {
                id: Some(7),
                output: "DP-1".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_string(&mv).unwrap(),
            r#"{"Action":{"MoveWindowToMonitor":{"id":7,"output":"DP-1"}}}"#
        );
    }

    #[test]
    fn test_parse_wrapped_windows_reply() {
        let reply = r#"{"Ok":{"Windows":[{"id":1,"title":"Test","app_id":"foot","workspace_id":1}]}}"#;
        let windows: Vec<NiriWindow> = parse_reply(reply, "Windows").unwrap();
        assert_eq!(windows.len(), 1);

        let candidate = window_candidate(windows[0].clone());
        assert_eq!(candidate.id, "win:1");
        assert_eq!(candidate.primary_text, "Test");
        assert_eq!(candidate.secondary_text, "foot");
        assert!(candidate.is_window());
    }

    #[test]
    fn test_parse_error_reply() {
        let result: Result<Vec<NiriWindow>> = parse_reply(r#"{"Err":"Something went wrong"}"#, "Windows");
        match result {
            Err(Error::Windowing(msg)) => assert_eq!(msg, "Something went wrong"),
            other => panic!("Expected windowing error, got {other:?}"),
        }
    }

    #[test]
    fn test_untitled_window_uses_app_id() {
        let candidate = window_candidate(NiriWindow {
            id: 3,
            title: None,
            app_id: Some("firefox".to_string()),
        });
        assert_eq!(candidate.primary_text, "firefox");
    }

    #[test]
    fn test_list_outputs_over_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("niri.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            assert_eq!(line.trim(), "\"Outputs\"");
            let mut stream = stream;
            writeln!(
                stream,
                r#"{{"Ok":{{"Outputs":{{"HDMI-A-1":{{"name":"HDMI-A-1"}},"DP-1":{{"name":"DP-1"}}}}}}}}"#
            )
            .unwrap();
        });

        let niri = NiriWindows::new(path);
        assert_eq!(niri.list_output_names().unwrap(), vec!["DP-1", "HDMI-A-1"]);
        server.join().unwrap();
    }
}
