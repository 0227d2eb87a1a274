//! Shared types for awelauncher components.
//!
//! This crate provides the value types used across awe-core, awe-ipc,
//! awe-daemon and awe-cli. All types are serializable for IPC transport.

use serde::{Deserialize, Serialize};

/// Prefix of the exec command that asks the launcher to signal a process
/// instead of spawning one (`kill:<pid>`).
pub const KILL_PREFIX: &str = "kill:";

/// One selectable entry: an application, process, window, host or stdin line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Stable key, unique within one displayed pool (`firefox.desktop`, `proc:1234`, `ssh:host`)
    pub id: String,
    #[serde(rename = "primary")]
    pub primary_text: String,
    #[serde(rename = "secondary", default)]
    pub secondary_text: String,
    /// Empty means the candidate is not executable (window entries)
    #[serde(rename = "exec", default)]
    pub exec_command: String,
    #[serde(rename = "icon", default)]
    pub icon_key: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub categories: String,
    #[serde(rename = "terminal", default)]
    pub terminal_flag: bool,
    /// Indices into whichever field produced the winning score. Recomputed on
    /// every filter call, never persisted.
    #[serde(skip)]
    pub match_positions: Vec<usize>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, primary_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            primary_text: primary_text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_secondary(mut self, text: impl Into<String>) -> Self {
        self.secondary_text = text.into();
        self
    }

    #[must_use]
    pub fn with_exec(mut self, exec: impl Into<String>) -> Self {
        self.exec_command = exec.into();
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon_key = icon.into();
        self
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: impl Into<String>) -> Self {
        self.categories = categories.into();
        self
    }

    #[must_use]
    pub fn in_terminal(mut self, terminal: bool) -> Self {
        self.terminal_flag = terminal;
        self
    }

    /// Window entries carry no exec command; activating them focuses the window.
    pub fn is_window(&self) -> bool {
        self.exec_command.is_empty()
    }

    /// PID encoded in a `kill:<pid>` exec command.
    ///
    /// Returns `None` for other commands and for a prefix followed by
    /// anything that is not a positive integer.
    pub fn kill_target(&self) -> Option<Result<i32, String>> {
        let rest = self.exec_command.strip_prefix(KILL_PREFIX)?;
        Some(
            rest.trim()
                .parse::<i32>()
                .ok()
                .filter(|pid| *pid > 0)
                .ok_or_else(|| rest.to_string()),
        )
    }

    pub fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            id: self.id.clone(),
            primary: self.primary_text.clone(),
            secondary: self.secondary_text.clone(),
            exec: self.exec_command.clone(),
        }
    }
}

/// Reduced candidate shape returned by the `query` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub id: String,
    pub primary: String,
    pub secondary: String,
    pub exec: String,
}

/// Payload of a `query` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResults {
    pub count: usize,
    pub items: Vec<CandidateSummary>,
}

impl QueryResults {
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        Self {
            count: candidates.len(),
            items: candidates.iter().map(Candidate::summary).collect(),
        }
    }
}

/// Interaction state of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    #[default]
    Normal,
    /// Choosing the output a window should move to
    MonitorSelect,
}

/// Window-level operations offered on window candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowAction {
    Close,
    Fullscreen,
    Maximize,
    Minimize,
}

/// Snapshot returned by the `status` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub visible: bool,
    pub set: String,
    pub mode: String,
    pub prompt: String,
    pub selection_mode: SelectionMode,
    pub query: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_wire_names() {
        let candidate = Candidate::new("ssh:box", "box")
            .with_secondary("SSH Host")
            .with_exec("ssh box")
            .with_icon("network-server")
            .in_terminal(true);

        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["primary"], "box");
        assert_eq!(value["secondary"], "SSH Host");
        assert_eq!(value["exec"], "ssh box");
        assert_eq!(value["icon"], "network-server");
        assert_eq!(value["terminal"], true);
        assert!(value.get("matchPositions").is_none());
    }

    #[test]
    fn test_candidate_missing_optional_fields() {
        let candidate: Candidate =
            serde_json::from_value(json!({"id": "a", "primary": "Alpha"})).unwrap();
        assert_eq!(candidate.primary_text, "Alpha");
        assert!(candidate.exec_command.is_empty());
        assert!(!candidate.terminal_flag);
    }

    #[test]
    fn test_window_candidate_has_no_exec() {
        assert!(Candidate::new("win:3", "Terminal").is_window());
        assert!(!Candidate::new("a", "A").with_exec("a").is_window());
    }

    #[test]
    fn test_kill_target() {
        let c = Candidate::new("proc:4821", "sleep").with_exec("kill:4821");
        assert_eq!(c.kill_target(), Some(Ok(4821)));

        let bad = Candidate::new("proc:x", "x").with_exec("kill:abc");
        assert_eq!(bad.kill_target(), Some(Err("abc".to_string())));

        let zero = Candidate::new("proc:0", "x").with_exec("kill:0");
        assert!(matches!(zero.kill_target(), Some(Err(_))));

        let plain = Candidate::new("a", "a").with_exec("firefox");
        assert_eq!(plain.kill_target(), None);
    }

    #[test]
    fn test_query_results_summary() {
        let pool = vec![
            Candidate::new("firefox.desktop", "Firefox")
                .with_secondary("Web Browser")
                .with_exec("firefox"),
        ];
        let results = QueryResults::from_candidates(&pool);
        assert_eq!(results.count, 1);
        assert_eq!(
            serde_json::to_value(&results).unwrap(),
            json!({"count": 1, "items": [{
                "id": "firefox.desktop",
                "primary": "Firefox",
                "secondary": "Web Browser",
                "exec": "firefox"
            }]})
        );
    }

    #[test]
    fn test_selection_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&SelectionMode::MonitorSelect).unwrap(),
            "\"monitorSelect\""
        );
        assert_eq!(SelectionMode::default(), SelectionMode::Normal);
    }
}
