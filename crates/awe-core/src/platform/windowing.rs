use crate::{Error, Result};
use awe_types::Candidate;

/// Prefix of window candidate ids (`win:<compositor id>`)
pub const WINDOW_ID_PREFIX: &str = "win:";

/// Compositor window management, addressed by window candidate id.
pub trait WindowManager: Send + Sync {
    /// One-time blocking check that the compositor is reachable.
    fn initialize(&self) -> Result<()>;

    fn list_windows(&self) -> Result<Vec<Candidate>>;
    fn activate(&self, id: &str) -> Result<()>;
    fn close(&self, id: &str) -> Result<()>;
    fn toggle_fullscreen(&self, id: &str) -> Result<()>;
    fn toggle_maximize(&self, id: &str) -> Result<()>;
    fn toggle_minimize(&self, id: &str) -> Result<()>;
    fn move_to_output(&self, id: &str, output: &str) -> Result<()>;
    fn list_output_names(&self) -> Result<Vec<String>>;
}

/// Used when no supported compositor is detected.
#[derive(Debug, Default)]
pub struct NoWindowing;

impl NoWindowing {
    fn unsupported<T>(what: &str) -> Result<T> {
        Err(Error::Unsupported(format!(
            "{what} requires a supported compositor"
        )))
    }
}

impl WindowManager for NoWindowing {
    fn initialize(&self) -> Result<()> {
        Self::unsupported("window management")
    }

    fn list_windows(&self) -> Result<Vec<Candidate>> {
        Ok(Vec::new())
    }

    fn activate(&self, _id: &str) -> Result<()> {
        Self::unsupported("activate")
    }

    fn close(&self, _id: &str) -> Result<()> {
        Self::unsupported("close")
    }

    fn toggle_fullscreen(&self, _id: &str) -> Result<()> {
        Self::unsupported("fullscreen")
    }

    fn toggle_maximize(&self, _id: &str) -> Result<()> {
        Self::unsupported("maximize")
    }

    fn toggle_minimize(&self, _id: &str) -> Result<()> {
        Self::unsupported("minimize")
    }

    fn move_to_output(&self, _id: &str, _output: &str) -> Result<()> {
        Self::unsupported("move to output")
    }

    fn list_output_names(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Numeric compositor id from a `win:<id>` candidate id.
pub(crate) fn parse_window_id(id: &str) -> Result<u64> {
    id.strip_prefix(WINDOW_ID_PREFIX)
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| Error::Windowing(format!("not a window id: {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_id() {
        assert_eq!(parse_window_id("win:42").unwrap(), 42);
        assert!(parse_window_id("42").is_err());
        assert!(parse_window_id("win:abc").is_err());
    }

    #[test]
    fn test_no_windowing_lists_nothing() {
        let wm = NoWindowing;
        assert!(wm.initialize().is_err());
        assert!(wm.list_windows().unwrap().is_empty());
        assert!(wm.list_output_names().unwrap().is_empty());
        assert!(matches!(wm.activate("win:1"), Err(Error::Unsupported(_))));
    }
}
