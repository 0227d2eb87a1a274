//! Candidate sources.
//!
//! A provider enumerates one kind of OS resource into candidates. The
//! registry maps the provider names used in sets and modes (`drun`, `run`,
//! `top`, `kill`, `ssh`, `window`, `dmenu`) to implementations.

mod desktop;
mod path;
mod process;
mod ssh;
mod stdin;
mod window;

pub use desktop::DesktopProvider;
pub use path::PathProvider;
pub use process::{ProcessMode, ProcessProvider};
pub use ssh::SshProvider;
pub use stdin::StdinProvider;
pub use window::WindowProvider;

use crate::Result;
use crate::config::Config;
use crate::platform::WindowManager;
use awe_types::Candidate;
use std::collections::HashMap;
use std::sync::Arc;

/// A source of candidates.
pub trait Provider: Send {
    /// Enumerate candidates in the provider's own order.
    fn scan(&self, config: &Config) -> Result<Vec<Candidate>>;
}

/// Fixed list of candidates.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    candidates: Vec<Candidate>,
}

impl StaticProvider {
    #[must_use]
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

impl Provider for StaticProvider {
    fn scan(&self, _config: &Config) -> Result<Vec<Candidate>> {
        Ok(self.candidates.clone())
    }
}

/// Provider name -> implementation
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Box<dyn Provider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in provider. `stdin_lines` backs the
    /// `dmenu`/`stdin` providers and is only present when input was piped in.
    #[must_use]
    pub fn system(windows: Arc<dyn WindowManager>, stdin_lines: Option<Vec<String>>) -> Self {
        let mut registry = Self::new();
        registry.register("drun", DesktopProvider::new());
        registry.register("run", PathProvider::new());
        registry.register(ProcessMode::Top.as_str(), ProcessProvider::new(ProcessMode::Top));
        registry.register(ProcessMode::Kill.as_str(), ProcessProvider::new(ProcessMode::Kill));
        registry.register("ssh", SshProvider::new());
        registry.register("window", WindowProvider::new(windows));
        if let Some(lines) = stdin_lines {
            registry.register("stdin", StdinProvider::new(lines.clone()));
            registry.register("dmenu", StdinProvider::new(lines));
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, provider: impl Provider + 'static) {
        self.providers.insert(name.into(), Box::new(provider));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Provider> {
        self.providers.get(name).map(AsRef::as_ref)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::NoWindowing;

    #[test]
    fn test_system_registry_names() {
        let registry = ProviderRegistry::system(Arc::new(NoWindowing), None);
        assert_eq!(
            registry.names(),
            vec!["drun", "kill", "run", "ssh", "top", "window"]
        );
        assert!(registry.get("dmenu").is_none());
    }

    #[test]
    fn test_stdin_registered_when_piped() {
        let registry =
            ProviderRegistry::system(Arc::new(NoWindowing), Some(vec!["one".to_string()]));
        let lines = registry
            .get("dmenu")
            .unwrap()
            .scan(&Config::default())
            .unwrap();
        assert_eq!(lines[0].primary_text, "one");
        assert!(registry.get("stdin").is_some());
    }

    #[test]
    fn test_static_provider_returns_candidates() {
        let provider = StaticProvider::new(vec![Candidate::new("a", "A")]);
        assert_eq!(provider.scan(&Config::default()).unwrap().len(), 1);
    }
}
