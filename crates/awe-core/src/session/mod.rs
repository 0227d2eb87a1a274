mod activation;

pub use activation::ActivateFlags;

use crate::config::{Config, Directories, LayoutOverrides, WindowConfig};
use crate::mru::MruStore;
use crate::platform::Collaborators;
use crate::providers::ProviderRegistry;
use crate::resolver::{ProviderSetResolver, SetRequest};
use crate::search::{RankingContext, RankingEngine};
use awe_types::{Candidate, SelectionMode, StatusReport};
use tracing::{debug, info};

/// What the front end should do after a session operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing happened (stale index, unsupported target, failed launch)
    Ignored,
    /// Keep the launcher open
    Continue,
    /// Resident launcher went invisible
    Hidden,
    /// Non-resident launcher is done
    Exit,
    /// Dmenu selection to print
    Selected(String),
}

/// Per-process interaction state
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub active_set: String,
    pub mode: String,
    pub prompt: String,
    pub icon: String,
    pub visible: bool,
    pub selection_mode: SelectionMode,
    /// Window waiting for an output while in `MonitorSelect`
    pub pending_handle: Option<String>,
    pub prompt_override: Option<String>,
    pub query: String,
}

/// Owns the candidate pool, ranking, MRU store and session state.
///
/// Every method runs synchronously; callers serialize access (the daemon
/// funnels all requests through one owner task).
pub struct Launcher {
    config: Config,
    cli_overrides: LayoutOverrides,
    resolver: ProviderSetResolver,
    mru: MruStore,
    engine: RankingEngine,
    /// Output picker replacing the set's pool during `MonitorSelect`
    picker: Option<RankingEngine>,
    state: SessionState,
    displayed: Vec<Candidate>,
    /// Prompt of the active set, restored when the picker closes
    set_prompt: String,
    collaborators: Collaborators,
    resident: bool,
    dmenu: bool,
    request: SetRequest,
}

impl Launcher {
    #[must_use]
    pub fn new(
        config: Config,
        resolver: ProviderSetResolver,
        mru: MruStore,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            config,
            cli_overrides: LayoutOverrides::default(),
            resolver,
            mru,
            engine: RankingEngine::default(),
            picker: None,
            state: SessionState::default(),
            displayed: Vec::new(),
            set_prompt: String::new(),
            collaborators,
            resident: false,
            dmenu: false,
            request: SetRequest::default(),
        }
    }

    /// Launcher wired to the real providers and collaborators.
    ///
    /// `stdin_lines` enables the `dmenu`/`stdin` providers.
    #[must_use]
    pub fn system(config: Config, dirs: &Directories, stdin_lines: Option<Vec<String>>) -> Self {
        let collaborators = Collaborators::system(&config);
        let registry = ProviderRegistry::system(collaborators.windows.clone(), stdin_lines);
        let mru = MruStore::load(&dirs.mru_file, config.history.max_entries);
        Self::new(config, ProviderSetResolver::new(registry), mru, collaborators)
    }

    /// Hide keeps the process alive instead of exiting.
    #[must_use]
    pub fn resident(mut self, resident: bool) -> Self {
        self.resident = resident;
        self
    }

    /// Activation returns the selection instead of launching it.
    #[must_use]
    pub fn dmenu(mut self, dmenu: bool) -> Self {
        self.dmenu = dmenu;
        self
    }

    /// Command-line layout values; applied after the set's own layout.
    pub fn set_layout_overrides(&mut self, overrides: LayoutOverrides) {
        self.config.overrides.apply(&overrides);
        self.cli_overrides = overrides;
    }

    pub fn set_prompt_override(&mut self, prompt: Option<String>) {
        self.state.prompt_override = prompt.filter(|p| !p.is_empty());
        if let Some(prompt) = &self.state.prompt_override {
            self.state.prompt.clone_from(prompt);
        }
    }

    /// Resolve a provider set and make it the active pool.
    ///
    /// The current query is re-applied to the new pool.
    pub fn load_set(&mut self, request: SetRequest) {
        self.config.overrides = LayoutOverrides::default();
        let resolution = self.resolver.resolve(&mut self.config, &request);
        let set = resolution.set;
        self.config.overrides.apply(&self.cli_overrides);

        let context = RankingContext::merged(
            &set.pins,
            &set.aliases,
            &self.config.pins,
            &self.config.aliases,
            self.config.general.fallback,
        );
        self.engine = RankingEngine::new(resolution.candidates, context);
        self.reset_selection();

        self.state.mode = request
            .mode
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| set.name.clone());
        self.state.active_set = set.name;
        self.set_prompt = set.prompt;
        self.state.prompt = self.current_prompt();
        self.state.icon = set.icon;
        self.request = request;

        let query = self.state.query.clone();
        self.filter(&query);
    }

    /// Resolve the requested set (or the last one when the request is
    /// empty), make the launcher visible and pre-fill the search.
    pub fn show(&mut self, request: SetRequest, query: Option<String>) -> Outcome {
        let request = if request == SetRequest::default() {
            self.request.clone()
        } else {
            request
        };
        // Leaving the picker clears the query, so do it before pre-filling
        self.reset_selection();
        self.state.query = query.unwrap_or_default();
        self.load_set(request);
        self.state.visible = true;
        info!(
            "Showing '{}' ({} candidates)",
            self.state.active_set,
            self.engine.pool().len()
        );
        Outcome::Continue
    }

    /// Rank the active pool against `query` and display the result.
    pub fn filter(&mut self, query: &str) -> &[Candidate] {
        query.clone_into(&mut self.state.query);
        let engine = self.picker.as_ref().unwrap_or(&self.engine);
        self.displayed = engine.filter(query, &self.mru);
        &self.displayed
    }

    /// Rank `text` without touching the session, the display or the MRU store.
    #[must_use]
    pub fn peek(&self, text: &str, limit: usize) -> Vec<Candidate> {
        let mut results = self.engine.filter(text, &self.mru);
        results.truncate(limit);
        results
    }

    /// Resident: become invisible and clear the search. Otherwise: exit.
    pub fn hide(&mut self) -> Outcome {
        self.reset_selection();
        self.state.visible = false;
        if !self.resident {
            return Outcome::Exit;
        }
        if !self.state.query.is_empty() {
            self.filter("");
        }
        debug!("Launcher hidden");
        Outcome::Hidden
    }

    pub fn toggle(&mut self) -> Outcome {
        if self.state.visible {
            self.hide()
        } else {
            self.state.visible = true;
            Outcome::Continue
        }
    }

    /// Re-resolve the active set, keeping visibility and query.
    pub fn reload(&mut self) {
        self.load_set(self.request.clone());
    }

    /// Replace the configuration and re-resolve the active set.
    pub fn reload_config(&mut self, config: Config) {
        self.config = config;
        self.reload();
        info!("Configuration reloaded");
    }

    #[must_use]
    pub fn status(&self) -> StatusReport {
        StatusReport {
            visible: self.state.visible,
            set: self.state.active_set.clone(),
            mode: self.state.mode.clone(),
            prompt: self.state.prompt.clone(),
            selection_mode: self.state.selection_mode,
            query: self.state.query.clone(),
            count: self.displayed.len(),
        }
    }

    fn reset_selection(&mut self) {
        if self.state.selection_mode == SelectionMode::MonitorSelect {
            debug!("Leaving monitor selection");
        }
        self.state.selection_mode = SelectionMode::Normal;
        self.state.pending_handle = None;
        if self.picker.take().is_some() {
            self.state.prompt = self.current_prompt();
            self.state.query.clear();
            self.displayed = self.engine.filter("", &self.mru);
        }
    }

    fn current_prompt(&self) -> String {
        self.state
            .prompt_override
            .clone()
            .unwrap_or_else(|| self.set_prompt.clone())
    }

    #[must_use]
    pub fn displayed(&self) -> &[Candidate] {
        &self.displayed
    }

    #[must_use]
    pub fn pool(&self) -> &[Candidate] {
        self.engine.pool()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn mru(&self) -> &MruStore {
        &self.mru
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Window layout after set and command-line overrides.
    #[must_use]
    pub fn effective_window(&self) -> WindowConfig {
        self.config.effective_window()
    }
}
