//! Provider-set resolution and candidate aggregation.
//!
//! A request names either a configured set or a mode token. The resolver
//! turns it into a [`ProviderSet`], scans every provider of the set in
//! order, drops duplicate ids, applies the include/exclude rules and
//! writes the set's layout into the config override layer.

mod filter;

pub use filter::{FilterRule, FilterRules};

use crate::config::{Config, FilterConfig, LayoutOverrides, SetConfig};
use crate::providers::ProviderRegistry;
use awe_types::Candidate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Name of the configured set used when a request names nothing
pub const DEFAULT_SET: &str = "default";

const DEFAULT_ICON: &str = "system-search";
const DEFAULT_PROMPT: &str = "Search...";

/// Prompt and icon shown for a mode without a configured set.
#[must_use]
pub fn mode_defaults(mode: &str) -> (&'static str, &'static str) {
    match mode {
        "top" => ("Top > ", "utilities-system-monitor"),
        "kill" => ("Kill > ", "process-stop"),
        "ssh" => ("SSH > ", "network-server"),
        "run" => ("Run > ", "system-run"),
        "window" => ("Windows > ", "preferences-system-windows"),
        "dmenu" => ("Select > ", "view-list"),
        _ => (DEFAULT_PROMPT, DEFAULT_ICON),
    }
}

/// A resolved provider set
#[derive(Debug, Clone, Default)]
pub struct ProviderSet {
    pub name: String,
    pub providers: Vec<String>,
    pub prompt: String,
    pub icon: String,
    pub pins: Vec<String>,
    pub aliases: HashMap<String, String>,
    pub filter: FilterConfig,
    pub layout: LayoutOverrides,
    /// Taken from the config file rather than synthesized from a mode
    pub configured: bool,
}

impl ProviderSet {
    fn from_config(name: &str, set: &SetConfig) -> Self {
        let (prompt, icon) = mode_defaults(name);
        Self {
            name: name.to_string(),
            providers: set.providers.clone(),
            prompt: set.prompt.clone().unwrap_or_else(|| prompt.to_string()),
            icon: set.icon.clone().unwrap_or_else(|| icon.to_string()),
            pins: set.pins.clone(),
            aliases: set.aliases.clone(),
            filter: set.filter.clone(),
            layout: set.layout.clone(),
            configured: true,
        }
    }

    /// Single-provider set for a mode token.
    #[must_use]
    pub fn ad_hoc(mode: &str) -> Self {
        let (prompt, icon) = mode_defaults(mode);
        Self {
            name: mode.to_string(),
            providers: vec![mode.to_string()],
            prompt: prompt.to_string(),
            icon: icon.to_string(),
            ..Self::default()
        }
    }
}

/// What the caller asked to show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetRequest {
    pub set: Option<String>,
    pub mode: Option<String>,
}

impl SetRequest {
    #[must_use]
    pub fn set(name: impl Into<String>) -> Self {
        Self {
            set: Some(name.into()),
            mode: None,
        }
    }

    #[must_use]
    pub fn mode(mode: impl Into<String>) -> Self {
        Self {
            set: None,
            mode: Some(mode.into()),
        }
    }
}

/// Output of one resolve
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub set: ProviderSet,
    pub candidates: Vec<Candidate>,
}

pub struct ProviderSetResolver {
    registry: ProviderRegistry,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl ProviderSetResolver {
    #[must_use]
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Pick the set a request refers to without scanning anything.
    #[must_use]
    pub fn select(config: &Config, request: &SetRequest) -> ProviderSet {
        let mode = non_empty(request.mode.as_ref());

        if let Some(name) = non_empty(request.set.as_ref()) {
            if let Some(set) = config.sets.get(name) {
                info!("Using configured set '{name}'");
                return ProviderSet::from_config(name, set);
            }
            warn!("Unknown set '{name}', falling back to mode");
            return ProviderSet::ad_hoc(mode.unwrap_or(name));
        }

        if let Some(mode) = mode {
            return ProviderSet::ad_hoc(mode);
        }

        if let Some(set) = config.sets.get(DEFAULT_SET) {
            return ProviderSet::from_config(DEFAULT_SET, set);
        }
        ProviderSet::ad_hoc(&config.general.default_mode)
    }

    /// Resolve `request` and build its candidate pool.
    ///
    /// Never fails: unknown providers and provider errors contribute nothing.
    /// The set's layout is applied on top of `config.overrides`.
    pub fn resolve(&self, config: &mut Config, request: &SetRequest) -> Resolution {
        let set = Self::select(config, request);
        let rules = FilterRules::compile(&set.filter);

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for name in &set.providers {
            let Some(provider) = self.registry.get(name) else {
                warn!(
                    "Unknown provider '{name}' in set '{}' (available: {})",
                    set.name,
                    self.registry.names().join(", ")
                );
                continue;
            };

            match provider.scan(config) {
                Ok(found) => {
                    debug!("Provider '{name}' returned {} candidates", found.len());
                    candidates.extend(found.into_iter().filter(|c| seen.insert(c.id.clone())));
                }
                Err(e) => warn!("Provider '{name}' failed: {e}"),
            }
        }

        if !rules.is_empty() {
            let before = candidates.len();
            candidates.retain(|c| rules.keep(c));
            debug!("Filters kept {} of {before} candidates", candidates.len());
        }

        config.overrides.apply(&set.layout);

        info!(
            "Loaded set '{}' with {} candidates",
            set.name,
            candidates.len()
        );
        Resolution { set, candidates }
    }
}
