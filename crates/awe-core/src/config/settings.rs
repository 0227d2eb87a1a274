use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub window: WindowConfig,

    /// Global pins, appended after the active set's own pins
    #[serde(default)]
    pub pins: Vec<String>,

    /// Global aliases, overridden by a set alias with the same key
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    #[serde(default)]
    pub sets: HashMap<String, SetConfig>,

    #[serde(default)]
    pub providers: ProviderSettings,

    #[serde(default)]
    pub history: HistoryConfig,

    /// Runtime layout override layer. Written by the set resolver and the
    /// command line, never persisted.
    #[serde(skip)]
    pub overrides: LayoutOverrides,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Load config, falling back to defaults when the file is unreadable or
    /// invalid.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config from {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Base window layout with the override layer applied on top.
    #[must_use]
    pub fn effective_window(&self) -> WindowConfig {
        let o = &self.overrides;
        WindowConfig {
            width: o.width.unwrap_or(self.window.width),
            height: o.height.unwrap_or(self.window.height),
            anchor: o.anchor.clone().unwrap_or_else(|| self.window.anchor.clone()),
            margin: o.margin.unwrap_or(self.window.margin),
            layer: o.layer.clone().unwrap_or_else(|| self.window.layer.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralConfig {
    /// Offer a "run in terminal" entry when nothing matches
    #[serde(default = "default_true")]
    pub fallback: bool,

    /// Terminal emulator override; autodetected when unset
    #[serde(default)]
    pub terminal: Option<String>,

    #[serde(default = "default_mode")]
    pub default_mode: String,
}

fn default_true() -> bool {
    true
}
fn default_mode() -> String {
    "drun".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            fallback: true,
            terminal: None,
            default_mode: default_mode(),
        }
    }
}

/// Window layout as consumed by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_anchor")]
    pub anchor: String,

    #[serde(default)]
    pub margin: i32,

    #[serde(default = "default_layer")]
    pub layer: String,
}

fn default_width() -> u32 {
    600
}
fn default_height() -> u32 {
    400
}
fn default_anchor() -> String {
    "center".to_string()
}
fn default_layer() -> String {
    "top".to_string()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            anchor: default_anchor(),
            margin: 0,
            layer: default_layer(),
        }
    }
}

/// Optional layout values layered over `WindowConfig`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOverrides {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub margin: Option<i32>,
    #[serde(default)]
    pub layer: Option<String>,
}

impl LayoutOverrides {
    /// Copy every value set in `other` over this layer.
    pub fn apply(&mut self, other: &LayoutOverrides) {
        if other.width.is_some() {
            self.width = other.width;
        }
        if other.height.is_some() {
            self.height = other.height;
        }
        if other.anchor.is_some() {
            self.anchor.clone_from(&other.anchor);
        }
        if other.margin.is_some() {
            self.margin = other.margin;
        }
        if other.layer.is_some() {
            self.layer.clone_from(&other.layer);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A named provider set as written in the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetConfig {
    #[serde(default)]
    pub providers: Vec<String>,

    #[serde(default)]
    pub prompt: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub pins: Vec<String>,

    #[serde(default)]
    pub aliases: HashMap<String, String>,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub layout: LayoutOverrides,
}

/// Include/exclude patterns: literal substrings or `/regex/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    #[serde(default)]
    pub top: TopSettings,

    #[serde(default)]
    pub ssh: SshSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessSort {
    #[default]
    Cpu,
    Mem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSettings {
    #[serde(default = "default_top_limit")]
    pub limit: usize,

    #[serde(default)]
    pub sort: ProcessSort,

    /// Include processes owned by other users
    #[serde(default)]
    pub show_system: bool,
}

fn default_top_limit() -> usize {
    50
}

impl Default for TopSettings {
    fn default() -> Self {
        Self {
            limit: default_top_limit(),
            sort: ProcessSort::default(),
            show_system: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshSettings {
    #[serde(default = "default_true")]
    pub parse_known_hosts: bool,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            parse_known_hosts: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Oldest entries beyond this count are evicted on save
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_entries() -> usize {
    1000
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}
