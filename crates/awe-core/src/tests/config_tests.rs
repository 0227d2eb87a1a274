//! Tests for loading complete configuration files
//!
//! Tests the config system including:
//! - A full file with sets, provider settings and history
//! - Partial files falling back to defaults
//! - Files with unknown keys still loading
//! - Directories management

use crate::config::{Config, Directories, ProcessSort};
use tempfile::{NamedTempFile, TempDir};

const FULL_CONFIG: &str = r#"{
  "general": { "fallback": false, "terminal": "foot", "defaultMode": "run" },
  "window":  { "width": 700, "height": 500, "anchor": "top", "margin": 12, "layer": "overlay" },
  "pins":    ["firefox.desktop"],
  "aliases": { "term": "foot.desktop", "up": "sudo pacman -Syu" },
  "sets": {
    "dev": {
      "providers": ["drun", "run"], "prompt": "Dev > ", "icon": "code",
      "pins": ["code.desktop"], "aliases": { "c": "code.desktop" },
      "filter": { "include": [], "exclude": ["/^avahi/"] },
      "layout": { "width": 800, "height": null, "anchor": null, "margin": null }
    }
  },
  "providers": {
    "top": { "limit": 20, "sort": "mem", "showSystem": true },
    "ssh": { "parseKnownHosts": false }
  },
  "history": { "maxEntries": 50 }
}"#;

#[test]
fn test_full_config_parses() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), FULL_CONFIG).unwrap();

    let config = Config::load(file.path()).unwrap();
    assert!(!config.general.fallback);
    assert_eq!(config.general.terminal.as_deref(), Some("foot"));
    assert_eq!(config.general.default_mode, "run");
    assert_eq!(config.window.width, 700);
    assert_eq!(config.window.layer, "overlay");
    assert_eq!(config.pins, vec!["firefox.desktop"]);
    assert_eq!(config.aliases["up"], "sudo pacman -Syu");

    let dev = &config.sets["dev"];
    assert_eq!(dev.providers, vec!["drun", "run"]);
    assert_eq!(dev.prompt.as_deref(), Some("Dev > "));
    assert_eq!(dev.filter.exclude, vec!["/^avahi/"]);
    assert_eq!(dev.layout.width, Some(800));
    assert!(dev.layout.height.is_none());

    assert_eq!(config.providers.top.limit, 20);
    assert_eq!(config.providers.top.sort, ProcessSort::Mem);
    assert!(config.providers.top.show_system);
    assert!(!config.providers.ssh.parse_known_hosts);
    assert_eq!(config.history.max_entries, 50);
    assert!(config.overrides.is_empty());
}

#[test]
fn test_partial_config_uses_defaults() {
    let config: Config = serde_json::from_str(r#"{"window": {"width": 1000}}"#).unwrap();
    assert_eq!(config.window.width, 1000);
    assert_eq!(config.window.height, 400);
    assert!(config.general.fallback);
    assert_eq!(config.general.default_mode, "drun");
    assert_eq!(config.providers.top.limit, 50);
    assert!(config.providers.ssh.parse_known_hosts);
    assert_eq!(config.history.max_entries, 1000);
}

#[test]
fn test_unknown_keys_do_not_prevent_loading() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        r#"{"theme": "dark", "sets": {"x": {"providers": ["ssh"], "colour": "red"}}}"#,
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.sets["x"].providers, vec!["ssh"]);
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "{ broken").unwrap();

    assert!(Config::load(file.path()).is_err());
    let config = Config::load_or_default(file.path());
    assert_eq!(config.general.default_mode, "drun");
}

#[test]
fn test_directories_layout() {
    let temp = TempDir::new().unwrap();
    let dirs = Directories::with_base(temp.path().to_path_buf());
    dirs.ensure_exists().unwrap();

    assert!(dirs.config.exists());
    assert!(dirs.cache.exists());
    assert_eq!(dirs.config_file.file_name().unwrap(), "config.json");
    assert_eq!(dirs.mru_file.file_name().unwrap(), "mru.json");
}
