//! Installed applications from freedesktop `.desktop` entries.

use super::Provider;
use crate::Result;
use crate::config::Config;
use crate::utils::find_program;
use awe_types::Candidate;
use directories::BaseDirs;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

const DEFAULT_DATA_DIRS: &str = "/usr/local/share:/usr/share";
const MAX_DEPTH: usize = 4;

/// Scans `applications/` under the XDG data directories.
#[derive(Debug, Clone, Default)]
pub struct DesktopProvider {
    dirs: Option<Vec<PathBuf>>,
    desktops: Option<Vec<String>>,
}

impl DesktopProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `dirs` and evaluate `OnlyShowIn`/`NotShowIn` against `desktops`.
    #[must_use]
    pub fn with_dirs(dirs: Vec<PathBuf>, desktops: Vec<String>) -> Self {
        Self {
            dirs: Some(dirs),
            desktops: Some(desktops),
        }
    }

    fn application_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::new();

        let data_home = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| BaseDirs::new().map(|b| b.data_dir().to_path_buf()));
        if let Some(home) = data_home {
            dirs.push(home.join("applications"));
        }

        let data_dirs = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIRS.to_string());
        dirs.extend(
            data_dirs
                .split(':')
                .filter(|d| !d.is_empty())
                .map(|d| Path::new(d).join("applications")),
        );

        dirs
    }

    fn current_desktops() -> Vec<String> {
        std::env::var("XDG_CURRENT_DESKTOP")
            .unwrap_or_default()
            .split(':')
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Provider for DesktopProvider {
    fn scan(&self, _config: &Config) -> Result<Vec<Candidate>> {
        let dirs = self.dirs.clone().unwrap_or_else(Self::application_dirs);
        let desktops = self.desktops.clone().unwrap_or_else(Self::current_desktops);

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for dir in dirs {
            let mut files = Vec::new();
            collect_desktop_files(&dir, 0, &mut files);
            files.sort();

            for file in files {
                let Some(id) = file.file_name().and_then(|n| n.to_str()).map(str::to_string)
                else {
                    continue;
                };
                // Earlier directories shadow later ones, even when hidden
                if !seen.insert(id.clone()) {
                    continue;
                }
                let Ok(content) = std::fs::read_to_string(&file) else {
                    debug!("Skipping unreadable desktop file {}", file.display());
                    continue;
                };
                candidates.extend(parse_desktop_entry(&id, &content, &desktops));
            }
        }

        candidates.sort_by_cached_key(|c| c.primary_text.to_lowercase());
        debug!("Found {} desktop entries", candidates.len());
        Ok(candidates)
    }
}

fn collect_desktop_files(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth < MAX_DEPTH {
                collect_desktop_files(&path, depth + 1, out);
            }
        } else if path.extension().is_some_and(|ext| ext == "desktop") {
            out.push(path);
        }
    }
}

/// Key/value pairs per `[group]`, ignoring localized keys.
fn parse_groups(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut groups: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = Some(name.to_string());
            continue;
        }
        let (Some(group), Some((key, value))) = (&current, line.split_once('=')) else {
            continue;
        };
        let key = key.trim();
        if key.contains('[') {
            continue;
        }
        groups
            .entry(group.clone())
            .or_default()
            .entry(key.to_string())
            .or_insert_with(|| value.trim().to_string());
    }

    groups
}

fn list(value: Option<&String>) -> Vec<&str> {
    value
        .map(|v| v.split(';').map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

fn is_true(value: Option<&String>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Remove `%f`-style field codes; `%%` is a literal percent sign.
fn strip_field_codes(exec: &str) -> String {
    let mut out = String::with_capacity(exec.len());
    let mut chars = exec.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some(_) | None => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn shown_in(entry: &HashMap<String, String>, desktops: &[String]) -> bool {
    let matches_current =
        |list: Vec<&str>| list.iter().any(|d| desktops.iter().any(|cur| cur.eq_ignore_ascii_case(d)));

    let only = list(entry.get("OnlyShowIn"));
    if !only.is_empty() && !matches_current(only) {
        return false;
    }
    !matches_current(list(entry.get("NotShowIn")))
}

/// Candidates for one desktop file: the application plus its actions.
fn parse_desktop_entry(id: &str, content: &str, desktops: &[String]) -> Vec<Candidate> {
    let groups = parse_groups(content);
    let Some(entry) = groups.get("Desktop Entry") else {
        return Vec::new();
    };

    if entry.get("Type").is_some_and(|t| t != "Application")
        || is_true(entry.get("NoDisplay"))
        || is_true(entry.get("Hidden"))
        || !shown_in(entry, desktops)
    {
        trace!("Skipping hidden desktop entry {id}");
        return Vec::new();
    }

    if let Some(try_exec) = entry.get("TryExec")
        && find_program(try_exec).is_none()
    {
        trace!("Skipping {id}: TryExec {try_exec} not found");
        return Vec::new();
    }

    let (Some(name), Some(exec)) = (entry.get("Name"), entry.get("Exec")) else {
        return Vec::new();
    };
    // An empty exec would read as a window entry
    let exec = strip_field_codes(exec);
    if exec.is_empty() {
        trace!("Skipping {id}: empty Exec");
        return Vec::new();
    }

    let secondary = entry
        .get("Comment")
        .or_else(|| entry.get("GenericName"))
        .cloned()
        .unwrap_or_default();
    let icon = entry.get("Icon").cloned().unwrap_or_default();
    let keywords = list(entry.get("Keywords")).join(" ");
    let categories = list(entry.get("Categories")).join(" ");
    let terminal = is_true(entry.get("Terminal"));

    let mut candidates = vec![
        Candidate::new(id, name.clone())
            .with_secondary(secondary.clone())
            .with_exec(exec)
            .with_icon(icon.clone())
            .with_keywords(keywords.clone())
            .with_categories(categories.clone())
            .in_terminal(terminal),
    ];

    for action in list(entry.get("Actions")) {
        let Some(group) = groups.get(&format!("Desktop Action {action}")) else {
            continue;
        };
        let (Some(action_name), Some(action_exec)) = (group.get("Name"), group.get("Exec")) else {
            continue;
        };
        let action_exec = strip_field_codes(action_exec);
        if action_exec.is_empty() {
            continue;
        }
        candidates.push(
            Candidate::new(format!("{id}:{action}"), format!("{name}: {action_name}"))
                .with_secondary(secondary.clone())
                .with_exec(action_exec)
                .with_icon(group.get("Icon").cloned().unwrap_or_else(|| icon.clone()))
                .with_keywords(keywords.clone())
                .with_categories(categories.clone())
                .in_terminal(terminal),
        );
    }

    candidates
}
