use super::Provider;
use crate::Result;
use crate::config::Config;
use crate::utils::{is_executable, path_dirs};
use awe_types::Candidate;
use std::collections::HashSet;
use std::path::PathBuf;

const EXECUTABLE_ICON: &str = "application-x-executable";

/// Executables found in `$PATH`; the first directory providing a name wins.
#[derive(Debug, Clone, Default)]
pub struct PathProvider {
    dirs: Option<Vec<PathBuf>>,
}

impl PathProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { dirs: Some(dirs) }
    }
}

impl Provider for PathProvider {
    fn scan(&self, _config: &Config) -> Result<Vec<Candidate>> {
        let dirs = self.dirs.clone().unwrap_or_else(path_dirs);
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for dir in dirs {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };

            let mut found: Vec<(String, PathBuf)> = entries
                .filter_map(std::result::Result::ok)
                .filter_map(|entry| {
                    let name = entry.file_name().into_string().ok()?;
                    let path = entry.path();
                    is_executable(&path).then_some((name, path))
                })
                .collect();
            found.sort_by(|a, b| a.0.cmp(&b.0));

            for (name, path) in found {
                if !seen.insert(name.clone()) {
                    continue;
                }
                candidates.push(
                    Candidate::new(format!("path:{name}"), name.clone())
                        .with_secondary(path.display().to_string())
                        .with_exec(name)
                        .with_icon(EXECUTABLE_ICON),
                );
            }
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn make_executable(dir: &std::path::Path, name: &str) {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_scan_finds_executables_first_dir_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        make_executable(first.path(), "zeta");
        make_executable(first.path(), "alpha");
        make_executable(second.path(), "alpha");
        make_executable(second.path(), "beta");
        fs::write(second.path().join("notes.txt"), "plain").unwrap();

        let provider =
            PathProvider::with_dirs(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        let candidates = provider.scan(&Config::default()).unwrap();
        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(ids, vec!["path:alpha", "path:zeta", "path:beta"]);
        assert_eq!(
            candidates[0].secondary_text,
            first.path().join("alpha").display().to_string()
        );
        assert_eq!(candidates[0].exec_command, "alpha");
    }

    #[test]
    fn test_missing_dir_is_skipped() {
        let provider = PathProvider::with_dirs(vec![PathBuf::from("/nonexistent/awe-bin")]);
        assert!(provider.scan(&Config::default()).unwrap().is_empty());
    }
}
