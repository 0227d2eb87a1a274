use super::Provider;
use crate::Result;
use crate::config::Config;
use awe_types::Candidate;
use directories::BaseDirs;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// Hosts from `~/.ssh/config` and, optionally, `~/.ssh/known_hosts`
#[derive(Debug, Clone, Default)]
pub struct SshProvider {
    ssh_dir: Option<PathBuf>,
}

impl SshProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dir(ssh_dir: PathBuf) -> Self {
        Self {
            ssh_dir: Some(ssh_dir),
        }
    }

    fn ssh_dir(&self) -> Option<PathBuf> {
        self.ssh_dir
            .clone()
            .or_else(|| BaseDirs::new().map(|b| b.home_dir().join(".ssh")))
    }
}

/// Concrete host names from `Host` lines; patterns are skipped.
fn config_hosts(content: &str) -> Vec<String> {
    let mut hosts = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        let Some((keyword, rest)) = line.split_once(|c: char| c.is_whitespace() || c == '=')
        else {
            continue;
        };
        if !keyword.eq_ignore_ascii_case("host") {
            continue;
        }
        hosts.extend(
            rest.trim_start_matches(|c: char| c.is_whitespace() || c == '=')
                .split_whitespace()
                .filter(|h| !h.contains(['*', '?', '!']))
                .map(str::to_string),
        );
    }
    hosts
}

/// Plain host names from `known_hosts`; hashed and `[host]:port` entries are skipped.
fn known_hosts(content: &str) -> Vec<String> {
    let mut hosts = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(['#', '|', '@']) {
            continue;
        }
        let Some(field) = line.split_whitespace().next() else {
            continue;
        };
        hosts.extend(
            field
                .split(',')
                .filter(|h| !h.is_empty() && !h.starts_with('[') && !h.contains('*'))
                .map(str::to_string),
        );
    }
    hosts
}

impl Provider for SshProvider {
    fn scan(&self, config: &Config) -> Result<Vec<Candidate>> {
        let Some(dir) = self.ssh_dir() else {
            return Ok(Vec::new());
        };

        let mut hosts = std::fs::read_to_string(dir.join("config"))
            .map(|c| config_hosts(&c))
            .unwrap_or_default();

        if config.providers.ssh.parse_known_hosts {
            hosts.extend(
                std::fs::read_to_string(dir.join("known_hosts"))
                    .map(|c| known_hosts(&c))
                    .unwrap_or_default(),
            );
        }

        let mut seen = HashSet::new();
        hosts.retain(|h| seen.insert(h.clone()));
        debug!("Found {} SSH hosts", hosts.len());

        Ok(hosts
            .into_iter()
            .map(|host| {
                Candidate::new(format!("ssh:{host}"), host.clone())
                    .with_secondary("SSH Host")
                    .with_exec(format!("ssh {host}"))
                    .with_icon("network-server")
                    .in_terminal(true)
            })
            .collect())
    }
}
