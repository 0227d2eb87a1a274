use super::Provider;
use crate::{Error, Result};
use crate::config::{Config, ProcessSort};
use awe_types::{Candidate, KILL_PREFIX};
use std::path::PathBuf;
use tracing::debug;

/// Which process view to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    /// Heaviest processes first, truncated to the configured limit
    Top,
    /// Every process in PID order
    Kill,
}

/// Running processes read from procfs
#[derive(Debug, Clone)]
pub struct ProcessProvider {
    mode: ProcessMode,
    proc_root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProcessInfo {
    pid: i32,
    name: String,
    cmdline: String,
    uid: Option<u32>,
    rss_kb: u64,
    cpu_ticks: u64,
}

impl ProcessMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessMode::Top => "top",
            ProcessMode::Kill => "kill",
        }
    }
}

impl ProcessProvider {
    #[must_use]
    pub fn new(mode: ProcessMode) -> Self {
        Self::with_root(mode, PathBuf::from("/proc"))
    }

    #[must_use]
    pub fn with_root(mode: ProcessMode, proc_root: PathBuf) -> Self {
        Self { mode, proc_root }
    }

    fn read_process(&self, pid: i32) -> Option<ProcessInfo> {
        let dir = self.proc_root.join(pid.to_string());
        let stat = std::fs::read_to_string(dir.join("stat")).ok()?;
        let status = std::fs::read_to_string(dir.join("status")).unwrap_or_default();
        let cmdline = std::fs::read(dir.join("cmdline")).unwrap_or_default();

        let (name, cpu_ticks) = parse_stat(&stat)?;
        let cmdline = cmdline
            .split(|b| *b == 0)
            .filter(|part| !part.is_empty())
            .map(|part| String::from_utf8_lossy(part).into_owned())
            .collect::<Vec<_>>()
            .join(" ");

        Some(ProcessInfo {
            pid,
            name,
            cmdline,
            uid: status_field(&status, "Uid:").and_then(|v| v.parse().ok()),
            rss_kb: status_field(&status, "VmRSS:")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            cpu_ticks,
        })
    }

    fn current_uid(&self) -> Option<u32> {
        let status = std::fs::read_to_string(self.proc_root.join("self").join("status")).ok()?;
        status_field(&status, "Uid:")?.parse().ok()
    }
}

/// Command name and utime+stime from `/proc/<pid>/stat`.
fn parse_stat(stat: &str) -> Option<(String, u64)> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    let name = stat.get(open + 1..close)?.to_string();

    // Fields after the command name start at field 3 (state);
    // utime and stime are fields 14 and 15.
    let rest: Vec<&str> = stat.get(close + 1..)?.split_whitespace().collect();
    let utime: u64 = rest.get(11)?.parse().ok()?;
    let stime: u64 = rest.get(12)?.parse().ok()?;
    Some((name, utime + stime))
}

/// First whitespace-separated value of a `Key:` line in `/proc/<pid>/status`.
fn status_field<'a>(status: &'a str, key: &str) -> Option<&'a str> {
    status
        .lines()
        .find_map(|line| line.strip_prefix(key))
        .and_then(|rest| rest.split_whitespace().next())
}

fn process_candidate(info: &ProcessInfo, icon: &str) -> Candidate {
    let command = if info.cmdline.is_empty() {
        format!("[{}]", info.name)
    } else {
        info.cmdline.clone()
    };
    Candidate::new(format!("proc:{}", info.pid), info.name.clone())
        .with_secondary(format!(
            "PID: {} | MEM: {} MB | {}",
            info.pid,
            info.rss_kb / 1024,
            command
        ))
        .with_exec(format!("{KILL_PREFIX}{}", info.pid))
        .with_icon(icon)
}

impl Provider for ProcessProvider {
    fn scan(&self, config: &Config) -> Result<Vec<Candidate>> {
        let settings = &config.providers.top;
        let own_pid = std::process::id();
        let uid = if settings.show_system {
            None
        } else {
            self.current_uid()
        };

        let entries = std::fs::read_dir(&self.proc_root).map_err(|e| Error::Provider {
            provider: self.mode.as_str().to_string(),
            message: format!("cannot read {}: {e}", self.proc_root.display()),
        })?;
        let mut pids: Vec<i32> = entries
            .filter_map(std::result::Result::ok)
            .filter_map(|e| e.file_name().to_str()?.parse().ok())
            .filter(|pid| u32::try_from(*pid).is_ok_and(|p| p != own_pid))
            .collect();
        pids.sort_unstable();

        let mut processes: Vec<ProcessInfo> = pids
            .into_iter()
            .filter_map(|pid| self.read_process(pid))
            .filter(|p| uid.is_none() || p.uid == uid)
            .collect();

        let icon = match self.mode {
            ProcessMode::Top => {
                match settings.sort {
                    ProcessSort::Cpu => processes.sort_by(|a, b| b.cpu_ticks.cmp(&a.cpu_ticks)),
                    ProcessSort::Mem => processes.sort_by(|a, b| b.rss_kb.cmp(&a.rss_kb)),
                }
                if settings.limit > 0 {
                    processes.truncate(settings.limit);
                }
                "utilities-system-monitor"
            }
            ProcessMode::Kill => "process-stop",
        };

        debug!("Listing {} processes ({:?})", processes.len(), self.mode);
        Ok(processes
            .iter()
            .map(|p| process_candidate(p, icon))
            .collect())
    }
}
