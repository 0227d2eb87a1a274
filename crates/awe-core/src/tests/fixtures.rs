//! Test fixtures and recording collaborators

use crate::config::Config;
use crate::mru::MruStore;
use crate::platform::{Collaborators, ProcessControl, Terminal, WindowManager};
use crate::providers::{ProviderRegistry, StaticProvider, WindowProvider};
use crate::resolver::ProviderSetResolver;
use crate::{Error, Launcher, Result};
use awe_types::Candidate;
use std::sync::{Arc, Mutex};

/// Mode name the test pool is registered under
pub const TEST_MODE: &str = "test";

/// Create an executable candidate whose exec is its id
pub fn make_candidate(id: &str, primary: &str) -> Candidate {
    Candidate::new(id, primary).with_exec(id)
}

/// Create a window candidate (no exec)
pub fn make_window(id: &str, title: &str) -> Candidate {
    Candidate::new(id, title).with_secondary("app")
}

pub fn ids(results: &[Candidate]) -> Vec<&str> {
    results.iter().map(|c| c.id.as_str()).collect()
}

/// Side effect observed by a recording collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Spawn(String, Vec<String>),
    Terminate(i32),
    Activate(String),
    Close(String),
    Fullscreen(String),
    Maximize(String),
    Minimize(String),
    Move(String, String),
}

/// Shared between the collaborators handed to a launcher and the test
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn spawned(&self) -> bool {
        self.calls().iter().any(|c| matches!(c, Call::Spawn(..)))
    }
}

pub struct RecordingProcesses {
    log: CallLog,
    fail_spawn: bool,
}

impl ProcessControl for RecordingProcesses {
    fn start_detached(&self, program: &str, args: &[String]) -> Result<()> {
        if self.fail_spawn {
            return Err(Error::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        self.log.push(Call::Spawn(program.to_string(), args.to_vec()));
        Ok(())
    }

    fn terminate(&self, pid: i32) -> Result<()> {
        self.log.push(Call::Terminate(pid));
        Ok(())
    }
}

pub struct FakeWindows {
    log: CallLog,
    windows: Vec<Candidate>,
    outputs: Vec<String>,
}

impl WindowManager for FakeWindows {
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn list_windows(&self) -> Result<Vec<Candidate>> {
        Ok(self.windows.clone())
    }

    fn activate(&self, id: &str) -> Result<()> {
        self.log.push(Call::Activate(id.to_string()));
        Ok(())
    }

    fn close(&self, id: &str) -> Result<()> {
        self.log.push(Call::Close(id.to_string()));
        Ok(())
    }

    fn toggle_fullscreen(&self, id: &str) -> Result<()> {
        self.log.push(Call::Fullscreen(id.to_string()));
        Ok(())
    }

    fn toggle_maximize(&self, id: &str) -> Result<()> {
        self.log.push(Call::Maximize(id.to_string()));
        Ok(())
    }

    fn toggle_minimize(&self, _id: &str) -> Result<()> {
        Err(Error::Unsupported("minimize".to_string()))
    }

    fn move_to_output(&self, id: &str, output: &str) -> Result<()> {
        self.log.push(Call::Move(id.to_string(), output.to_string()));
        Ok(())
    }

    fn list_output_names(&self) -> Result<Vec<String>> {
        Ok(self.outputs.clone())
    }
}

/// Always picks `foot`
pub struct FakeTerminal;

impl Terminal for FakeTerminal {
    fn find_terminal(&self) -> String {
        "foot".to_string()
    }
}

/// Builder for a launcher over a fixed pool and fake collaborators.
///
/// The pool is served by the `test` provider (the default mode); window
/// candidates come from the `window` provider.
pub struct LauncherBuilder {
    pool: Vec<Candidate>,
    windows: Vec<Candidate>,
    outputs: Vec<String>,
    config: Config,
    resident: bool,
    dmenu: bool,
    fail_spawn: bool,
}

impl LauncherBuilder {
    pub fn new(pool: Vec<Candidate>) -> Self {
        let mut config = Config::default();
        config.general.default_mode = TEST_MODE.to_string();
        Self {
            pool,
            windows: Vec::new(),
            outputs: Vec::new(),
            config,
            resident: false,
            dmenu: false,
            fail_spawn: false,
        }
    }

    pub fn windows(mut self, windows: Vec<Candidate>) -> Self {
        self.windows = windows;
        self
    }

    pub fn outputs(mut self, outputs: &[&str]) -> Self {
        self.outputs = outputs.iter().map(ToString::to_string).collect();
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn resident(mut self) -> Self {
        self.resident = true;
        self
    }

    pub fn dmenu(mut self) -> Self {
        self.dmenu = true;
        self
    }

    pub fn failing_spawn(mut self) -> Self {
        self.fail_spawn = true;
        self
    }

    pub fn build(self) -> (Launcher, CallLog) {
        let log = CallLog::default();
        let windows: Arc<dyn WindowManager> = Arc::new(FakeWindows {
            log: log.clone(),
            windows: self.windows,
            outputs: self.outputs,
        });

        let mut registry = ProviderRegistry::new();
        registry.register(TEST_MODE, StaticProvider::new(self.pool));
        registry.register("window", WindowProvider::new(windows.clone()));

        let collaborators = Collaborators {
            windows,
            terminal: Box::new(FakeTerminal),
            processes: Box::new(RecordingProcesses {
                log: log.clone(),
                fail_spawn: self.fail_spawn,
            }),
        };

        let launcher = Launcher::new(
            self.config,
            ProviderSetResolver::new(registry),
            MruStore::in_memory(),
            collaborators,
        )
        .resident(self.resident)
        .dmenu(self.dmenu);
        (launcher, log)
    }
}
