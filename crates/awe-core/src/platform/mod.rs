//! External collaborators: compositor windows, terminals and processes.
//!
//! Each is a trait so the session can be driven against recording fakes in
//! tests; `Collaborators::system` wires up the real implementations.

mod niri;
mod process;
mod terminal;
mod windowing;

pub use niri::NiriWindows;
pub use process::{ProcessControl, SystemProcesses};
pub use terminal::{SystemTerminal, Terminal, wrap_command};
pub use windowing::{NoWindowing, WINDOW_ID_PREFIX, WindowManager};

use crate::config::Config;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};

/// Wayland compositors with window-management support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compositor {
    Niri,
    Hyprland,
    Unknown,
}

impl Compositor {
    pub fn as_str(self) -> &'static str {
        match self {
            Compositor::Niri => "niri",
            Compositor::Hyprland => "hyprland",
            Compositor::Unknown => "unknown",
        }
    }
}

/// Detect the running compositor from its environment variables
pub fn detect() -> Compositor {
    if env::var_os("NIRI_SOCKET").is_some() {
        return Compositor::Niri;
    }
    if env::var_os("HYPRLAND_INSTANCE_SIGNATURE").is_some() {
        return Compositor::Hyprland;
    }
    Compositor::Unknown
}

/// Window manager for the detected compositor, or `NoWindowing`.
pub fn window_manager() -> Arc<dyn WindowManager> {
    let compositor = detect();
    if compositor == Compositor::Niri
        && let Some(niri) = NiriWindows::from_env()
    {
        match niri.initialize() {
            Ok(()) => return Arc::new(niri),
            Err(e) => warn!("Niri IPC unavailable: {e}"),
        }
    } else if compositor != Compositor::Unknown {
        info!(
            "Window management is not supported on {}",
            compositor.as_str()
        );
    }
    Arc::new(NoWindowing)
}

/// Side-effecting services used by the session
pub struct Collaborators {
    pub windows: Arc<dyn WindowManager>,
    pub terminal: Box<dyn Terminal>,
    pub processes: Box<dyn ProcessControl>,
}

impl Collaborators {
    /// Real implementations for the current desktop session.
    #[must_use]
    pub fn system(config: &Config) -> Self {
        Self {
            windows: window_manager(),
            terminal: Box::new(SystemTerminal::new(config.general.terminal.clone())),
            processes: Box::new(SystemProcesses),
        }
    }
}
