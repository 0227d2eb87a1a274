use super::{Launcher, Outcome};
use awe_types::{Candidate, SelectionMode, WindowAction};
use crate::search::{RankingContext, RankingEngine};
use tracing::{debug, info, warn};

const PICKER_PROMPT: &str = "Move to monitor > ";
const OUTPUT_ICON: &str = "video-display";

/// Modifiers of a single activation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivateFlags {
    /// Run in a terminal even if the candidate does not ask for one
    pub force_terminal: bool,
    /// Keep the terminal open after the command exits
    pub hold_open: bool,
}

impl Launcher {
    /// Activate the displayed candidate at `index`.
    pub fn activate(&mut self, index: usize, flags: ActivateFlags) -> Outcome {
        let Some(candidate) = self.displayed.get(index).cloned() else {
            debug!("Activate on stale index {index}");
            return Outcome::Ignored;
        };

        if self.state.selection_mode == SelectionMode::MonitorSelect {
            return self.finish_move_to_monitor(&candidate);
        }

        if self.dmenu {
            self.state.visible = false;
            return Outcome::Selected(candidate.primary_text);
        }

        if candidate.is_window() {
            if let Err(e) = self.collaborators.windows.activate(&candidate.id) {
                warn!("Failed to activate window {}: {e}", candidate.id);
            }
            return self.hide();
        }

        if let Some(target) = candidate.kill_target() {
            return self.terminate(target);
        }

        self.launch(&candidate, flags)
    }

    fn terminate(&mut self, target: Result<i32, String>) -> Outcome {
        let pid = match target {
            Ok(pid) => pid,
            Err(raw) => {
                debug!("Ignoring kill of invalid pid '{raw}'");
                return Outcome::Ignored;
            }
        };

        match self.collaborators.processes.terminate(pid) {
            Ok(()) => {
                info!("Sent SIGTERM to {pid}");
                self.hide()
            }
            Err(e) => {
                warn!("Failed to terminate {pid}: {e}");
                Outcome::Ignored
            }
        }
    }

    fn launch(&mut self, candidate: &Candidate, flags: ActivateFlags) -> Outcome {
        let argv: Vec<String> = if candidate.terminal_flag || flags.force_terminal {
            let terminal = self.collaborators.terminal.find_terminal();
            self.collaborators
                .terminal
                .wrap_command(&terminal, &candidate.exec_command, flags.hold_open)
        } else {
            candidate
                .exec_command
                .split_whitespace()
                .map(str::to_string)
                .collect()
        };

        let Some((program, args)) = argv.split_first() else {
            return Outcome::Ignored;
        };

        match self.collaborators.processes.start_detached(program, args) {
            Ok(()) => {
                info!("Launched {} ({program})", candidate.id);
                self.mru.record_activation(&candidate.id);
                self.hide()
            }
            Err(e) => {
                warn!("Failed to launch {}: {e}", candidate.id);
                Outcome::Ignored
            }
        }
    }

    /// Start the two-step "move window to output" interaction.
    ///
    /// Only valid on window candidates. The display is replaced by one
    /// entry per output.
    pub fn begin_move_to_monitor(&mut self, index: usize) -> Outcome {
        // Output entries have no exec either
        if self.state.selection_mode != SelectionMode::Normal {
            return Outcome::Ignored;
        }
        let Some(candidate) = self.displayed.get(index).filter(|c| c.is_window()).cloned() else {
            return Outcome::Ignored;
        };

        let outputs = self
            .collaborators
            .windows
            .list_output_names()
            .unwrap_or_else(|e| {
                warn!("Failed to list outputs: {e}");
                Vec::new()
            });

        let pool = outputs
            .into_iter()
            .map(|name| Candidate::new(name.clone(), name).with_icon(OUTPUT_ICON))
            .collect();

        self.picker = Some(RankingEngine::new(pool, RankingContext::default()));
        self.state.selection_mode = SelectionMode::MonitorSelect;
        self.state.pending_handle = Some(candidate.id);
        self.state.prompt = PICKER_PROMPT.to_string();
        self.filter("");
        Outcome::Continue
    }

    fn finish_move_to_monitor(&mut self, output: &Candidate) -> Outcome {
        if let Some(window) = self.state.pending_handle.take()
            && let Err(e) = self
                .collaborators
                .windows
                .move_to_output(&window, &output.primary_text)
        {
            warn!("Failed to move {window} to {}: {e}", output.primary_text);
        }
        self.hide()
    }

    /// Close, fullscreen, maximize or minimize a window candidate.
    pub fn window_action(&mut self, index: usize, action: WindowAction) -> Outcome {
        if self.state.selection_mode != SelectionMode::Normal {
            return Outcome::Ignored;
        }
        let Some(candidate) = self.displayed.get(index).filter(|c| c.is_window()) else {
            return Outcome::Ignored;
        };

        let windows = &self.collaborators.windows;
        let result = match action {
            WindowAction::Close => windows.close(&candidate.id),
            WindowAction::Fullscreen => windows.toggle_fullscreen(&candidate.id),
            WindowAction::Maximize => windows.toggle_maximize(&candidate.id),
            WindowAction::Minimize => windows.toggle_minimize(&candidate.id),
        };

        match result {
            Ok(()) => Outcome::Continue,
            Err(e) => {
                warn!("{action:?} on {} failed: {e}", candidate.id);
                Outcome::Ignored
            }
        }
    }
}
