use crate::utils::find_program;
use tracing::debug;

/// Terminal emulators probed in order when none is configured
const KNOWN_TERMINALS: &[&str] = &[
    "xdg-terminal-exec",
    "wezterm",
    "gnome-terminal",
    "konsole",
    "alacritty",
    "kitty",
    "xfce4-terminal",
    "urxvt",
    "xterm",
    "weston-terminal",
    "foot",
];

const FALLBACK_TERMINAL: &str = "x-terminal-emulator";

/// Terminal detection and command wrapping.
pub trait Terminal: Send {
    /// Terminal program to run commands in.
    fn find_terminal(&self) -> String;

    /// Full argv (program first) that runs `command` inside `program`.
    fn wrap_command(&self, program: &str, command: &str, hold_open: bool) -> Vec<String> {
        wrap_command(program, command, hold_open)
    }
}

/// Honours a configured terminal, otherwise probes `$PATH`.
#[derive(Debug, Clone, Default)]
pub struct SystemTerminal {
    configured: Option<String>,
}

impl SystemTerminal {
    #[must_use]
    pub fn new(configured: Option<String>) -> Self {
        Self {
            configured: configured.filter(|t| !t.trim().is_empty()),
        }
    }
}

impl Terminal for SystemTerminal {
    fn find_terminal(&self) -> String {
        if let Some(configured) = &self.configured {
            return configured.clone();
        }

        KNOWN_TERMINALS
            .iter()
            .find(|name| find_program(name).is_some())
            .map_or_else(
                || {
                    debug!("No known terminal found, using {FALLBACK_TERMINAL}");
                    FALLBACK_TERMINAL.to_string()
                },
                |name| (*name).to_string(),
            )
    }
}

/// Build the argv for running `command` in terminal `program`.
///
/// With `hold_open` the shell waits for Enter after the command exits.
#[must_use]
pub fn wrap_command(program: &str, command: &str, hold_open: bool) -> Vec<String> {
    let shell_command = if hold_open {
        format!("{command}; echo; echo 'Press Enter to close...'; read")
    } else {
        command.to_string()
    };

    let basename = program.rsplit('/').next().unwrap_or(program);
    let mut argv = vec![program.to_string()];

    match basename {
        "xdg-terminal-exec" => {
            argv.extend(["sh".into(), "-c".into(), shell_command]);
        }
        "wezterm" => {
            argv.extend([
                "start".into(),
                "--".into(),
                "sh".into(),
                "-c".into(),
                shell_command,
            ]);
        }
        _ if hold_open => {
            argv.extend(["-e".into(), "sh".into(), "-c".into(), shell_command]);
        }
        _ => {
            argv.push("-e".into());
            argv.extend(command.split_whitespace().map(str::to_string));
        }
    }

    argv
}
