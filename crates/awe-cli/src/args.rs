//! Command-line definition for `awelaunch`.

use std::path::PathBuf;

use awe_core::ActivateFlags;
use awe_core::config::LayoutOverrides;
use awe_core::resolver::SetRequest;
use awe_ipc::{DEFAULT_QUERY_LIMIT, ShowPayload, WindowAction};
use clap::{Parser, Subcommand, ValueEnum};

const DMENU_MODE: &str = "dmenu";

/// awelauncher - application launcher for Wayland compositors
#[derive(Parser, Debug)]
#[command(name = "awelaunch")]
#[command(version, about)]
#[command(after_help = "\
Examples:
  awelaunch                      Show the default provider set
  awelaunch -s ssh               Show SSH hosts
  awelaunch --set dev -q fire    Show the 'dev' set searching for 'fire'
  awelaunch toggle               Toggle a running launcher
  awelaunch query fire --limit 3 Print the top 3 matches as JSON
  awelaunch daemon               Run the resident launcher
  ls | awelaunch -d -q rea --activate 0
  awelaunch -s window --move-to-monitor 0 --activate 1
  awelaunch -s window -q mpv --window-action fullscreen --target 0

Keybinding examples (Niri):
  Mod+Space { spawn \"awelaunch\" \"toggle\"; }
  Mod+W { spawn \"awelaunch\" \"-s\" \"window\"; }
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Mode to show (drun, run, window, ssh, top, kill, dmenu)
    #[arg(short = 's', long = "show", value_name = "MODE")]
    pub mode: Option<String>,

    /// Configured provider set to show
    #[arg(long, value_name = "NAME")]
    pub set: Option<String>,

    /// Pre-fill the search
    #[arg(short, long, value_name = "TEXT")]
    pub query: Option<String>,

    /// Replace the set's prompt
    #[arg(short, long, value_name = "TEXT")]
    pub prompt: Option<String>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Screen anchor (center, top, bottom, ...)
    #[arg(short, long)]
    pub anchor: Option<String>,

    #[arg(short, long)]
    pub margin: Option<i32>,

    /// Place the window on the overlay layer
    #[arg(long)]
    pub overlay: bool,

    /// Rank lines read from stdin and print the selection
    #[arg(short, long)]
    pub dmenu: bool,

    /// Activate the candidate at this position of the ranked list
    #[arg(long, value_name = "INDEX")]
    pub activate: Option<usize>,

    /// Offer the outputs for the window entry at INDEX; pick one with --activate
    #[arg(long, value_name = "INDEX", conflicts_with = "window_action")]
    pub move_to_monitor: Option<usize>,

    /// Operate on the window entry given by --target
    #[arg(long, value_name = "ACTION", requires = "target", conflicts_with = "activate")]
    pub window_action: Option<WindowOp>,

    /// Position of the window entry for --window-action
    #[arg(long, value_name = "INDEX", requires = "window_action")]
    pub target: Option<usize>,

    /// Run the activated command in a terminal
    #[arg(long)]
    pub terminal: bool,

    /// Keep the terminal open after the command exits
    #[arg(long)]
    pub hold: bool,

    /// Custom socket path
    #[arg(long, value_name = "PATH", global = true)]
    pub socket: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'g', long, global = true)]
    pub debug: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOp {
    Close,
    Fullscreen,
    Maximize,
    Minimize,
}

impl From<WindowOp> for WindowAction {
    fn from(op: WindowOp) -> Self {
        match op {
            WindowOp::Close => WindowAction::Close,
            WindowOp::Fullscreen => WindowAction::Fullscreen,
            WindowOp::Maximize => WindowAction::Maximize,
            WindowOp::Minimize => WindowAction::Minimize,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the launcher (default)
    Show,

    /// Hide a running launcher
    Hide,

    /// Toggle a running launcher
    Toggle,

    /// Re-resolve the active provider set
    Reload,

    /// Print the launcher state as JSON
    Status,

    /// Rank TEXT against the active set and print the matches as JSON
    Query {
        text: String,

        #[arg(long, default_value_t = DEFAULT_QUERY_LIMIT)]
        limit: usize,
    },

    /// Run the resident launcher in the foreground
    Daemon,
}

impl Cli {
    pub fn resolved_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Show)
    }

    /// Set and mode asked for on the command line; dmenu implies its mode.
    pub fn set_request(&self) -> SetRequest {
        let mode = self
            .mode
            .clone()
            .or_else(|| self.dmenu.then(|| DMENU_MODE.to_string()));
        SetRequest {
            set: self.set.clone(),
            mode,
        }
    }

    pub fn show_payload(&self) -> ShowPayload {
        let request = self.set_request();
        ShowPayload {
            set: request.set,
            mode: request.mode,
            query: self.query.clone(),
        }
    }

    pub fn layout_overrides(&self) -> LayoutOverrides {
        LayoutOverrides {
            width: self.width,
            height: self.height,
            anchor: self.anchor.clone(),
            margin: self.margin,
            layer: self.overlay.then(|| "overlay".to_string()),
        }
    }

    /// `--window-action` with its target entry
    pub fn window_command(&self) -> Option<(usize, WindowAction)> {
        Some((self.target?, self.window_action?.into()))
    }

    pub fn activate_flags(&self) -> ActivateFlags {
        ActivateFlags {
            force_terminal: self.terminal,
            hold_open: self.hold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("awelaunch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_command_is_show() {
        let cli = parse(&[]);
        assert_eq!(cli.resolved_command(), Commands::Show);
        assert_eq!(cli.set_request(), SetRequest::default());
    }

    #[test]
    fn test_mode_and_query() {
        let cli = parse(&["-s", "ssh", "-q", "nas"]);
        let payload = cli.show_payload();
        assert_eq!(payload.mode.as_deref(), Some("ssh"));
        assert_eq!(payload.query.as_deref(), Some("nas"));
        assert_eq!(payload.set, None);
    }

    #[test]
    fn test_dmenu_implies_mode() {
        let cli = parse(&["-d"]);
        assert_eq!(cli.set_request().mode.as_deref(), Some("dmenu"));

        let cli = parse(&["-d", "-s", "run"]);
        assert_eq!(cli.set_request().mode.as_deref(), Some("run"));
    }

    #[test]
    fn test_query_subcommand_with_global_socket() {
        let cli = parse(&["query", "fire", "--limit", "3", "--socket", "/tmp/x.sock"]);
        assert_eq!(
            cli.resolved_command(),
            Commands::Query {
                text: "fire".to_string(),
                limit: 3
            }
        );
        assert_eq!(cli.socket, Some(PathBuf::from("/tmp/x.sock")));

        let cli = parse(&["query", "fire"]);
        assert_eq!(
            cli.resolved_command(),
            Commands::Query {
                text: "fire".to_string(),
                limit: DEFAULT_QUERY_LIMIT
            }
        );
    }

    #[test]
    fn test_layout_overrides() {
        let cli = parse(&["--width", "800", "-a", "top", "-m", "12", "--overlay"]);
        let overrides = cli.layout_overrides();
        assert_eq!(overrides.width, Some(800));
        assert_eq!(overrides.height, None);
        assert_eq!(overrides.anchor.as_deref(), Some("top"));
        assert_eq!(overrides.margin, Some(12));
        assert_eq!(overrides.layer.as_deref(), Some("overlay"));

        assert_eq!(parse(&[]).layout_overrides().layer, None);
    }

    #[test]
    fn test_activation_flags() {
        let cli = parse(&["--activate", "2", "--terminal", "--hold"]);
        assert_eq!(cli.activate, Some(2));
        assert_eq!(
            cli.activate_flags(),
            ActivateFlags {
                force_terminal: true,
                hold_open: true
            }
        );
    }

    #[test]
    fn test_window_flags() {
        let cli = parse(&["-s", "window", "--window-action", "maximize", "--target", "1"]);
        assert_eq!(cli.window_command(), Some((1, WindowAction::Maximize)));

        let cli = parse(&["-s", "window", "--move-to-monitor", "0", "--activate", "2"]);
        assert_eq!(cli.move_to_monitor, Some(0));
        assert_eq!(cli.activate, Some(2));
        assert_eq!(cli.window_command(), None);

        let parse_err = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("awelaunch").chain(args.iter().copied())).is_err()
        };
        assert!(parse_err(&["--window-action", "close"]));
        assert!(parse_err(&["--window-action", "shake", "--target", "0"]));
        assert!(parse_err(&["--window-action", "close", "--target", "0", "--activate", "1"]));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
