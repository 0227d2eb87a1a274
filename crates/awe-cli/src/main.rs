//! awelaunch
//!
//! Single entry point for awelauncher:
//! - A running launcher on the socket turns this invocation into a client
//! - `daemon` becomes the resident launcher
//! - Anything else runs standalone: resolve, rank and print (or activate)

mod args;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use awe_core::config::{Config, Directories};
use awe_core::providers::StdinProvider;
use awe_core::{Candidate, Launcher, Outcome, QueryResults};
use awe_daemon::{DaemonError, ServerOptions, cleanup_stale_socket, logging, server};
use awe_ipc::{
    Action, ActivatePayload, IpcClient, MoveToMonitorPayload, QueryPayload, Request, Response,
    WindowActionPayload,
};
use clap::Parser;
use tracing::{debug, info, warn};

use crate::args::{Cli, Commands};

/// Wait for a step that must finish before the next one is sent. `show`
/// rescans every provider of the set.
const STEP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.debug, "awelaunch");

    let socket = cli.socket.clone().unwrap_or_else(awe_ipc::socket_path);
    let command = cli.resolved_command();

    // dmenu owns stdin, so it never hands off to a running launcher
    if cli.dmenu {
        return run_dmenu(&cli);
    }

    if command == Commands::Daemon {
        return run_daemon(&cli, socket).await;
    }

    match IpcClient::connect(&socket).await {
        Ok(client) => return run_client(client, &cli, &command, &socket).await,
        Err(e) => debug!("No launcher at {}: {e}", socket.display()),
    }

    match cleanup_stale_socket(&socket).await {
        Ok(()) => {}
        Err(DaemonError::AddrInUse(_)) => {
            bail!("Launcher at {} is busy, try again", socket.display())
        }
        Err(e) => warn!("Failed to clean up stale socket: {e}"),
    }

    match command {
        Commands::Show => run_standalone_show(&cli),
        Commands::Query { text, limit } => run_standalone_query(&cli, &text, limit),
        Commands::Hide | Commands::Toggle | Commands::Reload | Commands::Status => {
            println!("No launcher is running");
            Ok(())
        }
        Commands::Daemon => run_daemon(&cli, socket).await,
    }
}

fn load_config() -> (Config, Directories) {
    let dirs = Directories::new();
    let config = Config::load_or_default(&dirs.config_file);
    (config, dirs)
}

fn build_launcher(cli: &Cli, stdin_lines: Option<Vec<String>>) -> Launcher {
    let (config, dirs) = load_config();
    let mut launcher = Launcher::system(config, &dirs, stdin_lines).dmenu(cli.dmenu);
    launcher.set_layout_overrides(cli.layout_overrides());
    launcher.set_prompt_override(cli.prompt.clone());
    launcher
}

async fn run_daemon(cli: &Cli, socket: PathBuf) -> Result<()> {
    let (config, dirs) = load_config();
    if let Err(e) = dirs.ensure_exists() {
        warn!("Cannot create launcher directories: {e}");
    }

    let mut launcher = Launcher::system(config, &dirs, None).resident(true);
    launcher.set_layout_overrides(cli.layout_overrides());
    launcher.set_prompt_override(cli.prompt.clone());
    launcher.load_set(cli.set_request());
    debug!("Effective layout: {:?}", launcher.effective_window());

    info!("Starting resident launcher");
    let options = ServerOptions::new(socket).watch_config(dirs.config_file.clone());
    match server::run(launcher, options).await {
        Err(DaemonError::AddrInUse(path)) => {
            bail!("A launcher is already running on {}", path.display())
        }
        result => result.context("Launcher server failed"),
    }
}

async fn run_client(
    client: IpcClient,
    cli: &Cli,
    command: &Commands,
    socket: &Path,
) -> Result<()> {
    match command {
        Commands::Show => {
            let show = Request::new(Action::Show, cli.show_payload())?;
            let mut steps = follow_up_requests(cli)?;
            let Some(last) = steps.pop() else {
                return client.send(&show).await.context("Show command failed");
            };

            // Follow-up indexes refer to the list the previous step produced
            let reply = client
                .request_with_timeout(&show, STEP_TIMEOUT)
                .await
                .context("Show command failed")?;
            expect_ok(reply)?;
            for step in &steps {
                let reply = IpcClient::connect(socket)
                    .await?
                    .request_with_timeout(step, STEP_TIMEOUT)
                    .await
                    .with_context(|| format!("{} command failed", step.action))?;
                expect_ok(reply)?;
            }
            IpcClient::connect(socket)
                .await?
                .send(&last)
                .await
                .with_context(|| format!("{} command failed", last.action))
        }
        Commands::Hide => send_bare(client, Action::Hide).await,
        Commands::Toggle => send_bare(client, Action::Toggle).await,
        Commands::Reload => send_bare(client, Action::Reload).await,
        Commands::Status => {
            let response = client
                .request(&Request::bare(Action::Status))
                .await
                .context("Status request failed")?;
            print_data(expect_ok(response)?)
        }
        Commands::Query { text, limit } => {
            let query = Request::new(
                Action::Query,
                QueryPayload {
                    text: text.clone(),
                    limit: *limit,
                },
            )?;
            let response = client
                .request(&query)
                .await
                .context("Query request failed")?;
            print_data(expect_ok(response)?)
        }
        Commands::Daemon => bail!("A launcher is already running on {}", socket.display()),
    }
}

/// Requests that follow `show`, in the order they must run.
fn follow_up_requests(cli: &Cli) -> Result<Vec<Request>> {
    let mut steps = Vec::new();
    if let Some(index) = cli.move_to_monitor {
        steps.push(Request::new(
            Action::MoveToMonitor,
            MoveToMonitorPayload { index },
        )?);
    }
    if let Some((index, action)) = cli.window_command() {
        steps.push(Request::new(
            Action::WindowAction,
            WindowActionPayload { index, action },
        )?);
    }
    if let Some(index) = cli.activate {
        let flags = cli.activate_flags();
        steps.push(Request::new(
            Action::Activate,
            ActivatePayload {
                index,
                terminal: flags.force_terminal,
                hold_open: flags.hold_open,
            },
        )?);
    }
    Ok(steps)
}

async fn send_bare(client: IpcClient, action: Action) -> Result<()> {
    client
        .send(&Request::bare(action))
        .await
        .with_context(|| format!("{action} command failed"))
}

fn expect_ok(response: Response) -> Result<serde_json::Value> {
    if !response.is_ok() {
        bail!(
            "Launcher error: {}",
            response.message.unwrap_or_else(|| "unknown".to_string())
        );
    }
    Ok(response.data.unwrap_or(serde_json::Value::Null))
}

fn print_data(data: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

fn run_standalone_query(cli: &Cli, text: &str, limit: usize) -> Result<()> {
    let mut launcher = build_launcher(cli, None);
    launcher.load_set(cli.set_request());
    let results = launcher.peek(text, limit);
    print_data(serde_json::to_value(QueryResults::from_candidates(&results))?)
}

fn run_standalone_show(cli: &Cli) -> Result<()> {
    let mut launcher = build_launcher(cli, None);
    launcher.show(cli.set_request(), cli.query.clone());
    debug!("Effective layout: {:?}", launcher.effective_window());

    if let Some(index) = cli.move_to_monitor
        && launcher.begin_move_to_monitor(index) == Outcome::Ignored
    {
        bail!("Entry {index} is not a window");
    }
    if let Some((index, action)) = cli.window_command() {
        if launcher.window_action(index, action) == Outcome::Ignored {
            bail!("{action:?} did not apply to entry {index}");
        }
        return Ok(());
    }
    if let Some(index) = cli.activate {
        return report_activation(&mut launcher, index, cli);
    }

    let mut out = io::stdout().lock();
    writeln!(out, "{}", launcher.state().prompt)?;
    for (index, candidate) in launcher.displayed().iter().enumerate() {
        writeln!(out, "{}", format_row(index, candidate))?;
    }
    Ok(())
}

fn format_row(index: usize, candidate: &Candidate) -> String {
    if candidate.secondary_text.is_empty() {
        format!("{index}\t{}", candidate.primary_text)
    } else {
        format!(
            "{index}\t{}\t{}",
            candidate.primary_text, candidate.secondary_text
        )
    }
}

fn report_activation(launcher: &mut Launcher, index: usize, cli: &Cli) -> Result<()> {
    match launcher.activate(index, cli.activate_flags()) {
        Outcome::Selected(text) => println!("{text}"),
        Outcome::Ignored => warn!("Nothing activated at index {index}"),
        outcome => debug!("Activation finished: {outcome:?}"),
    }
    Ok(())
}

fn run_dmenu(cli: &Cli) -> Result<()> {
    let lines =
        StdinProvider::read_lines(io::stdin().lock()).context("Failed to read stdin lines")?;
    debug!("Read {} lines from stdin", lines.len());

    let mut launcher = build_launcher(cli, Some(lines));
    launcher.show(cli.set_request(), cli.query.clone());

    if let Some(index) = cli.activate {
        return report_activation(&mut launcher, index, cli);
    }

    let mut out = io::stdout().lock();
    for candidate in launcher.displayed() {
        writeln!(out, "{}", candidate.primary_text)?;
    }
    Ok(())
}
