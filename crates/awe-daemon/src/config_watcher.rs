//! Configuration file watcher for hot-reload support.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::{DaemonError, Result};

const CONFIG_DEBOUNCE_DURATION: Duration = Duration::from_millis(500);

/// Keeps the underlying watcher alive; dropping it stops notifications.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

fn is_config_event(event: &notify::Event, config_file: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == config_file.file_name())
}

/// Watch the directory holding `config_file` and send `()` on `tx` for
/// each debounced change to that file.
///
/// # Errors
///
/// Returns an error if the path has no parent or the watcher cannot start.
pub fn spawn_config_watcher(
    config_file: PathBuf,
    tx: mpsc::UnboundedSender<()>,
) -> Result<ConfigWatcher> {
    let Some(dir) = config_file.parent().map(Path::to_path_buf) else {
        return Err(DaemonError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Invalid config path",
        )));
    };

    let last_event = Mutex::new(None::<Instant>);
    let mut watcher =
        notify::recommended_watcher(move |result: notify::Result<notify::Event>| match result {
            Ok(event) if is_config_event(&event, &config_file) => {
                let Ok(mut last) = last_event.lock() else {
                    error!("Debounce mutex poisoned, skipping event");
                    return;
                };
                let now = Instant::now();
                if last.is_some_and(|at| now.duration_since(at) < CONFIG_DEBOUNCE_DURATION) {
                    return;
                }
                *last = Some(now);
                debug!("Config file changed");
                if tx.send(()).is_err() {
                    debug!("Config reload receiver dropped");
                }
            }
            Ok(_) => {}
            Err(e) => error!("Watcher error: {e}"),
        })?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!("Watching config directory: {}", dir.display());

    Ok(ConfigWatcher { _watcher: watcher })
}
