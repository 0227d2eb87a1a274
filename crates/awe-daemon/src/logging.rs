//! Logging setup shared by the launcher binaries.
//!
//! Release builds log to stderr only. Debug builds additionally write a
//! plain-text log to `$TMPDIR/awelauncher-<binary>.log`, recreated on every
//! start.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter; `RUST_LOG` takes precedence.
#[must_use]
pub fn filter_directive(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("awe={level}")
}

#[must_use]
pub fn log_path(binary: &str) -> PathBuf {
    std::env::temp_dir().join(log_file_name(binary))
}

fn log_file_name(binary: &str) -> String {
    format!("awelauncher-{binary}.log")
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the file writer.
pub fn init(debug: bool, binary: &str) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(debug)));

    fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
    }

    if cfg!(debug_assertions) {
        let path = log_path(binary);
        let header = format!(
            "=== {binary} started {} ===\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        match std::fs::write(&path, header) {
            Ok(()) => {
                let appender =
                    tracing_appender::rolling::never(std::env::temp_dir(), log_file_name(binary));
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file_layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true);

                let _ = tracing_subscriber::registry()
                    .with(file_layer)
                    .with(stderr_layer())
                    .with(filter)
                    .try_init();

                eprintln!("Logging to: {} (and stderr)", path.display());
                return Some(guard);
            }
            Err(e) => eprintln!("Cannot write {}: {e}, logging to stderr only", path.display()),
        }
    }

    let _ = tracing_subscriber::registry()
        .with(stderr_layer())
        .with(filter)
        .try_init();
    None
}
