//! `taskdeck` command line: manage a local task list.
//!
//! Runs one command against the task list stored in the data directory.
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! cargo run --bin taskdeck -- add "Buy milk" -p low
//! cargo run --bin taskdeck -- list --filter active --sort-by priority --order asc
//! cargo run --bin taskdeck -- toggle 0192f3
//! cargo run --bin taskdeck -- mv 0 2
//!
//! # Or point at another data directory
//! TASKDECK_DATA_DIR=/tmp/tasks cargo run --bin taskdeck
//! ```

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::commands;
use taskdeck::config::{AppConfig, CliArgs};
use taskdeck::persist::{FileSlot, SNAPSHOT_KEY, SnapshotAdapter};
use taskdeck::tasks::TaskStore;

fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(&config.log_level, config.log_file.as_deref());

    let slot = FileSlot::new(&config.data_dir, SNAPSHOT_KEY);
    tracing::debug!(path = %slot.path().display(), "using task snapshot");
    let mut store = TaskStore::open(SnapshotAdapter::new(slot)).with_view(config.view);

    let command = cli.command.unwrap_or_default();
    let mut code = ExitCode::SUCCESS;

    match commands::execute(&mut store, command) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            code = ExitCode::FAILURE;
        }
    }

    for warning in store.take_warnings() {
        eprintln!("warning: {warning}");
        code = ExitCode::FAILURE;
    }

    code
}

/// Initialize logging.
///
/// Logs go to `file_path` through a non-blocking writer when given,
/// otherwise to stderr so stdout stays clean for command output. A path
/// without a usable file name falls back to stderr. Returns the
/// [`WorkerGuard`] that must be held until exit to flush file logs.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some((log_dir, file_name)) = file_path.and_then(split_log_path) else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .init();
        if let Some(path) = file_path {
            tracing::warn!(path = %path.display(), "log file path has no file name, logging to stderr");
        }
        return None;
    };

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Splits a log file path into its directory and UTF-8 file name.
fn split_log_path(path: &Path) -> Option<(&Path, &str)> {
    let file_name = path.file_name()?.to_str()?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Some((dir, file_name))
}
