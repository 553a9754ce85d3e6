//! File watcher: runs `check` on startup, then re-runs on document changes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};
use quickref::config::{self, Config};
use quickref::error::Error;

use crate::commands;

/// Debounce delay between filesystem events and re-check.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that sends the affected paths on `tx`
/// whenever anything is created, modified, or removed.
///
/// # Errors
///
/// Returns `Error::WatchFailed` if the watcher cannot be created.
fn create_watcher(tx: crossbeam_channel::Sender<Vec<PathBuf>>) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(event.paths);
        }
    })
    .map_err(|e| {
        return Error::WatchFailed {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Whether `path` is the project config file.
fn is_config_file(path: &Path) -> bool {
    return path.file_name().is_some_and(|name| return name == config::CONFIG_FILE);
}

/// Whether a changed path should trigger a re-check.
fn is_relevant(path: &Path, config: &Config) -> bool {
    return is_config_file(path) || config.is_document(path);
}

/// Entry point for the watch command.
///
/// Runs an initial check, then watches the project tree and re-checks on
/// changes. The config is reloaded whenever the config file changes, so a
/// new `extensions` list takes effect without a restart.
///
/// # Errors
///
/// Returns errors from config loading or watcher setup.
pub fn run() -> Result<ExitCode, Error> {
    let root = PathBuf::from(".");

    eprintln!("watch: initial check");
    let mut last_code = run_check();

    let mut config = Config::load(&root)?;
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|e| return Error::WatchFailed { reason: e.to_string() })?;

    eprintln!("watch: monitoring documents under {}, press Ctrl+C to stop", root.display());

    while let Ok(first) = rx.recv() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        let mut changed = first;
        while let Ok(more) = rx.recv_timeout(debounce) {
            changed.extend(more);
        }

        if changed.iter().any(|p| return is_config_file(p)) {
            match Config::load(&root) {
                Ok(reloaded) => config = reloaded,
                Err(e) => tracing::warn!(error = %e, "config reload failed, keeping previous filters"),
            }
        }
        if !changed.iter().any(|p| return is_relevant(p, &config)) {
            continue;
        }

        eprintln!("watch: change detected, re-checking...");
        last_code = run_check();
    }

    return Ok(last_code);
}

/// Run check once and print result. Returns the exit code from check.
fn run_check() -> ExitCode {
    return match commands::check() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(3_u8)
        },
    };
}
