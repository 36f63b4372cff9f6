//! Per-run log file.
//!
//! Each process start creates `<project root>/logs/<MM_DD_YYYY_HH_MM_SS>.log`
//! and routes every `tracing` event into it. Files are append-only and never
//! rotated or deleted.

use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::error::{ErrorKind, PipelineError, ResultExt};

pub const LOG_DIR: &str = "logs";
const DEFAULT_FILTER: &str = "debug";

/// Walk up from `start` to the first directory holding `Cargo.toml` or `.git`.
///
/// Falls back to `start` itself.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join("Cargo.toml").is_file() || dir.join(".git").exists())
        .unwrap_or(start)
        .to_path_buf()
}

pub fn log_file_name(started_at: DateTime<Local>) -> String {
    format!("{}.log", started_at.format("%m_%d_%Y_%H_%M_%S"))
}

/// Create the run's log file under `root` and install the global subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise everything at `debug`
/// and above is recorded. Returns the log file path.
pub fn init(root: &Path) -> Result<PathBuf, PipelineError> {
    let dir = root.join(LOG_DIR);
    create_dir_all(&dir).context(format!("Failed to create log dir '{}'", dir.display()))?;

    let path = dir.join(log_file_name(Local::now()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .context(format!("Failed to open log file '{}'", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| PipelineError::new(ErrorKind::Configuration, format!("Failed to install logger: {e}")))?;

    Ok(path)
}
