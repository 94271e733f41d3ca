//! File logging
//!
//! The TUI owns the terminal, so log output goes to a file. The filter
//! comes from `SDNATUI_LOG` (same syntax as `RUST_LOG`) and defaults to
//! `info`.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SDNATUI_LOG";

/// `<cache dir>/sdnatui/sdnatui.log`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("sdnatui").join("sdnatui.log"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `path`.
///
/// Keep the returned guard alive until exit; dropping it flushes the writer.
pub fn init_file_logging(path: &Path) -> Result<WorkerGuard> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Log path has no file name: {:?}", path))?;
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create log directory: {:?}", dir))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    tracing::info!("sdnatui v{} logging to {:?}", env!("CARGO_PKG_VERSION"), path);
    Ok(guard)
}
