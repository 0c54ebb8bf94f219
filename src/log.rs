// src/log.rs
//
// File logging: every `tracing` event goes to `<data>/debug.log`, appended,
// stamped with time since start. `verbose` lowers the level to DEBUG.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::fmt;

use crate::error::StoreError;
use crate::file;

pub fn init(path: &Path, verbose: bool) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        file::ensure_directory(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = fmt()
        .with_writer(Mutex::new(log_file))
        .with_timer(fmt::time::uptime())
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .try_init();
    Ok(())
}
