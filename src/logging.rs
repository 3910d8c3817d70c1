// Conditional logging macros - only active in debug builds.
// Errors and warnings go through `log::error!`/`log::warn!` directly so
// they survive release builds.

use env_logger::{Env, Target};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

const LOG_FILE_NAME: &str = "acronym-invaders.log";

/// Default log destination under the platform data directory.
#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(crate::APP_DIR_NAME).join(LOG_FILE_NAME))
}

/// Route `log` output to `path`. The terminal UI owns stdout, so logs never
/// go to the screen. Filter comes from `RUST_LOG`, default `info`.
pub fn init_file_logger(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(io::Error::other)
}
