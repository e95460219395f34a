//! Where dockspace keeps its files on disk
//!
//! ```text
//! <config dir>/dockspace/
//!     config.yaml     DockConfig
//!     layouts/        one JSON file per named layout
//!     logs/           daily rotated `dockspace.log.*`
//! ```
//!
//! `<config dir>` is `$XDG_CONFIG_HOME` or `~/.config` on Unix and macOS,
//! `%APPDATA%` on Windows.

use std::env;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "dockspace";
const LAYOUTS_DIR: &str = "layouts";
const LOGS_DIR: &str = "logs";

/// Base name of the rotating log file
pub const LOG_FILE_PREFIX: &str = "dockspace.log";

pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let base = env::var_os("APPDATA").map(PathBuf::from);

    #[cfg(not(target_os = "windows"))]
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

    base.map(|base| base.join(APP_DIR))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// Default directory of the layout store
pub fn layouts_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(LAYOUTS_DIR))
}

/// Create `<config dir>/dockspace/<name>` if needed
fn ensure_subdir(name: &str) -> Result<PathBuf, String> {
    let dir = config_dir()
        .ok_or_else(|| "No config directory available".to_string())?
        .join(name);
    fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create directory {}: {}", dir.display(), e))?;
    Ok(dir)
}

pub fn ensure_layouts_dir() -> Result<PathBuf, String> {
    ensure_subdir(LAYOUTS_DIR)
}

pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    ensure_subdir(LOGS_DIR)
}

/// Create the layouts directory (and the config directory above it),
/// logging rather than failing
pub fn ensure_all_config_dirs() {
    match ensure_layouts_dir() {
        Ok(layouts) => tracing::info!(layouts = %layouts.display(), "config directories ready"),
        Err(e) => tracing::warn!("Failed to ensure config directories: {}", e),
    }
}
