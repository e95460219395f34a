//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging dock
//! area, tab placement and window bookkeeping.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=dockspace::tab_manager=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/dockspace/logs/dockspace.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::global::GlobalTabManager;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG env var for filtering.
/// File logging writes to `~/.config/dockspace/logs/dockspace.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of docking state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockSnapshot {
    pub live_areas: usize,
    pub collapsed_areas: usize,
    pub live_tabs: usize,
    pub windows: usize,
}

impl DockSnapshot {
    pub fn from_manager(global: &GlobalTabManager) -> Self {
        let mut live_areas = 0;
        let mut collapsed_areas = 0;
        for m in global.managers.values() {
            live_areas += m.dock_areas().len();
            collapsed_areas += m.collapsed_areas().len();
        }

        Self {
            live_areas,
            collapsed_areas,
            live_tabs: global.tab_count(),
            windows: global.windows().live_windows().len(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &DockSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        let fields = [
            ("areas", self.live_areas, other.live_areas),
            ("collapsed", self.collapsed_areas, other.collapsed_areas),
            ("tabs", self.live_tabs, other.live_tabs),
            ("windows", self.windows, other.windows),
        ];
        for (name, before, after) in fields {
            if before != after {
                changes.push(format!("{}: {} → {}", name, before, after));
            }
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }

    /// Log the difference to `after` at debug level, tagged with `operation`
    pub fn log_diff(&self, operation: &str, after: &DockSnapshot) {
        if let Some(diff) = self.diff(after) {
            tracing::debug!(operation, "{}", diff);
        }
    }
}
