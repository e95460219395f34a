//! Command-line interface for inspecting and exercising layouts
//!
//! Supports:
//! - Checking a layout file and printing a summary
//! - Normalizing a layout file (collapsing redundant splitters)
//! - Running a headless demo session
//! - Listing stored layouts
//! - Printing or writing the docking config

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DockConfig;
use crate::geometry::Vec2;
use crate::global::GlobalTabManager;
use crate::layout::{Area, Layout, LayoutError, Orientation, Stack, TabId, TabState, WindowPlacement};
use crate::tab::DockTab;
use crate::tab_manager::ManagerId;
use crate::window::HeadlessWindows;

/// Dockable tab layout tool
#[derive(Parser, Debug)]
#[command(name = "dockspace", version, about = "Inspect and exercise dockable tab layouts")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Decode a layout file and print a summary
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Collapse redundant splitters and print the layout as JSON
    Normalize {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Drive a headless session and print the persisted layout
    Demo {
        /// Also save the resulting layout to the layouts directory
        #[arg(long)]
        save: bool,
    },

    /// List stored layouts
    List {
        /// Layouts directory (defaults to the config directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Print the effective docking config as YAML
    Config {
        /// Write it to the config file, creating the file if needed
        #[arg(long)]
        init: bool,
    },
}

/// Human-readable overview of a layout
pub fn layout_summary(layout: &Layout) -> String {
    let mut out = String::new();
    let primary = layout
        .primary_area_index
        .map_or("none".to_string(), |index| index.to_string());
    let _ = writeln!(
        out,
        "Layout {:?}: {} area(s), primary: {}",
        layout.name,
        layout.areas.len(),
        primary
    );

    for (index, area) in layout.areas.iter().enumerate() {
        let placement = match area.placement {
            WindowPlacement::NoWindow => "embedded".to_string(),
            WindowPlacement::Automatic { size } => format!("auto {}x{}", size.x, size.y),
            WindowPlacement::Specified {
                position,
                size,
                maximized,
            } => format!(
                "at {},{} {}x{}{}",
                position.x,
                position.y,
                size.x,
                size.y,
                if maximized { " maximized" } else { "" }
            ),
        };
        let stacks = area.stacks();
        let (open, closed) = stacks
            .iter()
            .flat_map(|stack| stack.tabs.iter())
            .fold((0, 0), |(open, closed), tab| {
                if tab.is_opened() {
                    (open + 1, closed)
                } else {
                    (open, closed + 1)
                }
            });
        let _ = writeln!(
            out,
            "  area {}: {}, {} stack(s), {} open, {} closed",
            index,
            placement,
            stacks.len(),
            open,
            closed
        );
    }
    out
}

/// Decode, collapse and re-encode a layout
pub fn normalize_layout(json: &str) -> Result<String, LayoutError> {
    Layout::from_json(json)?.collapse_splitters().to_json()
}

/// A short headless session: restore a layout, invoke a closed tab, tear it
/// out into its own window and close it again
///
/// The torn-out window is sized from `config`.
pub fn run_demo(config: DockConfig) -> GlobalTabManager {
    let log_window_size = config.default_window_size(&TabId::new("Log"));
    let mut global = GlobalTabManager::new(HeadlessWindows::new(), config);
    let root = global.create_root_window(Vec2::new(1600.0, 900.0));

    for name in ["Log", "Outliner", "Details"] {
        global
            .register_tab_spawner(ManagerId::GLOBAL, name, move |args| {
                DockTab::new(format!("{} content", args.tab_id))
            })
            .set_display_name(name);
    }

    let layout = Layout::new("Demo").add_area(
        Area::primary()
            .with_orientation(Orientation::Horizontal)
            .split(
                Stack::new()
                    .add_tab("Outliner", TabState::Opened)
                    .with_size_coefficient(0.3),
            )
            .split(
                Stack::new()
                    .add_tab("Details", TabState::Opened)
                    .add_tab("Log", TabState::Closed)
                    .with_size_coefficient(0.7),
            ),
    );
    global.restore_from(ManagerId::GLOBAL, layout, Some(root), false);

    let log = global.invoke_tab(ManagerId::GLOBAL, "Log");
    global.move_tab_to_new_window(log, Vec2::new(120.0, 80.0), log_window_size);
    if let Err(e) = global.close_tab(log) {
        tracing::warn!("demo could not close the log tab: {}", e);
    }

    global
}
