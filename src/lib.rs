//! Dockspace - dockable tab layouts
//!
//! This crate provides the layout model, the docking tree and the tab
//! managers behind a dockable tab UI: tabs spawned on demand by type, stacks
//! of tabs split across windows, and layouts persisted as JSON and restored
//! later.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod docking;
pub mod geometry;
pub mod global;
pub mod layout;
pub mod layout_store;
pub mod panels;
pub mod search;
pub mod spawner;
pub mod tab;
pub mod tab_manager;
pub mod tab_ops;
pub mod tracing;
pub mod window;
pub mod workspace;

// Re-export commonly used types
pub use config::DockConfig;
pub use docking::{DockTree, NodeId, RelativeDirection};
pub use geometry::{Rect, Vec2};
pub use global::{GlobalTabManager, UsageStats};
pub use layout::{Area, Layout, LayoutError, LayoutNode, Orientation, Splitter, Stack, TabId, TabState};
pub use layout_store::LayoutStore;
pub use search::{LastMajorOrNomadTab, LiveTabSearch, RequireClosedTab, SearchPreference};
pub use spawner::{SpawnTabArgs, TabSpawnerEntry, TabSpawnerMenuType};
pub use tab::{DockTab, TabHandle, TabRole};
pub use tab_manager::ManagerId;
pub use tab_ops::CloseTabError;
pub use window::{HeadlessWindows, WindowId, WindowProvider};
pub use workspace::{MenuElement, WorkspaceItem};
