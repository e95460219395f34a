//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use dockspace::config::DockConfig;
use dockspace::geometry::Vec2;
use dockspace::global::GlobalTabManager;
use dockspace::layout::{Area, Layout, Orientation, Stack, TabState};
use dockspace::tab::{DockTab, TabHandle};
use dockspace::tab_manager::ManagerId;
use dockspace::window::{HeadlessWindows, WindowId};

pub const ROOT_SIZE: Vec2 = Vec2::new(1600.0, 900.0);

/// Global manager over headless windows, with a root window
pub fn headless() -> (GlobalTabManager, WindowId) {
    let mut global = GlobalTabManager::new(HeadlessWindows::new(), DockConfig::default());
    let root = global.create_root_window(ROOT_SIZE);
    (global, root)
}

/// Register `tab_type` on `manager`; the returned counter counts spawns
pub fn register_counting(
    global: &mut GlobalTabManager,
    manager: ManagerId,
    tab_type: &str,
) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    let label = tab_type.to_string();
    global.register_tab_spawner(manager, tab_type, move |_| {
        counter.set(counter.get() + 1);
        DockTab::new(label.clone())
    });
    count
}

/// Register plain panels for every type in `tab_types`
pub fn register_panels(global: &mut GlobalTabManager, manager: ManagerId, tab_types: &[&str]) {
    for tab_type in tab_types {
        register_counting(global, manager, tab_type);
    }
}

/// Primary area: `Outliner` on the left, `Details` (plus a closed `Log`)
/// on the right
pub fn main_layout() -> Layout {
    Layout::new("Main").add_area(
        Area::primary()
            .with_orientation(Orientation::Horizontal)
            .split(Stack::new().add_tab("Outliner", TabState::Opened))
            .split(
                Stack::new()
                    .add_tab("Details", TabState::Opened)
                    .add_tab("Log", TabState::Closed),
            ),
    )
}

/// Floating area holding a single tab
pub fn floating_area(tab_type: &str, state: TabState) -> Area {
    Area::new(Vec2::new(400.0, 300.0)).split(Stack::new().add_tab(tab_type, state))
}

pub fn live_tab_types(global: &GlobalTabManager, manager: ManagerId) -> Vec<String> {
    global
        .live_tabs(manager)
        .into_iter()
        .filter_map(|handle| global.tab(handle))
        .map(|tab| tab.layout_id().to_string())
        .collect()
}

pub fn window_of(global: &GlobalTabManager, handle: TabHandle) -> Option<WindowId> {
    global.window_of_tab(handle)
}
