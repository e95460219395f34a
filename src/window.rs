//! Native window capability consumed by the tab managers
//!
//! Dock areas that need their own OS window create it through
//! [`WindowProvider`]. The crate never talks to a windowing backend directly;
//! applications implement the trait over winit, Win32 or whatever they use.
//! [`HeadlessWindows`] is an in-memory implementation for tests and tools.

use std::collections::BTreeMap;

use crate::geometry::{Rect, Vec2};

/// Handle to a window owned by a [`WindowProvider`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

/// Where a new window should appear
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowPosition {
    /// Centred on the desktop work area
    AutoCenter,
    At(Vec2),
}

/// Parameters for creating a window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDesc {
    pub title: String,
    pub client_size: Vec2,
    pub position: WindowPosition,
    pub maximized: bool,
}

impl WindowDesc {
    pub fn auto_centered(title: impl Into<String>, client_size: Vec2) -> Self {
        Self {
            title: title.into(),
            client_size,
            position: WindowPosition::AutoCenter,
            maximized: false,
        }
    }

    pub fn at(title: impl Into<String>, position: Vec2, client_size: Vec2, maximized: bool) -> Self {
        Self {
            title: title.into(),
            client_size,
            position: WindowPosition::At(position),
            maximized,
        }
    }
}

/// Window operations the docking system needs
///
/// Destroying a window destroys its child windows first.
pub trait WindowProvider {
    fn create_window(&mut self, desc: WindowDesc, parent: Option<WindowId>) -> WindowId;

    /// Destroy `window` and its descendants; returns every destroyed id,
    /// children before parents
    fn destroy_window(&mut self, window: WindowId) -> Vec<WindowId>;

    fn resize(&mut self, window: WindowId, size: Vec2);
    fn set_title(&mut self, window: WindowId, title: &str);
    fn show(&mut self, window: WindowId);
    fn hide(&mut self, window: WindowId);
    fn bring_to_front(&mut self, window: WindowId);

    fn is_alive(&self, window: WindowId) -> bool;
    fn screen_rect(&self, window: WindowId) -> Option<Rect>;
    fn is_maximized(&self, window: WindowId) -> bool;
    fn is_active(&self, window: WindowId) -> bool;
    fn is_visible(&self, window: WindowId) -> bool;
    fn title(&self, window: WindowId) -> Option<String>;
    fn parent(&self, window: WindowId) -> Option<WindowId>;
    fn children(&self, window: WindowId) -> Vec<WindowId>;
    fn live_windows(&self) -> Vec<WindowId>;

    /// True if any ancestor of `window` is the active window
    fn has_active_parent(&self, window: WindowId) -> bool {
        let mut current = self.parent(window);
        while let Some(parent) = current {
            if self.is_active(parent) {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }
}

// ============================================================================
// Headless implementation
// ============================================================================

/// Default desktop work area used for auto-centred windows
pub const DEFAULT_WORK_AREA: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 1920.0,
    height: 1080.0,
};

#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    pub title: String,
    pub rect: Rect,
    pub maximized: bool,
    pub visible: bool,
    pub parent: Option<WindowId>,
    /// Incremented every time the window is raised
    pub raise_count: u32,
}

/// In-memory windows with no backing OS resources
#[derive(Debug, Clone)]
pub struct HeadlessWindows {
    windows: BTreeMap<WindowId, HeadlessWindow>,
    next_window_id: u64,
    active: Option<WindowId>,
    work_area: Rect,
}

impl Default for HeadlessWindows {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessWindows {
    pub fn new() -> Self {
        Self::with_work_area(DEFAULT_WORK_AREA)
    }

    pub fn with_work_area(work_area: Rect) -> Self {
        Self {
            windows: BTreeMap::new(),
            next_window_id: 1,
            active: None,
            work_area,
        }
    }

    pub fn window(&self, window: WindowId) -> Option<&HeadlessWindow> {
        self.windows.get(&window)
    }

    /// Simulate the user focusing a window
    pub fn set_active(&mut self, window: Option<WindowId>) {
        self.active = window.filter(|w| self.windows.contains_key(w));
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl WindowProvider for HeadlessWindows {
    fn create_window(&mut self, desc: WindowDesc, parent: Option<WindowId>) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;

        let rect = match desc.position {
            WindowPosition::AutoCenter => self.work_area.centered(desc.client_size),
            WindowPosition::At(position) => Rect::from_position_size(position, desc.client_size),
        };

        tracing::debug!(?id, ?parent, title = %desc.title, ?rect, "headless window created");

        self.windows.insert(
            id,
            HeadlessWindow {
                title: desc.title,
                rect,
                maximized: desc.maximized,
                visible: true,
                parent: parent.filter(|p| self.windows.contains_key(p)),
                raise_count: 0,
            },
        );
        id
    }

    fn destroy_window(&mut self, window: WindowId) -> Vec<WindowId> {
        let mut destroyed = Vec::new();
        for child in self.children(window) {
            destroyed.extend(self.destroy_window(child));
        }
        if self.windows.remove(&window).is_some() {
            destroyed.push(window);
            if self.active == Some(window) {
                self.active = None;
            }
        }
        destroyed
    }

    fn resize(&mut self, window: WindowId, size: Vec2) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.rect.width = size.x;
            w.rect.height = size.y;
        }
    }

    fn set_title(&mut self, window: WindowId, title: &str) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.title = title.to_string();
        }
    }

    fn show(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.visible = true;
        }
    }

    fn hide(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.visible = false;
        }
    }

    fn bring_to_front(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.visible = true;
            w.raise_count += 1;
            self.active = Some(window);
        }
    }

    fn is_alive(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    fn screen_rect(&self, window: WindowId) -> Option<Rect> {
        self.windows.get(&window).map(|w| w.rect)
    }

    fn is_maximized(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.maximized)
    }

    fn is_active(&self, window: WindowId) -> bool {
        self.active == Some(window)
    }

    fn is_visible(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.visible)
    }

    fn title(&self, window: WindowId) -> Option<String> {
        self.windows.get(&window).map(|w| w.title.clone())
    }

    fn parent(&self, window: WindowId) -> Option<WindowId> {
        self.windows.get(&window).and_then(|w| w.parent)
    }

    fn children(&self, window: WindowId) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|(_, w)| w.parent == Some(window))
            .map(|(id, _)| *id)
            .collect()
    }

    fn live_windows(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }
}
