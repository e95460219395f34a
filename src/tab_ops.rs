//! Tab operations - closing tabs and moving them between stacks and windows

use thiserror::Error;

use crate::docking::{DockAreaInfo, NodeId, RelativeDirection};
use crate::geometry::Vec2;
use crate::global::GlobalTabManager;
use crate::layout::{Orientation, WindowPlacement};
use crate::tab::TabHandle;
use crate::tab_manager::TabRemoval;
use crate::tracing::DockSnapshot;
use crate::window::WindowDesc;

/// Why a tab was not closed; nothing was changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CloseTabError {
    #[error("no live tab with handle {0:?}")]
    UnknownTab(TabHandle),

    #[error("the main tab of a tab manager cannot be closed")]
    MainTab,

    #[error("the tab refused to close")]
    Vetoed,
}

impl GlobalTabManager {
    /// Close a live tab
    ///
    /// Tabs that persist in layouts leave a closed entry behind in their
    /// stack, so a later `invoke_tab` brings them back to the same place.
    /// An area left without live tabs is closed, and an area that owns its
    /// window takes the window with it.
    pub fn close_tab(&mut self, handle: TabHandle) -> Result<(), CloseTabError> {
        let tab = self.tabs.get(handle).ok_or(CloseTabError::UnknownTab(handle))?;
        if !self.is_tab_closeable(handle) {
            return Err(CloseTabError::MainTab);
        }
        if !tab.can_close_tab() {
            return Err(CloseTabError::Vetoed);
        }

        let before = DockSnapshot::from_manager(self);
        let keep_history = tab.layout_id().should_save_layout();
        let stack = tab.parent_stack;
        let area = stack.and_then(|stack| self.tree.area_of(stack));

        self.on_tab_closing(handle);
        self.detach_from_stack(handle, keep_history);
        self.tabs.remove(handle);
        if self.active_tab == Some(handle) {
            self.set_active_tab(None);
        }

        if let Some(area) = area.filter(|area| self.tree.contains(*area)) {
            self.clean_up_area(area, TabRemoval::Closed);
        }
        self.update_stats();

        before.log_diff("close_tab", &DockSnapshot::from_manager(self));
        Ok(())
    }

    /// Take a live tab out of its stack, foregrounding a neighbour
    fn detach_from_stack(&mut self, handle: TabHandle, keep_history: bool) {
        let Some(stack) = self.tabs.get_mut(handle).and_then(|tab| tab.parent_stack.take()) else {
            return;
        };
        let new_foreground = self
            .tree
            .stack_mut(stack)
            .and_then(|node| node.detach_tab(handle, keep_history));
        if let Some(new_foreground) = new_foreground {
            self.notify_tab_foregrounded(Some(new_foreground), None);
        }
    }

    /// Tear `handle` out into a floating window of its own
    ///
    /// Returns the new area, or `None` if the tab may not leave its tab well.
    pub fn move_tab_to_new_window(
        &mut self,
        handle: TabHandle,
        position: Vec2,
        size: Vec2,
    ) -> Option<NodeId> {
        if !self.can_tab_leave_tab_well(handle) {
            tracing::debug!(?handle, "tab cannot leave its tab well");
            return None;
        }
        let tab = self.tabs.get(handle)?;
        let manager = tab.manager?;
        let title = if tab.role().titles_window() {
            tab.label().to_string()
        } else {
            self.app_title.clone()
        };
        let source_area = tab.parent_stack.and_then(|stack| self.tree.area_of(stack));

        self.detach_from_stack(handle, false);

        let parent = self.parent_window(manager);
        let window = self
            .windows
            .create_window(WindowDesc::at(title, position, size, false), parent);
        let info = DockAreaInfo {
            manager,
            window: Some(window),
            owns_window: true,
            placement: WindowPlacement::Specified {
                position,
                size,
                maximized: false,
            },
            embed_title_area: false,
        };
        let area = self.tree.new_splitter(Orientation::Horizontal, 1.0, Some(info));
        let stack = self.tree.new_stack(1.0, false);
        self.tree.add_child(area, stack);
        if let Some(m) = self.managers.get_mut(&manager) {
            m.dock_areas.push(area);
        }

        self.open_tab_in_stack(stack, handle, None);
        if let Some(source) = source_area.filter(|source| self.tree.contains(*source)) {
            self.clean_up_area(source, TabRemoval::DraggedOut);
        }
        self.on_tab_relocated(handle, Some(window));
        Some(area)
    }

    /// Dock `handle` into a new stack placed beside `target_stack`
    ///
    /// Both must belong to the same manager. Returns the new stack.
    pub fn dock_tab_beside(
        &mut self,
        handle: TabHandle,
        target_stack: NodeId,
        direction: RelativeDirection,
    ) -> Option<NodeId> {
        let (source_area, splitter) = self.prepare_move(handle, target_stack)?;

        let coefficient = self.tree.size_coefficient(target_stack);
        let stack = self.tree.new_stack(coefficient, false);
        if !self.tree.place_node(splitter, stack, direction, target_stack) {
            tracing::error!(?target_stack, "target stack is not a child of its parent splitter");
            self.tree.destroy_subtree(stack);
            return None;
        }

        self.detach_from_stack(handle, false);
        self.open_tab_in_stack(stack, handle, None);
        self.finish_move(handle, source_area, stack);
        Some(stack)
    }

    /// Move `handle` into an existing stack at `index` (end if `None`)
    pub fn move_tab_to_stack(
        &mut self,
        handle: TabHandle,
        target_stack: NodeId,
        index: Option<usize>,
    ) -> bool {
        if self.prepare_move(handle, target_stack).is_none() {
            return false;
        }
        let source_area = self
            .tabs
            .get(handle)
            .and_then(|tab| tab.parent_stack)
            .and_then(|stack| self.tree.area_of(stack));

        self.detach_from_stack(handle, false);
        self.open_tab_in_stack(target_stack, handle, index);
        self.finish_move(handle, source_area, target_stack);
        true
    }

    /// Check a tab may move next to or into `target_stack`; returns the tab's
    /// source area and the target's parent splitter
    fn prepare_move(&self, handle: TabHandle, target_stack: NodeId) -> Option<(Option<NodeId>, NodeId)> {
        if !self.can_tab_leave_tab_well(handle) {
            return None;
        }
        let tab = self.tabs.get(handle)?;
        self.tree.stack(target_stack)?;

        let target_manager = self
            .tree
            .area_of(target_stack)
            .and_then(|area| self.tree.area_info(area))
            .map(|info| info.manager);
        if target_manager != tab.manager {
            tracing::warn!(?handle, ?target_stack, "tabs cannot move between tab managers");
            return None;
        }

        let source_area = tab.parent_stack.and_then(|stack| self.tree.area_of(stack));
        let splitter = self.tree.parent(target_stack)?;
        Some((source_area, splitter))
    }

    fn finish_move(&mut self, handle: TabHandle, source_area: Option<NodeId>, stack: NodeId) {
        if let Some(source) = source_area.filter(|source| self.tree.contains(*source)) {
            self.clean_up_area(source, TabRemoval::DraggedOut);
        }
        let window = self.window_of_node(stack);
        self.on_tab_relocated(handle, window);
    }
}
