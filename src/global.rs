//! Global tab manager - the context every tab manager lives in
//!
//! The [`GlobalTabManager`] owns the docking tree, the live tabs, the window
//! backend and every [`TabManager`]. It also carries the cross-manager state:
//! nomad spawners, sub-managers hosted inside major tabs, the active tab,
//! legacy tab type redirects and the optional proxy manager.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::DockConfig;
use crate::docking::{DockAreaInfo, DockTree, NodeId};
use crate::geometry::Vec2;
use crate::layout::TabId;
use crate::spawner::SpawnerRegistry;
use crate::tab::{DockTab, TabHandle, TabRole, TabStore};
use crate::tab_manager::{ManagerId, TabManager, TabRemoval};
use crate::window::{WindowDesc, WindowId, WindowPosition, WindowProvider};

/// Listener for tab changes; arguments are documented where registered
pub type TabChangedFn = Box<dyn Fn(Option<TabHandle>, Option<TabHandle>)>;

/// A tab manager hosted inside a major tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubTabManager {
    pub major_tab: TabHandle,
    pub manager: ManagerId,
}

/// Receives tabs the global manager is asked to place, when it supports them
pub struct ProxyTabManager {
    manager: ManagerId,
    parent_window: Option<WindowId>,
    is_supported: Box<dyn Fn(&TabId) -> bool>,
    on_attention_drawn: Option<Box<dyn Fn(TabHandle)>>,
}

impl ProxyTabManager {
    pub fn manager(&self) -> ManagerId {
        self.manager
    }

    pub fn parent_window(&self) -> Option<WindowId> {
        self.parent_window
    }

    pub fn is_tab_supported(&self, tab_id: &TabId) -> bool {
        (self.is_supported)(tab_id)
    }
}

/// Running maxima of tabs and windows in use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageStats {
    pub max_tabs: usize,
    pub max_windows: usize,
}

pub struct GlobalTabManager {
    pub(crate) windows: Box<dyn WindowProvider>,
    pub(crate) config: DockConfig,
    pub(crate) tree: DockTree,
    pub(crate) tabs: TabStore,
    pub(crate) managers: BTreeMap<ManagerId, TabManager>,
    pub(crate) nomad_spawners: SpawnerRegistry,
    pub(crate) sub_managers: Vec<SubTabManager>,
    pub(crate) legacy_tab_types: HashMap<String, String>,
    pub(crate) root_window: Option<WindowId>,
    pub(crate) app_title: String,
    pub(crate) active_tab: Option<TabHandle>,
    pub(crate) activation_clock: u64,
    pub(crate) proxy: Option<ProxyTabManager>,
    pub(crate) stats: UsageStats,
    next_manager_id: u32,
    active_tab_changed: Vec<TabChangedFn>,
    tab_foregrounded: Vec<TabChangedFn>,
}

impl GlobalTabManager {
    pub fn new(windows: impl WindowProvider + 'static, config: DockConfig) -> Self {
        let mut managers = BTreeMap::new();
        managers.insert(ManagerId::GLOBAL, TabManager::new(ManagerId::GLOBAL, None));

        Self {
            windows: Box::new(windows),
            app_title: config.application_title.clone(),
            config,
            tree: DockTree::new(),
            tabs: TabStore::default(),
            managers,
            nomad_spawners: SpawnerRegistry::new(),
            sub_managers: Vec::new(),
            legacy_tab_types: HashMap::new(),
            root_window: None,
            active_tab: None,
            activation_clock: 0,
            proxy: None,
            stats: UsageStats::default(),
            next_manager_id: 1,
            active_tab_changed: Vec::new(),
            tab_foregrounded: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn windows(&self) -> &dyn WindowProvider {
        self.windows.as_ref()
    }

    pub fn windows_mut(&mut self) -> &mut dyn WindowProvider {
        self.windows.as_mut()
    }

    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    pub fn tree(&self) -> &DockTree {
        &self.tree
    }

    pub fn tab(&self, handle: TabHandle) -> Option<&DockTab> {
        self.tabs.get(handle)
    }

    pub fn tab_mut(&mut self, handle: TabHandle) -> Option<&mut DockTab> {
        self.tabs.get_mut(handle)
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn manager(&self, manager: ManagerId) -> Option<&TabManager> {
        self.managers.get(&manager)
    }

    pub fn active_tab(&self) -> Option<TabHandle> {
        self.active_tab
    }

    pub fn nomad_spawners(&self) -> &SpawnerRegistry {
        &self.nomad_spawners
    }

    pub fn sub_managers(&self) -> &[SubTabManager] {
        &self.sub_managers
    }

    pub fn stats(&self) -> UsageStats {
        self.stats
    }

    pub fn proxy(&self) -> Option<&ProxyTabManager> {
        self.proxy.as_ref()
    }

    pub fn root_window(&self) -> Option<WindowId> {
        self.root_window
    }

    /// The application's main window; hosts the global primary area
    pub fn set_root_window(&mut self, window: WindowId) {
        self.root_window = Some(window);
    }

    /// Create the application's main window and make it the root window
    pub fn create_root_window(&mut self, size: Vec2) -> WindowId {
        let window = self.windows.create_window(
            WindowDesc {
                title: self.app_title.clone(),
                client_size: size,
                position: WindowPosition::AutoCenter,
                maximized: false,
            },
            None,
        );
        self.root_window = Some(window);
        window
    }

    pub fn application_title(&self) -> &str {
        &self.app_title
    }

    /// Retitle the global areas hosted in the root window
    pub fn set_application_title(&mut self, title: impl Into<String>) {
        self.app_title = title.into();
        let Some(root) = self.root_window else {
            return;
        };
        let hosts_root = self
            .areas_of(ManagerId::GLOBAL)
            .into_iter()
            .any(|(_, info)| info.window == Some(root));
        if hosts_root {
            self.windows.set_title(root, &self.app_title);
        }
    }

    pub fn set_default_tab_window_size(&mut self, tab_type: &str, size: Vec2) {
        self.config
            .default_tab_window_sizes
            .insert(tab_type.to_string(), size);
    }

    fn areas_of(&self, manager: ManagerId) -> Vec<(NodeId, DockAreaInfo)> {
        self.managers
            .get(&manager)
            .map(|m| {
                m.dock_areas
                    .iter()
                    .filter_map(|area| self.tree.area_info(*area).map(|info| (*area, info.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Windows created by (and owned by) areas of `manager`
    fn owned_area_windows(&self, manager: ManagerId) -> Vec<WindowId> {
        self.areas_of(manager)
            .into_iter()
            .filter(|(_, info)| info.owns_window)
            .filter_map(|(_, info)| info.window)
            .collect()
    }

    // ========================================================================
    // Sub-managers
    // ========================================================================

    /// Create a tab manager hosted inside `owner_tab` (a major tab)
    pub fn new_tab_manager(&mut self, owner_tab: TabHandle) -> ManagerId {
        let dead: Vec<SubTabManager> = self
            .sub_managers
            .iter()
            .filter(|sub| !self.tabs.contains(sub.major_tab))
            .copied()
            .collect();
        for sub in dead {
            tracing::debug!(manager = ?sub.manager, "pruning sub-manager of a closed major tab");
            self.sub_managers.retain(|s| s.manager != sub.manager);
            self.managers.remove(&sub.manager);
        }

        let id = ManagerId(self.next_manager_id);
        self.next_manager_id += 1;
        self.managers.insert(id, TabManager::new(id, Some(owner_tab)));
        self.sub_managers.push(SubTabManager {
            major_tab: owner_tab,
            manager: id,
        });
        tracing::debug!(?id, ?owner_tab, "created tab manager");
        id
    }

    pub fn sub_manager_for_major_tab(&self, major_tab: TabHandle) -> Option<ManagerId> {
        self.sub_managers
            .iter()
            .find(|sub| sub.major_tab == major_tab)
            .map(|sub| sub.manager)
    }

    pub fn major_tab_for_tab_manager(&self, manager: ManagerId) -> Option<TabHandle> {
        self.sub_managers
            .iter()
            .find(|sub| sub.manager == manager)
            .map(|sub| sub.major_tab)
    }

    // ========================================================================
    // Activation
    // ========================================================================

    /// Listener called with `(previous, new)` whenever the active tab changes
    pub fn on_active_tab_changed(&mut self, listener: impl Fn(Option<TabHandle>, Option<TabHandle>) + 'static) {
        self.active_tab_changed.push(Box::new(listener));
    }

    /// Listener called with `(foregrounded, backgrounded)` whenever a stack
    /// switches its foreground tab
    pub fn on_tab_foregrounded(&mut self, listener: impl Fn(Option<TabHandle>, Option<TabHandle>) + 'static) {
        self.tab_foregrounded.push(Box::new(listener));
    }

    /// Make `tab` the active tab; major tabs never become active
    pub fn set_active_tab(&mut self, tab: Option<TabHandle>) {
        if let Some(handle) = tab {
            if self.tabs.get(handle).is_some_and(|t| t.role() == TabRole::MajorTab) {
                return;
            }
        }
        if self.active_tab == tab {
            return;
        }

        if let Some(handle) = tab {
            self.stamp_activation(handle);
        }
        let previous = std::mem::replace(&mut self.active_tab, tab);
        for listener in &self.active_tab_changed {
            listener(previous, tab);
        }
    }

    fn stamp_activation(&mut self, handle: TabHandle) {
        self.activation_clock += 1;
        let clock = self.activation_clock;
        if let Some(tab) = self.tabs.get_mut(handle) {
            tab.activation_time = clock;
        }
    }

    /// Bring `handle` to the front of its stack
    pub(crate) fn activate_in_parent(&mut self, handle: TabHandle) {
        let Some(stack) = self.tabs.get(handle).and_then(|tab| tab.parent_stack) else {
            return;
        };
        self.stamp_activation(handle);

        let previous = self
            .tree
            .stack_mut(stack)
            .and_then(|stack| stack.set_foreground(handle));
        if previous != Some(handle) {
            self.notify_tab_foregrounded(Some(handle), previous);
        }
    }

    /// Show the windows of the foregrounded tab's sub-manager and hide those
    /// of the backgrounded one
    pub(crate) fn notify_tab_foregrounded(&mut self, new: Option<TabHandle>, old: Option<TabHandle>) {
        if let Some(manager) = new.and_then(|tab| self.sub_manager_for_major_tab(tab)) {
            for window in self.owned_area_windows(manager) {
                self.windows.show(window);
            }
        }
        if let Some(manager) = old.and_then(|tab| self.sub_manager_for_major_tab(tab)) {
            for window in self.owned_area_windows(manager) {
                self.windows.hide(window);
            }
        }

        for listener in &self.tab_foregrounded {
            listener(new, old);
        }
    }

    /// Foreground `handle` in its stack and make it the active tab
    pub fn activate_tab(&mut self, handle: TabHandle) {
        self.activate_in_parent(handle);
        self.set_active_tab(Some(handle));

        let title = self
            .tabs
            .get(handle)
            .filter(|tab| tab.role().titles_window())
            .map(|tab| tab.label().to_string());
        if let (Some(title), Some(window)) = (title, self.window_of_tab(handle)) {
            if Some(window) != self.root_window {
                self.windows.set_title(window, &title);
            }
        }
    }

    /// Foreground `handle` and flash it, raising its window if the user is
    /// already looking at it
    pub fn draw_attention(&mut self, handle: TabHandle) {
        let Some(manager) = self.tabs.get(handle).map(|tab| tab.manager) else {
            return;
        };
        if let Some(manager) = manager.filter(|m| !m.is_global()) {
            self.draw_attention_to_tab_manager(manager);
        }

        if let Some(window) = self.window_of_tab(handle) {
            if self.windows.is_active(window) || self.windows.has_active_parent(window) {
                self.windows.bring_to_front(window);
            }
        }

        self.activate_in_parent(handle);
        if let Some(tab) = self.tabs.get_mut(handle) {
            tab.attention_count += 1;
        }
    }

    /// Draw attention to the major tab hosting `manager`
    pub fn draw_attention_to_tab_manager(&mut self, manager: ManagerId) {
        let Some(major) = self.major_tab_for_tab_manager(manager) else {
            return;
        };
        self.draw_attention(major);

        let major_id = self.tabs.get(major).map(|tab| tab.layout_id().clone());
        if let (Some(proxy), Some(major_id)) = (&self.proxy, major_id) {
            if proxy.is_tab_supported(&major_id) {
                if let Some(notify) = &proxy.on_attention_drawn {
                    notify(major);
                }
            }
        }
    }

    /// Raise the window hosting `handle` unconditionally
    pub fn bring_to_front(&mut self, handle: TabHandle) {
        if let Some(window) = self.window_of_tab(handle) {
            self.windows.bring_to_front(window);
        }
        self.activate_in_parent(handle);
    }

    // ========================================================================
    // Relocation
    // ========================================================================

    /// Bookkeeping after a tab moved to another stack or window
    ///
    /// Floating windows of the tab's sub-manager follow a major tab into its
    /// new window. History for the tab is dropped from collapsed areas and
    /// from every other stack.
    pub(crate) fn on_tab_relocated(&mut self, handle: TabHandle, new_window: Option<WindowId>) {
        let Some(tab) = self.tabs.get(handle) else {
            return;
        };
        let role = tab.role();
        let tab_id = tab.layout_id().clone();
        let manager = tab.manager.unwrap_or(ManagerId::GLOBAL);
        let own_stack = tab.parent_stack;

        if matches!(role, TabRole::MajorTab | TabRole::NomadTab) {
            if let Some(m) = self.managers.get_mut(&manager) {
                m.last_major_dock_window = new_window;
            }
        }

        if let (Some(new_window), Some(sub)) = (new_window, self.sub_manager_for_major_tab(handle)) {
            self.reparent_sub_manager_windows(sub, new_window);
        }

        self.remove_tab_from_collapsed_areas(manager, &tab_id);

        let stacks: Vec<NodeId> = self
            .managers
            .get(&manager)
            .map(|m| m.dock_areas.clone())
            .unwrap_or_default()
            .into_iter()
            .flat_map(|area| self.tree.stacks_under(area))
            .filter(|stack| Some(*stack) != own_stack)
            .collect();
        for stack in stacks {
            if let Some(node) = self.tree.stack_mut(stack) {
                node.remove_stale_entries(&tab_id);
            }
        }
        let areas = self
            .managers
            .get(&manager)
            .map(|m| m.dock_areas.clone())
            .unwrap_or_default();
        for area in areas {
            self.tree.clean_up_nodes(area);
        }

        self.tree.assert_invariants();
        self.update_stats();
    }

    /// Recreate `manager`'s floating windows as children of `new_parent`
    fn reparent_sub_manager_windows(&mut self, manager: ManagerId, new_parent: WindowId) {
        let mut moved = Vec::new();
        for (area, info) in self.areas_of(manager) {
            let Some(old) = info.window.filter(|_| info.owns_window) else {
                continue;
            };
            let Some(rect) = self.windows.screen_rect(old) else {
                continue;
            };
            let title = self.windows.title(old).unwrap_or_default();
            let desc = WindowDesc::at(title, rect.position(), rect.size(), self.windows.is_maximized(old));
            let new = self.windows.create_window(desc, Some(new_parent));
            moved.push((area, old, new));
        }

        for (area, old, new) in moved {
            if let Some(info) = self.tree.area_info_mut(area) {
                info.window = Some(new);
            }
            tracing::debug!(?manager, ?old, ?new, "moved floating window to new parent");
            self.close_window(old);
        }
    }

    // ========================================================================
    // Closing
    // ========================================================================

    /// Destroy `window` and its children, collapsing every area they host
    pub fn close_window(&mut self, window: WindowId) {
        for child in self.windows.children(window) {
            self.close_window(child);
        }

        let hosted: Vec<NodeId> = self
            .managers
            .values()
            .flat_map(|m| m.dock_areas.iter().copied())
            .filter(|area| {
                self.tree
                    .area_info(*area)
                    .is_some_and(|info| info.window == Some(window))
            })
            .collect();
        for area in hosted {
            self.collapse_dock_area(area);
        }

        if self.windows.is_alive(window) {
            self.windows.destroy_window(window);
        }
        if self.root_window == Some(window) {
            self.root_window = None;
        }
        self.update_stats();
    }

    /// Move a live area into its manager's collapsed list
    pub(crate) fn collapse_dock_area(&mut self, area: NodeId) {
        let Some(manager) = self.tree.area_info(area).map(|info| info.manager) else {
            return;
        };
        let gathered = self.gather_area_layout(area);

        if let Some(m) = self.managers.get_mut(&manager) {
            m.dock_areas.retain(|a| *a != area);
            if let Some(gathered) = gathered {
                m.collapsed_areas.push(gathered);
            }
        }
        for handle in self.tree.destroy_subtree(area) {
            self.forget_tab(handle);
        }
        tracing::debug!(?manager, ?area, "dock area collapsed");
    }

    /// Close an area that ran out of live tabs
    pub(crate) fn close_dock_area(&mut self, area: NodeId) {
        let owned = self
            .tree
            .area_info(area)
            .filter(|info| info.owns_window)
            .and_then(|info| info.window);
        match owned {
            Some(window) => self.close_window(window),
            None => self.collapse_dock_area(area),
        }
    }

    /// Clean up an area after a tab left it
    pub(crate) fn clean_up_area(&mut self, area: NodeId, removal: TabRemoval) {
        let result = self.tree.clean_up_nodes(area);
        if removal != TabRemoval::None && result != crate::docking::CleanUpResult::LiveTabs {
            self.close_dock_area(area);
        }
        self.tree.assert_invariants();
    }

    /// Drop a live tab from the store without touching its stack
    pub(crate) fn forget_tab(&mut self, handle: TabHandle) {
        self.on_tab_closing(handle);
        self.tabs.remove(handle);
        if self.active_tab == Some(handle) {
            self.set_active_tab(None);
        }
    }

    /// A closing major tab takes its sub-manager with it
    pub(crate) fn on_tab_closing(&mut self, handle: TabHandle) {
        let Some(sub) = self.sub_manager_for_major_tab(handle) else {
            return;
        };
        self.on_tab_manager_closing(sub);
        self.close_all_areas(sub);
        self.sub_managers.retain(|s| s.manager != sub);
        self.managers.remove(&sub);
        tracing::debug!(manager = ?sub, "sub-manager closed with its major tab");
    }

    // ========================================================================
    // Legacy tab types
    // ========================================================================

    /// Redirect layouts that mention `legacy_type` to `new_type`
    ///
    /// # Panics
    ///
    /// If `legacy_type` has a spawner.
    pub fn add_legacy_tab_type(&mut self, legacy_type: &str, new_type: &str) {
        assert!(
            !self.nomad_spawners.contains(legacy_type)
                && !self.managers.values().any(|m| m.spawners.contains(legacy_type)),
            "{:?} has a spawner and cannot become a legacy tab type",
            legacy_type
        );
        self.legacy_tab_types
            .insert(legacy_type.to_string(), new_type.to_string());
    }

    pub fn is_legacy_tab_type(&self, tab_type: &str) -> bool {
        self.legacy_tab_types.contains_key(tab_type)
    }

    pub fn tab_type_for_potentially_legacy_tab<'a>(&'a self, tab_type: &'a str) -> &'a str {
        self.legacy_tab_types
            .get(tab_type)
            .map(String::as_str)
            .unwrap_or(tab_type)
    }

    // ========================================================================
    // Proxy
    // ========================================================================

    /// Install a proxy manager that receives supported tabs placed through
    /// the global manager, hosted in `parent_window`
    pub fn set_proxy_tab_manager(
        &mut self,
        parent_window: Option<WindowId>,
        is_supported: impl Fn(&TabId) -> bool + 'static,
    ) -> ManagerId {
        let id = ManagerId(self.next_manager_id);
        self.next_manager_id += 1;
        self.managers.insert(id, TabManager::new(id, None));
        self.proxy = Some(ProxyTabManager {
            manager: id,
            parent_window,
            is_supported: Box::new(is_supported),
            on_attention_drawn: None,
        });
        id
    }

    /// Called with the major tab whenever attention is drawn to a supported
    /// sub-manager
    pub fn on_proxy_attention_drawn(&mut self, notify: impl Fn(TabHandle) + 'static) {
        if let Some(proxy) = self.proxy.as_mut() {
            proxy.on_attention_drawn = Some(Box::new(notify));
        }
    }

    pub fn clear_proxy_tab_manager(&mut self) {
        if let Some(proxy) = self.proxy.take() {
            self.close_all_areas(proxy.manager);
            self.managers.remove(&proxy.manager);
        }
    }

    pub(crate) fn proxy_supports_tab(&self, handle: TabHandle) -> bool {
        match (&self.proxy, self.tabs.get(handle)) {
            (Some(proxy), Some(tab)) => proxy.is_tab_supported(tab.layout_id()),
            _ => false,
        }
    }

    /// Host `handle` in a fresh primary area of the proxy's window
    pub(crate) fn proxy_open_unmanaged_tab(&mut self, handle: TabHandle) {
        let Some((manager, window)) = self.proxy.as_ref().map(|p| (p.manager, p.parent_window)) else {
            return;
        };

        let info = DockAreaInfo {
            manager,
            window,
            owns_window: false,
            placement: crate::layout::WindowPlacement::NoWindow,
            embed_title_area: false,
        };
        let area = self.tree.new_splitter(Default::default(), 1.0, Some(info));
        let stack = self.tree.new_stack(1.0, false);
        self.tree.add_child(area, stack);
        if let Some(m) = self.managers.get_mut(&manager) {
            m.dock_areas.push(area);
            m.main_tab = Some(handle);
        }

        self.open_tab_in_stack(stack, handle, None);
        tracing::debug!(?handle, ?manager, "tab hosted by proxy manager");
    }

    // ========================================================================
    // Stats and persistence
    // ========================================================================

    /// Record the number of live tabs and windows if it is a new maximum
    pub(crate) fn update_stats(&mut self) {
        let mut tabs = 0;
        let mut windows = BTreeSet::new();
        for m in self.managers.values() {
            for area in &m.dock_areas {
                tabs += self.tree.live_tabs_under(*area).len();
                if let Some(window) = self.tree.area_info(*area).and_then(|info| info.window) {
                    windows.insert(window);
                }
            }
        }

        self.stats.max_tabs = self.stats.max_tabs.max(tabs);
        self.stats.max_windows = self.stats.max_windows.max(windows.len());
    }

    /// Persist every sub-manager's layout, then the global one
    pub fn save_all_visual_state(&self) {
        for sub in &self.sub_managers {
            self.save_persistent_layout(sub.manager);
        }
        self.save_persistent_layout(ManagerId::GLOBAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::HeadlessWindows;

    fn manager() -> GlobalTabManager {
        GlobalTabManager::new(HeadlessWindows::new(), DockConfig::default())
    }

    #[test]
    fn test_new_has_only_global_manager() {
        let global = manager();
        assert!(global.manager(ManagerId::GLOBAL).is_some());
        assert!(global.manager(ManagerId(1)).is_none());
        assert_eq!(global.application_title(), "Dockspace");
    }

    #[test]
    fn test_legacy_tab_type_redirect() {
        let mut global = manager();
        global.add_legacy_tab_type("OldLog", "Log");
        assert!(global.is_legacy_tab_type("OldLog"));
        assert_eq!(global.tab_type_for_potentially_legacy_tab("OldLog"), "Log");
        assert_eq!(global.tab_type_for_potentially_legacy_tab("Details"), "Details");
    }

    #[test]
    #[should_panic(expected = "legacy tab type")]
    fn test_legacy_type_cannot_be_registered() {
        let mut global = manager();
        global.add_legacy_tab_type("OldLog", "Log");
        global.register_nomad_tab_spawner("OldLog", |_| DockTab::default());
    }

    #[test]
    fn test_set_active_tab_ignores_major_tabs() {
        let mut global = manager();
        let major = global
            .tabs
            .insert(DockTab::default().with_role(TabRole::MajorTab));
        let panel = global.tabs.insert(DockTab::default());

        global.set_active_tab(Some(major));
        assert_eq!(global.active_tab(), None);

        global.set_active_tab(Some(panel));
        assert_eq!(global.active_tab(), Some(panel));
        assert!(global.tab(panel).unwrap().activation_time() > 0);
    }

    #[test]
    fn test_active_tab_listener_sees_previous_and_new() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut global = manager();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        global.on_active_tab_changed(move |old, new| sink.borrow_mut().push((old, new)));

        let a = global.tabs.insert(DockTab::default());
        let b = global.tabs.insert(DockTab::default());
        global.set_active_tab(Some(a));
        global.set_active_tab(Some(a));
        global.set_active_tab(Some(b));

        assert_eq!(*seen.borrow(), vec![(None, Some(a)), (Some(a), Some(b))]);
    }

    #[test]
    fn test_new_tab_manager_prunes_dead_pairs() {
        let mut global = manager();
        let major = global.tabs.insert(DockTab::default().with_role(TabRole::MajorTab));
        let first = global.new_tab_manager(major);
        assert_eq!(global.sub_manager_for_major_tab(major), Some(first));
        assert_eq!(global.major_tab_for_tab_manager(first), Some(major));

        global.tabs.remove(major);
        let other = global.tabs.insert(DockTab::default().with_role(TabRole::MajorTab));
        let second = global.new_tab_manager(other);

        assert_ne!(first, second);
        assert!(global.manager(first).is_none());
        assert_eq!(global.sub_managers().len(), 1);
    }
}
