//! Tab manager - spawners, dock areas and the invocation protocol
//!
//! A [`TabManager`] owns one set of dock areas (live and collapsed) and one
//! spawner registry. Managers never hold references to each other: they live
//! inside the [`GlobalTabManager`] and every operation names the manager it
//! acts on with a [`ManagerId`]. The global manager itself is
//! [`ManagerId::GLOBAL`].
//!
//! ## Invocation
//!
//! `invoke_tab` looks for a place to show a tab in this order:
//!
//! 1. An existing live instance (reuse callback or last spawned tab)
//! 2. A collapsed area that remembers the tab; it is restored
//! 3. A live stack that remembers the tab
//! 4. The global manager, for nomad tabs invoked on a sub-manager
//! 5. A brand-new window holding a single stack

use std::collections::BTreeSet;
use std::fmt;

use crate::docking::{DockAreaInfo, NodeId};
use crate::global::GlobalTabManager;
use crate::layout::{Area, Layout, LayoutNode, Stack, TabId, TabState, WindowPlacement};
use crate::search::{SearchPreference, TabLookup};
use crate::spawner::{SpawnTabArgs, SpawnerRegistry, TabSpawnerEntry, TabSpawnerMenuType};
use crate::tab::{DockTab, TabHandle};
use crate::tracing::DockSnapshot;
use crate::window::{WindowDesc, WindowId};
use crate::workspace::{MenuElement, MenuEntry, WorkspaceItem, WorkspaceItemKind};

/// Name given to layouts of managers that never restored one
pub const DEFAULT_LAYOUT_NAME: &str = "Default";

/// Identifies a tab manager inside the [`GlobalTabManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManagerId(pub u32);

impl ManagerId {
    pub const GLOBAL: ManagerId = ManagerId(0);

    pub fn is_global(self) -> bool {
        self == Self::GLOBAL
    }
}

pub type PersistLayoutFn = Box<dyn Fn(&Layout)>;

/// Why a tab removal happened; restores never close areas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TabRemoval {
    None,
    Closed,
    DraggedOut,
}

/// State owned by one tab manager
pub struct TabManager {
    id: ManagerId,
    owner_tab: Option<TabHandle>,
    pub(crate) spawners: SpawnerRegistry,
    pub(crate) dock_areas: Vec<NodeId>,
    pub(crate) collapsed_areas: Vec<Area>,
    pub(crate) last_document_uid: u32,
    pub(crate) main_tab: Option<TabHandle>,
    pub(crate) active_layout_name: String,
    pub(crate) local_workspace_menu_root: WorkspaceItem,
    pub(crate) on_persist_layout: Option<PersistLayoutFn>,
    pub(crate) can_do_drag_operation: bool,
    pub(crate) last_major_dock_window: Option<WindowId>,
}

impl fmt::Debug for TabManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabManager")
            .field("id", &self.id)
            .field("owner_tab", &self.owner_tab)
            .field("spawners", &self.spawners.len())
            .field("dock_areas", &self.dock_areas)
            .field("collapsed_areas", &self.collapsed_areas.len())
            .field("main_tab", &self.main_tab)
            .field("active_layout_name", &self.active_layout_name)
            .finish_non_exhaustive()
    }
}

impl TabManager {
    pub(crate) fn new(id: ManagerId, owner_tab: Option<TabHandle>) -> Self {
        Self {
            id,
            owner_tab,
            spawners: SpawnerRegistry::new(),
            dock_areas: Vec::new(),
            collapsed_areas: Vec::new(),
            last_document_uid: 0,
            main_tab: None,
            active_layout_name: DEFAULT_LAYOUT_NAME.to_string(),
            local_workspace_menu_root: WorkspaceItem::new_group("Local Workspace Root"),
            on_persist_layout: None,
            can_do_drag_operation: true,
            last_major_dock_window: None,
        }
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    /// Major tab hosting this manager; `None` for the global manager
    pub fn owner_tab(&self) -> Option<TabHandle> {
        self.owner_tab
    }

    pub fn spawners(&self) -> &SpawnerRegistry {
        &self.spawners
    }

    /// Root nodes of the live dock areas
    pub fn dock_areas(&self) -> &[NodeId] {
        &self.dock_areas
    }

    /// Areas that were closed or never materialized, kept for later restores
    pub fn collapsed_areas(&self) -> &[Area] {
        &self.collapsed_areas
    }

    pub fn main_tab(&self) -> Option<TabHandle> {
        self.main_tab
    }

    pub fn active_layout_name(&self) -> &str {
        &self.active_layout_name
    }

    pub fn local_workspace_menu_root(&self) -> &WorkspaceItem {
        &self.local_workspace_menu_root
    }
}

impl GlobalTabManager {
    /// `manager` if it exists, else the global manager
    ///
    /// Sub-manager ids go stale once their major tab closes.
    pub(crate) fn resolve_manager(&self, manager: ManagerId) -> ManagerId {
        if self.managers.contains_key(&manager) {
            manager
        } else {
            tracing::warn!(?manager, "unknown tab manager; using the global manager");
            ManagerId::GLOBAL
        }
    }

    fn manager_or_global_mut(&mut self, manager: ManagerId) -> &mut TabManager {
        let id = self.resolve_manager(manager);
        self.managers
            .entry(id)
            .or_insert_with(|| TabManager::new(id, None))
    }

    // ========================================================================
    // Spawner registry
    // ========================================================================

    /// Register a spawner on `manager`
    ///
    /// An unknown `manager` falls back to the global manager.
    ///
    /// # Panics
    ///
    /// If the type is already registered there, or is a legacy type.
    pub fn register_tab_spawner(
        &mut self,
        manager: ManagerId,
        tab_type: &str,
        on_spawn: impl Fn(&SpawnTabArgs) -> DockTab + 'static,
    ) -> &mut TabSpawnerEntry {
        assert!(
            !self.is_legacy_tab_type(tab_type),
            "{:?} is a legacy tab type and cannot have a spawner",
            tab_type
        );
        self.manager_or_global_mut(manager)
            .spawners
            .register(tab_type, on_spawn)
    }

    pub fn unregister_tab_spawner(&mut self, manager: ManagerId, tab_type: &str) -> bool {
        self.managers
            .get_mut(&manager)
            .is_some_and(|m| m.spawners.unregister(tab_type))
    }

    pub fn unregister_all_tab_spawners(&mut self, manager: ManagerId) {
        if let Some(m) = self.managers.get_mut(&manager) {
            m.spawners.clear();
        }
    }

    /// Register a spawner usable from every manager
    ///
    /// # Panics
    ///
    /// If the type is already a nomad type, or is a legacy type.
    pub fn register_nomad_tab_spawner(
        &mut self,
        tab_type: &str,
        on_spawn: impl Fn(&SpawnTabArgs) -> DockTab + 'static,
    ) -> &mut TabSpawnerEntry {
        assert!(
            !self.is_legacy_tab_type(tab_type),
            "{:?} is a legacy tab type and cannot have a spawner",
            tab_type
        );
        self.nomad_spawners.register(tab_type, on_spawn)
    }

    pub fn unregister_nomad_tab_spawner(&mut self, tab_type: &str) -> bool {
        self.nomad_spawners.unregister(tab_type)
    }

    /// Local registry first, then the nomad registry
    pub fn find_tab_spawner(&self, manager: ManagerId, tab_type: &str) -> Option<&TabSpawnerEntry> {
        self.managers
            .get(&manager)
            .and_then(|m| m.spawners.get(tab_type))
            .or_else(|| self.nomad_spawners.get(tab_type))
    }

    fn find_tab_spawner_mut(
        &mut self,
        manager: ManagerId,
        tab_type: &str,
    ) -> Option<&mut TabSpawnerEntry> {
        let local = self
            .managers
            .get(&manager)
            .is_some_and(|m| m.spawners.contains(tab_type));
        if local {
            self.managers
                .get_mut(&manager)
                .and_then(|m| m.spawners.get_mut(tab_type))
        } else {
            self.nomad_spawners.get_mut(tab_type)
        }
    }

    pub fn has_tab_spawner(&self, manager: ManagerId, tab_type: &str) -> bool {
        self.find_tab_spawner(manager, tab_type).is_some()
    }

    pub fn can_spawn_tab(&self, manager: ManagerId, tab_type: &str) -> bool {
        self.has_tab_spawner(manager, tab_type)
    }

    /// The spawner's last tab is alive and placed somewhere
    pub fn is_sole_tab_instance_spawned(&self, manager: ManagerId, tab_type: &str) -> bool {
        self.find_tab_spawner(manager, tab_type)
            .and_then(|entry| entry.spawned_tab())
            .is_some_and(|handle| self.is_tab_placed(handle))
    }

    /// A nomad tab that already lives elsewhere cannot be spawned again
    pub(crate) fn is_valid_tab_for_spawning(&self, tab_id: &TabId) -> bool {
        !self
            .nomad_spawners
            .get(&tab_id.tab_type)
            .and_then(|entry| entry.spawned_tab())
            .is_some_and(|handle| self.is_tab_placed(handle))
    }

    pub(crate) fn is_tab_placed(&self, handle: TabHandle) -> bool {
        self.tabs
            .get(handle)
            .is_some_and(|tab| tab.parent_stack.is_some())
    }

    fn has_valid_tabs(&self, manager: ManagerId, area: &Area) -> bool {
        area.any_tab(|tab| {
            tab.is_opened()
                && self.can_spawn_tab(manager, &tab.tab_id.tab_type)
                && self.is_valid_tab_for_spawning(&tab.tab_id)
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Window hosting the area that contains `node`
    pub fn window_of_node(&self, node: NodeId) -> Option<WindowId> {
        self.tree
            .area_of(node)
            .and_then(|area| self.tree.area_info(area))
            .and_then(|info| info.window)
    }

    pub fn window_of_tab(&self, handle: TabHandle) -> Option<WindowId> {
        self.tabs
            .get(handle)
            .and_then(|tab| tab.parent_stack)
            .and_then(|stack| self.window_of_node(stack))
    }

    /// Window new floating areas of `manager` are parented to
    pub fn parent_window(&self, manager: ManagerId) -> Option<WindowId> {
        match self.managers.get(&manager).and_then(|m| m.owner_tab) {
            Some(owner) => self.window_of_tab(owner),
            None => self.root_window,
        }
    }

    pub fn is_tab_active(&self, handle: TabHandle) -> bool {
        self.active_tab == Some(handle)
    }

    /// Live tabs in all of `manager`'s areas, in visual order
    pub fn live_tabs(&self, manager: ManagerId) -> Vec<TabHandle> {
        self.managers
            .get(&manager)
            .map(|m| {
                m.dock_areas
                    .iter()
                    .flat_map(|area| self.tree.live_tabs_under(*area))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Stacks of all live areas of `manager`
    fn live_stacks(&self, manager: ManagerId) -> Vec<NodeId> {
        self.managers
            .get(&manager)
            .map(|m| {
                m.dock_areas
                    .iter()
                    .flat_map(|area| self.tree.stacks_under(*area))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Find a stack that remembers `tab_id`, restoring a collapsed area if
    /// that is where it is remembered
    pub fn find_potentially_closed_tab(
        &mut self,
        manager: ManagerId,
        tab_id: &TabId,
    ) -> Option<NodeId> {
        self.find_closed_tab_stack(manager, tab_id).map(|(stack, _)| stack)
    }

    /// Like [`Self::find_potentially_closed_tab`], also reporting whether a
    /// collapsed area was restored on the way
    fn find_closed_tab_stack(&mut self, manager: ManagerId, tab_id: &TabId) -> Option<(NodeId, bool)> {
        let collapsed_index = self.managers.get(&manager).and_then(|m| {
            m.collapsed_areas
                .iter()
                .position(|area| area.any_tab(|tab| tab.tab_id.matches(tab_id)))
        });

        let restored = match collapsed_index {
            Some(index) => {
                let area = self.manager_or_global_mut(manager).collapsed_areas.remove(index);
                let parent = self.parent_window(manager);
                tracing::debug!(%tab_id, ?manager, "restoring collapsed area that remembers tab");
                self.restore_area(manager, area, parent, false);
                true
            }
            None => false,
        };

        self.live_stacks(manager)
            .into_iter()
            .find(|stack| {
                self.tree
                    .stack(*stack)
                    .is_some_and(|s| s.has_entry_matching(tab_id))
            })
            .map(|stack| (stack, restored))
    }

    // ========================================================================
    // Invocation
    // ========================================================================

    /// Show the tab `tab_id`, creating it if needed
    pub fn invoke_tab(&mut self, manager: ManagerId, tab_id: impl Into<TabId>) -> TabHandle {
        let tab_id = tab_id.into();
        let before = DockSnapshot::from_manager(self);
        let handle = self.invoke_tab_internal(manager, &tab_id);

        if let Some(tab) = self.tabs.get(handle) {
            if tab.role().titles_window() {
                let label = tab.label().to_string();
                if let Some(window) = self.window_of_tab(handle).filter(|w| Some(*w) != self.root_window) {
                    self.windows.set_title(window, &label);
                }
            }
        }

        self.update_stats();
        before.log_diff("invoke_tab", &DockSnapshot::from_manager(self));
        handle
    }

    pub(crate) fn invoke_tab_internal(&mut self, manager: ManagerId, tab_id: &TabId) -> TabHandle {
        let manager = self.resolve_manager(manager);

        let reuse = self
            .find_tab_spawner(manager, &tab_id.tab_type)
            .map(|entry| (entry.reuse_fn(), entry.spawned_tab()));

        match reuse {
            Some((reuse, spawned)) => {
                let existing = match reuse {
                    Some(find) => find(tab_id),
                    None => spawned,
                }
                .filter(|handle| self.is_tab_placed(*handle));

                if let Some(existing) = existing {
                    if !self.is_tab_active(existing) {
                        self.draw_attention(existing);
                    }
                    return existing;
                }
            }
            None => {
                tracing::warn!(%tab_id, ?manager, "no tab spawner registered; placeholder content will be used");
            }
        }

        if let Some((stack, restored_area)) = self.find_closed_tab_stack(manager, tab_id) {
            // The restored area spawned its opened tabs already
            let spawned = self.tree.stack(stack).filter(|_| restored_area).and_then(|s| {
                s.entries()
                    .iter()
                    .find(|entry| entry.live.is_some() && entry.tab.tab_id == *tab_id)
                    .and_then(|entry| entry.live)
            });
            if let Some(handle) = spawned {
                self.activate_in_parent(handle);
                return handle;
            }

            let window = self.window_of_node(stack);
            let handle = self.spawn_tab(manager, tab_id, window);
            self.open_tab_in_stack(stack, handle, None);
            return handle;
        }

        if !manager.is_global() && self.nomad_spawners.contains(&tab_id.tab_type) {
            return self.invoke_tab_internal(ManagerId::GLOBAL, tab_id);
        }

        // Nothing remembers this tab: give it a window of its own
        let size = self.config.default_window_size(tab_id);
        let area = Area::new(size).split(Stack::new().add_tab(tab_id.clone(), TabState::Opened));
        let parent = self.parent_window(manager);
        let area_node = self.restore_area(manager, area, parent, false);

        if let Some(handle) = self.tree.live_tabs_under(area_node).first().copied() {
            return handle;
        }

        let stack = match self.tree.stacks_under(area_node).first().copied() {
            Some(stack) => stack,
            None => {
                let stack = self.tree.new_stack(1.0, false);
                self.tree.add_child(area_node, stack);
                stack
            }
        };
        let window = self.window_of_node(area_node);
        let handle = self.spawn_tab(manager, tab_id, window);
        self.open_tab_in_stack(stack, handle, None);
        handle
    }

    /// Run the spawner for `tab_id`, or build placeholder content
    pub(crate) fn spawn_tab(
        &mut self,
        manager: ManagerId,
        tab_id: &TabId,
        owner_window: Option<WindowId>,
    ) -> TabHandle {
        let spawner = self
            .find_tab_spawner(manager, &tab_id.tab_type)
            .map(|entry| (entry.spawn_fn(), entry.display_name().to_string(), entry.icon().map(str::to_string)));

        let mut tab = match spawner {
            Some((spawn, display_name, icon)) => {
                let args = SpawnTabArgs {
                    owner_window,
                    tab_id: tab_id.clone(),
                };
                let mut tab = spawn(&args);
                tab.set_layout_identifier(tab_id.clone());
                tab.provide_default_label(&display_name);
                tab.provide_default_icon(icon.as_deref());
                tab
            }
            None => {
                tracing::debug!(%tab_id, "spawning placeholder for unrecognized tab");
                DockTab::placeholder(tab_id.clone())
            }
        };
        tab.manager = Some(manager);

        let handle = self.tabs.insert(tab);
        if let Some(entry) = self.find_tab_spawner_mut(manager, &tab_id.tab_type) {
            entry.spawned_tab = Some(handle);
        }
        handle
    }

    /// Put a live tab into `stack` and bring it to the front
    pub(crate) fn open_tab_in_stack(&mut self, stack: NodeId, handle: TabHandle, index: Option<usize>) {
        let Some(tab_id) = self.tabs.get(handle).map(|tab| tab.layout_id().clone()) else {
            return;
        };
        let Some(area) = self.tree.area_of(stack) else {
            tracing::error!(?stack, "stack is not part of a dock area");
            return;
        };
        let manager = self.tree.area_info(area).map(|info| info.manager);

        if let Some(stack_node) = self.tree.stack_mut(stack) {
            stack_node.attach_tab(handle, &tab_id, index);
        }
        if let Some(tab) = self.tabs.get_mut(handle) {
            tab.parent_stack = Some(stack);
            tab.manager = manager.or(tab.manager);
        }

        self.activate_in_parent(handle);
        self.tree.clean_up_nodes(area);
        self.tree.assert_invariants();
    }

    // ========================================================================
    // Document tabs
    // ========================================================================

    /// Insert a tab nobody registered a spawner for (a document)
    ///
    /// The tab gets a fresh instance id under `placeholder_id`. `search`
    /// picks a live tab whose stack receives it; failing that, the stack that
    /// remembers `placeholder_id`; failing that, a full invocation of
    /// `placeholder_id`.
    pub fn insert_new_document_tab(
        &mut self,
        manager: ManagerId,
        placeholder_id: &str,
        search: &dyn SearchPreference,
        tab: DockTab,
    ) -> TabHandle {
        self.insert_document_tab(manager, placeholder_id, search, tab, true)
    }

    /// Same as [`Self::insert_new_document_tab`] without the spawn animation
    pub fn restore_document_tab(
        &mut self,
        manager: ManagerId,
        placeholder_id: &str,
        search: &dyn SearchPreference,
        tab: DockTab,
    ) -> TabHandle {
        self.insert_document_tab(manager, placeholder_id, search, tab, false)
    }

    fn insert_document_tab(
        &mut self,
        manager: ManagerId,
        placeholder_id: &str,
        search: &dyn SearchPreference,
        mut tab: DockTab,
        play_spawn_anim: bool,
    ) -> TabHandle {
        let uid = match self.managers.get_mut(&manager) {
            Some(m) => {
                let uid = m.last_document_uid;
                m.last_document_uid += 1;
                uid
            }
            None => 0,
        };
        tab.set_layout_identifier(TabId::with_instance(placeholder_id, uid));
        tab.manager = Some(manager);

        let handle = self.tabs.insert(tab);
        self.open_unmanaged_tab(manager, placeholder_id, search, handle);
        self.draw_attention(handle);

        if play_spawn_anim {
            if let Some(tab) = self.tabs.get_mut(handle) {
                tab.spawn_animations += 1;
            }
        }
        self.update_stats();
        handle
    }

    fn open_unmanaged_tab(
        &mut self,
        manager: ManagerId,
        placeholder_id: &str,
        search: &dyn SearchPreference,
        handle: TabHandle,
    ) {
        if manager.is_global() && self.proxy_supports_tab(handle) {
            self.proxy_open_unmanaged_tab(handle);
            return;
        }

        let live = match self.tabs.get(handle) {
            Some(tab) => search.search(&*self, manager, placeholder_id, tab),
            None => return,
        };

        if let Some(stack) = live.and_then(|live| self.tabs.get(live)).and_then(|t| t.parent_stack) {
            self.open_tab_in_stack(stack, handle, None);
            return;
        }

        let placeholder = TabId::new(placeholder_id);
        if let Some(stack) = self.find_potentially_closed_tab(manager, &placeholder) {
            self.open_tab_in_stack(stack, handle, None);
            return;
        }

        tracing::warn!(placeholder_id, "no stack remembers the placeholder; invoking it");
        let live = self.invoke_tab_internal(manager, &placeholder);
        match self.tabs.get(live).and_then(|t| t.parent_stack) {
            Some(stack) => self.open_tab_in_stack(stack, handle, None),
            None => tracing::error!(placeholder_id, "invoked placeholder has no stack; tab left unplaced"),
        }
    }

    // ========================================================================
    // Restore
    // ========================================================================

    /// Materialize `layout` for `manager`
    ///
    /// The `NoWindow` area is the primary area and is hosted in
    /// `parent_window`; its root node is returned. Other areas get their own
    /// windows if they have something to show, and are collapsed otherwise.
    pub fn restore_from(
        &mut self,
        manager: ManagerId,
        mut layout: Layout,
        parent_window: Option<WindowId>,
        embed_title_area: bool,
    ) -> Option<NodeId> {
        let manager = self.resolve_manager(manager);
        layout.redirect_tab_types(&self.legacy_tab_types);
        let before = DockSnapshot::from_manager(self);
        self.manager_or_global_mut(manager).active_layout_name = layout.name.clone();

        let name = layout.name;
        let mut primary = None;
        for area in layout.areas {
            if area.is_primary() {
                if primary.is_some() {
                    tracing::error!(layout = %name, "layout has more than one primary area; extra area collapsed");
                    self.manager_or_global_mut(manager).collapsed_areas.push(area);
                    continue;
                }
                primary = Some(self.restore_area(manager, area, parent_window, embed_title_area));
            } else if self.has_valid_tabs(manager, &area) {
                self.restore_area(manager, area, parent_window, false);
            } else {
                self.manager_or_global_mut(manager).collapsed_areas.push(area);
            }
        }

        tracing::debug!(layout = %name, ?manager, ?primary, "layout restored");
        self.update_stats();
        before.log_diff("restore_from", &DockSnapshot::from_manager(self));
        primary
    }

    pub(crate) fn restore_area(
        &mut self,
        manager: ManagerId,
        area: Area,
        parent_window: Option<WindowId>,
        embed_title_area: bool,
    ) -> NodeId {
        let Area {
            splitter,
            placement,
        } = area;

        let title = self.app_title.clone();
        let (window, owns_window) = match placement {
            WindowPlacement::NoWindow => (parent_window, false),
            WindowPlacement::Automatic { size } => (
                Some(
                    self.windows
                        .create_window(WindowDesc::auto_centered(title, size), parent_window),
                ),
                true,
            ),
            WindowPlacement::Specified {
                position,
                size,
                maximized,
            } => (
                Some(self.windows.create_window(
                    WindowDesc::at(title, position, size, maximized),
                    parent_window,
                )),
                true,
            ),
        };

        let info = DockAreaInfo {
            manager,
            window,
            owns_window,
            placement,
            embed_title_area: embed_title_area && !owns_window,
        };
        let root = self
            .tree
            .new_splitter(splitter.orientation, splitter.size_coefficient, Some(info));
        for child in splitter.children {
            let node = self.restore_node(manager, child, window);
            self.tree.add_child(root, node);
        }

        if let Some(m) = self.managers.get_mut(&manager) {
            m.dock_areas.push(root);
        }
        self.clean_up_area(root, TabRemoval::None);
        tracing::debug!(?manager, ?root, ?window, owns_window, "dock area restored");
        root
    }

    fn restore_node(&mut self, manager: ManagerId, node: LayoutNode, window: Option<WindowId>) -> NodeId {
        match node {
            LayoutNode::Stack(stack) => self.restore_stack(manager, stack, window),
            LayoutNode::Splitter(splitter) => {
                let id = self
                    .tree
                    .new_splitter(splitter.orientation, splitter.size_coefficient, None);
                for child in splitter.children {
                    let child = self.restore_node(manager, child, window);
                    self.tree.add_child(id, child);
                }
                id
            }
            LayoutNode::Area(area) => {
                tracing::debug!("nested area restored as a plain splitter");
                self.restore_node(manager, LayoutNode::Splitter(area.splitter), window)
            }
        }
    }

    fn restore_stack(&mut self, manager: ManagerId, stack: Stack, window: Option<WindowId>) -> NodeId {
        let foreground = stack.effective_foreground().cloned();
        let Stack {
            size_coefficient,
            tabs,
            hide_tab_well,
            ..
        } = stack;

        let node = self.tree.new_stack(size_coefficient, hide_tab_well);
        if let Some(stack_node) = self.tree.stack_mut(node) {
            stack_node.set_entries(tabs.clone());
        }

        let mut first_live = None;
        let mut foreground_live = None;
        for (index, tab) in tabs.iter().enumerate() {
            if !tab.is_opened() || !self.is_valid_tab_for_spawning(&tab.tab_id) {
                continue;
            }
            let handle = self.spawn_tab(manager, &tab.tab_id, window);
            if let Some(stack_node) = self.tree.stack_mut(node) {
                stack_node.attach_at(index, handle);
            }
            if let Some(live) = self.tabs.get_mut(handle) {
                live.parent_stack = Some(node);
            }
            first_live.get_or_insert(handle);
            if foreground.as_ref() == Some(&tab.tab_id) {
                foreground_live = Some(handle);
            }
        }

        if let Some(handle) = foreground_live.or(first_live) {
            if let Some(stack_node) = self.tree.stack_mut(node) {
                stack_node.set_foreground(handle);
            }
        }
        node
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Snapshot `manager`'s live areas plus its collapsed areas
    pub fn persist_layout(&self, manager: ManagerId) -> Layout {
        let Some(m) = self.managers.get(&manager) else {
            return Layout::new(DEFAULT_LAYOUT_NAME);
        };

        let mut layout = Layout::new(m.active_layout_name.clone());
        for area in &m.dock_areas {
            if let Some(gathered) = self.gather_area_layout(*area) {
                layout.push_area(gathered);
            }
        }
        for area in &m.collapsed_areas {
            layout.push_area(area.clone());
        }
        layout
    }

    /// Gather one live area, capturing its window's current rect
    pub(crate) fn gather_area_layout(&self, area: NodeId) -> Option<Area> {
        let info = self.tree.area_info(area)?;
        let Some(LayoutNode::Splitter(splitter)) = self.tree.gather_persistent_layout(area) else {
            return None;
        };

        let placement = match info.window.filter(|_| info.owns_window) {
            Some(window) => match self.windows.screen_rect(window) {
                Some(rect) => WindowPlacement::Specified {
                    position: rect.position(),
                    size: rect.size(),
                    maximized: self.windows.is_maximized(window),
                },
                None => info.placement,
            },
            None => info.placement,
        };

        Area {
            splitter,
            placement,
        }
        .collapse()
    }

    pub fn set_on_persist_layout(&mut self, manager: ManagerId, handler: impl Fn(&Layout) + 'static) {
        if let Some(m) = self.managers.get_mut(&manager) {
            m.on_persist_layout = Some(Box::new(handler));
        }
    }

    /// Persist `manager`'s layout through its `on_persist_layout` handler
    pub fn save_persistent_layout(&self, manager: ManagerId) {
        let layout = self.persist_layout(manager);
        if let Some(handler) = self
            .managers
            .get(&manager)
            .and_then(|m| m.on_persist_layout.as_ref())
        {
            handler(&layout);
        }
    }

    // ========================================================================
    // Main tab / drag policy
    // ========================================================================

    /// Mark `tab` as the tab that can never be closed or dragged away
    pub fn set_main_tab(&mut self, manager: ManagerId, tab: TabHandle) {
        if let Some(m) = self.managers.get_mut(&manager) {
            m.main_tab = Some(tab);
        }
    }

    pub fn is_tab_closeable(&self, tab: TabHandle) -> bool {
        let manager = self.tabs.get(tab).and_then(|t| t.manager);
        !manager
            .and_then(|m| self.managers.get(&m))
            .is_some_and(|m| m.main_tab == Some(tab))
    }

    pub fn set_can_do_drag_operation(&mut self, manager: ManagerId, can_drag: bool) {
        if let Some(m) = self.managers.get_mut(&manager) {
            m.can_do_drag_operation = can_drag;
        }
    }

    pub fn can_tab_leave_tab_well(&self, tab: TabHandle) -> bool {
        let manager = self.tabs.get(tab).and_then(|t| t.manager);
        manager
            .and_then(|m| self.managers.get(&m))
            .is_some_and(|m| m.can_do_drag_operation && m.main_tab != Some(tab))
    }

    // ========================================================================
    // Lifetime
    // ========================================================================

    /// True if every live tab of `manager` (and, for the global manager, of
    /// every sub-manager) is in `ignore` or agrees to close
    pub fn can_close_manager(&self, manager: ManagerId, ignore: &[TabHandle]) -> bool {
        let own = self.live_tabs(manager).into_iter().all(|handle| {
            ignore.contains(&handle) || self.tabs.get(handle).map_or(true, DockTab::can_close_tab)
        });
        if !own {
            return false;
        }
        if manager.is_global() {
            return self
                .sub_managers
                .iter()
                .all(|sub| self.can_close_manager(sub.manager, ignore));
        }
        true
    }

    /// Persist through the handler, then destroy the manager's windows
    pub fn on_tab_manager_closing(&mut self, manager: ManagerId) {
        self.save_persistent_layout(manager);

        let windows: Vec<WindowId> = self
            .managers
            .get(&manager)
            .map(|m| {
                m.dock_areas
                    .iter()
                    .filter_map(|area| self.tree.area_info(*area))
                    .filter(|info| info.owns_window)
                    .filter_map(|info| info.window)
                    .collect()
            })
            .unwrap_or_default();

        for window in windows {
            self.close_window(window);
        }
    }

    /// Tear down every area of `manager` and forget its collapsed areas
    pub fn close_all_areas(&mut self, manager: ManagerId) {
        let Some(m) = self.managers.get_mut(&manager) else {
            return;
        };
        let areas = std::mem::take(&mut m.dock_areas);
        m.collapsed_areas.clear();

        for area in areas {
            let window = self
                .tree
                .area_info(area)
                .filter(|info| info.owns_window)
                .and_then(|info| info.window);
            for handle in self.tree.destroy_subtree(area) {
                self.forget_tab(handle);
            }
            if let Some(window) = window {
                self.close_window(window);
            }
        }
        self.update_stats();
    }

    // ========================================================================
    // Menus
    // ========================================================================

    pub fn local_workspace_menu_root_mut(&mut self, manager: ManagerId) -> Option<&mut WorkspaceItem> {
        self.managers
            .get_mut(&manager)
            .map(|m| &mut m.local_workspace_menu_root)
    }

    /// Menu for the manager's own workspace structure, orphans included
    pub fn populate_local_tab_spawner_menu(&self, manager: ManagerId) -> Vec<MenuElement> {
        match self.managers.get(&manager) {
            Some(m) => self.populate_tab_spawner_menu(manager, &m.local_workspace_menu_root, true),
            None => Vec::new(),
        }
    }

    /// Build menu elements for `structure`
    ///
    /// Spawners not mentioned in `structure` come first when
    /// `include_orphans` is set. Groups at even depths become sections and
    /// groups at odd depths become sub-menus. Hidden spawners are skipped.
    pub fn populate_tab_spawner_menu(
        &self,
        manager: ManagerId,
        structure: &WorkspaceItem,
        include_orphans: bool,
    ) -> Vec<MenuElement> {
        let mut elements = Vec::new();

        if include_orphans {
            let mut types: BTreeSet<&str> = BTreeSet::new();
            if let Some(m) = self.managers.get(&manager) {
                types.extend(m.spawners.iter().map(TabSpawnerEntry::tab_type));
            }
            types.extend(self.nomad_spawners.iter().map(TabSpawnerEntry::tab_type));

            for tab_type in types {
                let auto = self
                    .find_tab_spawner(manager, tab_type)
                    .is_some_and(TabSpawnerEntry::auto_generate_menu_entry);
                if auto && !structure.contains_spawner(tab_type) {
                    if let Some(entry) = self.menu_entry(manager, tab_type) {
                        elements.push(MenuElement::Entry(entry));
                    }
                }
            }
        }

        self.populate_menu_children(manager, structure, 0, &mut elements);
        elements
    }

    fn populate_menu_children(
        &self,
        manager: ManagerId,
        item: &WorkspaceItem,
        depth: usize,
        out: &mut Vec<MenuElement>,
    ) {
        for child in item.children() {
            match child.kind() {
                WorkspaceItemKind::Spawner { tab_type } => {
                    if let Some(entry) = self.menu_entry(manager, tab_type) {
                        out.push(MenuElement::Entry(entry));
                    }
                }
                WorkspaceItemKind::Group { .. } => {
                    let shown = |tab_type: &str| self.menu_entry(manager, tab_type).is_some();
                    if !child.has_visible_spawner(&shown) {
                        continue;
                    }

                    let mut children = Vec::new();
                    self.populate_menu_children(manager, child, depth + 1, &mut children);
                    if depth % 2 == 0 {
                        out.push(MenuElement::Section {
                            label: child.display_name().to_string(),
                            children,
                        });
                    } else {
                        out.push(MenuElement::SubMenu {
                            label: child.display_name().to_string(),
                            tooltip: child.tooltip().to_string(),
                            icon: child.icon().map(str::to_string),
                            children,
                        });
                    }
                }
            }
        }
    }

    fn menu_entry(&self, manager: ManagerId, tab_type: &str) -> Option<MenuEntry> {
        let spawner = self.find_tab_spawner(manager, tab_type)?;
        if spawner.menu_type() == TabSpawnerMenuType::Hidden {
            return None;
        }
        Some(MenuEntry {
            tab_type: tab_type.to_string(),
            label: spawner.display_name().to_string(),
            tooltip: spawner.tooltip_text().to_string(),
            icon: spawner.icon().map(str::to_string),
            enabled: spawner.menu_type() == TabSpawnerMenuType::Enabled,
            checked: self.is_sole_tab_instance_spawned(manager, tab_type),
        })
    }

    /// Remove entries for `tab_id` from the collapsed areas of `manager`,
    /// dropping areas that end up empty
    pub(crate) fn remove_tab_from_collapsed_areas(&mut self, manager: ManagerId, tab_id: &TabId) {
        let Some(m) = self.managers.get_mut(&manager) else {
            return;
        };
        let mut kept = Vec::with_capacity(m.collapsed_areas.len());
        for mut area in m.collapsed_areas.drain(..) {
            area.remove_tab_entries(tab_id);
            if let Some(area) = area.collapse() {
                kept.push(area);
            }
        }
        m.collapsed_areas = kept;
    }
}

impl TabLookup for GlobalTabManager {
    fn find_existing_live_tab(&self, manager: ManagerId, tab_id: &TabId) -> Option<TabHandle> {
        self.live_stacks(manager).into_iter().find_map(|stack| {
            self.tree.stack(stack).and_then(|s| {
                s.entries()
                    .iter()
                    .find(|entry| entry.live.is_some() && entry.tab.tab_id.matches(tab_id))
                    .and_then(|entry| entry.live)
            })
        })
    }

    fn find_last_tab_in_window(&self, manager: ManagerId, window: Option<WindowId>) -> Option<TabHandle> {
        let window = window?;
        let areas = self.managers.get(&manager)?.dock_areas.iter();
        areas
            .filter(|area| {
                self.tree
                    .area_info(**area)
                    .is_some_and(|info| info.window == Some(window))
            })
            .flat_map(|area| self.tree.live_tabs_under(*area))
            .filter_map(|handle| self.tabs.get(handle).map(|tab| (handle, tab.activation_time())))
            .max_by_key(|(_, time)| *time)
            .map(|(handle, _)| handle)
    }

    fn last_major_dock_window(&self, manager: ManagerId) -> Option<WindowId> {
        self.managers
            .get(&manager)
            .and_then(|m| m.last_major_dock_window)
            .or_else(|| {
                self.managers
                    .get(&ManagerId::GLOBAL)
                    .and_then(|m| m.last_major_dock_window)
            })
    }
}
