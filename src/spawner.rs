//! Tab spawner registry - factories that build tab content on demand
//!
//! Every tab type a manager can show is registered here with a spawn
//! callback. The entry also carries menu metadata and remembers the last
//! tab it spawned so single-instance tabs are reused instead of duplicated.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::layout::TabId;
use crate::tab::{DockTab, TabHandle};
use crate::window::WindowId;

/// Arguments handed to a spawn callback
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTabArgs {
    /// Window the new tab will live in, if it is known yet
    pub owner_window: Option<WindowId>,
    pub tab_id: TabId,
}

pub type SpawnTabFn = Rc<dyn Fn(&SpawnTabArgs) -> DockTab>;

/// Finds an existing live tab to reuse instead of spawning a new one
pub type FindTabToReuseFn = Rc<dyn Fn(&TabId) -> Option<TabHandle>>;

/// How an entry shows up in generated menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TabSpawnerMenuType {
    #[default]
    Enabled,
    Disabled,
    Hidden,
}

/// A registered tab type
pub struct TabSpawnerEntry {
    tab_type: String,
    on_spawn: SpawnTabFn,
    reuse: Option<FindTabToReuseFn>,
    display_name: String,
    tooltip: String,
    icon: Option<String>,
    menu_type: TabSpawnerMenuType,
    auto_generate_menu_entry: bool,
    /// Last tab this entry spawned; may be dead
    pub(crate) spawned_tab: Option<TabHandle>,
}

impl fmt::Debug for TabSpawnerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabSpawnerEntry")
            .field("tab_type", &self.tab_type)
            .field("display_name", &self.display_name)
            .field("menu_type", &self.menu_type)
            .field("auto_generate_menu_entry", &self.auto_generate_menu_entry)
            .field("spawned_tab", &self.spawned_tab)
            .finish_non_exhaustive()
    }
}

impl TabSpawnerEntry {
    pub(crate) fn new(tab_type: impl Into<String>, on_spawn: SpawnTabFn) -> Self {
        Self {
            tab_type: tab_type.into(),
            on_spawn,
            reuse: None,
            display_name: String::new(),
            tooltip: String::new(),
            icon: None,
            menu_type: TabSpawnerMenuType::Enabled,
            auto_generate_menu_entry: true,
            spawned_tab: None,
        }
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.display_name = name.into();
        self
    }

    pub fn set_tooltip_text(&mut self, tooltip: impl Into<String>) -> &mut Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) -> &mut Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn set_menu_type(&mut self, menu_type: TabSpawnerMenuType) -> &mut Self {
        self.menu_type = menu_type;
        self
    }

    pub fn set_auto_generate_menu_entry(&mut self, auto_generate: bool) -> &mut Self {
        self.auto_generate_menu_entry = auto_generate;
        self
    }

    pub fn set_reuse_tab_method(
        &mut self,
        reuse: impl Fn(&TabId) -> Option<TabHandle> + 'static,
    ) -> &mut Self {
        self.reuse = Some(Rc::new(reuse));
        self
    }

    pub fn tab_type(&self) -> &str {
        &self.tab_type
    }

    /// Display name, falling back to the tab type
    pub fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.tab_type
        } else {
            &self.display_name
        }
    }

    pub fn tooltip_text(&self) -> &str {
        &self.tooltip
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn menu_type(&self) -> TabSpawnerMenuType {
        self.menu_type
    }

    pub fn auto_generate_menu_entry(&self) -> bool {
        self.auto_generate_menu_entry
    }

    pub fn spawned_tab(&self) -> Option<TabHandle> {
        self.spawned_tab
    }

    pub(crate) fn spawn_fn(&self) -> SpawnTabFn {
        Rc::clone(&self.on_spawn)
    }

    pub(crate) fn reuse_fn(&self) -> Option<FindTabToReuseFn> {
        self.reuse.clone()
    }
}

/// Tab spawners keyed by tab type
///
/// Ordered so generated menus are stable.
#[derive(Debug, Default)]
pub struct SpawnerRegistry {
    entries: BTreeMap<String, TabSpawnerEntry>,
}

impl SpawnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tab_type`
    ///
    /// # Panics
    ///
    /// If `tab_type` is already registered.
    pub fn register(
        &mut self,
        tab_type: &str,
        on_spawn: impl Fn(&SpawnTabArgs) -> DockTab + 'static,
    ) -> &mut TabSpawnerEntry {
        assert!(
            !self.entries.contains_key(tab_type),
            "tab spawner {:?} is already registered",
            tab_type
        );
        self.entries
            .entry(tab_type.to_string())
            .or_insert_with(|| TabSpawnerEntry::new(tab_type, Rc::new(on_spawn)))
    }

    pub fn unregister(&mut self, tab_type: &str) -> bool {
        self.entries.remove(tab_type).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, tab_type: &str) -> Option<&TabSpawnerEntry> {
        self.entries.get(tab_type)
    }

    pub fn get_mut(&mut self, tab_type: &str) -> Option<&mut TabSpawnerEntry> {
        self.entries.get_mut(tab_type)
    }

    pub fn contains(&self, tab_type: &str) -> bool {
        self.entries.contains_key(tab_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TabSpawnerEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
