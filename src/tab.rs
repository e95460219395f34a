//! Live tabs - the runtime counterpart of a layout tab entry

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::docking::NodeId;
use crate::layout::TabId;
use crate::panels::PlaceholderPanel;
use crate::tab_manager::ManagerId;

/// Handle to a live tab owned by the global tab manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabHandle(pub u64);

/// What kind of tab this is; drives titles, activation and persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TabRole {
    /// Hosts a sub tab manager (an editor)
    MajorTab,
    #[default]
    PanelTab,
    /// A tab that can dock into any manager
    NomadTab,
    /// Never persisted; carries an instance id
    DocumentTab,
}

impl TabRole {
    /// Major and nomad tabs title the window they live in
    pub fn titles_window(self) -> bool {
        matches!(self, TabRole::MajorTab | TabRole::NomadTab)
    }
}

/// Content shown inside a tab
pub enum TabContent {
    Empty,
    Widget(Box<dyn Any>),
    Placeholder(PlaceholderPanel),
}

impl fmt::Debug for TabContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabContent::Empty => f.write_str("Empty"),
            TabContent::Widget(_) => f.write_str("Widget(..)"),
            TabContent::Placeholder(panel) => f.debug_tuple("Placeholder").field(panel).finish(),
        }
    }
}

pub type CanCloseFn = Rc<dyn Fn() -> bool>;

/// A live tab
///
/// Spawn callbacks build these; the manager stamps the layout id, parent
/// stack and owning manager when the tab is placed.
pub struct DockTab {
    layout_id: TabId,
    label: String,
    tooltip: String,
    icon: Option<String>,
    role: TabRole,
    content: TabContent,
    can_close: Option<CanCloseFn>,
    pub(crate) parent_stack: Option<NodeId>,
    pub(crate) manager: Option<ManagerId>,
    pub(crate) attention_count: u32,
    pub(crate) spawn_animations: u32,
    pub(crate) activation_time: u64,
}

impl fmt::Debug for DockTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockTab")
            .field("layout_id", &self.layout_id)
            .field("label", &self.label)
            .field("role", &self.role)
            .field("content", &self.content)
            .field("parent_stack", &self.parent_stack)
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

impl Default for DockTab {
    fn default() -> Self {
        Self::with_content(TabContent::Empty)
    }
}

impl DockTab {
    /// A tab wrapping arbitrary widget state
    pub fn new(widget: impl Any) -> Self {
        Self::with_content(TabContent::Widget(Box::new(widget)))
    }

    pub fn with_content(content: TabContent) -> Self {
        Self {
            layout_id: TabId::new(""),
            label: String::new(),
            tooltip: String::new(),
            icon: None,
            role: TabRole::default(),
            content,
            can_close: None,
            parent_stack: None,
            manager: None,
            attention_count: 0,
            spawn_animations: 0,
            activation_time: 0,
        }
    }

    /// Content for a tab type that has no spawner
    pub fn placeholder(tab_id: TabId) -> Self {
        let panel = PlaceholderPanel::new(tab_id.clone());
        let mut tab = Self::with_content(TabContent::Placeholder(panel));
        tab.label = tab_id.tab_type.clone();
        tab.layout_id = tab_id;
        tab
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_role(mut self, role: TabRole) -> Self {
        self.role = role;
        self
    }

    /// Install a predicate that can veto closing the tab
    pub fn on_can_close(mut self, can_close: impl Fn() -> bool + 'static) -> Self {
        self.can_close = Some(Rc::new(can_close));
        self
    }

    pub fn layout_id(&self) -> &TabId {
        &self.layout_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn role(&self) -> TabRole {
        self.role
    }

    pub fn content(&self) -> &TabContent {
        &self.content
    }

    /// Downcast widget content
    pub fn content_as<T: Any>(&self) -> Option<&T> {
        match &self.content {
            TabContent::Widget(widget) => widget.downcast_ref(),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, TabContent::Placeholder(_))
    }

    pub fn can_close_tab(&self) -> bool {
        self.can_close.as_ref().map_or(true, |can_close| can_close())
    }

    pub fn parent_stack(&self) -> Option<NodeId> {
        self.parent_stack
    }

    pub fn manager(&self) -> Option<ManagerId> {
        self.manager
    }

    /// How many times attention was drawn to this tab
    pub fn attention_count(&self) -> u32 {
        self.attention_count
    }

    pub fn spawn_animations(&self) -> u32 {
        self.spawn_animations
    }

    pub fn activation_time(&self) -> u64 {
        self.activation_time
    }

    pub(crate) fn set_layout_identifier(&mut self, tab_id: TabId) {
        self.layout_id = tab_id;
    }

    pub(crate) fn provide_default_label(&mut self, label: &str) {
        if self.label.is_empty() {
            self.label = label.to_string();
        }
    }

    pub(crate) fn provide_default_icon(&mut self, icon: Option<&str>) {
        if self.icon.is_none() {
            self.icon = icon.map(str::to_string);
        }
    }
}

/// Storage for every live tab, keyed by handle
#[derive(Debug, Default)]
pub(crate) struct TabStore {
    tabs: HashMap<TabHandle, DockTab>,
    next_tab_handle: u64,
}

impl TabStore {
    pub fn insert(&mut self, tab: DockTab) -> TabHandle {
        self.next_tab_handle += 1;
        let handle = TabHandle(self.next_tab_handle);
        self.tabs.insert(handle, tab);
        handle
    }

    pub fn get(&self, handle: TabHandle) -> Option<&DockTab> {
        self.tabs.get(&handle)
    }

    pub fn get_mut(&mut self, handle: TabHandle) -> Option<&mut DockTab> {
        self.tabs.get_mut(&handle)
    }

    pub fn remove(&mut self, handle: TabHandle) -> Option<DockTab> {
        self.tabs.remove(&handle)
    }

    pub fn contains(&self, handle: TabHandle) -> bool {
        self.tabs.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TabHandle, &DockTab)> {
        self.tabs.iter().map(|(handle, tab)| (*handle, tab))
    }
}
