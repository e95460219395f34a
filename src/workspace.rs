//! Workspace menu structure - groups that organize tab spawners in menus
//!
//! A [`WorkspaceItem`] tree describes how spawners are grouped. Generated menus
//! ([`crate::GlobalTabManager::populate_tab_spawner_menu`]) walk it and emit
//! [`MenuElement`]s: groups at even depths become sections, groups at odd
//! depths become sub-menus.

/// A node in the workspace menu tree
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceItem {
    display_name: String,
    tooltip: String,
    icon: Option<String>,
    kind: WorkspaceItemKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceItemKind {
    Group { children: Vec<WorkspaceItem> },
    Spawner { tab_type: String },
}

impl WorkspaceItem {
    pub fn new_group(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            tooltip: String::new(),
            icon: None,
            kind: WorkspaceItemKind::Group {
                children: Vec::new(),
            },
        }
    }

    pub fn new_spawner(tab_type: impl Into<String>) -> Self {
        let tab_type = tab_type.into();
        Self {
            display_name: tab_type.clone(),
            tooltip: String::new(),
            icon: None,
            kind: WorkspaceItemKind::Spawner { tab_type },
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn kind(&self) -> &WorkspaceItemKind {
        &self.kind
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, WorkspaceItemKind::Group { .. })
    }

    pub fn children(&self) -> &[WorkspaceItem] {
        match &self.kind {
            WorkspaceItemKind::Group { children } => children,
            WorkspaceItemKind::Spawner { .. } => &[],
        }
    }

    /// Append `item`; spawner items cannot hold children and ignore the call
    pub fn add_item(&mut self, item: WorkspaceItem) -> &mut WorkspaceItem {
        if let WorkspaceItemKind::Spawner { tab_type } = &self.kind {
            tracing::warn!(%tab_type, "cannot add menu items under a spawner entry");
            return self;
        }
        let WorkspaceItemKind::Group { children } = &mut self.kind else {
            unreachable!("spawner items returned above");
        };
        children.push(item);
        let last = children.len() - 1;
        &mut children[last]
    }

    pub fn add_group(&mut self, display_name: impl Into<String>) -> &mut WorkspaceItem {
        self.add_item(WorkspaceItem::new_group(display_name))
    }

    pub fn add_spawner(&mut self, tab_type: impl Into<String>) -> &mut WorkspaceItem {
        self.add_item(WorkspaceItem::new_spawner(tab_type))
    }

    pub fn clear_items(&mut self) {
        if let WorkspaceItemKind::Group { children } = &mut self.kind {
            children.clear();
        }
    }

    /// Sort children by display name, recursively
    pub fn sort_children(&mut self) {
        if let WorkspaceItemKind::Group { children } = &mut self.kind {
            children.sort_by(|a, b| a.display_name.cmp(&b.display_name));
            for child in children {
                child.sort_children();
            }
        }
    }

    /// True if `tab_type` is referenced anywhere below this item
    pub fn contains_spawner(&self, tab_type: &str) -> bool {
        match &self.kind {
            WorkspaceItemKind::Spawner { tab_type: t } => t == tab_type,
            WorkspaceItemKind::Group { children } => {
                children.iter().any(|child| child.contains_spawner(tab_type))
            }
        }
    }

    pub fn find_group(&self, display_name: &str) -> Option<&WorkspaceItem> {
        self.children().iter().find_map(|child| {
            if child.is_group() && child.display_name == display_name {
                Some(child)
            } else {
                child.find_group(display_name)
            }
        })
    }

    /// True if some spawner below this item satisfies `shown`
    pub fn has_visible_spawner(&self, shown: &dyn Fn(&str) -> bool) -> bool {
        match &self.kind {
            WorkspaceItemKind::Spawner { tab_type } => shown(tab_type),
            WorkspaceItemKind::Group { children } => {
                children.iter().any(|child| child.has_visible_spawner(shown))
            }
        }
    }
}

// ============================================================================
// Menu output
// ============================================================================

/// A clickable menu entry that invokes a tab
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub tab_type: String,
    pub label: String,
    pub tooltip: String,
    pub icon: Option<String>,
    pub enabled: bool,
    /// The tab type's single instance is currently open
    pub checked: bool,
}

/// Generated menu structure
#[derive(Debug, Clone, PartialEq)]
pub enum MenuElement {
    Entry(MenuEntry),
    Section {
        label: String,
        children: Vec<MenuElement>,
    },
    SubMenu {
        label: String,
        tooltip: String,
        icon: Option<String>,
        children: Vec<MenuElement>,
    },
}

impl MenuElement {
    pub fn label(&self) -> &str {
        match self {
            MenuElement::Entry(entry) => &entry.label,
            MenuElement::Section { label, .. } | MenuElement::SubMenu { label, .. } => label,
        }
    }

    pub fn children(&self) -> &[MenuElement] {
        match self {
            MenuElement::Entry(_) => &[],
            MenuElement::Section { children, .. } | MenuElement::SubMenu { children, .. } => {
                children
            }
        }
    }
}
