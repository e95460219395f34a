//! Docking tree - the live counterpart of the layout model
//!
//! Nodes live in an arena ([`DockTree`]) keyed by [`NodeId`]. Splitters own
//! their children through their child lists; the `parent` id on each node is
//! only used for navigation. A splitter that carries [`DockAreaInfo`] is the
//! root of a dock area.
//!
//! ## Architecture
//!
//! - `mod.rs`: node types, arena, structural edits (`place_node`,
//!   `remove_child_at`)
//! - `cleanup.rs`: `clean_up_nodes` and gathering back into the layout model
//! - `geometry.rs`: turning coefficients into rectangles and splitter bars

mod cleanup;
mod geometry;

use std::collections::HashMap;

use crate::layout::{Orientation, Tab, TabId, TabState, WindowPlacement};
use crate::tab::TabHandle;
use crate::tab_manager::ManagerId;
use crate::window::WindowId;

pub use cleanup::CleanUpResult;
pub use geometry::{DockGeometry, SplitterBar, SPLITTER_WIDTH};

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a docking node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Side of a reference node where a new node is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeDirection {
    LeftOf,
    RightOf,
    Above,
    Below,
}

impl RelativeDirection {
    pub fn orientation(self) -> Orientation {
        match self {
            RelativeDirection::LeftOf | RelativeDirection::RightOf => Orientation::Horizontal,
            RelativeDirection::Above | RelativeDirection::Below => Orientation::Vertical,
        }
    }

    fn inserts_after(self) -> bool {
        matches!(self, RelativeDirection::RightOf | RelativeDirection::Below)
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Visual state of one child slot in a splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitterSlot {
    /// Takes no space; the child only holds closed-tab history
    pub collapsed: bool,
}

/// What makes a splitter the root of a dock area
#[derive(Debug, Clone, PartialEq)]
pub struct DockAreaInfo {
    pub manager: ManagerId,
    /// Window hosting the area
    pub window: Option<WindowId>,
    /// The area created `window` and destroys it when it goes away
    pub owns_window: bool,
    pub placement: WindowPlacement,
    /// Embedded areas draw the host window's title area
    pub embed_title_area: bool,
}

#[derive(Debug, Clone)]
pub struct SplitterNode {
    pub orientation: Orientation,
    children: Vec<NodeId>,
    slots: Vec<SplitterSlot>,
    area: Option<DockAreaInfo>,
}

impl SplitterNode {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn slots(&self) -> &[SplitterSlot] {
        &self.slots
    }

    pub fn area(&self) -> Option<&DockAreaInfo> {
        self.area.as_ref()
    }
}

/// A layout tab entry, plus the live tab currently filling it
#[derive(Debug, Clone, PartialEq)]
pub struct StackEntry {
    pub tab: Tab,
    pub live: Option<TabHandle>,
}

#[derive(Debug, Clone, Default)]
pub struct StackNode {
    entries: Vec<StackEntry>,
    foreground: Option<TabHandle>,
    hide_tab_well: bool,
}

impl StackNode {
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    pub fn live_tabs(&self) -> impl Iterator<Item = TabHandle> + '_ {
        self.entries.iter().filter_map(|entry| entry.live)
    }

    pub fn foreground(&self) -> Option<TabHandle> {
        self.foreground
    }

    pub fn hide_tab_well(&self) -> bool {
        self.hide_tab_well
    }

    pub fn contains_tab(&self, handle: TabHandle) -> bool {
        self.entries.iter().any(|entry| entry.live == Some(handle))
    }

    /// Any entry, open or closed, matching `tab_id`
    pub fn has_entry_matching(&self, tab_id: &TabId) -> bool {
        self.entries.iter().any(|entry| entry.tab.tab_id.matches(tab_id))
    }

    pub fn tab_id_of(&self, handle: TabHandle) -> Option<&TabId> {
        self.entries
            .iter()
            .find(|entry| entry.live == Some(handle))
            .map(|entry| &entry.tab.tab_id)
    }

    pub(crate) fn set_entries(&mut self, tabs: Vec<Tab>) {
        self.entries = tabs
            .into_iter()
            .map(|tab| StackEntry { tab, live: None })
            .collect();
    }

    /// Attach a live tab to the first free entry with the same id,
    /// or add a new entry at `index` (end if `None`)
    pub(crate) fn attach_tab(&mut self, handle: TabHandle, tab_id: &TabId, index: Option<usize>) {
        let existing = self
            .entries
            .iter_mut()
            .find(|entry| entry.live.is_none() && &entry.tab.tab_id == tab_id);

        match existing {
            Some(entry) => {
                entry.live = Some(handle);
                entry.tab.state = TabState::Opened;
            }
            None => {
                let at = index.unwrap_or(self.entries.len()).min(self.entries.len());
                self.entries.insert(
                    at,
                    StackEntry {
                        tab: Tab::opened(tab_id.clone()),
                        live: Some(handle),
                    },
                );
            }
        }
    }

    /// Fill an existing entry at `index` with a live tab
    pub(crate) fn attach_at(&mut self, index: usize, handle: TabHandle) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.live = Some(handle);
            entry.tab.state = TabState::Opened;
        }
    }

    /// Make `handle` the foreground tab; returns the previous one
    pub(crate) fn set_foreground(&mut self, handle: TabHandle) -> Option<TabHandle> {
        if !self.contains_tab(handle) {
            return self.foreground;
        }
        self.foreground.replace(handle)
    }

    /// Detach a live tab. With `keep_history` the entry stays as a closed tab,
    /// otherwise it is removed. Returns the new foreground tab if it changed.
    pub(crate) fn detach_tab(&mut self, handle: TabHandle, keep_history: bool) -> Option<TabHandle> {
        let Some(index) = self.entries.iter().position(|e| e.live == Some(handle)) else {
            return None;
        };

        if keep_history {
            let entry = &mut self.entries[index];
            entry.live = None;
            entry.tab.state = TabState::Closed;
        } else {
            self.entries.remove(index);
        }

        if self.foreground != Some(handle) {
            return None;
        }

        let after = self.entries[index.min(self.entries.len())..]
            .iter()
            .find_map(|entry| entry.live);
        let before = self.entries[..index.min(self.entries.len())]
            .iter()
            .rev()
            .find_map(|entry| entry.live);
        self.foreground = after.or(before);
        self.foreground
    }

    /// Drop history entries (no live tab) that match `tab_id`
    pub(crate) fn remove_stale_entries(&mut self, tab_id: &TabId) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.live.is_some() || !entry.tab.tab_id.matches(tab_id));
        before - self.entries.len()
    }
}

#[derive(Debug, Clone)]
pub enum DockNodeKind {
    Splitter(SplitterNode),
    Stack(StackNode),
}

#[derive(Debug, Clone)]
pub struct DockNode {
    pub parent: Option<NodeId>,
    pub size_coefficient: f32,
    pub kind: DockNodeKind,
}

// ============================================================================
// Arena
// ============================================================================

/// Arena of docking nodes for every dock area of every manager
#[derive(Debug, Default)]
pub struct DockTree {
    nodes: HashMap<NodeId, DockNode>,
    next_node_id: u64,
}

impl DockTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, size_coefficient: f32, kind: DockNodeKind) -> NodeId {
        self.next_node_id += 1;
        let id = NodeId(self.next_node_id);
        self.nodes.insert(
            id,
            DockNode {
                parent: None,
                size_coefficient,
                kind,
            },
        );
        id
    }

    pub fn new_stack(&mut self, size_coefficient: f32, hide_tab_well: bool) -> NodeId {
        self.alloc(
            size_coefficient,
            DockNodeKind::Stack(StackNode {
                hide_tab_well,
                ..StackNode::default()
            }),
        )
    }

    pub fn new_splitter(
        &mut self,
        orientation: Orientation,
        size_coefficient: f32,
        area: Option<DockAreaInfo>,
    ) -> NodeId {
        self.alloc(
            size_coefficient,
            DockNodeKind::Splitter(SplitterNode {
                orientation,
                children: Vec::new(),
                slots: Vec::new(),
                area,
            }),
        )
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&DockNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn size_coefficient(&self, id: NodeId) -> f32 {
        self.nodes.get(&id).map_or(0.0, |node| node.size_coefficient)
    }

    pub fn set_size_coefficient(&mut self, id: NodeId, coefficient: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.size_coefficient = coefficient;
        }
    }

    pub fn stack(&self, id: NodeId) -> Option<&StackNode> {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(DockNodeKind::Stack(stack)) => Some(stack),
            _ => None,
        }
    }

    pub(crate) fn stack_mut(&mut self, id: NodeId) -> Option<&mut StackNode> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(DockNodeKind::Stack(stack)) => Some(stack),
            _ => None,
        }
    }

    pub fn splitter(&self, id: NodeId) -> Option<&SplitterNode> {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(DockNodeKind::Splitter(splitter)) => Some(splitter),
            _ => None,
        }
    }

    fn splitter_mut(&mut self, id: NodeId) -> Option<&mut SplitterNode> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(DockNodeKind::Splitter(splitter)) => Some(splitter),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.splitter(id).map_or(&[], |splitter| splitter.children())
    }

    pub fn area_info(&self, id: NodeId) -> Option<&DockAreaInfo> {
        self.splitter(id).and_then(|splitter| splitter.area())
    }

    pub(crate) fn area_info_mut(&mut self, id: NodeId) -> Option<&mut DockAreaInfo> {
        self.splitter_mut(id).and_then(|splitter| splitter.area.as_mut())
    }

    pub fn is_area(&self, id: NodeId) -> bool {
        self.area_info(id).is_some()
    }

    /// The dock area containing `id` (which may be the area itself)
    pub fn area_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.is_area(node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Every stack under `root`, in visual order
    pub fn stacks_under(&self, root: NodeId) -> Vec<NodeId> {
        let mut stacks = Vec::new();
        self.collect_stacks(root, &mut stacks);
        stacks
    }

    fn collect_stacks(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(DockNodeKind::Stack(_)) => out.push(id),
            Some(DockNodeKind::Splitter(splitter)) => {
                for child in &splitter.children {
                    self.collect_stacks(*child, out);
                }
            }
            None => {}
        }
    }

    /// Every live tab under `root`, in visual order
    pub fn live_tabs_under(&self, root: NodeId) -> Vec<TabHandle> {
        self.stacks_under(root)
            .into_iter()
            .filter_map(|stack| self.stack(stack))
            .flat_map(|stack| stack.live_tabs().collect::<Vec<_>>())
            .collect()
    }

    // ========================================================================
    // Structural edits
    // ========================================================================

    /// Insert `child` into `splitter` at `index`, keeping slots parallel
    pub(crate) fn insert_child(
        &mut self,
        splitter: NodeId,
        index: usize,
        child: NodeId,
        slot: SplitterSlot,
    ) {
        let Some(node) = self.splitter_mut(splitter) else {
            tracing::error!(?splitter, "insert_child on a node that is not a splitter");
            return;
        };
        let at = index.min(node.children.len());
        node.children.insert(at, child);
        node.slots.insert(at, slot);

        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = Some(splitter);
        }
    }

    pub(crate) fn add_child(&mut self, splitter: NodeId, child: NodeId) {
        let end = self.children(splitter).len();
        self.insert_child(splitter, end, child, SplitterSlot::default());
    }

    /// Remove the child at `index`; the child node stays in the arena
    pub fn remove_child_at(
        &mut self,
        splitter: NodeId,
        index: usize,
    ) -> Option<(NodeId, SplitterSlot)> {
        let node = self.splitter_mut(splitter)?;
        if index >= node.children.len() {
            return None;
        }
        let child = node.children.remove(index);
        let slot = node.slots.remove(index);

        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = None;
        }
        Some((child, slot))
    }

    fn detach_from_parent(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(index) = self.children(parent).iter().position(|c| *c == id) {
            self.remove_child_at(parent, index);
        }
    }

    /// Place `new_node` next to `relative_to`, a child of `splitter`
    ///
    /// Returns false if `relative_to` is not a child of `splitter`.
    pub fn place_node(
        &mut self,
        splitter: NodeId,
        new_node: NodeId,
        direction: RelativeDirection,
        relative_to: NodeId,
    ) -> bool {
        let orientation = direction.orientation();
        let Some(index) = self.children(splitter).iter().position(|c| *c == relative_to) else {
            return false;
        };
        let Some(node) = self.splitter_mut(splitter) else {
            return false;
        };

        if node.orientation != orientation && node.children.len() == 1 {
            node.orientation = orientation;
        }

        if node.orientation == orientation {
            let at = if direction.inserts_after() { index + 1 } else { index };
            self.insert_child(splitter, at, new_node, SplitterSlot::default());
            return true;
        }

        // Wrap the reference in a splitter of the requested orientation
        let coefficient = self.size_coefficient(relative_to);
        let wrapper = self.new_splitter(orientation, coefficient, None);
        let slot = self
            .remove_child_at(splitter, index)
            .map(|(_, slot)| slot)
            .unwrap_or_default();
        self.insert_child(splitter, index, wrapper, slot);

        self.set_size_coefficient(new_node, coefficient);
        if direction.inserts_after() {
            self.add_child(wrapper, relative_to);
            self.add_child(wrapper, new_node);
        } else {
            self.add_child(wrapper, new_node);
            self.add_child(wrapper, relative_to);
        }
        true
    }

    /// Remove `root` and everything below it; returns the live tabs it held
    pub(crate) fn destroy_subtree(&mut self, root: NodeId) -> Vec<TabHandle> {
        self.detach_from_parent(root);

        let mut live = Vec::new();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            match self.nodes.remove(&id).map(|node| node.kind) {
                Some(DockNodeKind::Splitter(splitter)) => pending.extend(splitter.children),
                Some(DockNodeKind::Stack(stack)) => live.extend(stack.live_tabs()),
                None => {}
            }
        }
        live
    }

    /// Check structural invariants of the arena
    ///
    /// - Every splitter's `children` and `slots` have the same length
    /// - Every child's parent id points back at its splitter
    /// - Every stack's foreground tab is live in that stack
    /// - No live tab appears in more than one entry
    ///
    /// Panics in debug builds if any invariant is violated.
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        let mut seen = std::collections::HashSet::new();

        for (id, node) in &self.nodes {
            match &node.kind {
                DockNodeKind::Splitter(splitter) => {
                    assert_eq!(
                        splitter.children.len(),
                        splitter.slots.len(),
                        "Splitter {:?} has {} children but {} slots",
                        id,
                        splitter.children.len(),
                        splitter.slots.len()
                    );
                    for child in &splitter.children {
                        let parent = self.parent(*child);
                        assert_eq!(
                            parent,
                            Some(*id),
                            "Child {:?} of {:?} records parent {:?}",
                            child,
                            id,
                            parent
                        );
                    }
                }
                DockNodeKind::Stack(stack) => {
                    if let Some(fg) = stack.foreground {
                        assert!(
                            stack.contains_tab(fg),
                            "Stack {:?} foreground {:?} is not one of its live tabs",
                            id,
                            fg
                        );
                    }
                    for handle in stack.live_tabs() {
                        assert!(seen.insert(handle), "Tab {:?} is live in two places", handle);
                    }
                }
            }
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}
