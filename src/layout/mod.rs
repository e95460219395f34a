//! Layout model - the declarative description of a docking arrangement
//!
//! A [`Layout`] is a list of [`Area`]s. Each area is a splitter tree whose
//! leaves are [`Stack`]s of tabs, plus a [`WindowPlacement`] that says whether
//! the area lives in its own window.
//!
//! ## Architecture
//!
//! - Layouts are built with the consuming builder API below
//! - `GlobalTabManager::restore_from` consumes a layout once to build the
//!   runtime docking tree
//! - `GlobalTabManager::persist_layout` gathers the runtime tree back into a
//!   layout, running [`Area::collapse`] on the result
//! - `persist` maps the model to and from the JSON format

mod extender;
mod persist;
mod tab_id;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

pub use extender::{LayoutExtender, LayoutExtensionPosition};
pub use persist::LayoutError;
pub use tab_id::{Tab, TabId, TabState};

/// Axis along which a splitter lays out its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Children arranged left-to-right
    #[default]
    #[serde(rename = "Orient_Horizontal")]
    Horizontal,
    /// Children arranged top-to-bottom
    #[serde(rename = "Orient_Vertical")]
    Vertical,
}

impl Orientation {
    pub fn other(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Where an area's window goes when the area is materialized
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowPlacement {
    /// Embedded in the caller's window; this is the primary area
    NoWindow,
    /// A new window of `size`, centred by the window provider
    Automatic { size: Vec2 },
    /// A new window at an exact position
    Specified {
        position: Vec2,
        size: Vec2,
        maximized: bool,
    },
}

impl WindowPlacement {
    pub fn needs_window(&self) -> bool {
        !matches!(self, WindowPlacement::NoWindow)
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// A node of the layout tree
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    Stack(Stack),
    Splitter(Splitter),
    Area(Area),
}

impl LayoutNode {
    pub fn size_coefficient(&self) -> f32 {
        match self {
            LayoutNode::Stack(stack) => stack.size_coefficient,
            LayoutNode::Splitter(splitter) => splitter.size_coefficient,
            LayoutNode::Area(area) => area.splitter.size_coefficient,
        }
    }

    pub fn set_size_coefficient(&mut self, coefficient: f32) {
        match self {
            LayoutNode::Stack(stack) => stack.size_coefficient = coefficient,
            LayoutNode::Splitter(splitter) => splitter.size_coefficient = coefficient,
            LayoutNode::Area(area) => area.splitter.size_coefficient = coefficient,
        }
    }

    /// True if any tab below this node satisfies `predicate`
    pub fn any_tab(&self, predicate: &mut dyn FnMut(&Tab) -> bool) -> bool {
        match self {
            LayoutNode::Stack(stack) => stack.tabs.iter().any(|tab| predicate(tab)),
            LayoutNode::Splitter(splitter) => splitter.any_tab(predicate),
            LayoutNode::Area(area) => area.splitter.any_tab(predicate),
        }
    }

    pub fn for_each_stack_mut(&mut self, visit: &mut dyn FnMut(&mut Stack)) {
        match self {
            LayoutNode::Stack(stack) => visit(stack),
            LayoutNode::Splitter(splitter) => splitter.for_each_stack_mut(visit),
            LayoutNode::Area(area) => area.splitter.for_each_stack_mut(visit),
        }
    }

    fn for_each_stack<'a>(&'a self, visit: &mut dyn FnMut(&'a Stack)) {
        match self {
            LayoutNode::Stack(stack) => visit(stack),
            LayoutNode::Splitter(splitter) => splitter.for_each_stack(visit),
            LayoutNode::Area(area) => area.splitter.for_each_stack(visit),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            LayoutNode::Stack(_) => "Stack",
            LayoutNode::Splitter(_) => "Splitter",
            LayoutNode::Area(_) => "Area",
        }
    }
}

impl From<Stack> for LayoutNode {
    fn from(stack: Stack) -> Self {
        LayoutNode::Stack(stack)
    }
}

impl From<Splitter> for LayoutNode {
    fn from(splitter: Splitter) -> Self {
        LayoutNode::Splitter(splitter)
    }
}

impl From<Area> for LayoutNode {
    fn from(area: Area) -> Self {
        LayoutNode::Area(area)
    }
}

/// A tab well holding an ordered list of tabs
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    pub size_coefficient: f32,
    pub tabs: Vec<Tab>,
    pub hide_tab_well: bool,
    pub foreground_tab: Option<TabId>,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self {
            size_coefficient: 1.0,
            tabs: Vec::new(),
            hide_tab_well: false,
            foreground_tab: None,
        }
    }

    pub fn add_tab(mut self, tab_id: impl Into<TabId>, state: TabState) -> Self {
        self.tabs.push(Tab::new(tab_id, state));
        self
    }

    pub fn with_size_coefficient(mut self, coefficient: f32) -> Self {
        self.size_coefficient = coefficient;
        self
    }

    pub fn with_hide_tab_well(mut self, hide: bool) -> Self {
        self.hide_tab_well = hide;
        self
    }

    pub fn with_foreground_tab(mut self, tab_id: impl Into<TabId>) -> Self {
        self.foreground_tab = Some(tab_id.into());
        self
    }

    /// The foreground tab, honoured only when it names a tab in this stack
    pub fn effective_foreground(&self) -> Option<&TabId> {
        self.foreground_tab
            .as_ref()
            .filter(|fg| self.tabs.iter().any(|tab| &tab.tab_id == *fg))
    }

    pub fn find_tab(&self, tab_id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.tab_id.matches(tab_id))
    }
}

/// Lays out its children along one axis
#[derive(Debug, Clone, PartialEq)]
pub struct Splitter {
    pub size_coefficient: f32,
    pub orientation: Orientation,
    pub children: Vec<LayoutNode>,
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Splitter {
    pub fn new() -> Self {
        Self {
            size_coefficient: 1.0,
            orientation: Orientation::Horizontal,
            children: Vec::new(),
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_size_coefficient(mut self, coefficient: f32) -> Self {
        self.size_coefficient = coefficient;
        self
    }

    pub fn split(mut self, node: impl Into<LayoutNode>) -> Self {
        self.children.push(node.into());
        self
    }

    fn any_tab(&self, predicate: &mut dyn FnMut(&Tab) -> bool) -> bool {
        self.children.iter().any(|child| child.any_tab(predicate))
    }

    fn for_each_stack_mut(&mut self, visit: &mut dyn FnMut(&mut Stack)) {
        for child in &mut self.children {
            child.for_each_stack_mut(visit);
        }
    }

    fn for_each_stack<'a>(&'a self, visit: &mut dyn FnMut(&'a Stack)) {
        for child in &self.children {
            child.for_each_stack(visit);
        }
    }

    /// Normalize this splitter tree
    ///
    /// - Empty stacks and splitters are dropped
    /// - A child splitter with the same orientation, or with a single child,
    ///   is folded into this one; its children are rescaled so they keep the
    ///   space the folded splitter had
    /// - If the only remaining child is a splitter, this splitter adopts its
    ///   orientation and children
    ///
    /// Returns `None` when nothing with layout information is left.
    /// Running it on its own output changes nothing.
    pub fn collapse(self) -> Option<Splitter> {
        let Splitter {
            size_coefficient,
            orientation,
            children,
        } = self;

        let mut folded = Vec::with_capacity(children.len());
        for child in children {
            match child {
                LayoutNode::Stack(stack) => {
                    if !stack.tabs.is_empty() {
                        folded.push(LayoutNode::Stack(stack));
                    }
                }
                LayoutNode::Splitter(inner) => {
                    let Some(inner) = inner.collapse() else {
                        continue;
                    };
                    if inner.orientation == orientation || inner.children.len() == 1 {
                        folded.extend(inner.into_promoted_children());
                    } else {
                        folded.push(LayoutNode::Splitter(inner));
                    }
                }
                LayoutNode::Area(area) => {
                    if let Some(area) = area.collapse() {
                        folded.push(LayoutNode::Area(area));
                    }
                }
            }
        }

        if folded.is_empty() {
            return None;
        }

        let mut splitter = Splitter {
            size_coefficient,
            orientation,
            children: folded,
        };

        if let [LayoutNode::Splitter(_)] = splitter.children.as_slice() {
            if let Some(LayoutNode::Splitter(only)) = splitter.children.pop() {
                splitter.orientation = only.orientation;
                splitter.children = only.into_promoted_children();
            }
        }

        Some(splitter)
    }

    /// Children of a splitter that is being folded away, rescaled to share
    /// the folded splitter's own coefficient
    fn into_promoted_children(self) -> Vec<LayoutNode> {
        let coefficients: Vec<f32> = self.children.iter().map(|c| c.size_coefficient()).collect();
        let scaled = promoted_coefficients(self.size_coefficient, &coefficients);
        let mut children = self.children;
        for (child, coefficient) in children.iter_mut().zip(scaled) {
            child.set_size_coefficient(coefficient);
        }
        children
    }
}

/// Rescale `children` so they sum to `parent`, keeping their proportions
///
/// Degenerate input (all weights zero or negative) is split evenly.
pub fn promoted_coefficients(parent: f32, children: &[f32]) -> Vec<f32> {
    let total: f32 = children.iter().sum();
    if total > 0.0 {
        children.iter().map(|c| c * parent / total).collect()
    } else {
        let even = parent / children.len().max(1) as f32;
        vec![even; children.len()]
    }
}

/// A splitter tree with a window placement
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub splitter: Splitter,
    pub placement: WindowPlacement,
}

impl Area {
    /// An area that gets its own auto-centred window of `size`
    pub fn new(size: Vec2) -> Self {
        Self {
            splitter: Splitter::new(),
            placement: WindowPlacement::Automatic { size },
        }
    }

    /// An area hosted in the caller's window
    pub fn primary() -> Self {
        Self {
            splitter: Splitter::new(),
            placement: WindowPlacement::NoWindow,
        }
    }

    pub fn with_placement(mut self, placement: WindowPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Pin the window to an exact position, keeping the current size
    pub fn set_window(mut self, position: Vec2, maximized: bool) -> Self {
        let size = match self.placement {
            WindowPlacement::Automatic { size } | WindowPlacement::Specified { size, .. } => size,
            WindowPlacement::NoWindow => Vec2::ZERO,
        };
        self.placement = WindowPlacement::Specified {
            position,
            size,
            maximized,
        };
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.splitter.orientation = orientation;
        self
    }

    pub fn with_size_coefficient(mut self, coefficient: f32) -> Self {
        self.splitter.size_coefficient = coefficient;
        self
    }

    pub fn split(mut self, node: impl Into<LayoutNode>) -> Self {
        self.splitter.children.push(node.into());
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.splitter.orientation
    }

    pub fn children(&self) -> &[LayoutNode] {
        &self.splitter.children
    }

    pub fn is_primary(&self) -> bool {
        !self.placement.needs_window()
    }

    /// [`Splitter::collapse`] on the area's splitter, keeping the placement
    pub fn collapse(self) -> Option<Area> {
        let Area {
            splitter,
            placement,
        } = self;
        splitter.collapse().map(|splitter| Area {
            splitter,
            placement,
        })
    }

    pub fn any_tab(&self, mut predicate: impl FnMut(&Tab) -> bool) -> bool {
        self.splitter.any_tab(&mut predicate)
    }

    /// Any tab marked open, regardless of whether it can be spawned
    pub fn has_open_tabs(&self) -> bool {
        self.any_tab(|tab| tab.is_opened())
    }

    pub fn stacks(&self) -> Vec<&Stack> {
        let mut stacks = Vec::new();
        self.splitter.for_each_stack(&mut |stack| stacks.push(stack));
        stacks
    }

    pub fn for_each_stack_mut(&mut self, mut visit: impl FnMut(&mut Stack)) {
        self.splitter.for_each_stack_mut(&mut visit);
    }

    /// Drop every entry matching `tab_id`; returns how many were removed
    pub fn remove_tab_entries(&mut self, tab_id: &TabId) -> usize {
        let mut removed = 0;
        self.for_each_stack_mut(|stack| {
            let before = stack.tabs.len();
            stack.tabs.retain(|tab| !tab.tab_id.matches(tab_id));
            removed += before - stack.tabs.len();
            if stack
                .foreground_tab
                .as_ref()
                .is_some_and(|fg| fg.matches(tab_id))
            {
                stack.foreground_tab = None;
            }
        });
        removed
    }
}

// ============================================================================
// Layout
// ============================================================================

/// A named set of areas, one of which may be the primary area
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub name: String,
    pub areas: Vec<Area>,
    pub primary_area_index: Option<usize>,
}

impl Layout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            areas: Vec::new(),
            primary_area_index: None,
        }
    }

    /// Append an area; the first `NoWindow` area becomes the primary area
    pub fn add_area(mut self, area: Area) -> Self {
        self.push_area(area);
        self
    }

    pub fn push_area(&mut self, area: Area) {
        if self.primary_area_index.is_none() && area.is_primary() {
            self.primary_area_index = Some(self.areas.len());
        }
        self.areas.push(area);
    }

    pub fn primary_area(&self) -> Option<&Area> {
        self.primary_area_index.and_then(|index| self.areas.get(index))
    }

    /// Rewrite tab types through `redirects` (old type -> new type)
    pub fn redirect_tab_types(&mut self, redirects: &HashMap<String, String>) {
        if redirects.is_empty() {
            return;
        }
        for area in &mut self.areas {
            area.for_each_stack_mut(|stack| {
                let ids = stack
                    .tabs
                    .iter_mut()
                    .map(|tab| &mut tab.tab_id)
                    .chain(stack.foreground_tab.as_mut());
                for id in ids {
                    if let Some(new_type) = redirects.get(&id.tab_type) {
                        id.tab_type = new_type.clone();
                    }
                }
            });
        }
    }

    /// Every tab id mentioned anywhere in the layout
    pub fn all_tab_ids(&self) -> Vec<&TabId> {
        let mut ids = Vec::new();
        for area in &self.areas {
            for stack in area.stacks() {
                ids.extend(stack.tabs.iter().map(|tab| &tab.tab_id));
            }
        }
        ids
    }

    /// Run [`Area::collapse`] over every area, dropping areas that end up empty
    pub fn collapse_splitters(self) -> Layout {
        let Layout {
            name,
            areas,
            primary_area_index,
        } = self;

        let mut layout = Layout::new(name);
        for (index, area) in areas.into_iter().enumerate() {
            if let Some(area) = area.collapse() {
                if primary_area_index == Some(index) {
                    layout.primary_area_index = Some(layout.areas.len());
                }
                layout.areas.push(area);
            }
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(id: &str, coefficient: f32) -> Stack {
        Stack::new()
            .add_tab(id, TabState::Opened)
            .with_size_coefficient(coefficient)
    }

    fn coefficients(splitter: &Splitter) -> Vec<f32> {
        splitter.children.iter().map(|c| c.size_coefficient()).collect()
    }

    #[test]
    fn test_same_orientation_child_is_folded_with_rescale() {
        let inner = Splitter::new()
            .with_orientation(Orientation::Horizontal)
            .with_size_coefficient(2.0)
            .split(stack("A", 1.0))
            .split(stack("B", 3.0));
        let outer = Splitter::new()
            .with_orientation(Orientation::Horizontal)
            .split(stack("Left", 1.0))
            .split(inner);

        let collapsed = outer.collapse().unwrap();
        assert_eq!(collapsed.children.len(), 3);
        assert_eq!(coefficients(&collapsed), vec![1.0, 0.5, 1.5]);
    }

    #[test]
    fn test_single_child_splitter_is_folded() {
        let inner = Splitter::new()
            .with_orientation(Orientation::Vertical)
            .with_size_coefficient(0.4)
            .split(stack("A", 0.8));
        let outer = Splitter::new()
            .split(stack("Left", 0.6))
            .split(inner);

        let collapsed = outer.collapse().unwrap();
        assert_eq!(collapsed.orientation, Orientation::Horizontal);
        assert_eq!(collapsed.children.len(), 2);
        assert!(matches!(collapsed.children[1], LayoutNode::Stack(_)));
        assert!((collapsed.children[1].size_coefficient() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_sole_splitter_child_is_adopted() {
        let inner = Splitter::new()
            .with_orientation(Orientation::Vertical)
            .with_size_coefficient(2.0)
            .split(stack("Top", 1.0))
            .split(stack("Bottom", 3.0));
        let outer = Splitter::new()
            .with_orientation(Orientation::Horizontal)
            .split(inner);

        let collapsed = outer.collapse().unwrap();
        assert_eq!(collapsed.orientation, Orientation::Vertical);
        assert_eq!(coefficients(&collapsed), vec![0.5, 1.5]);
    }

    #[test]
    fn test_empty_nodes_are_dropped() {
        let outer = Splitter::new()
            .split(Stack::new())
            .split(Splitter::new().split(Stack::new()))
            .split(stack("Log", 1.0));

        let collapsed = outer.collapse().unwrap();
        assert_eq!(collapsed.children.len(), 1);

        assert!(Splitter::new().split(Stack::new()).collapse().is_none());
    }

    #[test]
    fn test_collapse_is_idempotent() {
        let tree = Splitter::new()
            .split(stack("A", 1.0))
            .split(
                Splitter::new()
                    .with_orientation(Orientation::Vertical)
                    .with_size_coefficient(0.7)
                    .split(stack("B", 0.3))
                    .split(
                        Splitter::new()
                            .with_orientation(Orientation::Vertical)
                            .split(stack("C", 2.0))
                            .split(stack("D", 2.0)),
                    )
                    .split(Splitter::new().split(stack("E", 1.0))),
            );

        let once = tree.collapse().unwrap();
        let twice = once.clone().collapse().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_degenerate_coefficients_split_evenly() {
        assert_eq!(promoted_coefficients(1.0, &[0.0, 0.0]), vec![0.5, 0.5]);
        assert_eq!(promoted_coefficients(2.0, &[1.0, 3.0]), vec![0.5, 1.5]);
    }

    #[test]
    fn test_add_area_marks_first_no_window_area_primary() {
        let layout = Layout::new("Test")
            .add_area(Area::new(Vec2::new(800.0, 600.0)).split(stack("Float", 1.0)))
            .add_area(Area::primary().split(stack("Main", 1.0)))
            .add_area(Area::primary().split(stack("Extra", 1.0)));

        assert_eq!(layout.primary_area_index, Some(1));
        assert!(layout.primary_area().unwrap().is_primary());
    }

    #[test]
    fn test_effective_foreground_requires_member() {
        let stack = Stack::new()
            .add_tab("A", TabState::Opened)
            .with_foreground_tab("Missing");
        assert_eq!(stack.effective_foreground(), None);

        let stack = stack.with_foreground_tab("A");
        assert_eq!(stack.effective_foreground(), Some(&TabId::new("A")));
    }

    #[test]
    fn test_redirect_tab_types() {
        let mut layout = Layout::new("Test").add_area(
            Area::primary().split(
                Stack::new()
                    .add_tab("OldLog", TabState::Opened)
                    .with_foreground_tab("OldLog"),
            ),
        );
        let redirects = HashMap::from([("OldLog".to_string(), "Log".to_string())]);
        layout.redirect_tab_types(&redirects);

        let stacks = layout.areas[0].stacks();
        assert_eq!(stacks[0].tabs[0].tab_id, TabId::new("Log"));
        assert_eq!(stacks[0].foreground_tab, Some(TabId::new("Log")));
    }

    #[test]
    fn test_remove_tab_entries() {
        let mut area = Area::primary()
            .split(stack("Log", 1.0).add_tab("Details", TabState::Closed))
            .split(stack("Log", 1.0));
        assert_eq!(area.remove_tab_entries(&TabId::new("Log")), 2);
        assert!(!area.has_open_tabs());
        assert_eq!(area.stacks()[0].tabs.len(), 1);
    }
}
