//! Structural cleanup of the docking tree and gathering it back into layouts

use super::{DockNodeKind, DockTree, NodeId, SplitterSlot, StackNode};
use crate::layout::{promoted_coefficients, LayoutNode, Orientation, Splitter, Stack};

/// How much a subtree still matters after tabs were closed or moved
///
/// Ordered so the most responsibility wins when propagating upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CleanUpResult {
    /// Nothing left; the node can be removed
    NoContent,
    /// Only closed-tab history; kept but takes no space
    HistoryOnly,
    /// At least one live tab
    LiveTabs,
}

impl StackNode {
    pub fn classify(&self) -> CleanUpResult {
        if self.live_tabs().next().is_some() {
            CleanUpResult::LiveTabs
        } else if !self.entries.is_empty() {
            CleanUpResult::HistoryOnly
        } else {
            CleanUpResult::NoContent
        }
    }
}

impl DockTree {
    /// Remove empty children, collapse history-only ones and fold redundant
    /// splitters below `splitter`
    pub fn clean_up_nodes(&mut self, splitter: NodeId) -> CleanUpResult {
        let Some(node) = self.splitter(splitter) else {
            return self
                .stack(splitter)
                .map_or(CleanUpResult::NoContent, StackNode::classify);
        };
        let orientation = node.orientation;

        let mut result = CleanUpResult::NoContent;
        for index in (0..self.children(splitter).len()).rev() {
            let child = self.children(splitter)[index];
            let child_result = if self.splitter(child).is_some() {
                self.clean_up_nodes(child)
            } else {
                self.stack(child)
                    .map_or(CleanUpResult::NoContent, StackNode::classify)
            };

            match child_result {
                CleanUpResult::NoContent => {
                    self.destroy_subtree(child);
                }
                visible => {
                    self.set_slot(
                        splitter,
                        index,
                        SplitterSlot {
                            collapsed: visible == CleanUpResult::HistoryOnly,
                        },
                    );
                    if self.is_foldable(child, orientation) {
                        self.fold_child_splitter(splitter, index);
                    }
                }
            }

            result = result.max(child_result);
        }

        if let [only] = self.children(splitter) {
            let only = *only;
            if let Some(inner) = self.splitter(only).filter(|s| s.area.is_none()) {
                let inner_orientation = inner.orientation;
                self.fold_child_splitter(splitter, 0);
                if let Some(node) = self.splitter_mut(splitter) {
                    node.orientation = inner_orientation;
                }
            }
        }

        result
    }

    fn set_slot(&mut self, splitter: NodeId, index: usize, slot: SplitterSlot) {
        if let Some(node) = self.splitter_mut(splitter) {
            if let Some(existing) = node.slots.get_mut(index) {
                *existing = slot;
            }
        }
    }

    fn is_foldable(&self, child: NodeId, parent_orientation: Orientation) -> bool {
        self.splitter(child).is_some_and(|inner| {
            inner.area.is_none()
                && (inner.orientation == parent_orientation || inner.children.len() == 1)
        })
    }

    /// Replace the splitter at `index` with its children, rescaled to share
    /// the folded splitter's coefficient
    fn fold_child_splitter(&mut self, parent: NodeId, index: usize) {
        let Some(&child) = self.children(parent).get(index) else {
            return;
        };
        if self.splitter(child).is_none() {
            return;
        }

        self.remove_child_at(parent, index);
        let Some(node) = self.nodes.remove(&child) else {
            return;
        };
        let DockNodeKind::Splitter(inner) = node.kind else {
            return;
        };

        let coefficients: Vec<f32> = inner
            .children
            .iter()
            .map(|grandchild| self.size_coefficient(*grandchild))
            .collect();
        let scaled = promoted_coefficients(node.size_coefficient, &coefficients);

        for (offset, ((grandchild, slot), coefficient)) in inner
            .children
            .into_iter()
            .zip(inner.slots)
            .zip(scaled)
            .enumerate()
        {
            self.set_size_coefficient(grandchild, coefficient);
            self.insert_child(parent, index + offset, grandchild, slot);
        }
    }

    /// Snapshot the subtree at `id` as layout-model nodes
    ///
    /// Document tabs (ids with an instance) are left out. Stacks with nothing
    /// left to save and splitters without such stacks yield `None`.
    pub fn gather_persistent_layout(&self, id: NodeId) -> Option<LayoutNode> {
        match &self.get(id)?.kind {
            DockNodeKind::Stack(stack) => {
                let tabs: Vec<_> = stack
                    .entries
                    .iter()
                    .filter(|entry| entry.tab.tab_id.should_save_layout())
                    .map(|entry| entry.tab.clone())
                    .collect();
                if tabs.is_empty() {
                    return None;
                }
                let foreground_tab = stack
                    .foreground
                    .and_then(|handle| stack.tab_id_of(handle))
                    .filter(|tab_id| tab_id.should_save_layout())
                    .cloned();
                Some(LayoutNode::Stack(Stack {
                    size_coefficient: self.size_coefficient(id),
                    tabs,
                    hide_tab_well: stack.hide_tab_well,
                    foreground_tab,
                }))
            }
            DockNodeKind::Splitter(splitter) => {
                let children: Vec<LayoutNode> = splitter
                    .children
                    .iter()
                    .filter_map(|child| self.gather_persistent_layout(*child))
                    .collect();
                if children.is_empty() {
                    return None;
                }
                Some(LayoutNode::Splitter(Splitter {
                    size_coefficient: self.size_coefficient(id),
                    orientation: splitter.orientation,
                    children,
                }))
            }
        }
    }
}
