//! Layout computation - coefficients to rectangles

use super::{DockNodeKind, DockTree, NodeId};
use crate::geometry::Rect;
use crate::layout::Orientation;

/// Default splitter bar thickness in pixels
pub const SPLITTER_WIDTH: f32 = 6.0;

/// A draggable bar between two visible children of a splitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitterBar {
    pub orientation: Orientation,
    pub rect: Rect,
    pub splitter: NodeId,
    /// Index of the child before the bar
    pub index: usize,
}

/// Rectangles for every node in an area plus its splitter bars
#[derive(Debug, Clone, Default)]
pub struct DockGeometry {
    pub rects: Vec<(NodeId, Rect)>,
    pub splitters: Vec<SplitterBar>,
}

impl DockGeometry {
    pub fn rect_of(&self, node: NodeId) -> Option<Rect> {
        self.rects
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, rect)| *rect)
    }

    /// The splitter bar under a point, for drag hit-testing
    pub fn splitter_at(&self, x: f32, y: f32) -> Option<&SplitterBar> {
        self.splitters.iter().find(|bar| bar.rect.contains(x, y))
    }
}

impl DockTree {
    /// Lay out the subtree rooted at `root` inside `available`
    pub fn compute_layout(&self, root: NodeId, available: Rect) -> DockGeometry {
        self.compute_layout_scaled(root, available, SPLITTER_WIDTH)
    }

    /// Compute layout with a custom splitter width (for HiDPI scaling).
    pub fn compute_layout_scaled(
        &self,
        root: NodeId,
        available: Rect,
        splitter_width: f32,
    ) -> DockGeometry {
        let mut geometry = DockGeometry::default();
        self.compute_layout_node(root, available, &mut geometry, splitter_width);
        geometry
    }

    /// Recursively compute layout for a node
    fn compute_layout_node(
        &self,
        id: NodeId,
        rect: Rect,
        geometry: &mut DockGeometry,
        splitter_width: f32,
    ) {
        let Some(node) = self.get(id) else {
            return;
        };
        geometry.rects.push((id, rect));

        let DockNodeKind::Splitter(splitter) = &node.kind else {
            return;
        };
        if splitter.children.is_empty() {
            return;
        }

        // Collapsed slots take no space; visible children share by coefficient
        let visible: Vec<bool> = splitter.slots.iter().map(|slot| !slot.collapsed).collect();
        let total_coefficient: f32 = splitter
            .children
            .iter()
            .zip(&visible)
            .filter(|(_, shown)| **shown)
            .map(|(child, _)| self.size_coefficient(*child).max(0.0))
            .sum();
        let visible_count = visible.iter().filter(|shown| **shown).count();

        let total_size = match splitter.orientation {
            Orientation::Horizontal => rect.width,
            Orientation::Vertical => rect.height,
        };

        let mut offset = 0.0;
        let mut placed_visible = 0;
        for (i, child) in splitter.children.iter().enumerate() {
            let child_size = if !visible[i] {
                0.0
            } else if total_coefficient > 0.0 {
                total_size * self.size_coefficient(*child).max(0.0) / total_coefficient
            } else {
                total_size / visible_count as f32
            };

            let child_rect = match splitter.orientation {
                Orientation::Horizontal => {
                    Rect::new(rect.x + offset, rect.y, child_size, rect.height)
                }
                Orientation::Vertical => Rect::new(rect.x, rect.y + offset, rect.width, child_size),
            };

            if visible[i] {
                placed_visible += 1;
                // Bar between visible children (not after the last one)
                if placed_visible < visible_count {
                    let bar_rect = match splitter.orientation {
                        Orientation::Horizontal => Rect::new(
                            rect.x + offset + child_size - splitter_width / 2.0,
                            rect.y,
                            splitter_width,
                            rect.height,
                        ),
                        Orientation::Vertical => Rect::new(
                            rect.x,
                            rect.y + offset + child_size - splitter_width / 2.0,
                            rect.width,
                            splitter_width,
                        ),
                    };
                    geometry.splitters.push(SplitterBar {
                        orientation: splitter.orientation,
                        rect: bar_rect,
                        splitter: id,
                        index: i,
                    });
                }
            }

            self.compute_layout_node(*child, child_rect, geometry, splitter_width);
            offset += child_size;
        }
    }
}
