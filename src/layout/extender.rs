//! Layout extensions - tabs contributed by plugins relative to existing tabs

use std::collections::{HashMap, HashSet};

use super::{Layout, Tab, TabId};

/// Where an extension tab goes relative to its anchor tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutExtensionPosition {
    Before,
    After,
}

#[derive(Debug, Clone)]
struct Extension {
    position: LayoutExtensionPosition,
    tab: Tab,
}

/// Collects tabs to insert next to existing tabs in a layout
#[derive(Debug, Clone, Default)]
pub struct LayoutExtender {
    extensions: HashMap<TabId, Vec<Extension>>,
}

impl LayoutExtender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `tab` before or after every occurrence of `anchor`
    pub fn extend_layout(
        &mut self,
        anchor: impl Into<TabId>,
        position: LayoutExtensionPosition,
        tab: Tab,
    ) -> &mut Self {
        self.extensions
            .entry(anchor.into())
            .or_default()
            .push(Extension { position, tab });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    fn extensions_for<'a>(
        &'a self,
        anchor: &TabId,
        position: LayoutExtensionPosition,
    ) -> impl Iterator<Item = &'a Tab> + 'a {
        self.extensions
            .get(anchor)
            .into_iter()
            .flatten()
            .filter(move |ext| ext.position == position)
            .map(|ext| &ext.tab)
    }
}

impl Layout {
    /// Apply `extender` to every stack in the layout
    ///
    /// Tabs whose id is already present anywhere in the layout are skipped,
    /// so a layout saved after extension doesn't grow duplicates on reload.
    pub fn process_extensions(&mut self, extender: &LayoutExtender) {
        if extender.is_empty() {
            return;
        }

        let mut defined: HashSet<TabId> = self.all_tab_ids().into_iter().cloned().collect();

        for area in &mut self.areas {
            area.for_each_stack_mut(|stack| {
                let mut tabs = Vec::with_capacity(stack.tabs.len());
                for tab in stack.tabs.drain(..) {
                    let anchor = tab.tab_id.clone();
                    for ext in extender.extensions_for(&anchor, LayoutExtensionPosition::Before) {
                        if defined.insert(ext.tab_id.clone()) {
                            tabs.push(ext.clone());
                        }
                    }
                    tabs.push(tab);
                    for ext in extender.extensions_for(&anchor, LayoutExtensionPosition::After) {
                        if defined.insert(ext.tab_id.clone()) {
                            tabs.push(ext.clone());
                        }
                    }
                }
                stack.tabs = tabs;
            });
        }
    }
}
