//! Placeholder content for tabs nobody can spawn
//!
//! Shown when a layout names a tab type that has no registered spawner, so
//! the layout survives the restore and can be saved back unchanged.

use crate::layout::TabId;

/// Placeholder panel state
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderPanel {
    pub tab_id: TabId,
}

impl PlaceholderPanel {
    pub fn new(tab_id: TabId) -> Self {
        Self { tab_id }
    }

    /// Get the title for this placeholder
    pub fn title(&self) -> String {
        self.tab_id.to_string()
    }

    /// Get placeholder message
    pub fn message(&self) -> String {
        format!("Unrecognized tab: {}", self.tab_id.tab_type)
    }
}
