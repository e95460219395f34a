//! Search preferences for placing unmanaged (document) tabs
//!
//! When a document tab is inserted, a [`SearchPreference`] picks a live tab
//! whose stack should receive it. Preferences see the manager state through
//! the read-only [`TabLookup`] view.

use crate::layout::TabId;
use crate::tab::{DockTab, TabHandle};
use crate::tab_manager::ManagerId;
use crate::window::WindowId;

/// Read-only queries a search preference may run
pub trait TabLookup {
    /// A live tab matching `tab_id` in any of the manager's areas
    fn find_existing_live_tab(&self, manager: ManagerId, tab_id: &TabId) -> Option<TabHandle>;

    /// The most recently activated live tab hosted in `window`
    fn find_last_tab_in_window(
        &self,
        manager: ManagerId,
        window: Option<WindowId>,
    ) -> Option<TabHandle>;

    /// Window that last received a major or nomad tab
    fn last_major_dock_window(&self, manager: ManagerId) -> Option<WindowId>;
}

/// Chooses the live tab next to which a new document tab is placed
pub trait SearchPreference {
    fn search(
        &self,
        lookup: &dyn TabLookup,
        manager: ManagerId,
        placeholder_id: &str,
        unmanaged_tab: &DockTab,
    ) -> Option<TabHandle>;
}

/// Prefer an existing live tab with the placeholder id, or with an explicit
/// id if one is given
#[derive(Debug, Clone, Default)]
pub struct LiveTabSearch {
    search_for: Option<TabId>,
}

impl LiveTabSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_tab(tab_id: impl Into<TabId>) -> Self {
        Self {
            search_for: Some(tab_id.into()),
        }
    }
}

impl SearchPreference for LiveTabSearch {
    fn search(
        &self,
        lookup: &dyn TabLookup,
        manager: ManagerId,
        placeholder_id: &str,
        _unmanaged_tab: &DockTab,
    ) -> Option<TabHandle> {
        match &self.search_for {
            Some(tab_id) => lookup.find_existing_live_tab(manager, tab_id),
            None => lookup.find_existing_live_tab(manager, &TabId::new(placeholder_id)),
        }
    }
}

/// Never reuse a live tab; only a stack holding the placeholder's closed
/// entry (or a fresh invocation) will do
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireClosedTab;

impl SearchPreference for RequireClosedTab {
    fn search(
        &self,
        _lookup: &dyn TabLookup,
        _manager: ManagerId,
        _placeholder_id: &str,
        _unmanaged_tab: &DockTab,
    ) -> Option<TabHandle> {
        None
    }
}

/// Dock next to the last tab in the window that most recently received a
/// major or nomad tab, falling back to a live tab of `fallback`
#[derive(Debug, Clone, Default)]
pub struct LastMajorOrNomadTab {
    fallback: Option<TabId>,
}

impl LastMajorOrNomadTab {
    pub fn new(fallback: impl Into<TabId>) -> Self {
        Self {
            fallback: Some(fallback.into()),
        }
    }
}

impl SearchPreference for LastMajorOrNomadTab {
    fn search(
        &self,
        lookup: &dyn TabLookup,
        manager: ManagerId,
        _placeholder_id: &str,
        _unmanaged_tab: &DockTab,
    ) -> Option<TabHandle> {
        let window = lookup.last_major_dock_window(manager);
        lookup
            .find_last_tab_in_window(manager, window)
            .or_else(|| {
                self.fallback
                    .as_ref()
                    .and_then(|fallback| lookup.find_existing_live_tab(manager, fallback))
            })
    }
}

/// The two stock preferences by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPreferenceKind {
    #[default]
    PreferLiveTab,
    RequireClosedTab,
}

impl SearchPreference for SearchPreferenceKind {
    fn search(
        &self,
        lookup: &dyn TabLookup,
        manager: ManagerId,
        placeholder_id: &str,
        unmanaged_tab: &DockTab,
    ) -> Option<TabHandle> {
        match self {
            SearchPreferenceKind::PreferLiveTab => {
                LiveTabSearch::new().search(lookup, manager, placeholder_id, unmanaged_tab)
            }
            SearchPreferenceKind::RequireClosedTab => {
                RequireClosedTab.search(lookup, manager, placeholder_id, unmanaged_tab)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeLookup {
        live: Vec<(TabId, TabHandle)>,
        last_in_window: Option<TabHandle>,
        major_window: Option<WindowId>,
    }

    impl TabLookup for FakeLookup {
        fn find_existing_live_tab(&self, _manager: ManagerId, tab_id: &TabId) -> Option<TabHandle> {
            self.live
                .iter()
                .find(|(id, _)| id.matches(tab_id))
                .map(|(_, handle)| *handle)
        }

        fn find_last_tab_in_window(
            &self,
            _manager: ManagerId,
            window: Option<WindowId>,
        ) -> Option<TabHandle> {
            window.and(self.last_in_window)
        }

        fn last_major_dock_window(&self, _manager: ManagerId) -> Option<WindowId> {
            self.major_window
        }
    }

    fn lookup() -> FakeLookup {
        FakeLookup {
            live: vec![
                (TabId::with_instance("Doc", 1), TabHandle(10)),
                (TabId::new("Log"), TabHandle(20)),
            ],
            last_in_window: Some(TabHandle(30)),
            major_window: None,
        }
    }

    #[test]
    fn test_live_tab_search_uses_placeholder() {
        let found = LiveTabSearch::new().search(&lookup(), ManagerId::GLOBAL, "Doc", &DockTab::default());
        assert_eq!(found, Some(TabHandle(10)));
    }

    #[test]
    fn test_live_tab_search_explicit_id() {
        let found =
            LiveTabSearch::for_tab("Log").search(&lookup(), ManagerId::GLOBAL, "Doc", &DockTab::default());
        assert_eq!(found, Some(TabHandle(20)));
    }

    #[test]
    fn test_require_closed_tab_never_matches() {
        let found = RequireClosedTab.search(&lookup(), ManagerId::GLOBAL, "Doc", &DockTab::default());
        assert_eq!(found, None);
    }

    #[test]
    fn test_last_major_or_nomad_tab() {
        let search = LastMajorOrNomadTab::new("Log");
        let mut view = lookup();
        assert_eq!(
            search.search(&view, ManagerId::GLOBAL, "Doc", &DockTab::default()),
            Some(TabHandle(20))
        );

        view.major_window = Some(WindowId(4));
        assert_eq!(
            search.search(&view, ManagerId::GLOBAL, "Doc", &DockTab::default()),
            Some(TabHandle(30))
        );
    }
}
