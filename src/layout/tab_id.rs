//! Tab identifiers and layout-model tab entries

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::LayoutError;

/// Identifies a tab by its type name and an optional instance discriminator
///
/// Persistable tabs have no instance. Document tabs always carry one, stamped
/// by the owning tab manager when they are inserted.
///
/// Derived equality is structural; use [`TabId::matches`] for the
/// wildcard-aware comparison used when searching layouts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId {
    pub tab_type: String,
    pub instance_id: Option<u32>,
}

impl TabId {
    pub fn new(tab_type: impl Into<String>) -> Self {
        Self {
            tab_type: tab_type.into(),
            instance_id: None,
        }
    }

    pub fn with_instance(tab_type: impl Into<String>, instance_id: u32) -> Self {
        Self {
            tab_type: tab_type.into(),
            instance_id: Some(instance_id),
        }
    }

    /// Types are equal and either instance is unset or both are equal
    pub fn matches(&self, other: &TabId) -> bool {
        self.tab_type == other.tab_type
            && match (self.instance_id, other.instance_id) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }

    /// Only tabs without an instance id are written to layouts
    pub fn should_save_layout(&self) -> bool {
        self.instance_id.is_none()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instance_id {
            Some(instance) => write!(f, "{} : {}", self.tab_type, instance),
            None => f.write_str(&self.tab_type),
        }
    }
}

impl FromStr for TabId {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Only the exact `Display` separator splits off an instance
        let (tab_type, instance_id) = match s.rsplit_once(" : ") {
            Some((tab_type, instance)) => match instance.trim().parse::<u32>() {
                Ok(instance) => (tab_type.trim(), Some(instance)),
                Err(_) => (trimmed, None),
            },
            None => (trimmed, None),
        };

        if tab_type.is_empty() {
            return Err(LayoutError::InvalidTabId(s.to_string()));
        }

        Ok(TabId {
            tab_type: tab_type.to_string(),
            instance_id,
        })
    }
}

impl From<&str> for TabId {
    fn from(tab_type: &str) -> Self {
        TabId::new(tab_type)
    }
}

impl From<String> for TabId {
    fn from(tab_type: String) -> Self {
        TabId::new(tab_type)
    }
}

impl Serialize for TabId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TabId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Whether a layout-model tab was open when the layout was captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TabState {
    #[serde(rename = "OpenedTab")]
    Opened,
    #[serde(rename = "ClosedTab")]
    Closed,
}

/// A tab entry inside a layout stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    #[serde(rename = "TabId")]
    pub tab_id: TabId,
    #[serde(rename = "TabState")]
    pub state: TabState,
}

impl Tab {
    pub fn new(tab_id: impl Into<TabId>, state: TabState) -> Self {
        Self {
            tab_id: tab_id.into(),
            state,
        }
    }

    pub fn opened(tab_id: impl Into<TabId>) -> Self {
        Self::new(tab_id, TabState::Opened)
    }

    pub fn closed(tab_id: impl Into<TabId>) -> Self {
        Self::new(tab_id, TabState::Closed)
    }

    pub fn is_opened(&self) -> bool {
        self.state == TabState::Opened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_matching() {
        let any_doc = TabId::new("Doc");
        let doc_5 = TabId::with_instance("Doc", 5);
        let doc_6 = TabId::with_instance("Doc", 6);

        assert!(any_doc.matches(&doc_5));
        assert!(doc_5.matches(&any_doc));
        assert!(!doc_5.matches(&doc_6));
        assert!(doc_5.matches(&doc_5));
        assert!(!TabId::new("Log").matches(&doc_5));
    }

    #[test]
    fn test_structural_equality_is_strict() {
        assert_ne!(TabId::new("Doc"), TabId::with_instance("Doc", 1));
    }

    #[test]
    fn test_display_and_parse() {
        let id = TabId::with_instance("Doc", 12);
        assert_eq!(id.to_string(), "Doc : 12");
        assert_eq!("Doc : 12".parse::<TabId>().unwrap(), id);
        assert_eq!("Log".parse::<TabId>().unwrap(), TabId::new("Log"));
    }

    #[test]
    fn test_parse_keeps_colon_in_type() {
        let id: TabId = "Scope:Main".parse().unwrap();
        assert_eq!(id.tab_type, "Scope:Main");
        assert_eq!(id.instance_id, None);

        let id: TabId = "Scope:5".parse().unwrap();
        assert_eq!(id, TabId::new("Scope:5"));
    }

    #[test]
    fn test_colon_type_survives_json_round_trip() {
        use crate::layout::{Area, Layout, Stack};

        let layout = Layout::new("Main").add_area(
            Area::primary().split(
                Stack::new()
                    .add_tab(TabId::new("Scope:5"), TabState::Opened)
                    .add_tab(TabId::with_instance("Scope:5", 2), TabState::Closed),
            ),
        );
        let decoded = Layout::from_json(&layout.to_json().unwrap()).unwrap();

        assert_eq!(decoded, layout);
        assert!(decoded.all_tab_ids()[0].should_save_layout());
        assert_eq!(decoded.all_tab_ids()[1].instance_id, Some(2));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!("  ".parse::<TabId>().is_err());
        assert!(" : 3".parse::<TabId>().is_err());
    }

    #[test]
    fn test_should_save_layout() {
        assert!(TabId::new("Log").should_save_layout());
        assert!(!TabId::with_instance("Doc", 0).should_save_layout());
    }
}
