//! JSON persistence for layouts
//!
//! The wire format uses typed records that mirror the model one-to-one:
//!
//! ```text
//! { "Type": "Layout", "Name": "...", "PrimaryAreaIndex": 0, "Areas": [ ... ] }
//! ```
//!
//! Every node carries a `Type` tag (`Area`, `Splitter` or `Stack`). Decoding
//! fails on unknown tags, unknown enum strings and missing placement fields.

use serde::{Deserialize, Serialize};

use super::{
    Area, Layout, LayoutNode, Orientation, Splitter, Stack, Tab, TabId, WindowPlacement,
};
use crate::geometry::Vec2;

/// Errors produced while reading or writing layouts
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("malformed layout: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tab id {0:?}")]
    InvalidTabId(String),

    #[error("area with {placement} placement is missing {field}")]
    MissingField {
        placement: &'static str,
        field: &'static str,
    },

    #[error("layout area {index} is a {found}, expected an Area")]
    NotAnArea { index: usize, found: &'static str },

    #[error("layout io error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct LayoutRecord {
    #[serde(rename = "Type")]
    kind: LayoutTag,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "PrimaryAreaIndex", default = "no_primary_area")]
    primary_area_index: i64,
    #[serde(rename = "Areas", default)]
    areas: Vec<NodeRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum LayoutTag {
    Layout,
}

fn no_primary_area() -> i64 {
    -1
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "Type")]
enum NodeRecord {
    Area(AreaRecord),
    Splitter(SplitterRecord),
    Stack(StackRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PlacementKind {
    #[serde(rename = "Placement_NoWindow")]
    NoWindow,
    #[serde(rename = "Placement_Automatic")]
    Automatic,
    #[serde(rename = "Placement_Specified")]
    Specified,
}

impl PlacementKind {
    fn name(self) -> &'static str {
        match self {
            PlacementKind::NoWindow => "Placement_NoWindow",
            PlacementKind::Automatic => "Placement_Automatic",
            PlacementKind::Specified => "Placement_Specified",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AreaRecord {
    #[serde(rename = "SizeCoefficient")]
    size_coefficient: f32,
    #[serde(rename = "Orientation")]
    orientation: Orientation,
    #[serde(rename = "WindowPlacement")]
    placement: PlacementKind,
    #[serde(rename = "WindowPosition_X", default, skip_serializing_if = "Option::is_none")]
    window_position_x: Option<f32>,
    #[serde(rename = "WindowPosition_Y", default, skip_serializing_if = "Option::is_none")]
    window_position_y: Option<f32>,
    #[serde(rename = "WindowSize_X", default, skip_serializing_if = "Option::is_none")]
    window_size_x: Option<f32>,
    #[serde(rename = "WindowSize_Y", default, skip_serializing_if = "Option::is_none")]
    window_size_y: Option<f32>,
    #[serde(rename = "bIsMaximized", default, skip_serializing_if = "Option::is_none")]
    is_maximized: Option<bool>,
    #[serde(rename = "Nodes", default)]
    nodes: Vec<NodeRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SplitterRecord {
    #[serde(rename = "SizeCoefficient")]
    size_coefficient: f32,
    #[serde(rename = "Orientation")]
    orientation: Orientation,
    #[serde(rename = "Nodes", default)]
    nodes: Vec<NodeRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StackRecord {
    #[serde(rename = "SizeCoefficient")]
    size_coefficient: f32,
    #[serde(rename = "HideTabWell", default)]
    hide_tab_well: bool,
    #[serde(rename = "ForegroundTab", default, skip_serializing_if = "Option::is_none")]
    foreground_tab: Option<TabId>,
    #[serde(rename = "Tabs", default)]
    tabs: Vec<Tab>,
}

// ============================================================================
// Model -> records
// ============================================================================

impl From<&Layout> for LayoutRecord {
    fn from(layout: &Layout) -> Self {
        LayoutRecord {
            kind: LayoutTag::Layout,
            name: layout.name.clone(),
            primary_area_index: layout
                .primary_area_index
                .map(|index| index as i64)
                .unwrap_or(-1),
            areas: layout
                .areas
                .iter()
                .map(|area| NodeRecord::Area(area.into()))
                .collect(),
        }
    }
}

impl From<&Area> for AreaRecord {
    fn from(area: &Area) -> Self {
        let mut record = AreaRecord {
            size_coefficient: area.splitter.size_coefficient,
            orientation: area.splitter.orientation,
            placement: PlacementKind::NoWindow,
            window_position_x: None,
            window_position_y: None,
            window_size_x: None,
            window_size_y: None,
            is_maximized: None,
            nodes: area.splitter.children.iter().map(NodeRecord::from).collect(),
        };

        match area.placement {
            WindowPlacement::NoWindow => {}
            WindowPlacement::Automatic { size } => {
                record.placement = PlacementKind::Automatic;
                record.window_size_x = Some(size.x);
                record.window_size_y = Some(size.y);
            }
            WindowPlacement::Specified {
                position,
                size,
                maximized,
            } => {
                record.placement = PlacementKind::Specified;
                record.window_position_x = Some(position.x);
                record.window_position_y = Some(position.y);
                record.window_size_x = Some(size.x);
                record.window_size_y = Some(size.y);
                record.is_maximized = Some(maximized);
            }
        }

        record
    }
}

impl From<&LayoutNode> for NodeRecord {
    fn from(node: &LayoutNode) -> Self {
        match node {
            LayoutNode::Area(area) => NodeRecord::Area(area.into()),
            LayoutNode::Splitter(splitter) => NodeRecord::Splitter(SplitterRecord {
                size_coefficient: splitter.size_coefficient,
                orientation: splitter.orientation,
                nodes: splitter.children.iter().map(NodeRecord::from).collect(),
            }),
            LayoutNode::Stack(stack) => NodeRecord::Stack(StackRecord {
                size_coefficient: stack.size_coefficient,
                hide_tab_well: stack.hide_tab_well,
                foreground_tab: stack.foreground_tab.clone(),
                tabs: stack.tabs.clone(),
            }),
        }
    }
}

// ============================================================================
// Records -> model
// ============================================================================

impl TryFrom<AreaRecord> for Area {
    type Error = LayoutError;

    fn try_from(record: AreaRecord) -> Result<Self, Self::Error> {
        let kind = record.placement;
        let require = |value: Option<f32>, field: &'static str| {
            value.ok_or(LayoutError::MissingField {
                placement: kind.name(),
                field,
            })
        };

        let placement = match kind {
            PlacementKind::NoWindow => WindowPlacement::NoWindow,
            PlacementKind::Automatic => WindowPlacement::Automatic {
                size: Vec2::new(
                    require(record.window_size_x, "WindowSize_X")?,
                    require(record.window_size_y, "WindowSize_Y")?,
                ),
            },
            PlacementKind::Specified => WindowPlacement::Specified {
                position: Vec2::new(
                    require(record.window_position_x, "WindowPosition_X")?,
                    require(record.window_position_y, "WindowPosition_Y")?,
                ),
                size: Vec2::new(
                    require(record.window_size_x, "WindowSize_X")?,
                    require(record.window_size_y, "WindowSize_Y")?,
                ),
                maximized: record.is_maximized.ok_or(LayoutError::MissingField {
                    placement: kind.name(),
                    field: "bIsMaximized",
                })?,
            },
        };

        Ok(Area {
            splitter: Splitter {
                size_coefficient: record.size_coefficient,
                orientation: record.orientation,
                children: decode_nodes(record.nodes)?,
            },
            placement,
        })
    }
}

impl TryFrom<NodeRecord> for LayoutNode {
    type Error = LayoutError;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        Ok(match record {
            NodeRecord::Area(area) => LayoutNode::Area(area.try_into()?),
            NodeRecord::Splitter(splitter) => LayoutNode::Splitter(Splitter {
                size_coefficient: splitter.size_coefficient,
                orientation: splitter.orientation,
                children: decode_nodes(splitter.nodes)?,
            }),
            NodeRecord::Stack(stack) => LayoutNode::Stack(Stack {
                size_coefficient: stack.size_coefficient,
                tabs: stack.tabs,
                hide_tab_well: stack.hide_tab_well,
                foreground_tab: stack.foreground_tab,
            }),
        })
    }
}

fn decode_nodes(records: Vec<NodeRecord>) -> Result<Vec<LayoutNode>, LayoutError> {
    records.into_iter().map(LayoutNode::try_from).collect()
}

impl TryFrom<LayoutRecord> for Layout {
    type Error = LayoutError;

    fn try_from(record: LayoutRecord) -> Result<Self, Self::Error> {
        let mut areas = Vec::with_capacity(record.areas.len());
        for (index, node) in record.areas.into_iter().enumerate() {
            match LayoutNode::try_from(node)? {
                LayoutNode::Area(area) => areas.push(area),
                other => {
                    return Err(LayoutError::NotAnArea {
                        index,
                        found: other.kind_name(),
                    })
                }
            }
        }

        let primary_area_index = usize::try_from(record.primary_area_index)
            .ok()
            .filter(|index| *index < areas.len());

        Ok(Layout {
            name: record.name,
            areas,
            primary_area_index,
        })
    }
}

impl Layout {
    /// Encode as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(&LayoutRecord::from(self))?)
    }

    /// Decode from JSON; any malformed input is an error
    pub fn from_json(json: &str) -> Result<Layout, LayoutError> {
        let record: LayoutRecord = serde_json::from_str(json)?;
        Layout::try_from(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TabState;

    #[test]
    fn test_stack_fields_use_wire_names() {
        let layout = Layout::new("Wire").add_area(
            Area::primary().split(
                Stack::new()
                    .add_tab("Log", TabState::Opened)
                    .add_tab(TabId::new("Details"), TabState::Closed)
                    .with_foreground_tab("Log"),
            ),
        );

        let json = layout.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["Type"], "Layout");
        assert_eq!(value["PrimaryAreaIndex"], 0);
        let area = &value["Areas"][0];
        assert_eq!(area["Type"], "Area");
        assert_eq!(area["WindowPlacement"], "Placement_NoWindow");
        assert_eq!(area["Orientation"], "Orient_Horizontal");
        assert!(area.get("WindowSize_X").is_none());

        let stack = &area["Nodes"][0];
        assert_eq!(stack["Type"], "Stack");
        assert_eq!(stack["ForegroundTab"], "Log");
        assert_eq!(stack["Tabs"][0]["TabId"], "Log");
        assert_eq!(stack["Tabs"][0]["TabState"], "OpenedTab");
        assert_eq!(stack["Tabs"][1]["TabState"], "ClosedTab");
    }

    #[test]
    fn test_missing_primary_index_is_minus_one() {
        let layout = Layout::new("Floating").add_area(
            Area::new(Vec2::new(640.0, 480.0)).split(Stack::new().add_tab("Log", TabState::Opened)),
        );
        let value: serde_json::Value = serde_json::from_str(&layout.to_json().unwrap()).unwrap();
        assert_eq!(value["PrimaryAreaIndex"], -1);
        assert_eq!(value["Areas"][0]["WindowSize_X"], 640.0);
    }

    #[test]
    fn test_unknown_node_type_is_rejected() {
        let json = r#"{
            "Type": "Layout", "Name": "Bad", "PrimaryAreaIndex": -1,
            "Areas": [{
                "Type": "Area", "SizeCoefficient": 1.0, "Orientation": "Orient_Horizontal",
                "WindowPlacement": "Placement_NoWindow",
                "Nodes": [{ "Type": "Grid", "SizeCoefficient": 1.0 }]
            }]
        }"#;
        assert!(matches!(Layout::from_json(json), Err(LayoutError::Json(_))));
    }

    #[test]
    fn test_unknown_orientation_is_rejected() {
        let json = r#"{
            "Type": "Layout", "Name": "Bad", "PrimaryAreaIndex": -1,
            "Areas": [{
                "Type": "Area", "SizeCoefficient": 1.0, "Orientation": "Orient_Diagonal",
                "WindowPlacement": "Placement_NoWindow", "Nodes": []
            }]
        }"#;
        assert!(Layout::from_json(json).is_err());
    }

    #[test]
    fn test_missing_placement_field_is_rejected() {
        let json = r#"{
            "Type": "Layout", "Name": "Bad", "PrimaryAreaIndex": -1,
            "Areas": [{
                "Type": "Area", "SizeCoefficient": 1.0, "Orientation": "Orient_Vertical",
                "WindowPlacement": "Placement_Specified",
                "WindowSize_X": 800, "WindowSize_Y": 600,
                "WindowPosition_X": 10, "WindowPosition_Y": 20,
                "Nodes": []
            }]
        }"#;
        match Layout::from_json(json) {
            Err(LayoutError::MissingField { field, .. }) => assert_eq!(field, "bIsMaximized"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_top_level_stack_is_rejected() {
        let json = r#"{
            "Type": "Layout", "Name": "Bad", "PrimaryAreaIndex": -1,
            "Areas": [{ "Type": "Stack", "SizeCoefficient": 1.0, "Tabs": [] }]
        }"#;
        assert!(matches!(
            Layout::from_json(json),
            Err(LayoutError::NotAnArea { index: 0, .. })
        ));
    }

    #[test]
    fn test_out_of_range_primary_index_is_ignored() {
        let json = r#"{
            "Type": "Layout", "Name": "Odd", "PrimaryAreaIndex": 7, "Areas": []
        }"#;
        let layout = Layout::from_json(json).unwrap();
        assert_eq!(layout.primary_area_index, None);
    }
}
