use crate::model::ItemState;
use serde::{Deserialize, Serialize};

/// The canonical, format-neutral description of a flow graph.
/// Renderers consume it and parsers of custom formats produce it.
///
/// The first node is the root of the flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub nodes: Vec<FlowNodeDefinition>,
    #[serde(default)]
    pub edges: Vec<FlowEdgeDefinition>,
}

/// Defines a single node: its label, its type name and the names of the
/// conditions gating back transitions over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNodeDefinition {
    pub label: String,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub back_conditions: Vec<String>,
    /// Session state of the node when exported for a survey.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ItemState>,
}

/// Defines a forward route between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdgeDefinition {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl FlowDefinition {
    pub fn root(&self) -> Option<&FlowNodeDefinition> {
        self.nodes.first()
    }

    pub fn node(&self, label: &str) -> Option<&FlowNodeDefinition> {
        self.nodes.iter().find(|node| node.label == label)
    }

    /// Edges leaving `label`, in definition order.
    pub fn edges_from<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a FlowEdgeDefinition> {
        self.edges.iter().filter(move |edge| edge.source == label)
    }
}
