//! Fixed layout configuration sent alongside the graph description.

use serde::Serialize;

use crate::graph::encoder::GraphDescription;

pub const ROOT_ID: &str = "root";

pub const SPACING_NODE_NODE: u32 = 120;
pub const SPACING_BETWEEN_LAYERS: u32 = 120;
pub const SPACING_EDGE_NODE: u32 = 80;
pub const SPACING_EDGE_EDGE: u32 = 80;

/// Layered, top-down, orthogonally routed layout options keyed the way the
/// layout engine expects them. Values are strings on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutOptions {
    #[serde(rename = "elk.algorithm")]
    pub algorithm: &'static str,
    #[serde(rename = "elk.direction")]
    pub direction: &'static str,
    #[serde(rename = "elk.layered.edgeRouting")]
    pub layered_edge_routing: &'static str,
    #[serde(rename = "elk.layered.mergeEdges")]
    pub merge_edges: String,
    #[serde(rename = "elk.edgeRouting")]
    pub edge_routing: &'static str,
    #[serde(rename = "elk.spacing.nodeNode")]
    pub spacing_node_node: String,
    #[serde(rename = "elk.layered.spacing.nodeNodeBetweenLayers")]
    pub spacing_between_layers: String,
    #[serde(rename = "elk.spacing.edgeNodeBetweenLayers")]
    pub spacing_edge_node: String,
    #[serde(rename = "elk.spacing.edgeEdge")]
    pub spacing_edge_edge: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            algorithm: "layered",
            direction: "DOWN",
            layered_edge_routing: "ORTHOGONAL",
            merge_edges: false.to_string(),
            edge_routing: "ORTHOGONAL",
            spacing_node_node: SPACING_NODE_NODE.to_string(),
            spacing_between_layers: SPACING_BETWEEN_LAYERS.to_string(),
            spacing_edge_node: SPACING_EDGE_NODE.to_string(),
            spacing_edge_edge: SPACING_EDGE_EDGE.to_string(),
        }
    }
}

/// Root document handed to the layout engine.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest<'a> {
    pub id: &'static str,
    pub layout_options: LayoutOptions,
    #[serde(flatten)]
    pub graph: &'a GraphDescription,
}

impl<'a> LayoutRequest<'a> {
    pub fn new(graph: &'a GraphDescription) -> Self {
        Self {
            id: ROOT_ID,
            layout_options: LayoutOptions::default(),
            graph,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
