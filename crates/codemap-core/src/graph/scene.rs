//! Render primitives derived from the layout engine's positioned output.
//!
//! Nodes become rounded rectangles with a centred label; each edge section
//! becomes a polyline ending in an arrowhead, dashed for usage and solid for
//! inheritance.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::errors::CodemapResult;
use crate::graph::encoder::GraphDescription;
use crate::models::RelationshipKind;

pub const CORNER_RADIUS: f64 = 8.0;
/// Vertical nudge from the node centre to the label baseline.
pub const LABEL_BASELINE_OFFSET: f64 = 6.0;
pub const USAGE_DASH: &str = "6,4";
pub const ARROWHEAD_ID: &str = "arrowhead";

// ---------------------------------------------------------------------------
// Layout engine output
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSection {
    pub start_point: Point,
    #[serde(default)]
    pub bend_points: Vec<Point>,
    pub end_point: Point,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PositionedEdge {
    pub id: String,
    #[serde(default)]
    pub style: Option<RelationshipKind>,
    #[serde(default)]
    pub sections: Vec<EdgeSection>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LaidOutGraph {
    #[serde(default)]
    pub children: Vec<PositionedNode>,
    #[serde(default)]
    pub edges: Vec<PositionedEdge>,
}

impl LaidOutGraph {
    pub fn from_json(json: &str) -> CodemapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub label_x: f64,
    pub label_y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgePath {
    pub edge_id: String,
    pub style: RelationshipKind,
    /// SVG path data: `M start L bend ... L end`.
    pub d: String,
}

impl EdgePath {
    pub fn dash(&self) -> Option<&'static str> {
        match self.style {
            RelationshipKind::Usage => Some(USAGE_DASH),
            RelationshipKind::Inheritance => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<NodeShape>,
    pub edges: Vec<EdgePath>,
}

impl Scene {
    /// Build the scene for a positioned graph.
    ///
    /// An edge whose style was not echoed back takes the style of the
    /// same-id edge in `request`, falling back to inheritance.
    pub fn from_layout(layout: &LaidOutGraph, request: &GraphDescription) -> Self {
        let nodes = layout
            .children
            .iter()
            .map(|node| NodeShape {
                label: node.id.clone(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                corner_radius: CORNER_RADIUS,
                label_x: node.x + node.width / 2.0,
                label_y: node.y + node.height / 2.0 + LABEL_BASELINE_OFFSET,
            })
            .collect();

        let mut edges = Vec::new();
        for edge in &layout.edges {
            let style = edge
                .style
                .or_else(|| request.edge(&edge.id).map(|e| e.style))
                .unwrap_or(RelationshipKind::Inheritance);
            for section in &edge.sections {
                edges.push(EdgePath {
                    edge_id: edge.id.clone(),
                    style,
                    d: section_path(section),
                });
            }
        }

        Self { nodes, edges }
    }

    /// SVG markup for the scene, including the arrowhead marker.
    pub fn to_svg(&self) -> String {
        let mut svg = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg">"#);
        for node in &self.nodes {
            let _ = write!(
                svg,
                r##"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="#23263a" stroke="#e0e6f0" stroke-width="2" />"##,
                node.x, node.y, node.width, node.height, node.corner_radius
            );
            let _ = write!(
                svg,
                r##"<text x="{}" y="{}" text-anchor="middle" fill="#fff" font-size="16" font-family="sans-serif">{}</text>"##,
                node.label_x,
                node.label_y,
                escape_text(&node.label)
            );
        }
        for edge in &self.edges {
            let dash = edge
                .dash()
                .map(|d| format!(r#" stroke-dasharray="{d}""#))
                .unwrap_or_default();
            let _ = write!(
                svg,
                r##"<path d="{}" stroke="#aaa" stroke-width="2" fill="none" marker-end="url(#{ARROWHEAD_ID})"{dash} />"##,
                edge.d
            );
        }
        let _ = write!(
            svg,
            r##"<defs><marker id="{ARROWHEAD_ID}" markerWidth="10" markerHeight="7" refX="10" refY="3.5" orient="auto" markerUnits="strokeWidth"><polygon points="0 0, 10 3.5, 0 7" fill="#aaa"/></marker></defs>"##
        );
        svg.push_str("</svg>");
        svg
    }
}

fn section_path(section: &EdgeSection) -> String {
    let mut d = format!("M{},{}", section.start_point.x, section.start_point.y);
    for bend in &section.bend_points {
        let _ = write!(d, " L{},{}", bend.x, bend.y);
    }
    let _ = write!(d, " L{},{}", section.end_point.x, section.end_point.y);
    d
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
