//! Layout-engine input: sized nodes and labelled, styled edges.

use serde::{Deserialize, Serialize};

use crate::models::{ClassName, ClassSet, Relationship, RelationshipKind};

pub const MIN_NODE_WIDTH: u32 = 120;
pub const CHAR_WIDTH: u32 = 8;
pub const NODE_PADDING: u32 = 24;
pub const NODE_HEIGHT: u32 = 50;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeLabel {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDescription {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
    pub labels: Vec<EdgeLabel>,
    pub style: RelationshipKind,
}

/// The only artifact handed to the layout engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDescription {
    pub children: Vec<NodeDescription>,
    pub edges: Vec<EdgeDescription>,
}

impl GraphDescription {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeDescription> {
        self.edges.iter().find(|e| e.id == id)
    }
}

/// `max(120, chars * 8 + 24)`.
pub fn node_width(name: &ClassName) -> u32 {
    let chars = u32::try_from(name.char_len()).unwrap_or(u32::MAX);
    chars
        .saturating_mul(CHAR_WIDTH)
        .saturating_add(NODE_PADDING)
        .max(MIN_NODE_WIDTH)
}

pub fn edge_id(relationship: &Relationship) -> String {
    format!(
        "{}_{}_{}",
        relationship.source,
        relationship.target,
        relationship.kind.tag()
    )
}

pub fn encode(classes: &ClassSet, relationships: &[Relationship]) -> GraphDescription {
    let children = classes
        .iter()
        .map(|name| NodeDescription {
            id: name.to_string(),
            width: node_width(name),
            height: NODE_HEIGHT,
        })
        .collect();

    let edges = relationships
        .iter()
        .map(|rel| EdgeDescription {
            id: edge_id(rel),
            sources: vec![rel.source.to_string()],
            targets: vec![rel.target.to_string()],
            labels: vec![EdgeLabel {
                text: rel.kind.label().to_string(),
            }],
            style: rel.kind,
        })
        .collect();

    GraphDescription { children, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ClassName {
        ClassName::new(s).unwrap()
    }

    #[test]
    fn test_node_width_floor() {
        assert_eq!(node_width(&name("A")), 120);
        // 12 * 8 + 24 == 120
        assert_eq!(node_width(&name("TwelveChars_")), 120);
    }

    #[test]
    fn test_node_width_grows_with_name() {
        let long = name("VeryLongServiceLocatorName");
        assert_eq!(node_width(&long), 26 * 8 + 24);
    }

    #[test]
    fn test_encode_nodes_in_class_order() {
        let mut classes = ClassSet::new();
        classes.insert(name("Beta"));
        classes.insert(name("Alpha"));
        let graph = encode(&classes, &[]);
        let ids: Vec<&str> = graph.children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["Beta", "Alpha"]);
        assert!(graph.children.iter().all(|n| n.height == NODE_HEIGHT));
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_encode_edges() {
        let mut classes = ClassSet::new();
        classes.insert(name("Dog"));
        classes.insert(name("Animal"));
        let rels = vec![
            Relationship::inheritance(name("Animal"), name("Dog")),
            Relationship::usage(name("Dog"), name("Animal")),
        ];
        let graph = encode(&classes, &rels);
        assert_eq!(graph.edges[0].id, "Animal_Dog_inheritance");
        assert_eq!(graph.edges[0].labels[0].text, "inherits");
        assert_eq!(graph.edges[0].style, RelationshipKind::Inheritance);
        assert_eq!(graph.edges[1].id, "Dog_Animal_usage");
        assert_eq!(graph.edges[1].sources, vec!["Dog"]);
        assert_eq!(graph.edges[1].targets, vec!["Animal"]);
        assert_eq!(graph.edges[1].labels[0].text, "uses");
        assert!(graph.edge("Dog_Animal_usage").is_some());
    }

    #[test]
    fn test_json_shape() {
        let mut classes = ClassSet::new();
        classes.insert(name("Dog"));
        classes.insert(name("Animal"));
        let rels = vec![Relationship::inheritance(name("Animal"), name("Dog"))];
        let json: serde_json::Value =
            serde_json::from_str(&encode(&classes, &rels).to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "children": [
                    { "id": "Dog", "width": 120, "height": 50 },
                    { "id": "Animal", "width": 120, "height": 50 }
                ],
                "edges": [{
                    "id": "Animal_Dog_inheritance",
                    "sources": ["Animal"],
                    "targets": ["Dog"],
                    "labels": [{ "text": "inherits" }],
                    "style": "inheritance"
                }]
            })
        );
    }
}
