// Preview scene: positioned nodes with their badges and the edges that
// should be drawn.

use crate::layout::{Canvas, Point, layout_nodes};
use crate::model::{Journey, NodeType, is_assigned};
use std::collections::HashMap;

/// Indicator drawn on a node bound to at least one function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBadge {
    /// Name of the function reached through the first mapping on the node;
    /// `None` when that function does not resolve.
    pub label: Option<String>,
    pub mapping_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub kind: NodeType,
    pub position: Point,
    /// Property-count badge, present only for nodes with properties.
    pub property_badge: Option<usize>,
    pub function_badge: Option<FunctionBadge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneEdge {
    /// Position of the edge in the journey's edge collection.
    pub index: usize,
    pub id: String,
    /// Scene node indices of the endpoints.
    pub from: usize,
    pub to: usize,
    pub from_pos: Point,
    pub to_pos: Point,
    /// Validation condition shown at the midpoint, when non-empty.
    pub label: Option<String>,
    pub is_default: bool,
}

impl SceneEdge {
    pub fn midpoint(&self) -> Point {
        self.from_pos.midpoint(self.to_pos)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub canvas: Canvas,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

impl Scene {
    pub fn build(journey: &Journey, canvas: Canvas) -> Self {
        let placed = layout_nodes(journey, canvas);

        let nodes: Vec<SceneNode> = journey
            .nodes
            .iter()
            .zip(placed)
            .map(|(node, placed)| {
                let mut mappings =
                    journey.mappings.iter().filter(|m| m.node_id == node.id);
                let function_badge = if is_assigned(&node.id) {
                    mappings.next().map(|first| FunctionBadge {
                        label: journey
                            .function(&first.function_id)
                            .map(|f| f.name.clone()),
                        mapping_count: 1 + mappings.count(),
                    })
                } else {
                    None
                };
                SceneNode {
                    index: placed.index,
                    id: node.id.clone(),
                    name: node.name.clone(),
                    kind: node.kind,
                    position: placed.position,
                    property_badge: (!node.properties.is_empty())
                        .then_some(node.properties.len()),
                    function_badge,
                }
            })
            .collect();

        // First node wins when an id is duplicated.
        let mut by_id: HashMap<&str, usize> = HashMap::new();
        for node in nodes.iter().rev() {
            if is_assigned(&node.id) {
                by_id.insert(node.id.as_str(), node.index);
            }
        }

        let edges = journey
            .edges
            .iter()
            .enumerate()
            .filter_map(|(index, edge)| {
                let from = *by_id.get(edge.from_node_id.as_str())?;
                let to = *by_id.get(edge.to_node_id.as_str())?;
                if nodes[from].kind == NodeType::DeadEnd {
                    return None;
                }
                Some(SceneEdge {
                    index,
                    id: edge.id.clone(),
                    from,
                    to,
                    from_pos: nodes[from].position,
                    to_pos: nodes[to].position,
                    label: (!edge.validation_condition.is_empty())
                        .then(|| edge.validation_condition.clone()),
                    is_default: edge.is_default,
                })
            })
            .collect();

        Self {
            canvas,
            nodes,
            edges,
        }
    }

    pub fn node(&self, id: &str) -> Option<&SceneNode> {
        if !is_assigned(id) {
            return None;
        }
        self.nodes.iter().find(|n| n.id == id)
    }
}
