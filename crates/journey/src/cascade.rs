// Cascade transforms over a whole journey snapshot.
//
// The store composes these after removing the entity itself, so every
// function here only filters dependents.

use crate::model::{Journey, NodeType, is_assigned};
use std::collections::HashSet;

/// Remove `property_id` from every node's property list.
/// Returns the number of node entries stripped.
pub fn strip_property_refs(journey: &mut Journey, property_id: &str) -> usize {
    let mut stripped = 0;
    for node in &mut journey.nodes {
        let before = node.properties.len();
        node.properties.retain(|p| p != property_id);
        stripped += before - node.properties.len();
    }
    stripped
}

/// Remove every edge touching `node_id` and every mapping bound to it.
/// Returns the number of edges and mappings removed.
pub fn drop_node_dependents(journey: &mut Journey, node_id: &str) -> usize {
    let edges_before = journey.edges.len();
    journey
        .edges
        .retain(|e| e.from_node_id != node_id && e.to_node_id != node_id);
    let mappings_before = journey.mappings.len();
    journey.mappings.retain(|m| m.node_id != node_id);
    (edges_before - journey.edges.len())
        + (mappings_before - journey.mappings.len())
}

/// Remove every mapping that references `function_id`.
pub fn drop_function_dependents(
    journey: &mut Journey,
    function_id: &str,
) -> usize {
    let before = journey.mappings.len();
    journey.mappings.retain(|m| m.function_id != function_id);
    before - journey.mappings.len()
}

/// Remove every edge flagged as default.
pub fn drop_default_edges(journey: &mut Journey) -> usize {
    let before = journey.edges.len();
    journey.edges.retain(|e| !e.is_default);
    before - journey.edges.len()
}

/// Whether a non-default edge leaves any start node.
pub fn has_custom_start_edge(journey: &Journey) -> bool {
    journey
        .edges
        .iter()
        .any(|e| !e.is_default && leaves_start(journey, &e.from_node_id))
}

/// Whether `from_node_id` names a node of type `start`.
pub fn leaves_start(journey: &Journey, from_node_id: &str) -> bool {
    journey
        .node(from_node_id)
        .is_some_and(|node| node.kind == NodeType::Start)
}

/// Re-establish the default-edge rules: at most one default edge, and none
/// once a start node has a custom outgoing edge.
/// Returns the number of default edges removed.
pub fn enforce_default_edge(journey: &mut Journey) -> usize {
    if has_custom_start_edge(journey) {
        return drop_default_edges(journey);
    }
    let before = journey.edges.len();
    let mut seen_default = false;
    journey.edges.retain(|e| {
        if !e.is_default {
            return true;
        }
        !std::mem::replace(&mut seen_default, true)
    });
    before - journey.edges.len()
}

/// Bring a bulk-replaced snapshot back to a consistent graph: edges and
/// mappings whose endpoints do not resolve are dropped, node property lists
/// only keep known properties, and the default-edge rules are enforced.
/// Returns the number of entries removed.
pub fn normalize(journey: &mut Journey) -> usize {
    let node_ids: HashSet<String> = assigned(journey.nodes.iter().map(|n| &n.id));
    let function_ids: HashSet<String> =
        assigned(journey.functions.iter().map(|f| &f.id));
    let property_ids: HashSet<String> =
        assigned(journey.properties.iter().map(|p| &p.id));

    let edges_before = journey.edges.len();
    journey.edges.retain(|e| {
        node_ids.contains(&e.from_node_id) && node_ids.contains(&e.to_node_id)
    });
    let mappings_before = journey.mappings.len();
    journey.mappings.retain(|m| {
        node_ids.contains(&m.node_id) && function_ids.contains(&m.function_id)
    });
    let mut removed = (edges_before - journey.edges.len())
        + (mappings_before - journey.mappings.len());
    for node in &mut journey.nodes {
        let before = node.properties.len();
        node.properties.retain(|p| property_ids.contains(p));
        removed += before - node.properties.len();
    }
    removed + enforce_default_edge(journey)
}

fn assigned<'a>(ids: impl Iterator<Item = &'a String>) -> HashSet<String> {
    ids.filter(|id| is_assigned(id)).cloned().collect()
}
