use crate::model::{
    Edge, Function, Journey, Node, NodeFunctionMapping, Property,
    is_assigned,
};

/// Single-node selection; selecting the selected node clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    node_id: Option<String>,
}

impl Selection {
    pub fn selected(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.node_id.as_deref() == Some(id)
    }

    /// Toggle `id`. The unassigned id cannot be selected.
    pub fn toggle(&mut self, id: &str) {
        if !is_assigned(id) {
            return;
        }
        if self.is_selected(id) {
            self.node_id = None;
        } else {
            self.node_id = Some(id.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.node_id = None;
    }

    /// Drop the selection if the node no longer exists.
    pub fn retain_existing(&mut self, journey: &Journey) {
        let missing = self
            .node_id
            .as_deref()
            .is_some_and(|id| journey.node(id).is_none());
        if missing {
            self.node_id = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedFunction<'a> {
    pub mapping: &'a NodeFunctionMapping,
    pub function: &'a Function,
}

/// An edge together with the name of the node at its other end.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedEdge<'a> {
    pub edge: &'a Edge,
    /// `None` when the peer node does not resolve.
    pub peer_name: Option<&'a str>,
}

/// Everything the detail panel shows for one node, resolved against the
/// current snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetails<'a> {
    pub node: &'a Node,
    pub properties: Vec<&'a Property>,
    pub functions: Vec<MappedFunction<'a>>,
    pub incoming: Vec<ConnectedEdge<'a>>,
    pub outgoing: Vec<ConnectedEdge<'a>>,
}

impl<'a> NodeDetails<'a> {
    /// `None` when `node_id` does not name a node. Unresolvable references
    /// are dropped, or reported as unknown peers for edges.
    pub fn resolve(journey: &'a Journey, node_id: &str) -> Option<Self> {
        let node = journey.node(node_id)?;

        let properties = node
            .properties
            .iter()
            .filter_map(|id| journey.property(id))
            .collect();

        let functions = journey
            .mappings
            .iter()
            .filter(|m| m.node_id == node.id)
            .filter_map(|mapping| {
                journey
                    .function(&mapping.function_id)
                    .map(|function| MappedFunction { mapping, function })
            })
            .collect();

        let peer = |id: &str| journey.node(id).map(|n| n.name.as_str());
        let incoming = journey
            .edges
            .iter()
            .filter(|e| e.to_node_id == node.id)
            .map(|edge| ConnectedEdge {
                edge,
                peer_name: peer(&edge.from_node_id),
            })
            .collect();
        let outgoing = journey
            .edges
            .iter()
            .filter(|e| e.from_node_id == node.id)
            .map(|edge| ConnectedEdge {
                edge,
                peer_name: peer(&edge.to_node_id),
            })
            .collect();

        Some(Self {
            node,
            properties,
            functions,
            incoming,
            outgoing,
        })
    }
}
