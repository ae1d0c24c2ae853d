use crate::cascade;
use crate::model::{
    EdgePatch, FunctionPatch, Journey, JourneyPatch, MappingPatch,
    NewEdge, NewFunction, NewMapping, NewNode, NewProperty, NodePatch,
    NodeType, PropertyPatch, is_assigned,
};
use std::fmt;
use tracing::{debug, trace};

/// Handle returned by [`GraphStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&Journey)>;

/// Single owner of the journey being edited.
///
/// Every mutation goes through `&mut self`, runs to completion, refreshes
/// `updated_at`, bumps the revision and notifies observers. Operations that
/// address an entity which does not exist leave the store untouched.
pub struct GraphStore {
    journey: Journey,
    revision: u64,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("journey", &self.journey)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::create_empty()
    }
}

impl GraphStore {
    pub fn create_empty() -> Self {
        Self::from_journey(Journey::empty())
    }

    pub fn from_journey(journey: Journey) -> Self {
        Self {
            journey,
            revision: 0,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn journey(&self) -> &Journey {
        &self.journey
    }

    pub fn into_journey(self) -> Journey {
        self.journey
    }

    /// Number of mutations applied since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&Journey) + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) {
        self.observers.retain(|(observer_id, _)| *observer_id != id);
    }

    fn commit(&mut self, op: &str) -> &Journey {
        self.journey.touch();
        self.revision += 1;
        trace!(op, revision = self.revision, "journey mutated");
        for (_, observer) in &mut self.observers {
            observer(&self.journey);
        }
        &self.journey
    }

    fn unchanged(&self, op: &str, id: &str) -> &Journey {
        trace!(op, id, "no matching entity, mutation skipped");
        &self.journey
    }

    // --------------------------------------------------------------
    // Journey
    // --------------------------------------------------------------

    /// Shallow-merge `patch` into the snapshot.
    ///
    /// When the patch replaces any entity collection the result is
    /// normalized, so unresolved edges and mappings never survive a bulk
    /// replacement.
    pub fn replace_whole(&mut self, patch: JourneyPatch) -> &Journey {
        let touches_graph = patch.touches_graph();
        patch.apply(&mut self.journey);
        if touches_graph {
            let removed = cascade::normalize(&mut self.journey);
            if removed > 0 {
                debug!(removed, "replaced journey normalized");
            }
        }
        self.commit("replace_whole")
    }

    pub fn toggle_active(&mut self) -> &Journey {
        self.journey.is_active = !self.journey.is_active;
        self.commit("toggle_active")
    }

    /// Append a `start` and an `end` node with the given ids, joined by
    /// the default edge unless one already exists or the start node already
    /// has a custom outgoing edge.
    pub fn seed_start_and_end(
        &mut self,
        start_id: &str,
        end_id: &str,
    ) -> &Journey {
        let mut start = NewNode::new("Start", NodeType::Start).into_node();
        start.id = start_id.to_string();
        let mut end = NewNode::new("End", NodeType::End).into_node();
        end.id = end_id.to_string();
        self.journey.nodes.push(start);
        self.journey.nodes.push(end);

        let has_default = self.journey.edges.iter().any(|e| e.is_default);
        if !has_default && !cascade::has_custom_start_edge(&self.journey) {
            let edge = NewEdge {
                is_default: true,
                ..NewEdge::between(start_id, end_id)
            };
            self.journey.edges.push(edge.into_edge());
        }
        self.commit("seed_start_and_end")
    }

    // --------------------------------------------------------------
    // Properties
    // --------------------------------------------------------------

    pub fn add_property(&mut self, data: NewProperty) -> &Journey {
        self.journey.properties.push(data.into_property());
        self.commit("add_property")
    }

    pub fn update_property(
        &mut self,
        id: &str,
        patch: PropertyPatch,
    ) -> &Journey {
        match position(&self.journey.properties, id, |p| &p.id) {
            Some(index) => self.update_property_at(index, patch),
            None => self.unchanged("update_property", id),
        }
    }

    pub fn update_property_at(
        &mut self,
        index: usize,
        patch: PropertyPatch,
    ) -> &Journey {
        match self.journey.properties.get_mut(index) {
            Some(property) => {
                patch.apply(property);
                self.commit("update_property")
            }
            None => self.unchanged("update_property_at", &index.to_string()),
        }
    }

    pub fn delete_property(&mut self, id: &str) -> &Journey {
        if position(&self.journey.properties, id, |p| &p.id).is_none() {
            return self.unchanged("delete_property", id);
        }
        self.journey.properties.retain(|p| p.id != id);
        let stripped = cascade::strip_property_refs(&mut self.journey, id);
        debug!(id, stripped, "property deleted");
        self.commit("delete_property")
    }

    // --------------------------------------------------------------
    // Nodes
    // --------------------------------------------------------------

    pub fn add_node(&mut self, data: NewNode) -> &Journey {
        self.journey.nodes.push(data.into_node());
        self.commit("add_node")
    }

    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> &Journey {
        match position(&self.journey.nodes, id, |n| &n.id) {
            Some(index) => self.update_node_at(index, patch),
            None => self.unchanged("update_node", id),
        }
    }

    pub fn update_node_at(
        &mut self,
        index: usize,
        patch: NodePatch,
    ) -> &Journey {
        match self.journey.nodes.get_mut(index) {
            Some(node) => {
                let retyped = patch.kind.is_some_and(|kind| kind != node.kind);
                patch.apply(node);
                if retyped {
                    let dropped = cascade::enforce_default_edge(&mut self.journey);
                    if dropped > 0 {
                        debug!(dropped, "retyped node drops default edge");
                    }
                }
                self.commit("update_node")
            }
            None => self.unchanged("update_node_at", &index.to_string()),
        }
    }

    pub fn delete_node(&mut self, id: &str) -> &Journey {
        if position(&self.journey.nodes, id, |n| &n.id).is_none() {
            return self.unchanged("delete_node", id);
        }
        self.journey.nodes.retain(|n| n.id != id);
        let dropped = cascade::drop_node_dependents(&mut self.journey, id);
        debug!(id, dropped, "node deleted");
        self.commit("delete_node")
    }

    // --------------------------------------------------------------
    // Functions
    // --------------------------------------------------------------

    pub fn add_function(&mut self, data: NewFunction) -> &Journey {
        self.journey.functions.push(data.into_function());
        self.commit("add_function")
    }

    pub fn update_function(
        &mut self,
        id: &str,
        patch: FunctionPatch,
    ) -> &Journey {
        match position(&self.journey.functions, id, |f| &f.id) {
            Some(index) => self.update_function_at(index, patch),
            None => self.unchanged("update_function", id),
        }
    }

    pub fn update_function_at(
        &mut self,
        index: usize,
        patch: FunctionPatch,
    ) -> &Journey {
        match self.journey.functions.get_mut(index) {
            Some(function) => {
                patch.apply(function);
                self.commit("update_function")
            }
            None => self.unchanged("update_function_at", &index.to_string()),
        }
    }

    pub fn delete_function(&mut self, id: &str) -> &Journey {
        if position(&self.journey.functions, id, |f| &f.id).is_none() {
            return self.unchanged("delete_function", id);
        }
        self.journey.functions.retain(|f| f.id != id);
        let dropped =
            cascade::drop_function_dependents(&mut self.journey, id);
        debug!(id, dropped, "function deleted");
        self.commit("delete_function")
    }

    // --------------------------------------------------------------
    // Mappings
    // --------------------------------------------------------------

    pub fn add_mapping(&mut self, data: NewMapping) -> &Journey {
        self.journey.mappings.push(data.into_mapping());
        self.commit("add_mapping")
    }

    pub fn update_mapping(
        &mut self,
        id: &str,
        patch: MappingPatch,
    ) -> &Journey {
        match position(&self.journey.mappings, id, |m| &m.id) {
            Some(index) => self.update_mapping_at(index, patch),
            None => self.unchanged("update_mapping", id),
        }
    }

    pub fn update_mapping_at(
        &mut self,
        index: usize,
        patch: MappingPatch,
    ) -> &Journey {
        match self.journey.mappings.get_mut(index) {
            Some(mapping) => {
                patch.apply(mapping);
                self.commit("update_mapping")
            }
            None => self.unchanged("update_mapping_at", &index.to_string()),
        }
    }

    pub fn delete_mapping(&mut self, id: &str) -> &Journey {
        if position(&self.journey.mappings, id, |m| &m.id).is_none() {
            return self.unchanged("delete_mapping", id);
        }
        self.journey.mappings.retain(|m| m.id != id);
        self.commit("delete_mapping")
    }

    // --------------------------------------------------------------
    // Edges
    // --------------------------------------------------------------

    /// Append an edge.
    ///
    /// A custom edge leaving the start node first removes the default edge.
    /// A default edge is skipped once the start node has a custom outgoing
    /// edge, and otherwise replaces any previous default.
    pub fn add_edge(&mut self, data: NewEdge) -> &Journey {
        if data.is_default {
            if cascade::has_custom_start_edge(&self.journey) {
                trace!("start node already has a custom edge, default skipped");
                return &self.journey;
            }
            cascade::drop_default_edges(&mut self.journey);
        } else if cascade::leaves_start(&self.journey, &data.from_node_id) {
            let dropped = cascade::drop_default_edges(&mut self.journey);
            if dropped > 0 {
                debug!(dropped, "custom start edge replaces default edge");
            }
        }
        self.journey.edges.push(data.into_edge());
        self.commit("add_edge")
    }

    pub fn update_edge(&mut self, id: &str, patch: EdgePatch) -> &Journey {
        match position(&self.journey.edges, id, |e| &e.id) {
            Some(index) => self.update_edge_at(index, patch),
            None => self.unchanged("update_edge", id),
        }
    }

    pub fn update_edge_at(
        &mut self,
        index: usize,
        patch: EdgePatch,
    ) -> &Journey {
        let Some(edge) = self.journey.edges.get_mut(index) else {
            return self.unchanged("update_edge_at", &index.to_string());
        };
        patch.apply(edge);
        let (is_default, from) = (edge.is_default, edge.from_node_id.clone());
        if !is_default && cascade::leaves_start(&self.journey, &from) {
            let dropped = cascade::drop_default_edges(&mut self.journey);
            if dropped > 0 {
                debug!(dropped, "custom start edge replaces default edge");
            }
        }
        self.commit("update_edge")
    }

    pub fn delete_edge(&mut self, id: &str) -> &Journey {
        if position(&self.journey.edges, id, |e| &e.id).is_none() {
            return self.unchanged("delete_edge", id);
        }
        self.journey.edges.retain(|e| e.id != id);
        self.commit("delete_edge")
    }
}

/// Index of the first entity holding `id`. The unassigned id never matches.
fn position<T>(
    items: &[T],
    id: &str,
    id_of: impl Fn(&T) -> &String,
) -> Option<usize> {
    if !is_assigned(id) {
        return None;
    }
    items.iter().position(|item| id_of(item) == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        FunctionConfig, FunctionType, HeaderKind, FunctionHeader,
        PropertyType,
    };
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    fn seeded() -> GraphStore {
        let mut store = GraphStore::create_empty();
        store.seed_start_and_end("s", "e");
        store
    }

    fn add_node_with_id(store: &mut GraphStore, id: &str, kind: NodeType) {
        store.add_node(NewNode::new(id.to_uppercase(), kind));
        let index = store.journey().nodes.len() - 1;
        store.update_node_at(
            index,
            NodePatch {
                id: Some(id.to_string()),
                ..NodePatch::default()
            },
        );
    }

    fn add_edge_with_id(store: &mut GraphStore, id: &str, from: &str, to: &str) {
        store.add_edge(NewEdge::between(from, to));
        let index = store.journey().edges.len() - 1;
        store.update_edge_at(
            index,
            EdgePatch {
                id: Some(id.to_string()),
                ..EdgePatch::default()
            },
        );
    }

    fn add_property_with_id(store: &mut GraphStore, id: &str, key: &str) {
        store.add_property(NewProperty {
            key: key.to_string(),
            kind: PropertyType::String,
            validation_condition: None,
        });
        let index = store.journey().properties.len() - 1;
        store.update_property_at(
            index,
            PropertyPatch {
                id: Some(id.to_string()),
                ..PropertyPatch::default()
            },
        );
    }

    fn add_function_with_id(store: &mut GraphStore, id: &str) {
        store.add_function(NewFunction {
            name: id.to_uppercase(),
            kind: FunctionType::Api,
            config: FunctionConfig::default(),
            input_properties: BTreeMap::new(),
            output_properties: BTreeMap::new(),
        });
        let index = store.journey().functions.len() - 1;
        store.update_function_at(
            index,
            FunctionPatch {
                id: Some(id.to_string()),
                ..FunctionPatch::default()
            },
        );
    }

    fn add_mapping_with_id(
        store: &mut GraphStore,
        id: &str,
        node_id: &str,
        function_id: &str,
    ) {
        store.add_mapping(NewMapping {
            node_id: node_id.to_string(),
            function_id: function_id.to_string(),
            ..NewMapping::default()
        });
        let index = store.journey().mappings.len() - 1;
        store.update_mapping_at(
            index,
            MappingPatch {
                id: Some(id.to_string()),
                ..MappingPatch::default()
            },
        );
    }

    fn default_edges(store: &GraphStore) -> usize {
        store.journey().edges.iter().filter(|e| e.is_default).count()
    }

    #[test]
    fn test_create_empty() {
        let store = GraphStore::create_empty();
        let journey = store.journey();
        assert_eq!(journey.id, "");
        assert!(!journey.is_active);
        assert_eq!(journey.stats(), Default::default());
        assert_eq!(journey.created_at, journey.updated_at);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_seed_creates_default_edge() {
        let store = seeded();
        let journey = store.journey();
        assert_eq!(journey.nodes.len(), 2);
        assert_eq!(journey.nodes[0].kind, NodeType::Start);
        assert_eq!(journey.nodes[1].kind, NodeType::End);
        assert_eq!(journey.edges.len(), 1);
        assert!(journey.edges[0].is_default);
        assert_eq!(journey.edges[0].from_node_id, "s");
        assert_eq!(journey.edges[0].to_node_id, "e");
    }

    #[test]
    fn test_custom_start_edge_removes_default() {
        let mut store = seeded();
        add_node_with_id(&mut store, "n", NodeType::Custom);
        store.add_edge(NewEdge::between("s", "n"));

        let journey = store.journey();
        assert_eq!(default_edges(&store), 0, "default edge must be gone");
        assert_eq!(journey.edges.len(), 1);
        assert_eq!(journey.edges[0].to_node_id, "n");
    }

    #[test]
    fn test_edge_from_other_node_keeps_default() {
        let mut store = seeded();
        add_node_with_id(&mut store, "n", NodeType::Custom);
        store.add_edge(NewEdge::between("n", "e"));
        assert_eq!(default_edges(&store), 1);
        assert_eq!(store.journey().edges.len(), 2);
    }

    #[test]
    fn test_default_edge_is_exclusive() {
        let mut store = seeded();
        add_node_with_id(&mut store, "n", NodeType::Custom);

        store.add_edge(NewEdge {
            is_default: true,
            ..NewEdge::between("s", "n")
        });
        assert_eq!(default_edges(&store), 1, "second default replaces first");
        assert_eq!(store.journey().edges[0].to_node_id, "n");

        add_edge_with_id(&mut store, "custom", "s", "e");
        assert_eq!(default_edges(&store), 0);

        store.add_edge(NewEdge {
            is_default: true,
            ..NewEdge::between("s", "e")
        });
        assert_eq!(
            default_edges(&store),
            0,
            "no default once the start node has a custom edge"
        );
    }

    #[test]
    fn test_update_edge_onto_start_removes_default() {
        let mut store = seeded();
        add_node_with_id(&mut store, "n", NodeType::Custom);
        add_edge_with_id(&mut store, "x", "n", "e");
        assert_eq!(default_edges(&store), 1);

        store.update_edge(
            "x",
            EdgePatch {
                from_node_id: Some("s".to_string()),
                ..EdgePatch::default()
            },
        );
        assert_eq!(default_edges(&store), 0);
        assert_eq!(store.journey().edges.len(), 1);
    }

    #[test]
    fn test_delete_node_cascades() {
        let mut store = seeded();
        add_node_with_id(&mut store, "n", NodeType::Custom);
        add_edge_with_id(&mut store, "e1", "s", "n");
        add_edge_with_id(&mut store, "e2", "n", "e");
        add_function_with_id(&mut store, "f");
        add_mapping_with_id(&mut store, "m1", "n", "f");
        add_mapping_with_id(&mut store, "m2", "s", "f");

        store.delete_node("n");
        let journey = store.journey();
        assert!(journey.nodes.iter().all(|n| n.id != "n"));
        assert!(
            journey
                .edges
                .iter()
                .all(|e| e.from_node_id != "n" && e.to_node_id != "n"),
            "no edge may touch the deleted node"
        );
        assert!(journey.mappings.iter().all(|m| m.node_id != "n"));
        assert_eq!(journey.mappings.len(), 1);
    }

    #[test]
    fn test_delete_property_cascades() {
        let mut store = seeded();
        add_property_with_id(&mut store, "p", "email");
        add_property_with_id(&mut store, "q", "age");
        store.update_node(
            "s",
            NodePatch {
                properties: Some(vec!["p".to_string(), "q".to_string()]),
                ..NodePatch::default()
            },
        );
        store.update_node(
            "e",
            NodePatch {
                properties: Some(vec!["p".to_string()]),
                ..NodePatch::default()
            },
        );

        store.delete_property("p");
        let journey = store.journey();
        assert_eq!(journey.properties.len(), 1);
        assert_eq!(journey.nodes[0].properties, vec!["q"]);
        assert!(journey.nodes[1].properties.is_empty());
    }

    #[test]
    fn test_delete_function_cascades() {
        let mut store = seeded();
        add_function_with_id(&mut store, "f");
        add_function_with_id(&mut store, "g");
        add_mapping_with_id(&mut store, "m1", "s", "f");
        add_mapping_with_id(&mut store, "m2", "e", "g");
        add_mapping_with_id(&mut store, "m3", "e", "f");

        store.delete_function("f");
        let journey = store.journey();
        assert_eq!(journey.functions.len(), 1);
        assert_eq!(journey.mappings.len(), 1);
        assert_eq!(journey.mappings[0].id, "m2");
    }

    #[test]
    fn test_toggle_active_twice() {
        let mut store = GraphStore::create_empty();
        let t0 = store.journey().updated_at;
        let original = store.journey().is_active;

        let t1 = store.toggle_active().updated_at;
        assert_ne!(store.journey().is_active, original);
        let t2 = store.toggle_active().updated_at;

        assert_eq!(store.journey().is_active, original);
        assert!(t1 > t0, "first toggle must advance updatedAt");
        assert!(t2 > t1, "second toggle must advance updatedAt");
    }

    #[test]
    fn test_missing_id_is_noop() {
        let mut store = seeded();
        let before = store.journey().clone();
        let revision = store.revision();

        store.update_node("nonexistent", NodePatch::name("x"));
        store.delete_node("nonexistent");
        store.delete_edge("");
        store.update_property_at(7, PropertyPatch::default());

        assert_eq!(store.journey(), &before, "snapshot must be unchanged");
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_unassigned_ids_coexist() {
        let mut store = GraphStore::create_empty();
        store.add_node(NewNode::new("A", NodeType::Custom));
        store.add_node(NewNode::new("B", NodeType::Custom));
        assert_eq!(store.journey().nodes.len(), 2);

        store.update_node("", NodePatch::name("changed"));
        assert!(
            store.journey().nodes.iter().all(|n| n.name != "changed"),
            "the unassigned id is not a locator"
        );

        store.update_node_at(1, NodePatch::name("B2"));
        assert_eq!(store.journey().nodes[0].name, "A");
        assert_eq!(store.journey().nodes[1].name, "B2");
    }

    #[test]
    fn test_replace_whole_merges_fields() {
        let mut store = seeded();
        let nodes = store.journey().nodes.clone();
        store.replace_whole(JourneyPatch {
            name: Some("Onboarding".to_string()),
            ..JourneyPatch::default()
        });
        assert_eq!(store.journey().name, "Onboarding");
        assert_eq!(store.journey().nodes, nodes, "untouched fields survive");
    }

    #[test]
    fn test_assigned_ids_are_never_rewritten() {
        let mut store = seeded();
        add_property_with_id(&mut store, "p", "plan");
        add_function_with_id(&mut store, "f");
        add_mapping_with_id(&mut store, "m", "s", "f");
        store.update_node(
            "s",
            NodePatch {
                id: Some("s2".to_string()),
                properties: Some(vec!["p".to_string()]),
                ..NodePatch::default()
            },
        );
        store.update_property(
            "p",
            PropertyPatch {
                id: Some("p2".to_string()),
                ..PropertyPatch::default()
            },
        );
        store.update_function(
            "f",
            FunctionPatch {
                id: Some("f2".to_string()),
                ..FunctionPatch::default()
            },
        );

        let journey = store.journey();
        assert_eq!(journey.nodes[0].id, "s");
        assert_eq!(journey.nodes[0].properties, vec!["p"]);
        assert_eq!(journey.properties[0].id, "p");
        assert_eq!(journey.functions[0].id, "f");
        assert_eq!(journey.edges[0].from_node_id, "s");
        assert!(
            crate::validation::find_dangling_references(journey).is_empty(),
            "no reference may point at a missing entity"
        );
    }

    #[test]
    fn test_replace_whole_normalizes_edges() {
        let mut store = seeded();
        add_node_with_id(&mut store, "n", NodeType::Custom);
        let mut edges = store.journey().edges.clone();
        let mut second_default = edges[0].clone();
        second_default.id = "d2".to_string();
        second_default.to_node_id = "n".to_string();
        edges.push(second_default);
        let mut dangling = edges[0].clone();
        dangling.id = "ghost".to_string();
        dangling.is_default = false;
        dangling.to_node_id = "missing".to_string();
        edges.push(dangling);

        store.replace_whole(JourneyPatch {
            edges: Some(edges),
            ..JourneyPatch::default()
        });
        let journey = store.journey();
        assert_eq!(default_edges(&store), 1, "only the first default survives");
        assert_eq!(journey.edges.len(), 1);
        assert_eq!(journey.edges[0].to_node_id, "e");
        assert!(crate::validation::find_dangling_references(journey).is_empty());
    }

    #[test]
    fn test_replace_whole_drops_default_beside_custom_start_edge() {
        let mut store = seeded();
        add_node_with_id(&mut store, "n", NodeType::Custom);
        let mut edges = store.journey().edges.clone();
        let mut custom = edges[0].clone();
        custom.id = "c".to_string();
        custom.is_default = false;
        custom.to_node_id = "n".to_string();
        edges.push(custom);

        store.replace_whole(JourneyPatch {
            edges: Some(edges),
            ..JourneyPatch::default()
        });
        assert_eq!(default_edges(&store), 0);
        assert_eq!(store.journey().edges.len(), 1);
    }

    #[test]
    fn test_second_start_node_replaces_default_edge() {
        let mut store = seeded();
        add_node_with_id(&mut store, "n", NodeType::Custom);
        add_node_with_id(&mut store, "x", NodeType::Custom);
        add_edge_with_id(&mut store, "nx", "n", "x");
        assert_eq!(default_edges(&store), 1);

        store.update_node(
            "n",
            NodePatch {
                kind: Some(NodeType::Start),
                ..NodePatch::default()
            },
        );
        assert_eq!(default_edges(&store), 0, "n now starts with a custom edge");

        add_node_with_id(&mut store, "s3", NodeType::Start);
        add_edge_with_id(&mut store, "s3x", "s3", "x");
        store.add_edge(NewEdge {
            is_default: true,
            ..NewEdge::between("s", "e")
        });
        assert_eq!(default_edges(&store), 0);
    }

    #[test]
    fn test_update_function_config() {
        let mut store = GraphStore::create_empty();
        add_function_with_id(&mut store, "f");
        let config = FunctionConfig {
            host: "https://api.example.com".to_string(),
            headers: vec![FunctionHeader {
                key: "Authorization".to_string(),
                kind: HeaderKind::Property,
                value: "p".to_string(),
            }],
            ..FunctionConfig::default()
        };
        store.update_function(
            "f",
            FunctionPatch {
                config: Some(config.clone()),
                ..FunctionPatch::default()
            },
        );
        assert_eq!(store.journey().functions[0].config, config);
    }

    #[test]
    fn test_observers_see_applied_mutations_only() {
        let mut store = GraphStore::create_empty();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let id = store.subscribe(move |_| seen.set(seen.get() + 1));

        store.add_node(NewNode::new("A", NodeType::Custom));
        store.delete_node("missing");
        assert_eq!(calls.get(), 1);

        store.unsubscribe(id);
        store.toggle_active();
        assert_eq!(calls.get(), 1);
        assert_eq!(store.revision(), 2);
    }
}
