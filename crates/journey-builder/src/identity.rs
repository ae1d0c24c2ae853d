// Identity issuer. The model only ever creates entities with the
// unassigned id; permanent ids are handed out here, right after an add.

use journey::{
    EdgePatch, FunctionPatch, GraphStore, JourneyPatch, MappingPatch,
    NodePatch, PropertyPatch, is_assigned,
};
use rand::Rng;
use rand::distr::Alphanumeric;

pub trait IdIssuer {
    fn issue(&mut self) -> String;
}

/// Issues `temp_<unix millis>_<9 random lowercase alphanumerics>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalIssuer;

impl IdIssuer for LocalIssuer {
    fn issue(&mut self) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        format!("temp_{millis}_{suffix}")
    }
}

/// Give every unassigned entity in the open journey an id.
/// Returns how many ids were issued.
pub fn assign_missing_ids(
    store: &mut GraphStore,
    issuer: &mut impl IdIssuer,
) -> usize {
    let journey = store.journey();
    let properties = unassigned(journey.properties.iter().map(|p| &p.id));
    let nodes = unassigned(journey.nodes.iter().map(|n| &n.id));
    let functions = unassigned(journey.functions.iter().map(|f| &f.id));
    let mappings = unassigned(journey.mappings.iter().map(|m| &m.id));
    let edges = unassigned(journey.edges.iter().map(|e| &e.id));

    let mut issued = 0;
    for index in properties {
        store.update_property_at(
            index,
            PropertyPatch {
                id: Some(issuer.issue()),
                ..PropertyPatch::default()
            },
        );
        issued += 1;
    }
    for index in nodes {
        store.update_node_at(
            index,
            NodePatch {
                id: Some(issuer.issue()),
                ..NodePatch::default()
            },
        );
        issued += 1;
    }
    for index in functions {
        store.update_function_at(
            index,
            FunctionPatch {
                id: Some(issuer.issue()),
                ..FunctionPatch::default()
            },
        );
        issued += 1;
    }
    for index in mappings {
        store.update_mapping_at(
            index,
            MappingPatch {
                id: Some(issuer.issue()),
                ..MappingPatch::default()
            },
        );
        issued += 1;
    }
    for index in edges {
        store.update_edge_at(
            index,
            EdgePatch {
                id: Some(issuer.issue()),
                ..EdgePatch::default()
            },
        );
        issued += 1;
    }
    if issued > 0 {
        tracing::debug!(issued, "assigned entity ids");
    }
    issued
}

/// Give the journey itself an id if it has none yet.
pub fn assign_journey_id(store: &mut GraphStore, issuer: &mut impl IdIssuer) {
    if !is_assigned(&store.journey().id) {
        store.replace_whole(JourneyPatch {
            id: Some(issuer.issue()),
            ..JourneyPatch::default()
        });
    }
}

fn unassigned<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<usize> {
    ids.enumerate()
        .filter(|(_, id)| !is_assigned(id))
        .map(|(index, _)| index)
        .collect()
}
