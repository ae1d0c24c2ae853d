// Edit-form checks and an integrity audit. None of this is enforced by the
// store.

use crate::model::{HeaderKind, Journey};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static PROPERTY_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("property key pattern")
});

/// A property key starts with a letter followed by letters, digits or `_`.
pub fn is_valid_property_key(key: &str) -> bool {
    PROPERTY_KEY.is_match(key)
}

pub fn is_non_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Keys used by more than one property, with how often each appears.
pub fn duplicate_property_keys(journey: &Journey) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for property in &journey.properties {
        *counts.entry(property.key.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, count)| (key.to_string(), count))
        .collect()
}

/// Where an unresolved reference was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    NodeProperty { node_id: String, property_id: String },
    EdgeSource { edge_id: String, node_id: String },
    EdgeTarget { edge_id: String, node_id: String },
    MappingNode { mapping_id: String, node_id: String },
    MappingFunction { mapping_id: String, function_id: String },
    HeaderProperty { function_id: String, header: String, property_id: String },
    BodyProperty { function_id: String, field: String, property_id: String },
}

/// Report every id that no longer resolves. Empty binding values are
/// treated as "not yet chosen" rather than dangling.
pub fn find_dangling_references(journey: &Journey) -> Vec<DanglingReference> {
    let mut found = Vec::new();

    for node in &journey.nodes {
        for property_id in &node.properties {
            if journey.property(property_id).is_none() {
                found.push(DanglingReference::NodeProperty {
                    node_id: node.id.clone(),
                    property_id: property_id.clone(),
                });
            }
        }
    }

    for edge in &journey.edges {
        if journey.node(&edge.from_node_id).is_none() {
            found.push(DanglingReference::EdgeSource {
                edge_id: edge.id.clone(),
                node_id: edge.from_node_id.clone(),
            });
        }
        if journey.node(&edge.to_node_id).is_none() {
            found.push(DanglingReference::EdgeTarget {
                edge_id: edge.id.clone(),
                node_id: edge.to_node_id.clone(),
            });
        }
    }

    for mapping in &journey.mappings {
        if journey.node(&mapping.node_id).is_none() {
            found.push(DanglingReference::MappingNode {
                mapping_id: mapping.id.clone(),
                node_id: mapping.node_id.clone(),
            });
        }
        if journey.function(&mapping.function_id).is_none() {
            found.push(DanglingReference::MappingFunction {
                mapping_id: mapping.id.clone(),
                function_id: mapping.function_id.clone(),
            });
        }
    }

    for function in &journey.functions {
        let config = &function.config;
        for header in &config.headers {
            if header.kind == HeaderKind::Property
                && !header.value.is_empty()
                && journey.property(&header.value).is_none()
            {
                found.push(DanglingReference::HeaderProperty {
                    function_id: function.id.clone(),
                    header: header.key.clone(),
                    property_id: header.value.clone(),
                });
            }
        }
        let bodies = config
            .request_body
            .iter()
            .chain(config.request_body_path.iter());
        for (field, property_id) in bodies.flat_map(|m| m.iter()) {
            if !property_id.is_empty() && journey.property(property_id).is_none()
            {
                found.push(DanglingReference::BodyProperty {
                    function_id: function.id.clone(),
                    field: field.clone(),
                    property_id: property_id.clone(),
                });
            }
        }
    }

    found
}
