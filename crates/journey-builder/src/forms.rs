// Edit buffers behind the tab forms. Map-valued fields are edited as rows
// and only become maps when the form is confirmed, so renaming a key is a
// remove-then-insert at that point.

use journey::{
    EdgePatch, Function, FunctionConfig, FunctionHeader, FunctionPatch,
    FunctionType, HeaderKind, HttpMethod, MappingPatch, NewEdge,
    NewFunction, NewMapping, NewNode, NewProperty, Node,
    NodeFunctionMapping, NodePatch, NodeType, Property, PropertyPatch,
    PropertyType, Edge, is_assigned, is_non_blank, is_valid_property_key,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Blank(&'static str),
    #[error(
        "invalid property key \"{0}\": start with a letter, then letters, digits or _"
    )]
    InvalidPropertyKey(String),
    #[error("select a {0}")]
    MissingSelection(&'static str),
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    if is_non_blank(value) {
        Ok(value.trim().to_string())
    } else {
        Err(FormError::Blank(field))
    }
}

fn selected(id: &str, what: &'static str) -> Result<String, FormError> {
    if is_assigned(id) {
        Ok(id.to_string())
    } else {
        Err(FormError::MissingSelection(what))
    }
}

// ------------------------------------------------------------------
// Key/value rows
// ------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValueRow {
    pub key: String,
    pub value: String,
}

pub fn rows_from_map(map: &BTreeMap<String, String>) -> Vec<KeyValueRow> {
    map.iter()
        .map(|(key, value)| KeyValueRow {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Rows with a blank key are dropped; a later row wins over an earlier one
/// with the same key.
pub fn rows_to_map(rows: &[KeyValueRow]) -> BTreeMap<String, String> {
    rows.iter()
        .filter(|row| is_non_blank(&row.key))
        .map(|row| (row.key.trim().to_string(), row.value.clone()))
        .collect()
}

// ------------------------------------------------------------------
// Property
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDraft {
    pub key: String,
    pub kind: PropertyType,
    pub validation_condition: String,
}

impl Default for PropertyDraft {
    fn default() -> Self {
        Self {
            key: String::new(),
            kind: PropertyType::String,
            validation_condition: String::new(),
        }
    }
}

impl PropertyDraft {
    pub fn from_property(property: &Property) -> Self {
        Self {
            key: property.key.clone(),
            kind: property.kind,
            validation_condition: property
                .validation_condition
                .clone()
                .unwrap_or_default(),
        }
    }

    fn condition(&self) -> Option<String> {
        is_non_blank(&self.validation_condition)
            .then(|| self.validation_condition.trim().to_string())
    }

    pub fn to_new(&self) -> Result<NewProperty, FormError> {
        let key = required(&self.key, "property key")?;
        if !is_valid_property_key(&key) {
            return Err(FormError::InvalidPropertyKey(key));
        }
        Ok(NewProperty {
            key,
            kind: self.kind,
            validation_condition: self.condition(),
        })
    }

    pub fn to_patch(&self) -> Result<PropertyPatch, FormError> {
        let new = self.to_new()?;
        Ok(PropertyPatch {
            id: None,
            key: Some(new.key),
            kind: Some(new.kind),
            validation_condition: Some(new.validation_condition),
        })
    }
}

// ------------------------------------------------------------------
// Node
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDraft {
    pub name: String,
    pub kind: NodeType,
    pub description: String,
    pub properties: Vec<String>,
}

impl Default for NodeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: NodeType::Custom,
            description: String::new(),
            properties: Vec::new(),
        }
    }
}

impl NodeDraft {
    pub fn from_node(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            kind: node.kind,
            description: node.description.clone(),
            properties: node.properties.clone(),
        }
    }

    pub fn toggle_property(&mut self, property_id: &str) {
        if let Some(pos) = self.properties.iter().position(|p| p == property_id) {
            self.properties.remove(pos);
        } else {
            self.properties.push(property_id.to_string());
        }
    }

    pub fn to_new(&self) -> Result<NewNode, FormError> {
        Ok(NewNode {
            description: self.description.clone(),
            properties: self.properties.clone(),
            ..NewNode::new(required(&self.name, "node name")?, self.kind)
        })
    }

    pub fn to_patch(&self) -> Result<NodePatch, FormError> {
        Ok(NodePatch {
            name: Some(required(&self.name, "node name")?),
            kind: Some(self.kind),
            description: Some(self.description.clone()),
            properties: Some(self.properties.clone()),
            ..NodePatch::default()
        })
    }
}

// ------------------------------------------------------------------
// Function
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDraft {
    pub name: String,
    pub kind: FunctionType,
    pub host: String,
    pub path: String,
    pub method: HttpMethod,
    pub header_params: Vec<KeyValueRow>,
    pub headers: Vec<FunctionHeader>,
    pub request_body: Vec<KeyValueRow>,
    pub request_body_path: Vec<KeyValueRow>,
    pub input_properties: Vec<KeyValueRow>,
    pub output_properties: Vec<KeyValueRow>,
    /// Unrecognised config fields of the function being edited.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for FunctionDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: FunctionType::Api,
            host: String::new(),
            path: String::new(),
            method: HttpMethod::Get,
            header_params: Vec::new(),
            headers: Vec::new(),
            request_body: Vec::new(),
            request_body_path: Vec::new(),
            input_properties: Vec::new(),
            output_properties: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl FunctionDraft {
    pub fn from_function(function: &Function) -> Self {
        let config = &function.config;
        Self {
            name: function.name.clone(),
            kind: function.kind,
            host: config.host.clone(),
            path: config.path.clone(),
            method: config.method,
            header_params: rows_from_map(&config.header_params),
            headers: config.headers.clone(),
            request_body: config
                .request_body
                .as_ref()
                .map(rows_from_map)
                .unwrap_or_default(),
            request_body_path: config
                .request_body_path
                .as_ref()
                .map(rows_from_map)
                .unwrap_or_default(),
            input_properties: rows_from_map(&function.input_properties),
            output_properties: rows_from_map(&function.output_properties),
            extra: config.extra.clone(),
        }
    }

    pub fn add_header(&mut self, kind: HeaderKind) {
        self.headers.push(FunctionHeader {
            key: String::new(),
            kind,
            value: String::new(),
        });
    }

    pub fn config(&self) -> FunctionConfig {
        let optional = |rows: &[KeyValueRow]| {
            let map = rows_to_map(rows);
            (!map.is_empty()).then_some(map)
        };
        FunctionConfig {
            host: self.host.trim().to_string(),
            path: self.path.trim().to_string(),
            method: self.method,
            header_params: rows_to_map(&self.header_params),
            headers: self
                .headers
                .iter()
                .filter(|h| is_non_blank(&h.key))
                .cloned()
                .collect(),
            request_body: optional(&self.request_body),
            request_body_path: optional(&self.request_body_path),
            extra: self.extra.clone(),
        }
    }

    pub fn to_new(&self) -> Result<NewFunction, FormError> {
        Ok(NewFunction {
            name: required(&self.name, "function name")?,
            kind: self.kind,
            config: self.config(),
            input_properties: rows_to_map(&self.input_properties),
            output_properties: rows_to_map(&self.output_properties),
        })
    }

    pub fn to_patch(&self) -> Result<FunctionPatch, FormError> {
        let new = self.to_new()?;
        Ok(FunctionPatch {
            id: None,
            name: Some(new.name),
            kind: Some(new.kind),
            config: Some(new.config),
            input_properties: Some(new.input_properties),
            output_properties: Some(new.output_properties),
        })
    }
}

// ------------------------------------------------------------------
// Mapping
// ------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingDraft {
    pub name: String,
    pub description: String,
    pub node_id: String,
    pub function_id: String,
    pub condition: String,
}

impl MappingDraft {
    pub fn from_mapping(mapping: &NodeFunctionMapping) -> Self {
        Self {
            name: mapping.name.clone(),
            description: mapping.description.clone(),
            node_id: mapping.node_id.clone(),
            function_id: mapping.function_id.clone(),
            condition: mapping.condition.clone(),
        }
    }

    pub fn to_new(&self) -> Result<NewMapping, FormError> {
        Ok(NewMapping {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            node_id: selected(&self.node_id, "node")?,
            function_id: selected(&self.function_id, "function")?,
            condition: self.condition.trim().to_string(),
        })
    }

    pub fn to_patch(&self) -> Result<MappingPatch, FormError> {
        let new = self.to_new()?;
        Ok(MappingPatch {
            id: None,
            name: Some(new.name),
            description: Some(new.description),
            node_id: Some(new.node_id),
            function_id: Some(new.function_id),
            condition: Some(new.condition),
        })
    }
}

// ------------------------------------------------------------------
// Edge
// ------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeDraft {
    pub from_node_id: String,
    pub to_node_id: String,
    pub validation_condition: String,
}

impl EdgeDraft {
    pub fn from_edge(edge: &Edge) -> Self {
        Self {
            from_node_id: edge.from_node_id.clone(),
            to_node_id: edge.to_node_id.clone(),
            validation_condition: edge.validation_condition.clone(),
        }
    }

    pub fn to_new(&self) -> Result<NewEdge, FormError> {
        Ok(NewEdge {
            validation_condition: self.validation_condition.trim().to_string(),
            ..NewEdge::between(
                selected(&self.from_node_id, "source node")?,
                selected(&self.to_node_id, "target node")?,
            )
        })
    }

    pub fn to_patch(&self) -> Result<EdgePatch, FormError> {
        let new = self.to_new()?;
        Ok(EdgePatch {
            id: None,
            from_node_id: Some(new.from_node_id),
            to_node_id: Some(new.to_node_id),
            validation_condition: Some(new.validation_condition),
        })
    }
}

// ------------------------------------------------------------------
// Per-tab form state
// ------------------------------------------------------------------

/// A form draft plus the id of the entity it edits (`None` = creating).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form<D> {
    pub draft: D,
    pub editing: Option<String>,
}

impl<D: Default> Form<D> {
    pub fn edit(&mut self, id: &str, draft: D) {
        self.draft = draft;
        self.editing = Some(id.to_string());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct Drafts {
    pub journey_name: String,
    pub journey_description: String,
    pub property: Form<PropertyDraft>,
    pub node: Form<NodeDraft>,
    pub function: Form<FunctionDraft>,
    pub mapping: Form<MappingDraft>,
    pub edge: Form<EdgeDraft>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(key: &str, value: &str) -> KeyValueRow {
        KeyValueRow {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_rows_to_map() {
        let map = rows_to_map(&[
            row("userId", "STRING"),
            row("  ", "ignored"),
            row("age", "NUMBER"),
            row("userId", "NUMBER"),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["userId"], "NUMBER", "later rows win");
    }

    #[test]
    fn test_property_draft_validation() {
        let mut draft = PropertyDraft::default();
        assert_eq!(draft.to_new(), Err(FormError::Blank("property key")));

        draft.key = "1st".to_string();
        assert_eq!(
            draft.to_new(),
            Err(FormError::InvalidPropertyKey("1st".to_string()))
        );

        draft.key = " email ".to_string();
        draft.validation_condition = "  ".to_string();
        let new = draft.to_new().unwrap();
        assert_eq!(new.key, "email");
        assert_eq!(new.validation_condition, None);
    }

    #[test]
    fn test_node_draft() {
        let mut draft = NodeDraft::default();
        assert!(draft.to_new().is_err());
        draft.name = "Verify".to_string();
        draft.toggle_property("p1");
        draft.toggle_property("p2");
        draft.toggle_property("p1");
        let patch = draft.to_patch().unwrap();
        assert_eq!(patch.properties, Some(vec!["p2".to_string()]));
        assert_eq!(patch.x, None, "form edits never touch manual placement");
    }

    #[test]
    fn test_function_draft_round_trip_keeps_extra_fields() {
        let mut config = FunctionConfig {
            host: "https://api.example.com".to_string(),
            method: HttpMethod::Patch,
            request_body: Some(BTreeMap::from([(
                "id".to_string(),
                "p1".to_string(),
            )])),
            ..FunctionConfig::default()
        };
        config.extra.insert("retries".to_string(), json!(3));
        let function = Function {
            id: "f".to_string(),
            name: "Update user".to_string(),
            kind: FunctionType::Api,
            config: config.clone(),
            input_properties: BTreeMap::from([(
                "id".to_string(),
                "STRING".to_string(),
            )]),
            output_properties: BTreeMap::new(),
        };

        let draft = FunctionDraft::from_function(&function);
        let new = draft.to_new().unwrap();
        assert_eq!(new.config, config);
        assert_eq!(new.input_properties, function.input_properties);
    }

    #[test]
    fn test_function_key_rename_replaces_entry() {
        let mut draft = FunctionDraft {
            name: "f".to_string(),
            input_properties: vec![row("old", "STRING")],
            ..FunctionDraft::default()
        };
        draft.input_properties[0].key = "renamed".to_string();
        let new = draft.to_new().unwrap();
        assert!(!new.input_properties.contains_key("old"));
        assert_eq!(new.input_properties["renamed"], "STRING");
    }

    #[test]
    fn test_function_empty_bodies_are_omitted() {
        let mut draft = FunctionDraft {
            name: "Publish".to_string(),
            kind: FunctionType::Kafka,
            request_body: vec![row("", "")],
            ..FunctionDraft::default()
        };
        draft.add_header(HeaderKind::Property);
        let config = draft.to_new().unwrap().config;
        assert_eq!(config.request_body, None);
        assert!(config.headers.is_empty(), "headers without a key are dropped");
    }

    #[test]
    fn test_mapping_and_edge_require_selection() {
        let mapping = MappingDraft {
            node_id: "n".to_string(),
            ..MappingDraft::default()
        };
        assert_eq!(
            mapping.to_new(),
            Err(FormError::MissingSelection("function"))
        );

        let edge = EdgeDraft {
            from_node_id: "a".to_string(),
            to_node_id: "b".to_string(),
            validation_condition: " ok ".to_string(),
        };
        let new = edge.to_new().unwrap();
        assert_eq!(new.validation_condition, "ok");
        assert!(!new.is_default);
    }

    #[test]
    fn test_form_edit_and_reset() {
        let mut form: Form<EdgeDraft> = Form::default();
        form.edit(
            "e1",
            EdgeDraft {
                from_node_id: "a".to_string(),
                ..EdgeDraft::default()
            },
        );
        assert_eq!(form.editing.as_deref(), Some("e1"));
        form.reset();
        assert_eq!(form, Form::default());
    }
}
