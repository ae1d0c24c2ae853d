// Journey model - entity definitions, creation payloads and patches

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder identifier held by an entity until the identity issuer
/// supplies a permanent one.
pub const UNASSIGNED_ID: &str = "";

pub fn is_assigned(id: &str) -> bool {
    id != UNASSIGNED_ID
}

// ------------------------------------------------------------------
// Enumerations
// ------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Date,
    Timestamp,
    Range,
    List,
    Map,
}

impl PropertyType {
    pub const ALL: [PropertyType; 8] = [
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Date,
        Self::Timestamp,
        Self::Range,
        Self::List,
        Self::Map,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::Timestamp => "TIMESTAMP",
            Self::Range => "RANGE",
            Self::List => "LIST",
            Self::Map => "MAP",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Start,
    End,
    DeadEnd,
    Custom,
    Loader,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        Self::Start,
        Self::End,
        Self::DeadEnd,
        Self::Custom,
        Self::Loader,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::DeadEnd => "dead_end",
            Self::Custom => "custom",
            Self::Loader => "loader",
        }
    }

    /// Fill colour used by the preview for this node type.
    pub fn color_rgb(&self) -> [u8; 3] {
        match self {
            Self::Start => [0x10, 0xB9, 0x81],
            Self::End | Self::DeadEnd => [0xEF, 0x44, 0x44],
            Self::Custom => [0x3B, 0x82, 0xF6],
            Self::Loader => [0xF5, 0x9E, 0x0B],
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionType {
    Api,
    Kafka,
}

impl FunctionType {
    pub const ALL: [FunctionType; 2] = [Self::Api, Self::Kafka];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "API",
            Self::Kafka => "KAFKA",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Where a header value comes from: a literal, or a property id.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HeaderKind {
    #[default]
    Custom,
    Property,
}

// ------------------------------------------------------------------
// Entities
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default)]
    pub description: String,
    /// Ordered set of property ids.
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionHeader {
    pub key: String,
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: HeaderKind,
    #[serde(default)]
    pub value: String,
}

/// Call configuration: the known fields plus an open extension map that
/// round-trips any additional keys found on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub header_params: BTreeMap<String, String>,
    #[serde(default)]
    pub headers: Vec<FunctionHeader>,
    #[serde(
        rename = "requestBody",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_body: Option<BTreeMap<String, String>>,
    #[serde(
        rename = "requestBodyPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_body_path: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FunctionConfig {
    /// Property ids referenced by `property` headers and body maps.
    pub fn property_refs(&self) -> impl Iterator<Item = &str> + '_ {
        let headers = self
            .headers
            .iter()
            .filter(|h| h.kind == HeaderKind::Property)
            .map(|h| h.value.as_str());
        let body = self
            .request_body
            .iter()
            .chain(self.request_body_path.iter())
            .flat_map(|m| m.values().map(String::as_str));
        headers.chain(body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FunctionType,
    #[serde(default)]
    pub config: FunctionConfig,
    #[serde(default)]
    pub input_properties: BTreeMap<String, String>,
    #[serde(default)]
    pub output_properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFunctionMapping {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub node_id: String,
    pub function_id: String,
    #[serde(default)]
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    #[serde(default)]
    pub validation_condition: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub functions: Vec<Function>,
    #[serde(default)]
    pub mappings: Vec<NodeFunctionMapping>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Collection sizes shown next to a journey in the library list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JourneyStats {
    pub properties: usize,
    pub nodes: usize,
    pub functions: usize,
    pub mappings: usize,
    pub edges: usize,
}

impl Journey {
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            id: UNASSIGNED_ID.to_string(),
            name: String::new(),
            description: String::new(),
            properties: Vec::new(),
            nodes: Vec::new(),
            functions: Vec::new(),
            mappings: Vec::new(),
            edges: Vec::new(),
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`; the new value is always strictly later than
    /// the previous one, even when the clock has not advanced.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + TimeDelta::milliseconds(1)
        };
    }

    /// First `start` node carrying an assigned id.
    pub fn start_node(&self) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|n| n.kind == NodeType::Start && is_assigned(&n.id))
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        if !is_assigned(id) {
            return None;
        }
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn property(&self, id: &str) -> Option<&Property> {
        if !is_assigned(id) {
            return None;
        }
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn function(&self, id: &str) -> Option<&Function> {
        if !is_assigned(id) {
            return None;
        }
        self.functions.iter().find(|f| f.id == id)
    }

    pub fn stats(&self) -> JourneyStats {
        JourneyStats {
            properties: self.properties.len(),
            nodes: self.nodes.len(),
            functions: self.functions.len(),
            mappings: self.mappings.len(),
            edges: self.edges.len(),
        }
    }
}

impl Default for Journey {
    fn default() -> Self {
        Self::empty()
    }
}

// ------------------------------------------------------------------
// Creation payloads (entity minus id)
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub key: String,
    pub kind: PropertyType,
    pub validation_condition: Option<String>,
}

impl NewProperty {
    pub fn into_property(self) -> Property {
        Property {
            id: UNASSIGNED_ID.to_string(),
            key: self.key,
            kind: self.kind,
            validation_condition: self.validation_condition,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub name: String,
    pub kind: NodeType,
    pub description: String,
    pub properties: Vec<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl NewNode {
    pub fn new(name: impl Into<String>, kind: NodeType) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            properties: Vec::new(),
            x: None,
            y: None,
        }
    }

    pub fn into_node(self) -> Node {
        Node {
            id: UNASSIGNED_ID.to_string(),
            name: self.name,
            kind: self.kind,
            description: self.description,
            properties: dedup_ids(self.properties),
            x: self.x,
            y: self.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFunction {
    pub name: String,
    pub kind: FunctionType,
    pub config: FunctionConfig,
    pub input_properties: BTreeMap<String, String>,
    pub output_properties: BTreeMap<String, String>,
}

impl NewFunction {
    pub fn into_function(self) -> Function {
        Function {
            id: UNASSIGNED_ID.to_string(),
            name: self.name,
            kind: self.kind,
            config: self.config,
            input_properties: self.input_properties,
            output_properties: self.output_properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewMapping {
    pub name: String,
    pub description: String,
    pub node_id: String,
    pub function_id: String,
    pub condition: String,
}

impl NewMapping {
    pub fn into_mapping(self) -> NodeFunctionMapping {
        NodeFunctionMapping {
            id: UNASSIGNED_ID.to_string(),
            name: self.name,
            description: self.description,
            node_id: self.node_id,
            function_id: self.function_id,
            condition: self.condition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewEdge {
    pub from_node_id: String,
    pub to_node_id: String,
    pub validation_condition: String,
    pub is_default: bool,
}

impl NewEdge {
    pub fn between(
        from_node_id: impl Into<String>,
        to_node_id: impl Into<String>,
    ) -> Self {
        Self {
            from_node_id: from_node_id.into(),
            to_node_id: to_node_id.into(),
            ..Self::default()
        }
    }

    pub fn into_edge(self) -> Edge {
        Edge {
            id: UNASSIGNED_ID.to_string(),
            from_node_id: self.from_node_id,
            to_node_id: self.to_node_id,
            validation_condition: self.validation_condition,
            is_default: self.is_default,
        }
    }
}

// ------------------------------------------------------------------
// Patches (shallow merge: a `Some` field replaces the attribute)
//
// An entity `id` in a patch only fills the unassigned placeholder. Once an
// entity holds a permanent id it is never rewritten, since other entities
// reference it.
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyPatch {
    pub id: Option<String>,
    pub key: Option<String>,
    pub kind: Option<PropertyType>,
    pub validation_condition: Option<Option<String>>,
}

impl PropertyPatch {
    pub fn apply(self, property: &mut Property) {
        if let Some(id) = self.id
            && !is_assigned(&property.id)
        {
            property.id = id;
        }
        if let Some(key) = self.key {
            property.key = key;
        }
        if let Some(kind) = self.kind {
            property.kind = kind;
        }
        if let Some(condition) = self.validation_condition {
            property.validation_condition = condition;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodePatch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: Option<NodeType>,
    pub description: Option<String>,
    pub properties: Option<Vec<String>>,
    pub x: Option<Option<f64>>,
    pub y: Option<Option<f64>>,
}

impl NodePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn apply(self, node: &mut Node) {
        if let Some(id) = self.id
            && !is_assigned(&node.id)
        {
            node.id = id;
        }
        if let Some(name) = self.name {
            node.name = name;
        }
        if let Some(kind) = self.kind {
            node.kind = kind;
        }
        if let Some(description) = self.description {
            node.description = description;
        }
        if let Some(properties) = self.properties {
            node.properties = dedup_ids(properties);
        }
        if let Some(x) = self.x {
            node.x = x;
        }
        if let Some(y) = self.y {
            node.y = y;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionPatch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: Option<FunctionType>,
    pub config: Option<FunctionConfig>,
    pub input_properties: Option<BTreeMap<String, String>>,
    pub output_properties: Option<BTreeMap<String, String>>,
}

impl FunctionPatch {
    pub fn apply(self, function: &mut Function) {
        if let Some(id) = self.id
            && !is_assigned(&function.id)
        {
            function.id = id;
        }
        if let Some(name) = self.name {
            function.name = name;
        }
        if let Some(kind) = self.kind {
            function.kind = kind;
        }
        if let Some(config) = self.config {
            function.config = config;
        }
        if let Some(inputs) = self.input_properties {
            function.input_properties = inputs;
        }
        if let Some(outputs) = self.output_properties {
            function.output_properties = outputs;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappingPatch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub node_id: Option<String>,
    pub function_id: Option<String>,
    pub condition: Option<String>,
}

impl MappingPatch {
    pub fn apply(self, mapping: &mut NodeFunctionMapping) {
        if let Some(id) = self.id
            && !is_assigned(&mapping.id)
        {
            mapping.id = id;
        }
        if let Some(name) = self.name {
            mapping.name = name;
        }
        if let Some(description) = self.description {
            mapping.description = description;
        }
        if let Some(node_id) = self.node_id {
            mapping.node_id = node_id;
        }
        if let Some(function_id) = self.function_id {
            mapping.function_id = function_id;
        }
        if let Some(condition) = self.condition {
            mapping.condition = condition;
        }
    }
}

/// Edge update. The default flag is managed by the store and cannot be
/// patched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgePatch {
    pub id: Option<String>,
    pub from_node_id: Option<String>,
    pub to_node_id: Option<String>,
    pub validation_condition: Option<String>,
}

impl EdgePatch {
    pub fn apply(self, edge: &mut Edge) {
        if let Some(id) = self.id
            && !is_assigned(&edge.id)
        {
            edge.id = id;
        }
        if let Some(from) = self.from_node_id {
            edge.from_node_id = from;
        }
        if let Some(to) = self.to_node_id {
            edge.to_node_id = to;
        }
        if let Some(condition) = self.validation_condition {
            edge.validation_condition = condition;
        }
    }
}

/// Whole-journey shallow merge. `updated_at` is always refreshed by the
/// store and is therefore not part of the patch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JourneyPatch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub properties: Option<Vec<Property>>,
    pub nodes: Option<Vec<Node>>,
    pub functions: Option<Vec<Function>>,
    pub mappings: Option<Vec<NodeFunctionMapping>>,
    pub edges: Option<Vec<Edge>>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl JourneyPatch {
    /// Patch that replaces every content field with the snapshot's.
    pub fn from_snapshot(journey: Journey) -> Self {
        Self {
            id: Some(journey.id),
            name: Some(journey.name),
            description: Some(journey.description),
            properties: Some(journey.properties),
            nodes: Some(journey.nodes),
            functions: Some(journey.functions),
            mappings: Some(journey.mappings),
            edges: Some(journey.edges),
            is_active: Some(journey.is_active),
            created_at: Some(journey.created_at),
        }
    }

    /// Whether the patch replaces any entity collection.
    pub fn touches_graph(&self) -> bool {
        self.properties.is_some()
            || self.nodes.is_some()
            || self.functions.is_some()
            || self.mappings.is_some()
            || self.edges.is_some()
    }

    pub fn apply(self, journey: &mut Journey) {
        if let Some(id) = self.id {
            journey.id = id;
        }
        if let Some(name) = self.name {
            journey.name = name;
        }
        if let Some(description) = self.description {
            journey.description = description;
        }
        if let Some(properties) = self.properties {
            journey.properties = properties;
        }
        if let Some(nodes) = self.nodes {
            journey.nodes = nodes;
        }
        if let Some(functions) = self.functions {
            journey.functions = functions;
        }
        if let Some(mappings) = self.mappings {
            journey.mappings = mappings;
        }
        if let Some(edges) = self.edges {
            journey.edges = edges;
        }
        if let Some(is_active) = self.is_active {
            journey.is_active = is_active;
        }
        if let Some(created_at) = self.created_at {
            journey.created_at = created_at;
        }
    }
}

fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
