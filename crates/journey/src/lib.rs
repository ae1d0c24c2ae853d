pub mod cascade;
pub mod layout;
pub mod model;
pub mod render;
pub mod selection;
pub mod storage;
pub mod store;
pub mod validation;

pub use layout::{
    Canvas, GridCell, PlacedNode, Point, grid_cell, layout_nodes,
};
pub use model::{
    Edge, EdgePatch, Function, FunctionConfig, FunctionHeader,
    FunctionPatch, FunctionType, HeaderKind, HttpMethod, Journey,
    JourneyPatch, JourneyStats, MappingPatch, NewEdge, NewFunction,
    NewMapping, NewNode, NewProperty, Node, NodeFunctionMapping,
    NodePatch, NodeType, Property, PropertyPatch, PropertyType,
    UNASSIGNED_ID, is_assigned,
};
pub use render::{FunctionBadge, Scene, SceneEdge, SceneNode};
pub use selection::{ConnectedEdge, MappedFunction, NodeDetails, Selection};
pub use storage::{
    BlobStore, DEFAULT_SLOT, FileBlobStore, JourneyRepository,
    MemoryBlobStore, StorageError, export_journey, import_journey,
};
pub use store::{GraphStore, ObserverId};
pub use validation::{
    DanglingReference, duplicate_property_keys, find_dangling_references,
    is_non_blank, is_valid_property_key,
};
