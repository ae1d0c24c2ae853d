use crate::layout_grid::{LayoutGrid, LayoutStateGrid};
use crate::node_shapes::{JourneyNodeShape, node_visuals, text_galley};
use eframe::egui::{self, Color32, Pos2, epaint::TextShape};
use egui_graphs::{
    DefaultEdgeShape, DisplayEdge, DisplayNode, DrawContext, EdgeProps, Graph, GraphView, Node,
};
use journey::{FunctionBadge, NodeType, Point, Scene, Selection};
use petgraph::graph::DefaultIx;
use petgraph::stable_graph::{IndexType, NodeIndex, StableGraph};
use petgraph::{Directed, EdgeType};
use std::collections::HashMap;

const EDGE_LABEL_COLOR: Color32 = Color32::from_rgb(156, 163, 175);
const DEFAULT_EDGE_WIDTH: f32 = 1.0;
const CUSTOM_EDGE_WIDTH: f32 = 2.0;

// ------------------------------------------------------------------
// Payloads
// ------------------------------------------------------------------

/// Node payload of the preview graph: one scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewNode {
    pub id: String,
    pub name: String,
    pub kind: NodeType,
    pub position: Point,
    pub property_badge: Option<usize>,
    pub function_badge: Option<FunctionBadge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewEdge {
    pub id: String,
    pub label: Option<String>,
    pub is_default: bool,
}

// ------------------------------------------------------------------
// Type aliases for graph types
// ------------------------------------------------------------------

pub type PreviewGraph =
    Graph<PreviewNode, PreviewEdge, Directed, DefaultIx, JourneyNodeShape, ConditionEdgeShape>;

pub type PreviewGraphView<'a> = GraphView<
    'a,
    PreviewNode,
    PreviewEdge,
    Directed,
    DefaultIx,
    JourneyNodeShape,
    ConditionEdgeShape,
    LayoutStateGrid,
    LayoutGrid,
>;

/// Display graph for a scene. Node indices follow scene order.
pub fn build_preview_graph(scene: &Scene) -> PreviewGraph {
    let mut g: StableGraph<PreviewNode, PreviewEdge> = StableGraph::new();
    let mut indices = HashMap::with_capacity(scene.nodes.len());
    for node in &scene.nodes {
        let idx = g.add_node(PreviewNode {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            position: node.position,
            property_badge: node.property_badge,
            function_badge: node.function_badge.clone(),
        });
        indices.insert(node.index, idx);
    }
    for edge in &scene.edges {
        if let (Some(&from), Some(&to)) = (indices.get(&edge.from), indices.get(&edge.to)) {
            g.add_edge(
                from,
                to,
                PreviewEdge {
                    id: edge.id.clone(),
                    label: edge.label.clone(),
                    is_default: edge.is_default,
                },
            );
        }
    }

    let mut graph = PreviewGraph::from(&g);
    for (idx, node) in g.node_indices().zip(g.node_weights()) {
        if let Some(graph_node) = graph.node_mut(idx) {
            graph_node.set_label(node.name.clone());
        }
    }
    // Conditions are drawn by the edge shape itself.
    let edge_indices: Vec<_> = graph.edges_iter().map(|(idx, _)| idx).collect();
    for edge_idx in edge_indices {
        if let Some(edge) = graph.edge_mut(edge_idx) {
            edge.set_label(String::new());
        }
    }
    graph
}

/// Scene coordinates for every node, keyed by display index.
pub fn node_positions(graph: &PreviewGraph) -> Vec<(NodeIndex, Pos2)> {
    graph
        .nodes_iter()
        .map(|(idx, node)| {
            let p = node.payload().position;
            (idx, Pos2::new(p.x as f32, p.y as f32))
        })
        .collect()
}

/// Mirror the store selection onto the display graph.
pub fn sync_selection(graph: &mut PreviewGraph, selection: &Selection) {
    let nodes: Vec<(NodeIndex, bool)> = graph
        .nodes_iter()
        .map(|(idx, node)| (idx, selection.is_selected(&node.payload().id)))
        .collect();
    for (idx, selected) in nodes {
        if let Some(node) = graph.node_mut(idx)
            && node.selected() != selected
        {
            node.set_selected(selected);
        }
    }
    graph.set_selected_edges(Vec::new());
}

/// Journey node id for a display index.
pub fn node_id_at(graph: &PreviewGraph, idx: NodeIndex) -> Option<String> {
    graph.node(idx).map(|node| node.payload().id.clone())
}

// ------------------------------------------------------------------
// Custom edge shape
// ------------------------------------------------------------------

/// Straight arrow with the validation condition drawn at its midpoint.
/// Default edges are drawn thinner.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ConditionEdgeShape {
    default_impl: DefaultEdgeShape,
    condition: Option<String>,
    is_default: bool,
}

impl From<EdgeProps<PreviewEdge>> for ConditionEdgeShape {
    fn from(props: EdgeProps<PreviewEdge>) -> Self {
        let condition = props.payload.label.clone();
        let is_default = props.payload.is_default;
        let mut default_impl = DefaultEdgeShape::from(props);
        default_impl.width = edge_width(is_default);
        Self {
            default_impl,
            condition,
            is_default,
        }
    }
}

fn edge_width(is_default: bool) -> f32 {
    if is_default {
        DEFAULT_EDGE_WIDTH
    } else {
        CUSTOM_EDGE_WIDTH
    }
}

impl<N: Clone, Ty: EdgeType, Ix: IndexType, D: DisplayNode<N, PreviewEdge, Ty, Ix>>
    DisplayEdge<N, PreviewEdge, Ty, Ix, D> for ConditionEdgeShape
{
    fn is_inside(
        &self,
        start: &Node<N, PreviewEdge, Ty, Ix, D>,
        end: &Node<N, PreviewEdge, Ty, Ix, D>,
        pos: egui::Pos2,
    ) -> bool {
        self.default_impl.is_inside(start, end, pos)
    }

    fn shapes(
        &mut self,
        start: &Node<N, PreviewEdge, Ty, Ix, D>,
        end: &Node<N, PreviewEdge, Ty, Ix, D>,
        ctx: &DrawContext,
    ) -> Vec<egui::Shape> {
        let mut shapes = self.default_impl.shapes(start, end, ctx);
        let visuals = node_visuals();
        if visuals.show_edge_labels
            && let Some(condition) = &self.condition
        {
            let mid = start.location().lerp(end.location(), 0.5);
            let galley = text_galley(
                ctx,
                condition,
                visuals.badge_font_size,
                EDGE_LABEL_COLOR,
            );
            let center = ctx.meta.canvas_to_screen_pos(mid);
            shapes.push(
                TextShape::new(center - galley.size() / 2.0, galley, EDGE_LABEL_COLOR).into(),
            );
        }
        shapes
    }

    fn update(&mut self, state: &EdgeProps<PreviewEdge>) {
        self.condition = state.payload.label.clone();
        self.is_default = state.payload.is_default;
        self.default_impl.width = edge_width(self.is_default);
        DisplayEdge::<N, PreviewEdge, Ty, Ix, D>::update(&mut self.default_impl, state);
    }

    fn extra_bounds(
        &self,
        start: &Node<N, PreviewEdge, Ty, Ix, D>,
        end: &Node<N, PreviewEdge, Ty, Ix, D>,
    ) -> Option<(egui::Pos2, egui::Pos2)> {
        self.default_impl.extra_bounds(start, end)
    }
}
