use crate::graph_view::PreviewNode;
use crate::layout_settings::NodeVisualSettings;
use eframe::egui::{
    self, Color32, FontFamily, FontId, Pos2, Shape, Stroke, Vec2,
    epaint::{CircleShape, TextShape},
};
use egui_graphs::{DisplayNode, DrawContext, NodeProps};
use once_cell::sync::Lazy;
use petgraph::{EdgeType, stable_graph::IndexType};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

const FUNCTION_BADGE_COLOR: Color32 = Color32::from_rgb(139, 92, 246);
const PROPERTY_BADGE_COLOR: Color32 = Color32::from_rgb(107, 114, 128);
const BADGE_GAP: f32 = 6.0;

static NODE_VISUALS: Lazy<RwLock<NodeVisualSettings>> =
    Lazy::new(|| RwLock::new(NodeVisualSettings::default()));

pub fn set_node_visuals(visuals: &NodeVisualSettings) {
    let mut guard =
        NODE_VISUALS.write().unwrap_or_else(PoisonError::into_inner);
    *guard = visuals.clone();
}

pub(crate) fn node_visuals() -> NodeVisualSettings {
    NODE_VISUALS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub fn node_type_color(node: &PreviewNode) -> Color32 {
    let [r, g, b] = node.kind.color_rgb();
    Color32::from_rgb(r, g, b)
}

/// Coloured circle per journey node with the name inside, a property
/// count under it and a function marker at the top-right.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JourneyNodeShape {
    pos: Pos2,
    selected: bool,
    dragged: bool,
    hovered: bool,
    fill: Color32,
    label_text: String,
    property_count: Option<usize>,
    function_label: Option<String>,
    has_function: bool,
    radius: f32,
    label_font: f32,
    badge_font: f32,
    show_label: bool,
    show_property_badge: bool,
    show_function_badge: bool,
}

impl From<NodeProps<PreviewNode>> for JourneyNodeShape {
    fn from(props: NodeProps<PreviewNode>) -> Self {
        let mut shape = Self {
            pos: props.location(),
            selected: props.selected,
            dragged: props.dragged,
            hovered: props.hovered,
            fill: node_type_color(&props.payload),
            label_text: props.payload.name.clone(),
            property_count: props.payload.property_badge,
            function_label: None,
            has_function: false,
            radius: 0.0,
            label_font: 0.0,
            badge_font: 0.0,
            show_label: true,
            show_property_badge: true,
            show_function_badge: true,
        };
        shape.set_function(&props.payload);
        shape.refresh_visuals();
        shape
    }
}

impl<E: Clone, Ty: EdgeType, Ix: IndexType>
    DisplayNode<PreviewNode, E, Ty, Ix> for JourneyNodeShape
{
    fn closest_boundary_point(&self, dir: Vec2) -> Pos2 {
        self.pos + dir.normalized() * self.radius
    }

    fn shapes(&mut self, ctx: &DrawContext) -> Vec<Shape> {
        self.refresh_visuals();
        let mut res = Vec::with_capacity(5);
        let center = ctx.meta.canvas_to_screen_pos(self.pos);
        let radius = ctx.meta.canvas_to_screen_size(self.radius);

        res.push(
            CircleShape {
                center,
                radius,
                fill: self.fill,
                stroke: self.effective_stroke(),
            }
            .into(),
        );

        if self.show_label || self.selected || self.hovered || self.dragged {
            let galley = text_galley(
                ctx,
                &self.label_text,
                self.label_font,
                Color32::WHITE,
            );
            let top_left = center - galley.size() / 2.0;
            res.push(TextShape::new(top_left, galley, Color32::WHITE).into());
        }

        if self.show_property_badge
            && let Some(count) = self.property_count
        {
            let text = format!("{count} props");
            let galley = text_galley(
                ctx,
                &text,
                self.badge_font,
                PROPERTY_BADGE_COLOR,
            );
            let gap = ctx.meta.canvas_to_screen_size(BADGE_GAP);
            let top_left = Pos2::new(
                center.x - galley.size().x / 2.0,
                center.y + radius + gap,
            );
            res.push(
                TextShape::new(top_left, galley, PROPERTY_BADGE_COLOR).into(),
            );
        }

        if self.show_function_badge && self.has_function {
            res.extend(self.function_badge_shapes(ctx, center, radius));
        }
        res
    }

    fn update(&mut self, state: &NodeProps<PreviewNode>) {
        self.refresh_visuals();
        self.pos = state.location();
        self.selected = state.selected;
        self.dragged = state.dragged;
        self.hovered = state.hovered;
        self.fill = node_type_color(&state.payload);
        self.label_text = state.payload.name.clone();
        self.property_count = state.payload.property_badge;
        self.set_function(&state.payload);
    }

    fn is_inside(&self, pos: Pos2) -> bool {
        (pos - self.pos).length() <= self.radius
    }
}

impl JourneyNodeShape {
    fn refresh_visuals(&mut self) {
        let visuals = node_visuals();
        self.radius = visuals.node_radius;
        self.label_font = visuals.label_font_size;
        self.badge_font = visuals.badge_font_size;
        self.show_label = visuals.show_labels;
        self.show_property_badge = visuals.show_property_badges;
        self.show_function_badge = visuals.show_function_badges;
    }

    fn set_function(&mut self, node: &PreviewNode) {
        self.has_function = node.function_badge.is_some();
        self.function_label =
            node.function_badge.as_ref().and_then(|b| b.label.clone());
    }

    fn effective_stroke(&self) -> Stroke {
        if self.selected {
            Stroke::new(4.0, egui::Color32::from_rgb(180, 50, 60))
        } else if self.hovered || self.dragged {
            Stroke::new(2.0, egui::Color32::from_rgb(220, 220, 220))
        } else {
            Stroke::new(2.0, egui::Color32::from_rgb(80, 80, 80))
        }
    }

    fn function_badge_shapes(
        &self,
        ctx: &DrawContext,
        center: Pos2,
        radius: f32,
    ) -> Vec<Shape> {
        let mut res = Vec::with_capacity(3);
        let badge_radius = ctx.meta.canvas_to_screen_size(self.badge_font);
        let diagonal = Vec2::new(1.0, -1.0).normalized() * radius;
        let badge_center = center + diagonal;

        res.push(
            CircleShape {
                center: badge_center,
                radius: badge_radius,
                fill: FUNCTION_BADGE_COLOR,
                stroke: Stroke::new(1.0, Color32::WHITE),
            }
            .into(),
        );
        let marker = text_galley(ctx, "f", self.badge_font, Color32::WHITE);
        res.push(
            TextShape::new(
                badge_center - marker.size() / 2.0,
                marker,
                Color32::WHITE,
            )
            .into(),
        );

        if let Some(label) = &self.function_label {
            let galley =
                text_galley(ctx, label, self.badge_font, FUNCTION_BADGE_COLOR);
            let top_left = Pos2::new(
                badge_center.x + badge_radius + 2.0,
                badge_center.y - galley.size().y / 2.0,
            );
            res.push(
                TextShape::new(top_left, galley, FUNCTION_BADGE_COLOR).into(),
            );
        }
        res
    }
}

pub(crate) fn text_galley(
    ctx: &DrawContext,
    text: &str,
    canvas_font_size: f32,
    color: Color32,
) -> std::sync::Arc<egui::Galley> {
    let size = ctx.meta.canvas_to_screen_size(canvas_font_size).max(1.0);
    ctx.ctx.fonts_mut(|f| {
        f.layout_no_wrap(
            text.to_string(),
            FontId::new(size, FontFamily::Monospace),
            color,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use journey::{FunctionBadge, NodeType, Point};

    fn preview(kind: NodeType) -> PreviewNode {
        PreviewNode {
            id: "n1".to_string(),
            name: "Start".to_string(),
            kind,
            position: Point::new(0.0, 0.0),
            property_badge: Some(2),
            function_badge: Some(FunctionBadge {
                label: None,
                mapping_count: 1,
            }),
        }
    }

    #[test]
    fn test_node_colors_follow_type() {
        assert_eq!(
            node_type_color(&preview(NodeType::Start)),
            Color32::from_rgb(0x10, 0xB9, 0x81)
        );
        assert_eq!(
            node_type_color(&preview(NodeType::DeadEnd)),
            node_type_color(&preview(NodeType::End))
        );
    }

    #[test]
    fn test_visuals_are_shared() {
        let mut visuals = NodeVisualSettings::default();
        visuals.node_radius = 22.0;
        visuals.show_property_badges = false;
        set_node_visuals(&visuals);
        assert_eq!(node_visuals(), visuals);
        set_node_visuals(&NodeVisualSettings::default());
    }
}
