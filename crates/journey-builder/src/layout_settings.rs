use journey::Canvas;
use serde::{Deserialize, Serialize};

/// Common slider metadata so bounds live in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

pub const NODE_RADIUS_RANGE: SliderRange = SliderRange::new(10.0, 60.0, 1.0);
pub const LABEL_FONT_RANGE: SliderRange = SliderRange::new(8.0, 24.0, 1.0);
pub const BADGE_FONT_RANGE: SliderRange = SliderRange::new(6.0, 18.0, 1.0);
pub const CANVAS_WIDTH_RANGE: SliderRange =
    SliderRange::new(200.0, 2000.0, 10.0);
pub const CANVAS_HEIGHT_RANGE: SliderRange =
    SliderRange::new(200.0, 1200.0, 10.0);

/// Preview appearance, persisted as part of the application config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub visuals: NodeVisualSettings,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 400.0,
            visuals: NodeVisualSettings::default(),
        }
    }
}

impl LayoutSettings {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: f64::from(CANVAS_WIDTH_RANGE.clamp(self.canvas_width)),
            height: f64::from(CANVAS_HEIGHT_RANGE.clamp(self.canvas_height)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeVisualSettings {
    pub node_radius: f32,
    pub label_font_size: f32,
    pub badge_font_size: f32,
    pub show_labels: bool,
    pub show_property_badges: bool,
    pub show_function_badges: bool,
    pub show_edge_labels: bool,
}

impl Default for NodeVisualSettings {
    fn default() -> Self {
        Self {
            node_radius: 35.0,
            label_font_size: 12.0,
            badge_font_size: 10.0,
            show_labels: true,
            show_property_badges: true,
            show_function_badges: true,
            show_edge_labels: true,
        }
    }
}
