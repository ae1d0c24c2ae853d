use crate::model::Journey;
use serde::{Deserialize, Serialize};

/// Drawing area the grid is spread over, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Grid slot of one node, together with the grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl GridCell {
    pub fn position(&self, canvas: Canvas) -> Point {
        let x = (self.col + 1) as f64 * canvas.width / (self.cols + 1) as f64;
        let y =
            (self.row + 1) as f64 * canvas.height / (self.rows + 1) as f64;
        Point::new(x, y)
    }
}

/// Cell for the node at `index` among `count` nodes laid out row-major on a
/// `ceil(sqrt(count))`-column grid.
pub fn grid_cell(index: usize, count: usize) -> GridCell {
    let count = count.max(1);
    let cols = ((count as f64).sqrt().ceil() as usize).max(1);
    let rows = count.div_ceil(cols);
    GridCell {
        row: index / cols,
        col: index % cols,
        rows,
        cols,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    /// Position of the node in the journey's node collection.
    pub index: usize,
    pub node_id: String,
    pub position: Point,
    /// Whether at least one coordinate came from a stored manual placement.
    pub manual: bool,
}

/// Place every node, in collection order. Stored coordinates win per axis;
/// the missing axis falls back to the grid.
pub fn layout_nodes(journey: &Journey, canvas: Canvas) -> Vec<PlacedNode> {
    let count = journey.nodes.len();
    journey
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let grid = grid_cell(index, count).position(canvas);
            PlacedNode {
                index,
                node_id: node.id.clone(),
                position: Point::new(
                    node.x.unwrap_or(grid.x),
                    node.y.unwrap_or(grid.y),
                ),
                manual: node.x.is_some() || node.y.is_some(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewNode, NodeType};

    fn journey_with(count: usize) -> Journey {
        let mut journey = Journey::empty();
        for i in 0..count {
            let mut node =
                NewNode::new(format!("N{i}"), NodeType::Custom).into_node();
            node.id = format!("n{i}");
            journey.nodes.push(node);
        }
        journey
    }

    #[test]
    fn test_grid_cell_for_four_nodes() {
        let cell = grid_cell(2, 4);
        assert_eq!(cell.cols, 2);
        assert_eq!(cell.rows, 2);
        assert_eq!((cell.row, cell.col), (1, 0));
    }

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(grid_cell(0, 1).cols, 1);
        assert_eq!(grid_cell(0, 5).cols, 3);
        assert_eq!(grid_cell(0, 5).rows, 2);
        assert_eq!(grid_cell(0, 9).rows, 3);
        assert_eq!(grid_cell(0, 10).cols, 4);
        assert_eq!(grid_cell(0, 10).rows, 3);
    }

    #[test]
    fn test_single_node_is_centered() {
        let canvas = Canvas {
            width: 600.0,
            height: 400.0,
        };
        let placed = layout_nodes(&journey_with(1), canvas);
        assert_eq!(placed[0].position, Point::new(300.0, 200.0));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let journey = journey_with(7);
        let canvas = Canvas::default();
        let first = layout_nodes(&journey, canvas);
        let second = layout_nodes(&journey, canvas);
        assert_eq!(first, second);

        let mut positions: Vec<(i64, i64)> = first
            .iter()
            .map(|p| (p.position.x as i64, p.position.y as i64))
            .collect();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), 7, "grid positions must not overlap");
    }

    #[test]
    fn test_four_node_positions() {
        let canvas = Canvas {
            width: 300.0,
            height: 300.0,
        };
        let placed = layout_nodes(&journey_with(4), canvas);
        assert_eq!(placed[0].position, Point::new(100.0, 100.0));
        assert_eq!(placed[1].position, Point::new(200.0, 100.0));
        assert_eq!(placed[2].position, Point::new(100.0, 200.0));
        assert_eq!(placed[3].position, Point::new(200.0, 200.0));
    }

    #[test]
    fn test_manual_coordinates_win_per_axis() {
        let mut journey = journey_with(4);
        journey.nodes[0].x = Some(0.0);
        journey.nodes[0].y = Some(0.0);
        journey.nodes[3].x = Some(42.0);
        let canvas = Canvas {
            width: 300.0,
            height: 300.0,
        };
        let placed = layout_nodes(&journey, canvas);
        assert_eq!(placed[0].position, Point::new(0.0, 0.0));
        assert!(placed[0].manual);
        assert_eq!(placed[3].position, Point::new(42.0, 200.0));
        assert!(!placed[1].manual);
    }

    #[test]
    fn test_empty_journey() {
        assert!(layout_nodes(&Journey::empty(), Canvas::default()).is_empty());
    }
}
