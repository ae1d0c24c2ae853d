use eframe::egui;
use egui_graphs::{DisplayEdge, DisplayNode, Graph, Layout, LayoutState};
use once_cell::sync::Lazy;
use petgraph::EdgeType;
use petgraph::graph::IndexType;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::{PoisonError, RwLock};

// Positions for the next layout reset (set before reset_layout)
static PENDING_POSITIONS: Lazy<RwLock<Option<Vec<(usize, [f32; 2])>>>> =
    Lazy::new(|| RwLock::new(None));

pub fn set_pending_layout(positions: &[(NodeIndex, egui::Pos2)]) {
    let positions = positions
        .iter()
        .map(|(idx, pos)| (idx.index(), [pos.x, pos.y]))
        .collect();
    *PENDING_POSITIONS
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(positions);
}

/// Precomputed grid placement, keyed by node index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutStateGrid {
    pub positions: Vec<(usize, [f32; 2])>,
}

impl Default for LayoutStateGrid {
    fn default() -> Self {
        let positions = PENDING_POSITIONS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_default();
        Self { positions }
    }
}

impl LayoutState for LayoutStateGrid {}

/// Places nodes once at their grid (or manual) coordinates and then
/// leaves them alone, so dragging works until the next reset.
#[derive(Debug, Clone, Default)]
pub struct LayoutGrid {
    state: LayoutStateGrid,
    applied: bool,
}

impl Layout<LayoutStateGrid> for LayoutGrid {
    fn from_state(state: LayoutStateGrid) -> impl Layout<LayoutStateGrid> {
        Self {
            state,
            applied: false,
        }
    }

    fn next<N, E, Ty, Ix, Dn, De>(
        &mut self,
        g: &mut Graph<N, E, Ty, Ix, Dn, De>,
        _ui: &egui::Ui,
    ) where
        N: Clone,
        E: Clone,
        Ty: EdgeType,
        Ix: IndexType,
        Dn: DisplayNode<N, E, Ty, Ix>,
        De: DisplayEdge<N, E, Ty, Ix, Dn>,
    {
        if self.applied {
            return;
        }

        for (index, [x, y]) in &self.state.positions {
            let idx = NodeIndex::<Ix>::new(*index);
            if let Some(node) = g.node_mut(idx) {
                node.set_location(egui::Pos2::new(*x, *y));
            }
        }

        self.applied = true;
    }

    fn state(&self) -> LayoutStateGrid {
        self.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_positions_are_taken_once() {
        set_pending_layout(&[
            (NodeIndex::new(0), egui::Pos2::new(200.0, 100.0)),
            (NodeIndex::new(1), egui::Pos2::new(600.0, 100.0)),
        ]);
        let state = LayoutStateGrid::default();
        assert_eq!(state.positions.len(), 2);
        assert_eq!(state.positions[1], (1, [600.0, 100.0]));

        assert!(LayoutStateGrid::default().positions.is_empty());
    }
}
