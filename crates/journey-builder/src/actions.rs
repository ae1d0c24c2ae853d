use crate::effects::Effect;
use crate::identity::{IdIssuer, assign_journey_id};
use crate::layout_settings::LayoutSettings;
use crate::store::{ActiveTab, Screen, Store};
use journey::{
    EdgePatch, FunctionPatch, GraphStore, JourneyPatch, MappingPatch,
    NewEdge, NewFunction, NewMapping, NewNode, NewProperty, NodePatch,
    PropertyPatch,
};
use std::path::PathBuf;

/// Actions that can be dispatched to modify the editor state
#[derive(Debug, Clone)]
pub enum Action {
    // Library
    /// Start a fresh journey seeded with start and end nodes
    NewJourney,
    /// Open a saved journey for editing, or read-only preview
    OpenJourney { index: usize, preview_only: bool },
    /// Go back to the journey list
    CloseJourney,
    /// Persist the open journey into the library
    SaveJourney,
    /// Remove a journey from the library
    DeleteJourney { id: String },
    /// Re-read the library from storage
    ReloadLibrary,

    // Journey
    SetJourneyName { name: String },
    SetJourneyDescription { description: String },
    ToggleActive,

    // Properties
    AddProperty { data: NewProperty },
    UpdateProperty { id: String, patch: PropertyPatch },
    DeleteProperty { id: String },

    // Nodes
    AddNode { data: NewNode },
    UpdateNode { id: String, patch: NodePatch },
    DeleteNode { id: String },

    // Functions
    AddFunction { data: NewFunction },
    UpdateFunction { id: String, patch: FunctionPatch },
    DeleteFunction { id: String },

    // Mappings
    AddMapping { data: NewMapping },
    UpdateMapping { id: String, patch: MappingPatch },
    DeleteMapping { id: String },

    // Edges
    AddEdge { data: NewEdge },
    UpdateEdge { id: String, patch: EdgePatch },
    DeleteEdge { id: String },

    // Preview
    /// Click on a node: select it, or deselect it if already selected
    ToggleNodeSelection { node_id: String },
    ClearSelection,
    /// Store the dragged position as the node's manual placement
    PinNodePosition { node_id: String, x: f64, y: f64 },
    /// Drop manual placements so every node returns to the grid
    ResetManualPositions,
    ClearPreviewLayoutResetFlag,

    // UI State
    SetActiveTab { tab: ActiveTab },
    SetLayoutSettings { settings: LayoutSettings },
    /// Write the current settings to the config file
    SaveSettings,

    // File Operations
    /// Export the open journey as a JSON document
    ExportToFile { path: PathBuf },
    /// Import a journey document and open it
    ImportFromFile { path: PathBuf },
    /// Surface a message in the error window
    ShowError { message: String },
    ClearErrorMessage,
    ClearStatusMessage,
}

/// Apply a single action to modify the store state
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    match action {
        // Library
        Action::NewJourney => {
            let mut graph = GraphStore::create_empty();
            let (start, end) = (store.issuer.issue(), store.issuer.issue());
            graph.seed_start_and_end(&start, &end);
            store.open(graph);
            store.mutate(|_| {});
            store.mark_saved();
            store.screen = Screen::Editor { preview_only: false };
            store.active_tab = ActiveTab::Journey;
            vec![]
        }
        Action::OpenJourney {
            index,
            preview_only,
        } => {
            let Some(journey) = store.library.get(index).cloned() else {
                return vec![];
            };
            store.open(GraphStore::from_journey(journey));
            store.screen = Screen::Editor { preview_only };
            store.active_tab = if preview_only {
                ActiveTab::Preview
            } else {
                ActiveTab::Journey
            };
            vec![]
        }
        Action::CloseJourney => {
            store.screen = Screen::Library;
            store.selection.clear();
            vec![]
        }
        Action::SaveJourney => {
            let graph = store.journey.get_mut();
            assign_journey_id(graph, &mut store.issuer);
            vec![Effect::SaveJourney {
                journey: graph.journey().clone(),
            }]
        }
        Action::DeleteJourney { id } => vec![Effect::DeleteJourney { id }],
        Action::ReloadLibrary => vec![Effect::LoadLibrary],

        // Journey
        Action::SetJourneyName { name } => {
            store.mutate(|g| {
                g.replace_whole(JourneyPatch {
                    name: Some(name),
                    ..JourneyPatch::default()
                });
            });
            vec![]
        }
        Action::SetJourneyDescription { description } => {
            store.mutate(|g| {
                g.replace_whole(JourneyPatch {
                    description: Some(description),
                    ..JourneyPatch::default()
                });
            });
            vec![]
        }
        Action::ToggleActive => {
            store.mutate(|g| {
                g.toggle_active();
            });
            vec![]
        }

        // Properties
        Action::AddProperty { data } => {
            store.mutate(|g| {
                g.add_property(data);
            });
            vec![]
        }
        Action::UpdateProperty { id, patch } => {
            store.mutate(|g| {
                g.update_property(&id, patch);
            });
            vec![]
        }
        Action::DeleteProperty { id } => {
            store.mutate(|g| {
                g.delete_property(&id);
            });
            vec![]
        }

        // Nodes
        Action::AddNode { data } => {
            store.mutate(|g| {
                g.add_node(data);
            });
            vec![]
        }
        Action::UpdateNode { id, patch } => {
            store.mutate(|g| {
                g.update_node(&id, patch);
            });
            vec![]
        }
        Action::DeleteNode { id } => {
            store.mutate(|g| {
                g.delete_node(&id);
            });
            vec![]
        }

        // Functions
        Action::AddFunction { data } => {
            store.mutate(|g| {
                g.add_function(data);
            });
            vec![]
        }
        Action::UpdateFunction { id, patch } => {
            store.mutate(|g| {
                g.update_function(&id, patch);
            });
            vec![]
        }
        Action::DeleteFunction { id } => {
            store.mutate(|g| {
                g.delete_function(&id);
            });
            vec![]
        }

        // Mappings
        Action::AddMapping { data } => {
            store.mutate(|g| {
                g.add_mapping(data);
            });
            vec![]
        }
        Action::UpdateMapping { id, patch } => {
            store.mutate(|g| {
                g.update_mapping(&id, patch);
            });
            vec![]
        }
        Action::DeleteMapping { id } => {
            store.mutate(|g| {
                g.delete_mapping(&id);
            });
            vec![]
        }

        // Edges
        Action::AddEdge { data } => {
            store.mutate(|g| {
                g.add_edge(data);
            });
            vec![]
        }
        Action::UpdateEdge { id, patch } => {
            store.mutate(|g| {
                g.update_edge(&id, patch);
            });
            vec![]
        }
        Action::DeleteEdge { id } => {
            store.mutate(|g| {
                g.delete_edge(&id);
            });
            vec![]
        }

        // Preview
        Action::ToggleNodeSelection { node_id } => {
            store.selection.toggle(&node_id);
            vec![]
        }
        Action::ClearSelection => {
            store.selection.clear();
            vec![]
        }
        Action::PinNodePosition { node_id, x, y } => {
            let patch = NodePatch {
                x: Some(Some(x)),
                y: Some(Some(y)),
                ..NodePatch::default()
            };
            store.mutate(|g| {
                g.update_node(&node_id, patch);
            });
            vec![]
        }
        Action::ResetManualPositions => {
            let pinned: Vec<String> = store
                .current()
                .nodes
                .iter()
                .filter(|n| n.x.is_some() || n.y.is_some())
                .map(|n| n.id.clone())
                .collect();
            if !pinned.is_empty() {
                store.mutate(|g| {
                    for id in &pinned {
                        g.update_node(
                            id,
                            NodePatch {
                                x: Some(None),
                                y: Some(None),
                                ..NodePatch::default()
                            },
                        );
                    }
                });
            }
            vec![]
        }
        Action::ClearPreviewLayoutResetFlag => {
            store.preview_layout_reset_needed = false;
            vec![]
        }

        // UI State
        Action::SetActiveTab { tab } => {
            if !store.is_preview_only() {
                store.active_tab = tab;
            }
            vec![]
        }
        Action::SetLayoutSettings { settings } => {
            if settings != store.settings {
                store.settings = settings;
                store.preview_layout_reset_needed = true;
            }
            vec![]
        }
        Action::SaveSettings => {
            store.config.layout = store.settings.clone();
            vec![Effect::SaveConfig {
                config: store.config.clone(),
            }]
        }

        // File Operations
        Action::ExportToFile { path } => vec![Effect::ExportToFile {
            path,
            journey: store.current().clone(),
        }],
        Action::ImportFromFile { path } => {
            vec![Effect::ImportFromFile { path }]
        }
        Action::ShowError { message } => {
            store.error_message = Some(message);
            vec![]
        }
        Action::ClearErrorMessage => {
            store.error_message = None;
            vec![]
        }
        Action::ClearStatusMessage => {
            store.status_message = None;
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::test_store;
    use journey::{NodeType, PropertyType};

    fn apply(store: &mut Store, actions: Vec<Action>) -> Vec<Effect> {
        actions
            .into_iter()
            .flat_map(|action| update(store, action))
            .collect()
    }

    #[test]
    fn test_new_journey_is_seeded() {
        let mut store = test_store();
        apply(&mut store, vec![Action::NewJourney]);

        let journey = store.current();
        assert_eq!(journey.nodes.len(), 2);
        assert_eq!(journey.nodes[0].kind, NodeType::Start);
        assert_eq!(journey.edges.len(), 1);
        assert!(journey.edges[0].is_default);
        assert!(
            journey::is_assigned(&journey.edges[0].id),
            "seeded default edge gets an id"
        );
        assert_eq!(store.screen, Screen::Editor { preview_only: false });
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_custom_start_edge_replaces_default() {
        let mut store = test_store();
        apply(
            &mut store,
            vec![
                Action::NewJourney,
                Action::AddNode {
                    data: NewNode::new("Check", NodeType::Custom),
                },
            ],
        );
        let start = store.current().nodes[0].id.clone();
        let check = store.current().nodes[2].id.clone();
        apply(
            &mut store,
            vec![Action::AddEdge {
                data: NewEdge::between(start, check.clone()),
            }],
        );

        let journey = store.current();
        assert_eq!(journey.edges.len(), 1);
        assert!(!journey.edges[0].is_default);
        assert_eq!(journey.edges[0].to_node_id, check);
    }

    #[test]
    fn test_delete_selected_node_clears_selection() {
        let mut store = test_store();
        apply(&mut store, vec![Action::NewJourney]);
        let end = store.current().nodes[1].id.clone();

        apply(
            &mut store,
            vec![Action::ToggleNodeSelection {
                node_id: end.clone(),
            }],
        );
        assert!(store.selection.is_selected(&end));

        apply(&mut store, vec![Action::DeleteNode { id: end }]);
        assert_eq!(store.selection.selected(), None);
        assert!(store.current().edges.is_empty(), "edges cascade with node");
    }

    #[test]
    fn test_toggle_selection_twice() {
        let mut store = test_store();
        apply(&mut store, vec![Action::NewJourney]);
        let start = store.current().nodes[0].id.clone();
        let toggle = Action::ToggleNodeSelection { node_id: start };
        apply(&mut store, vec![toggle.clone(), toggle]);
        assert_eq!(store.selection.selected(), None);
    }

    #[test]
    fn test_save_assigns_journey_id() {
        let mut store = test_store();
        apply(&mut store, vec![Action::NewJourney]);
        let effects = apply(&mut store, vec![Action::SaveJourney]);
        match effects.as_slice() {
            [Effect::SaveJourney { journey }] => {
                assert!(journey::is_assigned(&journey.id));
                assert_eq!(journey.id, store.current().id);
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn test_pin_and_reset_positions() {
        let mut store = test_store();
        apply(&mut store, vec![Action::NewJourney]);
        let start = store.current().nodes[0].id.clone();
        apply(
            &mut store,
            vec![Action::PinNodePosition {
                node_id: start,
                x: 0.0,
                y: 12.5,
            }],
        );
        assert_eq!(store.current().nodes[0].x, Some(0.0));
        assert_eq!(store.current().nodes[0].y, Some(12.5));

        apply(&mut store, vec![Action::ResetManualPositions]);
        assert_eq!(store.current().nodes[0].x, None);
    }

    #[test]
    fn test_preview_only_locks_tab() {
        let mut store = test_store();
        store.library.push(journey::Journey::empty());
        apply(
            &mut store,
            vec![
                Action::OpenJourney {
                    index: 0,
                    preview_only: true,
                },
                Action::SetActiveTab {
                    tab: ActiveTab::Nodes,
                },
            ],
        );
        assert_eq!(store.active_tab, ActiveTab::Preview);
    }

    #[test]
    fn test_open_missing_index_is_ignored() {
        let mut store = test_store();
        apply(
            &mut store,
            vec![Action::OpenJourney {
                index: 3,
                preview_only: false,
            }],
        );
        assert_eq!(store.screen, Screen::Library);
    }

    #[test]
    fn test_property_delete_cascades_through_actions() {
        let mut store = test_store();
        apply(
            &mut store,
            vec![
                Action::NewJourney,
                Action::AddProperty {
                    data: NewProperty {
                        key: "email".to_string(),
                        kind: PropertyType::String,
                        validation_condition: None,
                    },
                },
            ],
        );
        let property = store.current().properties[0].id.clone();
        let start = store.current().nodes[0].id.clone();
        apply(
            &mut store,
            vec![
                Action::UpdateNode {
                    id: start,
                    patch: NodePatch {
                        properties: Some(vec![property.clone()]),
                        ..NodePatch::default()
                    },
                },
                Action::DeleteProperty { id: property },
            ],
        );
        assert!(store.current().nodes[0].properties.is_empty());
    }
}
