// Per-tab editors. Each tab reads the open journey, edits its form draft in
// place and pushes actions; nothing here mutates the journey directly.

use crate::actions::Action;
use crate::cache::Cache;
use crate::forms::{FormError, KeyValueRow};
use crate::graph_view::{PreviewGraphView, node_id_at, node_positions, sync_selection};
use crate::layout_grid::{LayoutStateGrid, set_pending_layout};
use crate::layout_settings::{
    BADGE_FONT_RANGE, CANVAS_HEIGHT_RANGE, CANVAS_WIDTH_RANGE, LABEL_FONT_RANGE,
    NODE_RADIUS_RANGE, SliderRange,
};
use crate::store::{ActiveTab, Store};
use eframe::egui;
use egui_graphs::{SettingsInteraction, SettingsStyle, reset_layout};
use journey::{
    DanglingReference, FunctionType, HeaderKind, HttpMethod, Journey, NodeDetails, NodeType,
    PropertyType,
};
use petgraph::stable_graph::NodeIndex;

const MUTED: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);
const WARNING: egui::Color32 = egui::Color32::from_rgb(230, 160, 40);

/// Preview bookkeeping that lives across frames but not in the store.
#[derive(Debug, Default)]
pub struct PreviewState {
    layout_version: Option<u64>,
    dragging: Option<NodeIndex>,
}

pub fn show(
    tab: ActiveTab,
    ui: &mut egui::Ui,
    store: &mut Store,
    cache: &mut Cache,
    preview: &mut PreviewState,
    out: &mut Vec<Action>,
) {
    match tab {
        ActiveTab::Journey => journey_tab(ui, store, cache, out),
        ActiveTab::Properties => properties_tab(ui, store, out),
        ActiveTab::Nodes => nodes_tab(ui, store, out),
        ActiveTab::Functions => functions_tab(ui, store, out),
        ActiveTab::Mappings => mappings_tab(ui, store, out),
        ActiveTab::Edges => edges_tab(ui, store, out),
        ActiveTab::Preview => preview_tab(ui, store, cache, preview, out),
    }
}

// ------------------------------------------------------------------
// Helpers
// ------------------------------------------------------------------

/// Push the action built from a valid draft, or report the form error.
fn submit<T>(
    draft: Result<T, FormError>,
    out: &mut Vec<Action>,
    make: impl FnOnce(T) -> Action,
) -> bool {
    match draft {
        Ok(value) => {
            out.push(make(value));
            true
        }
        Err(e) => {
            out.push(Action::ShowError {
                message: e.to_string(),
            });
            false
        }
    }
}

fn node_name(journey: &Journey, id: &str) -> String {
    journey
        .node(id)
        .map(|n| n.name.clone())
        .unwrap_or_else(|| "(unknown)".to_string())
}

fn node_picker(ui: &mut egui::Ui, salt: &str, journey: &Journey, value: &mut String) {
    let selected = if value.is_empty() {
        "Select a node".to_string()
    } else {
        node_name(journey, value)
    };
    egui::ComboBox::from_id_salt(salt)
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for node in &journey.nodes {
                ui.selectable_value(value, node.id.clone(), &node.name);
            }
        });
}

fn property_picker(ui: &mut egui::Ui, salt: impl std::hash::Hash, journey: &Journey, value: &mut String) {
    let selected = journey
        .property(value)
        .map(|p| p.key.clone())
        .unwrap_or_else(|| "Select a property".to_string());
    egui::ComboBox::from_id_salt(salt)
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for property in &journey.properties {
                ui.selectable_value(value, property.id.clone(), &property.key);
            }
        });
}

/// Editable key/value rows with add and remove buttons.
fn key_value_rows(ui: &mut egui::Ui, salt: &str, label: &str, rows: &mut Vec<KeyValueRow>) {
    ui.label(label);
    let mut remove = None;
    egui::Grid::new(salt).num_columns(3).show(ui, |ui| {
        for (i, row) in rows.iter_mut().enumerate() {
            ui.add(egui::TextEdit::singleline(&mut row.key).hint_text("key").desired_width(120.0));
            ui.add(egui::TextEdit::singleline(&mut row.value).hint_text("value").desired_width(160.0));
            if ui.small_button("✕").clicked() {
                remove = Some(i);
            }
            ui.end_row();
        }
    });
    if let Some(i) = remove {
        rows.remove(i);
    }
    if ui.small_button("+ Add row").clicked() {
        rows.push(KeyValueRow::default());
    }
}

fn form_buttons(ui: &mut egui::Ui, editing: bool, noun: &str) -> (bool, bool) {
    let mut confirmed = false;
    let mut cancelled = false;
    ui.horizontal(|ui| {
        let label = if editing {
            format!("Update {noun}")
        } else {
            format!("Add {noun}")
        };
        confirmed = ui.button(label).clicked();
        if editing {
            cancelled = ui.button("Cancel").clicked();
        }
    });
    (confirmed, cancelled)
}

fn slider(ui: &mut egui::Ui, value: &mut f32, range: SliderRange, label: &str) -> bool {
    ui.add(
        egui::Slider::new(value, range.min..=range.max)
            .step_by(f64::from(range.step))
            .text(label),
    )
    .changed()
}

// ------------------------------------------------------------------
// Journey
// ------------------------------------------------------------------

fn journey_tab(ui: &mut egui::Ui, store: &mut Store, cache: &mut Cache, out: &mut Vec<Action>) {
    let dangling = cache.dangling.get(store).clone();
    let duplicates = cache.duplicate_keys.get(store).clone();
    let journey = store.journey.get().journey();
    let drafts = &mut store.drafts;

    ui.heading("Journey Details");
    ui.separator();

    ui.label("Name");
    if ui.text_edit_singleline(&mut drafts.journey_name).changed() {
        out.push(Action::SetJourneyName {
            name: drafts.journey_name.clone(),
        });
    }
    ui.label("Description");
    if ui
        .text_edit_multiline(&mut drafts.journey_description)
        .changed()
    {
        out.push(Action::SetJourneyDescription {
            description: drafts.journey_description.clone(),
        });
    }

    let mut active = journey.is_active;
    if ui.checkbox(&mut active, "Active").changed() {
        out.push(Action::ToggleActive);
    }

    ui.add_space(8.0);
    let stats = journey.stats();
    ui.label(format!(
        "{} properties · {} nodes · {} functions · {} mappings · {} edges",
        stats.properties, stats.nodes, stats.functions, stats.mappings, stats.edges
    ));
    ui.colored_label(
        MUTED,
        format!(
            "Created {} · updated {}",
            journey.created_at.format("%Y-%m-%d %H:%M"),
            journey.updated_at.format("%Y-%m-%d %H:%M")
        ),
    );

    if dangling.is_empty() && duplicates.is_empty() {
        return;
    }
    ui.add_space(8.0);
    ui.label(egui::RichText::new("Warnings").strong());
    for (key, count) in &duplicates {
        ui.colored_label(WARNING, format!("Property key \"{key}\" is used {count} times"));
    }
    for reference in &dangling {
        ui.colored_label(WARNING, dangling_text(journey, reference));
    }
}

fn dangling_text(journey: &Journey, reference: &DanglingReference) -> String {
    match reference {
        DanglingReference::NodeProperty { node_id, property_id } => format!(
            "Node \"{}\" lists missing property {property_id}",
            node_name(journey, node_id)
        ),
        DanglingReference::EdgeSource { edge_id, node_id } => {
            format!("Edge {edge_id} starts at missing node {node_id}")
        }
        DanglingReference::EdgeTarget { edge_id, node_id } => {
            format!("Edge {edge_id} ends at missing node {node_id}")
        }
        DanglingReference::MappingNode { mapping_id, node_id } => {
            format!("Mapping {mapping_id} points at missing node {node_id}")
        }
        DanglingReference::MappingFunction {
            mapping_id,
            function_id,
        } => format!("Mapping {mapping_id} points at missing function {function_id}"),
        DanglingReference::HeaderProperty {
            function_id,
            header,
            property_id,
        } => format!(
            "Function {function_id} header \"{header}\" uses missing property {property_id}"
        ),
        DanglingReference::BodyProperty {
            function_id,
            field,
            property_id,
        } => format!(
            "Function {function_id} body field \"{field}\" uses missing property {property_id}"
        ),
    }
}

// ------------------------------------------------------------------
// Properties
// ------------------------------------------------------------------

fn properties_tab(ui: &mut egui::Ui, store: &mut Store, out: &mut Vec<Action>) {
    let journey = store.journey.get().journey();
    let form = &mut store.drafts.property;

    ui.heading("Properties");
    ui.separator();
    egui::Grid::new("property_list").striped(true).show(ui, |ui| {
        for property in &journey.properties {
            ui.label(&property.key);
            ui.label(property.kind.as_str());
            ui.label(property.validation_condition.as_deref().unwrap_or(""));
            if ui.small_button("Edit").clicked() {
                form.edit(&property.id, crate::forms::PropertyDraft::from_property(property));
            }
            if ui.small_button("Delete").clicked() {
                out.push(Action::DeleteProperty {
                    id: property.id.clone(),
                });
            }
            ui.end_row();
        }
    });

    ui.add_space(8.0);
    ui.separator();
    let draft = &mut form.draft;
    ui.label("Key");
    ui.text_edit_singleline(&mut draft.key);
    ui.label("Type");
    egui::ComboBox::from_id_salt("property_type")
        .selected_text(draft.kind.as_str())
        .show_ui(ui, |ui| {
            for kind in PropertyType::ALL {
                ui.selectable_value(&mut draft.kind, kind, kind.as_str());
            }
        });
    ui.label("Validation condition");
    ui.text_edit_singleline(&mut draft.validation_condition);

    let (confirmed, cancelled) = form_buttons(ui, form.editing.is_some(), "Property");
    if confirmed {
        let done = match form.editing.clone() {
            Some(id) => submit(form.draft.to_patch(), out, |patch| Action::UpdateProperty { id, patch }),
            None => submit(form.draft.to_new(), out, |data| Action::AddProperty { data }),
        };
        if done {
            form.reset();
        }
    }
    if cancelled {
        form.reset();
    }
}

// ------------------------------------------------------------------
// Nodes
// ------------------------------------------------------------------

fn nodes_tab(ui: &mut egui::Ui, store: &mut Store, out: &mut Vec<Action>) {
    let journey = store.journey.get().journey();
    let form = &mut store.drafts.node;

    ui.heading("Nodes");
    ui.separator();
    egui::Grid::new("node_list").striped(true).show(ui, |ui| {
        for node in &journey.nodes {
            ui.label(&node.name);
            ui.label(node.kind.as_str());
            ui.label(format!("{} props", node.properties.len()));
            if ui.small_button("Edit").clicked() {
                form.edit(&node.id, crate::forms::NodeDraft::from_node(node));
            }
            if ui.small_button("Delete").clicked() {
                out.push(Action::DeleteNode { id: node.id.clone() });
            }
            ui.end_row();
        }
    });

    ui.add_space(8.0);
    ui.separator();
    let draft = &mut form.draft;
    ui.label("Name");
    ui.text_edit_singleline(&mut draft.name);
    ui.label("Type");
    egui::ComboBox::from_id_salt("node_type")
        .selected_text(draft.kind.as_str())
        .show_ui(ui, |ui| {
            for kind in NodeType::ALL {
                ui.selectable_value(&mut draft.kind, kind, kind.as_str());
            }
        });
    ui.label("Description");
    ui.text_edit_multiline(&mut draft.description);
    ui.label("Properties");
    if journey.properties.is_empty() {
        ui.colored_label(MUTED, "No properties defined yet");
    }
    for property in &journey.properties {
        let mut checked = draft.properties.contains(&property.id);
        if ui.checkbox(&mut checked, &property.key).changed() {
            draft.toggle_property(&property.id);
        }
    }

    let (confirmed, cancelled) = form_buttons(ui, form.editing.is_some(), "Node");
    if confirmed {
        let done = match form.editing.clone() {
            Some(id) => submit(form.draft.to_patch(), out, |patch| Action::UpdateNode { id, patch }),
            None => submit(form.draft.to_new(), out, |data| Action::AddNode { data }),
        };
        if done {
            form.reset();
        }
    }
    if cancelled {
        form.reset();
    }
}

// ------------------------------------------------------------------
// Functions
// ------------------------------------------------------------------

fn functions_tab(ui: &mut egui::Ui, store: &mut Store, out: &mut Vec<Action>) {
    let journey = store.journey.get().journey();
    let form = &mut store.drafts.function;

    ui.heading("Functions");
    ui.separator();
    egui::Grid::new("function_list").striped(true).show(ui, |ui| {
        for function in &journey.functions {
            ui.label(&function.name);
            ui.label(function.kind.as_str());
            ui.label(format!(
                "{} {}{}",
                function.config.method.as_str(),
                function.config.host,
                function.config.path
            ));
            if ui.small_button("Edit").clicked() {
                form.edit(&function.id, crate::forms::FunctionDraft::from_function(function));
            }
            if ui.small_button("Delete").clicked() {
                out.push(Action::DeleteFunction {
                    id: function.id.clone(),
                });
            }
            ui.end_row();
        }
    });

    ui.add_space(8.0);
    ui.separator();
    let draft = &mut form.draft;
    ui.label("Name");
    ui.text_edit_singleline(&mut draft.name);
    ui.horizontal(|ui| {
        ui.label("Type");
        egui::ComboBox::from_id_salt("function_type")
            .selected_text(draft.kind.as_str())
            .show_ui(ui, |ui| {
                for kind in [FunctionType::Api, FunctionType::Kafka] {
                    ui.selectable_value(&mut draft.kind, kind, kind.as_str());
                }
            });
        ui.label("Method");
        egui::ComboBox::from_id_salt("function_method")
            .selected_text(draft.method.as_str())
            .show_ui(ui, |ui| {
                for method in HttpMethod::ALL {
                    ui.selectable_value(&mut draft.method, method, method.as_str());
                }
            });
    });
    ui.label("Host");
    ui.text_edit_singleline(&mut draft.host);
    ui.label("Path");
    ui.text_edit_singleline(&mut draft.path);

    key_value_rows(ui, "header_params", "Header params", &mut draft.header_params);

    ui.label("Headers");
    let mut remove = None;
    for (i, header) in draft.headers.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut header.key).hint_text("key").desired_width(120.0));
            match header.kind {
                HeaderKind::Custom => {
                    ui.add(
                        egui::TextEdit::singleline(&mut header.value)
                            .hint_text("value")
                            .desired_width(160.0),
                    );
                }
                HeaderKind::Property => {
                    property_picker(ui, ("header_property", i), journey, &mut header.value);
                }
            }
            if ui.small_button("✕").clicked() {
                remove = Some(i);
            }
        });
    }
    if let Some(i) = remove {
        draft.headers.remove(i);
    }
    ui.horizontal(|ui| {
        if ui.small_button("+ Custom header").clicked() {
            draft.add_header(HeaderKind::Custom);
        }
        if ui.small_button("+ Property header").clicked() {
            draft.add_header(HeaderKind::Property);
        }
    });

    key_value_rows(ui, "request_body", "Request body", &mut draft.request_body);
    key_value_rows(
        ui,
        "request_body_path",
        "Request body path",
        &mut draft.request_body_path,
    );
    key_value_rows(ui, "input_properties", "Input properties", &mut draft.input_properties);
    key_value_rows(ui, "output_properties", "Output properties", &mut draft.output_properties);

    let (confirmed, cancelled) = form_buttons(ui, form.editing.is_some(), "Function");
    if confirmed {
        let done = match form.editing.clone() {
            Some(id) => submit(form.draft.to_patch(), out, |patch| Action::UpdateFunction { id, patch }),
            None => submit(form.draft.to_new(), out, |data| Action::AddFunction { data }),
        };
        if done {
            form.reset();
        }
    }
    if cancelled {
        form.reset();
    }
}

// ------------------------------------------------------------------
// Mappings
// ------------------------------------------------------------------

fn mappings_tab(ui: &mut egui::Ui, store: &mut Store, out: &mut Vec<Action>) {
    let journey = store.journey.get().journey();
    let form = &mut store.drafts.mapping;

    ui.heading("Node ↔ Function Mappings");
    ui.separator();
    egui::Grid::new("mapping_list").striped(true).show(ui, |ui| {
        for mapping in &journey.mappings {
            let function = journey
                .function(&mapping.function_id)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| "(unknown)".to_string());
            ui.label(&mapping.name);
            ui.label(format!("{} → {}", node_name(journey, &mapping.node_id), function));
            ui.label(&mapping.condition);
            if ui.small_button("Edit").clicked() {
                form.edit(&mapping.id, crate::forms::MappingDraft::from_mapping(mapping));
            }
            if ui.small_button("Delete").clicked() {
                out.push(Action::DeleteMapping {
                    id: mapping.id.clone(),
                });
            }
            ui.end_row();
        }
    });

    ui.add_space(8.0);
    ui.separator();
    let draft = &mut form.draft;
    ui.label("Name");
    ui.text_edit_singleline(&mut draft.name);
    ui.label("Description");
    ui.text_edit_multiline(&mut draft.description);
    ui.label("Node");
    node_picker(ui, "mapping_node", journey, &mut draft.node_id);
    ui.label("Function");
    let selected = journey
        .function(&draft.function_id)
        .map(|f| f.name.clone())
        .unwrap_or_else(|| "Select a function".to_string());
    egui::ComboBox::from_id_salt("mapping_function")
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for function in &journey.functions {
                ui.selectable_value(&mut draft.function_id, function.id.clone(), &function.name);
            }
        });
    ui.label("Condition");
    ui.text_edit_singleline(&mut draft.condition);

    let (confirmed, cancelled) = form_buttons(ui, form.editing.is_some(), "Mapping");
    if confirmed {
        let done = match form.editing.clone() {
            Some(id) => submit(form.draft.to_patch(), out, |patch| Action::UpdateMapping { id, patch }),
            None => submit(form.draft.to_new(), out, |data| Action::AddMapping { data }),
        };
        if done {
            form.reset();
        }
    }
    if cancelled {
        form.reset();
    }
}

// ------------------------------------------------------------------
// Edges
// ------------------------------------------------------------------

fn edges_tab(ui: &mut egui::Ui, store: &mut Store, out: &mut Vec<Action>) {
    let journey = store.journey.get().journey();
    let form = &mut store.drafts.edge;

    ui.heading("Edges");
    ui.separator();
    egui::Grid::new("edge_list").striped(true).show(ui, |ui| {
        for edge in &journey.edges {
            ui.label(format!(
                "{} → {}",
                node_name(journey, &edge.from_node_id),
                node_name(journey, &edge.to_node_id)
            ));
            ui.label(&edge.validation_condition);
            if edge.is_default {
                ui.colored_label(MUTED, "default");
            } else {
                ui.label("");
            }
            if ui.small_button("Edit").clicked() {
                form.edit(&edge.id, crate::forms::EdgeDraft::from_edge(edge));
            }
            if ui.small_button("Delete").clicked() {
                out.push(Action::DeleteEdge { id: edge.id.clone() });
            }
            ui.end_row();
        }
    });

    ui.add_space(8.0);
    ui.separator();
    let draft = &mut form.draft;
    ui.label("From");
    node_picker(ui, "edge_from", journey, &mut draft.from_node_id);
    ui.label("To");
    node_picker(ui, "edge_to", journey, &mut draft.to_node_id);
    ui.label("Validation condition");
    ui.text_edit_singleline(&mut draft.validation_condition);

    let (confirmed, cancelled) = form_buttons(ui, form.editing.is_some(), "Edge");
    if confirmed {
        let done = match form.editing.clone() {
            Some(id) => submit(form.draft.to_patch(), out, |patch| Action::UpdateEdge { id, patch }),
            None => submit(form.draft.to_new(), out, |data| Action::AddEdge { data }),
        };
        if done {
            form.reset();
        }
    }
    if cancelled {
        form.reset();
    }
}

// ------------------------------------------------------------------
// Preview
// ------------------------------------------------------------------

fn preview_tab(
    ui: &mut egui::Ui,
    store: &mut Store,
    cache: &mut Cache,
    preview: &mut PreviewState,
    out: &mut Vec<Action>,
) {
    egui::SidePanel::right("node_details")
        .exact_width(280.0)
        .show_inside(ui, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                node_details_panel(ui, store, out);
                ui.add_space(12.0);
                ui.separator();
                preview_settings(ui, store, out);
            });
        });

    let (drawn_nodes, drawn_edges) = {
        let scene = cache.scene.get(store);
        (scene.nodes.len(), scene.edges.len())
    };

    egui::CentralPanel::default().show_inside(ui, |ui| {
        cache.preview_graph.get_mut(store);
        let version = cache.preview_graph.version();
        let graph = cache.preview_graph.get_mut(store);

        if store.preview_layout_reset_needed || preview.layout_version != Some(version) {
            set_pending_layout(&node_positions(graph));
            reset_layout::<LayoutStateGrid>(ui, None);
            preview.layout_version = Some(version);
            preview.dragging = None;
            out.push(Action::ClearPreviewLayoutResetFlag);
        }

        sync_selection(graph, &store.selection);

        let interactions = SettingsInteraction::new()
            .with_dragging_enabled(!store.is_preview_only())
            .with_node_clicking_enabled(true)
            .with_node_selection_enabled(false);
        let style = SettingsStyle::new().with_labels_always(store.settings.visuals.show_labels);

        let available_height = ui.available_height() - 24.0;
        ui.allocate_ui_with_layout(
            egui::Vec2::new(ui.available_width(), available_height),
            egui::Layout::top_down(egui::Align::Center),
            |ui| {
                ui.add(
                    &mut PreviewGraphView::new(graph)
                        .with_interactions(&interactions)
                        .with_styles(&style),
                );
            },
        );

        let pointer = ui.input(|i| i.pointer.clone());
        if pointer.primary_clicked()
            && let Some(idx) = graph.hovered_node()
            && let Some(node_id) = node_id_at(graph, idx)
        {
            out.push(Action::ToggleNodeSelection { node_id });
        }

        // A finished drag pins the node where it was dropped.
        match graph.dragged_node() {
            Some(idx) => preview.dragging = Some(idx),
            None => {
                if let Some(idx) = preview.dragging.take()
                    && let Some(node) = graph.node(idx)
                {
                    let location = node.location();
                    out.push(Action::PinNodePosition {
                        node_id: node.payload().id.clone(),
                        x: f64::from(location.x),
                        y: f64::from(location.y),
                    });
                }
            }
        }

        ui.colored_label(
            MUTED,
            format!("{drawn_nodes} nodes · {drawn_edges} edges drawn · click a node for details"),
        );
    });
}

fn node_details_panel(ui: &mut egui::Ui, store: &Store, out: &mut Vec<Action>) {
    ui.heading("Node Details");
    ui.separator();
    let journey = store.current();
    let Some(details) = store
        .selection
        .selected()
        .and_then(|id| NodeDetails::resolve(journey, id))
    else {
        ui.colored_label(MUTED, "Select a node in the preview");
        return;
    };

    ui.label(egui::RichText::new(&details.node.name).strong());
    ui.label(details.node.kind.as_str());
    if !details.node.description.is_empty() {
        ui.label(&details.node.description);
    }

    ui.add_space(6.0);
    ui.label(egui::RichText::new("Properties").strong());
    if details.properties.is_empty() {
        ui.colored_label(MUTED, "none");
    }
    for property in &details.properties {
        let condition = property
            .validation_condition
            .as_deref()
            .map(|c| format!(" ({c})"))
            .unwrap_or_default();
        ui.label(format!("{}: {}{}", property.key, property.kind.as_str(), condition));
    }

    ui.add_space(6.0);
    ui.label(egui::RichText::new("Functions").strong());
    if details.functions.is_empty() {
        ui.colored_label(MUTED, "none");
    }
    for mapped in &details.functions {
        let function = mapped.function;
        ui.label(format!(
            "{} [{}] {} {}{}",
            function.name,
            function.kind.as_str(),
            function.config.method.as_str(),
            function.config.host,
            function.config.path
        ));
        if !mapped.mapping.condition.is_empty() {
            ui.colored_label(MUTED, format!("when {}", mapped.mapping.condition));
        }
    }

    ui.add_space(6.0);
    ui.label(egui::RichText::new("Connections").strong());
    for connected in &details.incoming {
        ui.label(format!(
            "← {}{}",
            connected.peer_name.unwrap_or("(unknown)"),
            edge_suffix(&connected.edge.validation_condition, connected.edge.is_default)
        ));
    }
    for connected in &details.outgoing {
        ui.label(format!(
            "→ {}{}",
            connected.peer_name.unwrap_or("(unknown)"),
            edge_suffix(&connected.edge.validation_condition, connected.edge.is_default)
        ));
    }

    ui.add_space(6.0);
    if ui.button("Close").clicked() {
        out.push(Action::ClearSelection);
    }
}

fn edge_suffix(condition: &str, is_default: bool) -> String {
    match (condition.is_empty(), is_default) {
        (_, true) => " (default)".to_string(),
        (true, false) => String::new(),
        (false, false) => format!(" [{condition}]"),
    }
}

fn preview_settings(ui: &mut egui::Ui, store: &Store, out: &mut Vec<Action>) {
    ui.label(egui::RichText::new("Display").strong());
    let mut settings = store.settings.clone();
    let mut changed = false;
    let visuals = &mut settings.visuals;
    changed |= ui.checkbox(&mut visuals.show_labels, "Show labels").changed();
    changed |= ui
        .checkbox(&mut visuals.show_property_badges, "Property badges")
        .changed();
    changed |= ui
        .checkbox(&mut visuals.show_function_badges, "Function badges")
        .changed();
    changed |= ui.checkbox(&mut visuals.show_edge_labels, "Edge conditions").changed();
    changed |= slider(ui, &mut visuals.node_radius, NODE_RADIUS_RANGE, "Node radius");
    changed |= slider(ui, &mut visuals.label_font_size, LABEL_FONT_RANGE, "Label font");
    changed |= slider(ui, &mut visuals.badge_font_size, BADGE_FONT_RANGE, "Badge font");
    changed |= slider(ui, &mut settings.canvas_width, CANVAS_WIDTH_RANGE, "Canvas width");
    changed |= slider(ui, &mut settings.canvas_height, CANVAS_HEIGHT_RANGE, "Canvas height");
    if changed {
        out.push(Action::SetLayoutSettings { settings });
    }

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!store.is_preview_only(), egui::Button::new("Reset positions"))
            .clicked()
        {
            out.push(Action::ResetManualPositions);
        }
        if ui.button("Save settings").clicked() {
            out.push(Action::SaveSettings);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_reports_form_errors() {
        let mut out = Vec::new();
        let ok = submit(
            Err::<(), _>(FormError::Blank("node name")),
            &mut out,
            |_| Action::ClearSelection,
        );
        assert!(!ok);
        assert!(matches!(
            out.as_slice(),
            [Action::ShowError { message }] if message == "node name is required"
        ));

        out.clear();
        assert!(submit(Ok(()), &mut out, |_| Action::ClearSelection));
        assert!(matches!(out.as_slice(), [Action::ClearSelection]));
    }

    #[test]
    fn test_edge_suffix() {
        assert_eq!(edge_suffix("", true), " (default)");
        assert_eq!(edge_suffix("", false), "");
        assert_eq!(edge_suffix("age > 18", false), " [age > 18]");
    }
}
