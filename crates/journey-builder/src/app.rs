use crate::actions::Action;
use crate::node_shapes::set_node_visuals;
use crate::state::State;
use crate::store::{ActiveTab, Screen, Store};
use crate::tabs::{self, PreviewState};
use eframe::egui;

const ACTIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(16, 185, 129);
const INACTIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);
const UNSAVED_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 160, 40);

pub struct JourneyApp {
    state: State,
    preview: PreviewState,
    confirm_discard: bool,
}

impl JourneyApp {
    pub fn new(store: Store) -> Self {
        Self {
            state: State::new(store),
            preview: PreviewState::default(),
            confirm_discard: false,
        }
    }

    fn store(&self) -> &Store {
        &self.state.store
    }
}

impl eframe::App for JourneyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        set_node_visuals(&self.state.store.settings.visuals);
        let mut out = Vec::new();

        self.menu_bar(ctx, &mut out);
        match self.store().screen {
            Screen::Library => self.library_screen(ctx, &mut out),
            Screen::Editor { preview_only } => {
                self.editor_screen(ctx, preview_only, &mut out)
            }
        }

        // Display error dialog if there's an error message
        if let Some(error) = self.store().error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        out.push(Action::ClearErrorMessage);
                    }
                });
        }

        if self.confirm_discard {
            egui::Window::new("Unsaved changes")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Discard the changes to this journey?");
                    ui.horizontal(|ui| {
                        if ui.button("Discard").clicked() {
                            out.push(Action::CloseJourney);
                            self.confirm_discard = false;
                        }
                        if ui.button("Keep editing").clicked() {
                            self.confirm_discard = false;
                        }
                    });
                });
        }

        for action in out {
            self.state.dispatch(action);
        }
        self.state.flush_actions();
        self.state.flush_effects();
    }
}

impl JourneyApp {
    fn menu_bar(&mut self, ctx: &egui::Context, out: &mut Vec<Action>) {
        let editing = matches!(
            self.store().screen,
            Screen::Editor {
                preview_only: false
            }
        );
        let in_editor = matches!(self.store().screen, Screen::Editor { .. });

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Journey").clicked() {
                        ui.close();
                        out.push(Action::NewJourney);
                    }
                    if ui
                        .add_enabled(editing, egui::Button::new("Save Journey"))
                        .clicked()
                    {
                        ui.close();
                        out.push(Action::SaveJourney);
                    }
                    ui.separator();
                    file_dialog_items(ui, in_editor, out);
                    if ui.button("Reload Library").clicked() {
                        ui.close();
                        out.push(Action::ReloadLibrary);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Save Display Settings").clicked() {
                        ui.close();
                        out.push(Action::SaveSettings);
                    }
                });

                if let Some(status) = &self.state.store.status_message {
                    ui.separator();
                    ui.label(status);
                    if ui.small_button("✕").clicked() {
                        out.push(Action::ClearStatusMessage);
                    }
                }
            });
        });
    }

    fn library_screen(&mut self, ctx: &egui::Context, out: &mut Vec<Action>) {
        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(16.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Customer Journeys");
                    if ui.button("+ Create Journey").clicked() {
                        out.push(Action::NewJourney);
                    }
                });
                ui.separator();

                let library = &self.state.store.library;
                if library.is_empty() {
                    ui.label("No journeys yet. Create one to get started.");
                    return;
                }

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (index, journey) in library.iter().enumerate() {
                        ui.group(|ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new(&journey.name).strong());
                                if journey.is_active {
                                    ui.colored_label(ACTIVE_COLOR, "active");
                                } else {
                                    ui.colored_label(INACTIVE_COLOR, "inactive");
                                }
                            });
                            if !journey.description.is_empty() {
                                ui.label(&journey.description);
                            }
                            let stats = journey.stats();
                            ui.colored_label(
                                INACTIVE_COLOR,
                                format!(
                                    "{} nodes · {} edges · {} functions · updated {}",
                                    stats.nodes,
                                    stats.edges,
                                    stats.functions,
                                    journey.updated_at.format("%Y-%m-%d %H:%M")
                                ),
                            );
                            ui.horizontal(|ui| {
                                if ui.button("Edit").clicked() {
                                    out.push(Action::OpenJourney {
                                        index,
                                        preview_only: false,
                                    });
                                }
                                if ui.button("Preview").clicked() {
                                    out.push(Action::OpenJourney {
                                        index,
                                        preview_only: true,
                                    });
                                }
                                if ui.button("Delete").clicked() {
                                    out.push(Action::DeleteJourney {
                                        id: journey.id.clone(),
                                    });
                                }
                            });
                        });
                        ui.add_space(4.0);
                    }
                });
            });
    }

    fn editor_screen(
        &mut self,
        ctx: &egui::Context,
        preview_only: bool,
        out: &mut Vec<Action>,
    ) {
        let active_tab = self.store().active_tab;

        // Tab navigation below menu bar
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("← Journeys").clicked() {
                    if self.state.store.has_unsaved_changes() {
                        self.confirm_discard = true;
                    } else {
                        out.push(Action::CloseJourney);
                    }
                }
                ui.separator();
                let name = &self.state.store.current().name;
                let title = if name.is_empty() { "Untitled journey" } else { name };
                ui.label(egui::RichText::new(title).strong());
                if self.state.store.has_unsaved_changes() {
                    ui.colored_label(UNSAVED_COLOR, "● unsaved");
                }
                ui.separator();
                for tab in ActiveTab::ALL {
                    let enabled = !preview_only || tab == ActiveTab::Preview;
                    ui.add_enabled_ui(enabled, |ui| {
                        if ui.selectable_label(active_tab == tab, tab.title()).clicked() {
                            out.push(Action::SetActiveTab { tab });
                        }
                    });
                }
            });
        });

        if !preview_only {
            egui::TopBottomPanel::bottom("flow_nav").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(previous) = active_tab.previous()
                        && ui.button("Previous").clicked()
                    {
                        out.push(Action::SetActiveTab { tab: previous });
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        match active_tab.next() {
                            Some(next) => {
                                if ui.button("Next").clicked() {
                                    out.extend(self.next_tab(active_tab, next));
                                }
                                if ui.button("Skip").clicked() {
                                    out.push(Action::SetActiveTab { tab: next });
                                }
                            }
                            None => {
                                if ui.button("Save Journey").clicked() {
                                    out.push(Action::SaveJourney);
                                }
                            }
                        }
                    });
                });
            });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(8.0))
            .show(ctx, |ui| {
                let State { store, cache, .. } = &mut self.state;
                if active_tab == ActiveTab::Preview {
                    tabs::show(active_tab, ui, store, cache, &mut self.preview, out);
                } else {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        tabs::show(active_tab, ui, store, cache, &mut self.preview, out);
                    });
                }
            });
    }

    /// Next only leaves the journey tab once the journey has a name.
    fn next_tab(&self, current: ActiveTab, next: ActiveTab) -> Vec<Action> {
        if current == ActiveTab::Journey
            && !journey::is_non_blank(&self.store().current().name)
        {
            return vec![Action::ShowError {
                message: "journey name is required".to_string(),
            }];
        }
        vec![Action::SetActiveTab { tab: next }]
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn file_dialog_items(ui: &mut egui::Ui, in_editor: bool, out: &mut Vec<Action>) {
    if ui
        .add_enabled(in_editor, egui::Button::new("Export Journey…"))
        .clicked()
    {
        ui.close();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .save_file()
        {
            out.push(Action::ExportToFile { path });
        }
    }
    if ui.button("Import Journey…").clicked() {
        ui.close();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            out.push(Action::ImportFromFile { path });
        }
    }
    ui.separator();
}

#[cfg(target_arch = "wasm32")]
fn file_dialog_items(_ui: &mut egui::Ui, _in_editor: bool, _out: &mut Vec<Action>) {}
