use crate::config::AppConfig;
use crate::store::{ActiveTab, Screen, Store};
use journey::{GraphStore, Journey, StorageError, export_journey, import_journey};
use std::path::{Path, PathBuf};

/// Deferred effects that must run outside the main reducer (e.g., file IO)
#[derive(Debug, Clone)]
pub enum Effect {
    /// Upsert the journey into the library and return to the list
    SaveJourney { journey: Journey },
    /// Remove a journey from the library
    DeleteJourney { id: String },
    /// Re-read the library from storage
    LoadLibrary,
    /// Write a single journey document to disk
    ExportToFile { path: PathBuf, journey: Journey },
    /// Read a journey document from disk and open it
    ImportFromFile { path: PathBuf },
    /// Persist the application config
    SaveConfig { config: AppConfig },
}

/// Execute a single effect against the store
pub fn run(store: &mut Store, effect: Effect) {
    match effect {
        Effect::SaveJourney { journey } => {
            match store.repository.try_save_journey(&journey) {
                Ok(library) => {
                    store.library = library;
                    store.mark_saved();
                    store.screen = Screen::Library;
                    store.status_message =
                        Some(format!("Journey \"{}\" saved", journey.name));
                    tracing::info!(id = %journey.id, "journey saved");
                }
                Err(e) => {
                    store.error_message =
                        Some(format!("Could not save journey: {e}"));
                }
            }
        }
        Effect::DeleteJourney { id } => {
            match store.repository.try_remove_journey(&id) {
                Ok(library) => store.library = library,
                Err(e) => {
                    store.error_message =
                        Some(format!("Could not delete journey: {e}"));
                }
            }
        }
        Effect::LoadLibrary => match store.repository.try_load() {
            Ok(library) => store.library = library,
            Err(e) => {
                store.error_message =
                    Some(format!("Could not load journeys: {e}"));
            }
        },
        Effect::ExportToFile { path, journey } => {
            if let Err(e) = write_journey(&path, &journey) {
                store.error_message = Some(e.to_string());
            } else {
                store.status_message =
                    Some(format!("Exported to {}", path.display()));
            }
        }
        Effect::ImportFromFile { path } => match read_journey(&path) {
            Ok(journey) => {
                store.open(GraphStore::from_journey(journey));
                store.mutate(|_| {});
                store.unsaved.set(true);
                store.screen = Screen::Editor {
                    preview_only: false,
                };
                store.active_tab = ActiveTab::Journey;
            }
            Err(e) => store.error_message = Some(e.to_string()),
        },
        Effect::SaveConfig { config } => {
            if let Err(e) = save_config(&config) {
                store.error_message =
                    Some(format!("Could not save settings: {e}"));
            }
        }
    }
}

fn write_journey(path: &Path, journey: &Journey) -> Result<(), StorageError> {
    std::fs::write(path, export_journey(journey)?)?;
    Ok(())
}

fn read_journey(path: &Path) -> Result<Journey, StorageError> {
    import_journey(&std::fs::read_to_string(path)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn save_config(config: &AppConfig) -> Result<(), crate::config::ConfigError> {
    let path = crate::config::config_path()?;
    crate::config::save_to_path(config, &path)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn save_config(_config: &AppConfig) -> Result<(), crate::config::ConfigError> {
    tracing::debug!("config is not persisted on the web");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, update};
    use crate::store::tests::test_store;

    fn dispatch(store: &mut Store, action: Action) {
        for effect in update(store, action) {
            run(store, effect);
        }
    }

    #[test]
    fn test_save_returns_to_library() {
        let mut store = test_store();
        dispatch(&mut store, Action::NewJourney);
        dispatch(
            &mut store,
            Action::SetJourneyName {
                name: "Onboarding".to_string(),
            },
        );
        assert!(store.has_unsaved_changes());

        dispatch(&mut store, Action::SaveJourney);
        assert_eq!(store.screen, Screen::Library);
        assert!(!store.has_unsaved_changes());
        assert_eq!(store.library.len(), 1);
        assert_eq!(store.library[0].name, "Onboarding");
        assert!(store.status_message.is_some());

        // Saving again replaces rather than appends.
        dispatch(
            &mut store,
            Action::OpenJourney {
                index: 0,
                preview_only: false,
            },
        );
        dispatch(&mut store, Action::SaveJourney);
        assert_eq!(store.library.len(), 1);
    }

    #[test]
    fn test_delete_journey() {
        let mut store = test_store();
        dispatch(&mut store, Action::NewJourney);
        dispatch(&mut store, Action::SaveJourney);
        let id = store.library[0].id.clone();

        dispatch(&mut store, Action::DeleteJourney { id });
        assert!(store.library.is_empty());
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journey.json");

        let mut store = test_store();
        dispatch(&mut store, Action::NewJourney);
        dispatch(
            &mut store,
            Action::SetJourneyName {
                name: "Exported".to_string(),
            },
        );
        dispatch(&mut store, Action::ExportToFile { path: path.clone() });
        assert_eq!(store.error_message, None);

        dispatch(&mut store, Action::CloseJourney);
        dispatch(&mut store, Action::ImportFromFile { path });
        assert_eq!(store.current().name, "Exported");
        assert_eq!(store.current().nodes.len(), 2);
        assert!(store.has_unsaved_changes());
        assert_eq!(store.screen, Screen::Editor { preview_only: false });
    }

    #[test]
    fn test_import_bad_file_sets_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();

        let mut store = test_store();
        dispatch(&mut store, Action::ImportFromFile { path });
        assert!(store.error_message.is_some());
        assert_eq!(store.screen, Screen::Library);
    }
}
