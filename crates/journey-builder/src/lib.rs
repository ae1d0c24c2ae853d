pub mod actions;
pub mod app;
pub mod cache;
pub mod config;
pub mod effects;
pub mod forms;
pub mod graph_view;
pub mod identity;
pub mod layout_grid;
pub mod layout_settings;
pub mod native;
pub mod node_shapes;
pub mod state;
pub mod store;
pub mod tabs;
pub mod versioned;
pub mod web;

pub use app::JourneyApp;

use config::AppConfig;
use journey::JourneyRepository;
use store::Store;

/// Build the application from a resolved config.
pub fn create_app(
    _cc: &eframe::CreationContext<'_>,
    config: AppConfig,
) -> JourneyApp {
    let repository = open_repository(&config);
    let store = Store::new(config, repository);
    tracing::info!(
        journeys = store.library.len(),
        slot = %store.repository.slot(),
        "journey library opened"
    );
    JourneyApp::new(store)
}

#[cfg(not(target_arch = "wasm32"))]
fn open_repository(config: &AppConfig) -> JourneyRepository {
    match config.resolve_data_dir() {
        Ok(dir) => JourneyRepository::with_slot(
            Box::new(journey::FileBlobStore::new(dir)),
            config.storage_slot.clone(),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "no data directory, journeys are kept in memory");
            JourneyRepository::in_memory()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn open_repository(config: &AppConfig) -> JourneyRepository {
    JourneyRepository::with_slot(
        Box::new(web::LocalStorageBlobStore),
        config.storage_slot.clone(),
    )
}
